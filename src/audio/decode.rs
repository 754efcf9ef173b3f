//! Compressed and container formats decoded with symphonia.

use super::types::{AudioData, AudioError};
use super::wav::read_wav_file;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Reads any supported audio file.
///
/// `.wav` files go through hound, everything else (MP3, FLAC, OGG/Vorbis, AAC/MP4)
/// is probed and decoded by symphonia.
pub fn read_audio_file(path: &Path) -> Result<AudioData, AudioError> {
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav") || ext.eq_ignore_ascii_case("wave"));

    if is_wav {
        read_wav_file(path)
    } else {
        decode_with_symphonia(path)
    }
}

/// Decodes an entire file to interleaved f32 samples.
pub fn decode_with_symphonia(path: &Path) -> Result<AudioData, AudioError> {
    debug!("Decoding {} with symphonia", path.display());

    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Give the probe a hint from the file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Decode(format!("Failed to probe format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::Decode("No audio track found".to_string()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(format!("Failed to create decoder: {}", e)))?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(AudioError::Decode(format!("Failed to read packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt packets are skipped, the rest of the stream is still usable
                warn!("Skipping undecodable packet: {}", e);
            }
            Err(e) => {
                return Err(AudioError::Decode(format!("Decoder failed: {}", e)));
            }
        }
    }

    if sample_rate == 0 || channels == 0 {
        return Err(AudioError::Decode(
            "Stream did not report a sample rate or channel layout".to_string(),
        ));
    }

    debug!(
        "Decoded {} frames at {} Hz ({} channels)",
        samples.len() / channels as usize,
        sample_rate,
        channels
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
    })
}
