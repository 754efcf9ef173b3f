use super::types::{AudioData, AudioError};
use hound::{SampleFormat, WavReader};
use std::path::Path;
use tracing::debug;

/// Reads and parses a WAV file, converting samples to normalized f32 values.
///
/// This function supports the following WAV formats:
/// - 32-bit float
/// - 8-bit, 16-bit, 24-bit and 32-bit integer
///
/// All integer formats are normalized to the [-1, 1] range.
///
/// # Errors
/// * `AudioError::Io` if the file cannot be opened
/// * `AudioError::Decode` if the WAV format is unsupported or a sample is corrupt
pub fn read_wav_file(path: &Path) -> Result<AudioData, AudioError> {
    let reader = WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();
    debug!(
        "WAV format: {:?} {}-bit, {} Hz, {} channels",
        spec.sample_format, spec.bits_per_sample, spec.sample_rate, spec.channels
    );

    // Convert samples to f32, regardless of input format
    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map_err(wav_error))
            .collect::<Result<Vec<f32>, AudioError>>()?,
        (SampleFormat::Int, 8) => reader
            .into_samples::<i8>()
            .map(|s| s.map_err(wav_error))
            .map(|s| Ok(s? as f32 / 128.0))
            .collect::<Result<Vec<f32>, AudioError>>()?,
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map_err(wav_error))
            .map(|s| Ok(s? as f32 / 32768.0))
            .collect::<Result<Vec<f32>, AudioError>>()?,
        (SampleFormat::Int, 24) => reader
            .into_samples::<i32>()
            .map(|s| s.map_err(wav_error))
            .map(|s| Ok(s? as f32 / 8388608.0))
            .collect::<Result<Vec<f32>, AudioError>>()?,
        (SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .map(|s| s.map_err(wav_error))
            .map(|s| Ok(s? as f32 / 2147483648.0))
            .collect::<Result<Vec<f32>, AudioError>>()?,
        _ => {
            return Err(AudioError::Decode(format!(
                "Unsupported WAV format: {:?} {}-bit",
                spec.sample_format, spec.bits_per_sample
            )))
        }
    };

    Ok(AudioData {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

fn wav_error(err: hound::Error) -> AudioError {
    match err {
        hound::Error::IoError(io) if io.kind() != std::io::ErrorKind::UnexpectedEof => {
            AudioError::Io(io)
        }
        other => AudioError::Decode(other.to_string()),
    }
}
