// Audio processing tests
//
// These tests focus on loading sound files and extracting the five metrics
// that drive the compressor recommendation.
//
// The tests cover:
// - WAV file loading and validation
// - The symphonia decode path for non-WAV containers
// - Level statistics of silent and sine signals
// - Spectral statistics of a pure tone
// - Error handling for missing and undecodable files

use compressor_advisor::audio::{self, AnalysisConfig, AudioError};
use std::fs;
use std::path::Path;

mod test_utils;
use test_utils::{write_silent_wav, write_sine_wav, SAMPLE_RATE, SINE_FREQ};

/// Test WAV file loading functionality.
///
/// This test verifies:
/// - Loading a stereo WAV file from disk
/// - Correct extraction of WAV properties (sample rate, channels)
/// - Mixdown to mono keeps the per-channel signal
#[test]
fn test_wav_file_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sine_wav(dir.path(), "stereo.wav", SINE_FREQ, 0.5, 44100, 2);

    let data = audio::read_audio_file(&path).expect("Failed to load WAV file");
    assert_eq!(data.sample_rate, 44100);
    assert_eq!(data.channels, 2);
    assert_eq!(data.frames(), 44100);

    let mono = data.to_mono();
    assert_eq!(mono.len(), 44100);
    assert!((audio::peak(&mono) - 0.5).abs() < 1e-3);
}

/// Test the symphonia decode path.
///
/// This test verifies:
/// - symphonia decodes a stereo PCM file written by hound
/// - Sample rate, channel count and frame count match the file
/// - Samples are normalized the same way as the hound reader
#[test]
fn test_symphonia_decoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sine_wav(dir.path(), "stereo.wav", SINE_FREQ, 0.5, 44100, 2);

    let data = audio::decode_with_symphonia(&path).expect("Failed to decode with symphonia");
    assert_eq!(data.sample_rate, 44100);
    assert_eq!(data.channels, 2);
    assert_eq!(data.frames(), 44100);

    let mono = data.to_mono();
    assert!((audio::peak(&mono) - 0.5).abs() < 1e-3);

    let reference = audio::read_wav_file(&path).unwrap();
    let max_difference = reference
        .samples
        .iter()
        .zip(&data.samples)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    assert!(max_difference < 1e-3, "decoders disagree by {}", max_difference);
}

/// Test metrics of a silent file.
///
/// This test verifies:
/// - rms, peak and dynamic range are exactly zero
/// - spectral statistics of silence are zero
#[test]
fn test_silent_file_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_silent_wav(dir.path(), "silence.wav", SAMPLE_RATE as usize);

    let metrics = audio::analyze_file(&path, &AnalysisConfig::default())
        .expect("Failed to analyze silent file");
    assert_eq!(metrics.rms, 0.0);
    assert_eq!(metrics.peak, 0.0);
    assert_eq!(metrics.dynamic_range, 0.0);
    assert_eq!(metrics.spectral_centroid, 0.0);
    assert_eq!(metrics.spectral_rolloff, 0.0);
}

/// Test metrics of a full-scale sine wave.
///
/// This test verifies:
/// - peak is close to the amplitude
/// - rms is close to amplitude / sqrt(2)
/// - dynamic range equals peak - rms exactly
/// - the spectral centroid sits near the tone frequency
#[test]
fn test_sine_file_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sine_wav(dir.path(), "sine.wav", SINE_FREQ, 1.0, SAMPLE_RATE, 1);

    let metrics =
        audio::analyze_file(&path, &AnalysisConfig::default()).expect("Failed to analyze sine");

    assert!((metrics.peak - 1.0).abs() < 1e-3, "peak was {}", metrics.peak);
    assert!(
        (metrics.rms - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3,
        "rms was {}",
        metrics.rms
    );
    assert_eq!(metrics.dynamic_range, metrics.peak - metrics.rms);
    assert!(
        (metrics.spectral_centroid - SINE_FREQ).abs() < 200.0,
        "centroid was {}",
        metrics.spectral_centroid
    );
    assert!(metrics.spectral_rolloff >= metrics.spectral_centroid * 0.5);
}

/// Test resampling before analysis.
///
/// This test verifies:
/// - A 44.1 kHz file is analyzed at the 22.05 kHz default rate
/// - Level statistics survive resampling
#[test]
fn test_analysis_resamples_to_target_rate() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sine_wav(dir.path(), "hires.wav", SINE_FREQ, 0.5, 44100, 1);

    let resampled = audio::analyze_file(&path, &AnalysisConfig::default()).unwrap();
    let native = audio::analyze_file(
        &path,
        &AnalysisConfig {
            target_sample_rate: None,
            ..AnalysisConfig::default()
        },
    )
    .unwrap();

    assert!((resampled.rms - native.rms).abs() < 0.01);
    assert!((resampled.spectral_centroid - native.spectral_centroid).abs() < 100.0);
}

/// Test audio processing error cases.
///
/// This test verifies:
/// - Proper error handling for non-existent files
/// - Non-audio bytes fail with a decode error
/// - Invalid analysis parameters are rejected
#[test]
fn test_audio_error_cases() {
    let result = audio::read_audio_file(Path::new("non_existent_file.wav"));
    assert!(matches!(result, Err(AudioError::Io(_))));

    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("notes.mp3");
    fs::write(&bogus, b"this is not an mp3 file at all").unwrap();
    assert!(matches!(
        audio::analyze_file(&bogus, &AnalysisConfig::default()),
        Err(AudioError::Decode(_))
    ));

    let bogus_wav = dir.path().join("broken.wav");
    fs::write(&bogus_wav, b"RIFF....WAVEjunk").unwrap();
    assert!(matches!(
        audio::read_wav_file(&bogus_wav),
        Err(AudioError::Decode(_))
    ));

    let invalid = AnalysisConfig {
        hop_size: 0,
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        audio::compute_metrics(&[0.0; 16], SAMPLE_RATE, &invalid),
        Err(AudioError::InvalidParams(_))
    ));
}
