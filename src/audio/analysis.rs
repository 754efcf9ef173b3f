use super::decode::read_audio_file;
use super::resample::resample_mono;
use super::types::{AnalysisConfig, AudioError, AudioMetrics};
use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;
use std::path::Path;
use tracing::{debug, info};

/// Loads an audio file and computes its metrics.
///
/// This function performs the following steps:
/// 1. Validates the analysis configuration
/// 2. Decodes the file and mixes it down to mono
/// 3. Resamples to the configured analysis rate
/// 4. Computes level statistics and STFT-based spectral statistics
///
/// # Errors
/// * If the configuration is invalid
/// * If the file cannot be read or decoded
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<AudioMetrics, AudioError> {
    config.validate()?;

    let audio = read_audio_file(path)?;
    info!(
        "Loaded {} ({:.2}s, {} Hz, {} channels)",
        path.display(),
        audio.duration_secs(),
        audio.sample_rate,
        audio.channels
    );

    let mono = audio.to_mono();
    let (samples, sample_rate) = match config.target_sample_rate {
        Some(rate) => (resample_mono(&mono, audio.sample_rate, rate)?, rate),
        None => (mono, audio.sample_rate),
    };

    compute_metrics(&samples, sample_rate, config)
}

/// Computes the five metrics from a mono buffer.
///
/// An empty buffer yields all-zero metrics.
pub fn compute_metrics(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<AudioMetrics, AudioError> {
    config.validate()?;

    if sample_rate == 0 {
        return Err(AudioError::InvalidParams(
            "Sample rate must be greater than zero".to_string(),
        ));
    }

    let rms = rms(samples);
    let peak = peak(samples);

    let spectrogram = magnitude_spectrogram(samples, config.frame_size, config.hop_size);
    let freqs = bin_frequencies(config.frame_size, sample_rate);
    debug!(
        "STFT: {} frames of {} bins",
        spectrogram.len(),
        freqs.len()
    );

    let spectral_centroid = mean(spectrogram.iter().map(|frame| frame_centroid(frame, &freqs)));
    let spectral_rolloff = mean(
        spectrogram
            .iter()
            .map(|frame| frame_rolloff(frame, &freqs, config.roll_percent)),
    );

    Ok(AudioMetrics {
        rms,
        peak,
        dynamic_range: peak - rms,
        spectral_centroid,
        spectral_rolloff,
    })
}

/// Root-mean-square amplitude, accumulated in f64.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Maximum absolute sample value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Periodic Hann window of the given length.
///
/// w(n) = 0.5 * (1 - cos(2π*n/N))
fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / len as f32).cos()))
        .collect()
}

/// Centre frequency in Hz of each one-sided FFT bin.
fn bin_frequencies(frame_size: usize, sample_rate: u32) -> Vec<f32> {
    (0..=frame_size / 2)
        .map(|k| k as f32 * sample_rate as f32 / frame_size as f32)
        .collect()
}

/// Short-time Fourier transform magnitudes.
///
/// Frames are centred: the signal is zero-padded by half a frame on both sides,
/// so frame `t` covers samples around `t * hop_size`. Each frame holds the
/// `frame_size / 2 + 1` one-sided bin magnitudes.
fn magnitude_spectrogram(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<Vec<f32>> {
    if samples.is_empty() {
        return Vec::new();
    }

    let pad = frame_size / 2;
    let mut padded = vec![0.0f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let window = hann_window(frame_size);
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(frame_size);

    let num_frames = 1 + (padded.len() - frame_size) / hop_size;
    let mut frames = Vec::with_capacity(num_frames);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];

    for t in 0..num_frames {
        let start = t * hop_size;
        for (slot, (&sample, &w)) in buffer
            .iter_mut()
            .zip(padded[start..start + frame_size].iter().zip(window.iter()))
        {
            *slot = Complex::new(sample * w, 0.0);
        }

        fft.process(&mut buffer);

        frames.push(buffer[..=frame_size / 2].iter().map(|c| c.norm()).collect());
    }

    frames
}

/// Magnitude-weighted mean frequency of one frame, 0 for a silent frame.
fn frame_centroid(magnitudes: &[f32], freqs: &[f32]) -> f32 {
    let total: f64 = magnitudes.iter().map(|&m| m as f64).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = magnitudes
        .iter()
        .zip(freqs)
        .map(|(&m, &f)| m as f64 * f as f64)
        .sum();
    (weighted / total) as f32
}

/// Lowest bin frequency whose cumulative magnitude reaches `roll_percent` of the total.
fn frame_rolloff(magnitudes: &[f32], freqs: &[f32], roll_percent: f32) -> f32 {
    let total: f64 = magnitudes.iter().map(|&m| m as f64).sum();
    let threshold = roll_percent as f64 * total;

    let mut cumulative = 0.0f64;
    for (&m, &f) in magnitudes.iter().zip(freqs) {
        cumulative += m as f64;
        if cumulative >= threshold {
            return f;
        }
    }
    freqs.last().copied().unwrap_or(0.0)
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0f64, 0usize), |(sum, count), v| {
        (sum + v as f64, count + 1)
    });
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64) as f32
}
