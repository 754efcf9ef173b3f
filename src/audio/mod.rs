/// Audio processing module for decoding sound files and extracting level and spectral statistics.
///
/// This module provides functionality to:
/// - Read WAV files and decode compressed formats
/// - Mix down and resample to the analysis rate
/// - Compute RMS, peak, dynamic range, spectral centroid and spectral rolloff
mod analysis;
mod decode;
mod resample;
mod types;
mod wav;

pub use analysis::{analyze_file, compute_metrics, peak, rms};
pub use decode::{decode_with_symphonia, read_audio_file};
pub use resample::resample_mono;
pub use types::{AnalysisConfig, AudioData, AudioError, AudioMetrics};
pub use wav::read_wav_file;
