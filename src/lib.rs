//! Audio analysis, compressor settings recommendation and fixed MIDI arrangement writing.
//!
//! The analysis pipeline runs strictly in one direction:
//! [`audio::analyze_file`] produces [`audio::AudioMetrics`], a
//! [`recommend::Recommender`] turns them into [`recommend::Recommendation`], and
//! [`report::format_report`] renders both as text.
pub mod audio;
pub mod config;
pub mod midi;
pub mod recommend;
pub mod report;
