use crate::audio::AudioMetrics;
use serde::{Deserialize, Serialize};

/// Dynamic-range compressor parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorSettings {
    /// Level above which gain reduction starts (dB)
    pub threshold: f32,
    /// Input/output ratio above the threshold
    pub ratio: f32,
    /// Attack time (ms)
    pub attack: f32,
    /// Release time (ms)
    pub release: f32,
    /// Gain applied after compression (dB)
    pub makeup_gain: f32,
}

impl CompressorSettings {
    /// Settings used when a generated response cannot be parsed.
    pub fn fallback() -> Self {
        CompressorSettings {
            threshold: -20.0,
            ratio: 4.0,
            attack: 10.0,
            release: 100.0,
            makeup_gain: 5.0,
        }
    }
}

/// Where a recommendation's settings came from
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsSource {
    /// Parsed from generated text
    Generated,
    /// Generated text was not valid settings JSON
    Fallback { reason: String },
    /// Picked from the preset table by a classifier
    Preset { index: usize, confidence: f32 },
}

/// Settings plus whatever explanation the strategy produced
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub settings: CompressorSettings,
    pub explanation: String,
    pub source: SettingsSource,
}

impl Recommendation {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, SettingsSource::Fallback { .. })
    }
}

/// Errors that can occur while producing a recommendation
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// No credential for the text-generation service
    #[error("API key not found, set the {0} environment variable")]
    MissingApiKey(String),

    /// Transport or HTTP status failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Classifier model could not be loaded or is malformed
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    /// Classifier output does not line up with the preset table
    #[error("Classifier produced {actual} scores but the preset table has {expected} entries")]
    ShapeMismatch { expected: usize, actual: usize },

    /// IO errors when reading model files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A way of turning audio metrics into compressor settings.
pub trait Recommender {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn recommend(&self, metrics: &AudioMetrics) -> Result<Recommendation, RecommendError>;
}

impl<R: Recommender + ?Sized> Recommender for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recommend(&self, metrics: &AudioMetrics) -> Result<Recommendation, RecommendError> {
        (**self).recommend(metrics)
    }
}
