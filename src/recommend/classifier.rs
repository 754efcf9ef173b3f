use super::model::{argmax, softmax, TextClassifierModel};
use super::types::{
    CompressorSettings, Recommendation, RecommendError, Recommender, SettingsSource,
};
use crate::audio::AudioMetrics;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Settings for the classification strategy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// JSON model file, the bundled model is used when unset
    pub model_path: Option<PathBuf>,
    /// Settings selected by class index
    pub presets: Vec<CompressorSettings>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            model_path: None,
            presets: vec![
                // Gentle
                CompressorSettings {
                    threshold: -10.0,
                    ratio: 2.0,
                    attack: 50.0,
                    release: 300.0,
                    makeup_gain: 3.0,
                },
                // Medium
                CompressorSettings {
                    threshold: -15.0,
                    ratio: 3.0,
                    attack: 30.0,
                    release: 200.0,
                    makeup_gain: 5.0,
                },
                // Heavy
                CompressorSettings {
                    threshold: -20.0,
                    ratio: 6.0,
                    attack: 5.0,
                    release: 80.0,
                    makeup_gain: 8.0,
                },
            ],
        }
    }
}

impl ClassifierConfig {
    /// Loads the model at `model_path`, or the bundled one when none is set.
    pub fn load_model(&self) -> Result<TextClassifierModel, RecommendError> {
        match &self.model_path {
            Some(path) => TextClassifierModel::load(path),
            None => {
                info!("No classifier model configured, using the bundled model");
                TextClassifierModel::bundled()
            }
        }
    }
}

/// Scores a piece of text against a fixed set of classes.
pub trait SequenceClassifier {
    /// One raw score per class
    fn logits(&self, text: &str) -> Result<Vec<f32>, RecommendError>;
}

impl<T: SequenceClassifier + ?Sized> SequenceClassifier for &T {
    fn logits(&self, text: &str) -> Result<Vec<f32>, RecommendError> {
        (**self).logits(text)
    }
}

/// Classifies a description of the metrics and looks the class up in a preset table.
pub struct ClassifierRecommender<C> {
    classifier: C,
    presets: Vec<CompressorSettings>,
}

impl<C: SequenceClassifier> ClassifierRecommender<C> {
    pub fn new(classifier: C, presets: Vec<CompressorSettings>) -> Self {
        ClassifierRecommender {
            classifier,
            presets,
        }
    }
}

impl<C: SequenceClassifier> Recommender for ClassifierRecommender<C> {
    fn name(&self) -> &str {
        "classifier"
    }

    fn recommend(&self, metrics: &AudioMetrics) -> Result<Recommendation, RecommendError> {
        let text = describe(metrics);
        let logits = self.classifier.logits(&text)?;
        if logits.len() != self.presets.len() {
            return Err(RecommendError::ShapeMismatch {
                expected: self.presets.len(),
                actual: logits.len(),
            });
        }

        let probabilities = softmax(&logits);
        let (index, settings) = select_preset(&probabilities, &self.presets)?;
        let confidence = probabilities[index];
        info!("Classifier picked preset {} (p = {:.3})", index, confidence);

        Ok(Recommendation {
            settings,
            explanation: format!(
                "Preset {} selected with probability {:.2} from: {}",
                index, confidence, text
            ),
            source: SettingsSource::Preset { index, confidence },
        })
    }
}

/// The text handed to the classifier: the five values, then a plain-word
/// summary of level, dynamics and tone.
pub fn describe(metrics: &AudioMetrics) -> String {
    let level = match metrics.rms {
        r if r < 0.05 => "quiet",
        r if r < 0.2 => "average",
        _ => "loud",
    };
    let dynamics = match metrics.dynamic_range {
        d if d < 0.3 => "narrow",
        d if d < 0.6 => "moderate",
        _ => "wide",
    };
    let tone = match metrics.spectral_centroid {
        c if c < 1000.0 => "dark",
        c if c < 3000.0 => "balanced",
        _ => "bright",
    };
    format!(
        "Audio with RMS {:.2}, peak {:.2}, dynamic range {:.2}, spectral centroid {:.2} Hz and spectral rolloff {:.2} Hz. \
         The mix is {} with {} dynamics and a {} tone.",
        metrics.rms,
        metrics.peak,
        metrics.dynamic_range,
        metrics.spectral_centroid,
        metrics.spectral_rolloff,
        level,
        dynamics,
        tone
    )
}

/// Picks the preset at the argmax of `probabilities`.
///
/// # Errors
/// * `RecommendError::ShapeMismatch` if the lengths differ
pub fn select_preset(
    probabilities: &[f32],
    presets: &[CompressorSettings],
) -> Result<(usize, CompressorSettings), RecommendError> {
    if probabilities.len() != presets.len() || presets.is_empty() {
        return Err(RecommendError::ShapeMismatch {
            expected: presets.len(),
            actual: probabilities.len(),
        });
    }
    let index = argmax(probabilities);
    Ok((index, presets[index]))
}
