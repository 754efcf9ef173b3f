//! Linear text classifier over hashed bag-of-words features.

use super::classifier::SequenceClassifier;
use super::types::RecommendError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Three-class preset model shipped with the crate
const BUNDLED_MODEL: &str = include_str!("../../assets/classifier.json");

/// Serialized sequence-classification model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextClassifierModel {
    #[serde(default)]
    pub model_id: Option<String>,
    /// Number of hash buckets tokens are folded into
    pub feature_dim: usize,
    pub classes: Vec<String>,
    /// Row-major `classes x feature_dim`
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    1.0
}

impl TextClassifierModel {
    /// A model with zero weights, every input scores all classes equally.
    pub fn untrained(classes: &[&str], feature_dim: usize) -> Self {
        TextClassifierModel {
            model_id: None,
            feature_dim,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            weights: vec![0.0; classes.len() * feature_dim],
            bias: vec![0.0; classes.len()],
            temperature: 1.0,
        }
    }

    /// The built-in model keyed on the level, dynamics and tone words of the
    /// metric description. Classes are gentle, medium and heavy.
    pub fn bundled() -> Result<Self, RecommendError> {
        let model: TextClassifierModel = serde_json::from_str(BUNDLED_MODEL)
            .map_err(|e| RecommendError::ModelLoad(format!("bundled model: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    /// Reads and validates a model from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RecommendError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            RecommendError::ModelLoad(format!("{}: {}", path.display(), e))
        })?;
        let model: TextClassifierModel = serde_json::from_str(&contents)
            .map_err(|e| RecommendError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        model.validate()?;
        info!(
            "Loaded classifier {} ({} classes, {} features)",
            model.model_id.as_deref().unwrap_or("<unnamed>"),
            model.classes.len(),
            model.feature_dim
        );
        Ok(model)
    }

    /// Checks that the weight matrix and bias match the declared shape.
    pub fn validate(&self) -> Result<(), RecommendError> {
        if self.feature_dim == 0 {
            return Err(RecommendError::ModelLoad(
                "feature_dim must be greater than zero".to_string(),
            ));
        }
        let classes = self.classes.len();
        if classes == 0 {
            return Err(RecommendError::ModelLoad("No classes defined".to_string()));
        }
        if self.weights.len() != classes * self.feature_dim {
            return Err(RecommendError::ModelLoad(format!(
                "weights length {} does not match {} classes x {} features",
                self.weights.len(),
                classes,
                self.feature_dim
            )));
        }
        if self.bias.len() != classes {
            return Err(RecommendError::ModelLoad("bias length mismatch".to_string()));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(RecommendError::ModelLoad(
                "temperature must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// L2-normalized bucket counts for the tokens of `text`.
    pub fn features(&self, text: &str) -> Vec<f32> {
        let mut counts = vec![0.0f32; self.feature_dim];
        for token in tokenize(text) {
            let bucket = (fnv1a(&token) % self.feature_dim as u64) as usize;
            counts[bucket] += 1.0;
        }
        let norm = counts.iter().map(|c| c * c).sum::<f32>().sqrt();
        if norm > 0.0 {
            counts.iter_mut().for_each(|c| *c /= norm);
        }
        counts
    }
}

impl SequenceClassifier for TextClassifierModel {
    fn logits(&self, text: &str) -> Result<Vec<f32>, RecommendError> {
        self.validate()?;
        let features = self.features(text);
        let temp = self.temperature.max(1e-6);
        Ok(self
            .weights
            .chunks_exact(self.feature_dim)
            .zip(&self.bias)
            .map(|(row, bias)| {
                let dot: f32 = row.iter().zip(&features).map(|(w, x)| w * x).sum();
                (dot + bias) / temp
            })
            .collect())
    }
}

/// Lower-cased runs of alphanumerics, keeping decimal points inside numbers.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '.'))
        .map(|token| token.trim_matches('.'))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
    })
}

/// Compute a numerically-stable softmax for a set of logits.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = raw.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value, the first one wins ties.
pub fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}
