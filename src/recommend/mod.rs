/// Compressor settings recommendation.
///
/// Two interchangeable strategies implement [`Recommender`]:
/// - [`GenerativeRecommender`] asks a text generator for JSON settings
/// - [`ClassifierRecommender`] classifies a description of the metrics and picks a preset
mod classifier;
mod generative;
mod model;
mod openai;
mod types;

pub use classifier::{
    describe, select_preset, ClassifierConfig, ClassifierRecommender, SequenceClassifier,
};
pub use generative::{
    build_prompt, parse_response, GenerativeConfig, GenerativeRecommender, TextGenerator,
};
pub use model::{argmax, softmax, tokenize, TextClassifierModel};
pub use openai::OpenAiClient;
pub use types::{
    CompressorSettings, Recommendation, RecommendError, Recommender, SettingsSource,
};
