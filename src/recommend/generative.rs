use super::types::{
    CompressorSettings, Recommendation, RecommendError, Recommender, SettingsSource,
};
use crate::audio::AudioMetrics;
use serde::Deserialize;
use tracing::{info, warn};

/// Settings for the text-generation strategy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    /// Chat-completions endpoint
    pub endpoint: String,
    /// Model name sent with every request
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// System message framing the request
    pub system_prompt: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        GenerativeConfig {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            system_prompt: "You are an expert audio engineer specializing in compression."
                .to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 60,
        }
    }
}

/// Something that completes a prompt with free-form text.
pub trait TextGenerator {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, RecommendError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, RecommendError> {
        (**self).generate(system, prompt)
    }
}

/// Asks a text generator for settings and parses its answer.
pub struct GenerativeRecommender<G> {
    generator: G,
    system_prompt: String,
}

impl<G: TextGenerator> GenerativeRecommender<G> {
    pub fn new(generator: G, config: &GenerativeConfig) -> Self {
        GenerativeRecommender {
            generator,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

impl<G: TextGenerator> Recommender for GenerativeRecommender<G> {
    fn name(&self) -> &str {
        "generative"
    }

    fn recommend(&self, metrics: &AudioMetrics) -> Result<Recommendation, RecommendError> {
        let prompt = build_prompt(metrics);
        info!("Requesting compressor settings from text generator");
        let response = self.generator.generate(&self.system_prompt, &prompt)?;
        Ok(parse_response(&response))
    }
}

/// Builds the user prompt with every metric rounded to two decimals.
pub fn build_prompt(metrics: &AudioMetrics) -> String {
    format!(
        "Based on the following audio metrics, recommend compressor settings:
RMS: {:.2}
Peak: {:.2}
Dynamic Range: {:.2}
Spectral Centroid: {:.2} Hz
Spectral Rolloff: {:.2} Hz

Provide the settings in the following JSON format:
{{
    \"threshold\": (float value in dB),
    \"ratio\": (float value),
    \"attack\": (float value in ms),
    \"release\": (float value in ms),
    \"makeup_gain\": (float value in dB)
}}

Also provide a brief explanation for these settings.",
        metrics.rms,
        metrics.peak,
        metrics.dynamic_range,
        metrics.spectral_centroid,
        metrics.spectral_rolloff
    )
}

/// Splits generated text into settings JSON and explanation.
///
/// Everything before the first blank line is treated as JSON. The remaining
/// blank-line separated paragraphs are joined with single newlines to form the
/// explanation. If the JSON does not parse into settings the fallback record is
/// returned and the source says why.
pub fn parse_response(text: &str) -> Recommendation {
    let mut parts = text.split("\n\n");
    let head = parts.next().unwrap_or_default();
    let explanation = parts.collect::<Vec<&str>>().join("\n");

    match serde_json::from_str::<CompressorSettings>(head.trim()) {
        Ok(settings) => Recommendation {
            settings,
            explanation,
            source: SettingsSource::Generated,
        },
        Err(e) => {
            warn!("Error parsing JSON ({}). Using fallback settings.", e);
            Recommendation {
                settings: CompressorSettings::fallback(),
                explanation,
                source: SettingsSource::Fallback {
                    reason: e.to_string(),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> AudioMetrics {
        AudioMetrics {
            rms: 0.123,
            peak: 0.8,
            dynamic_range: 0.677,
            spectral_centroid: 1534.204,
            spectral_rolloff: 3012.5,
        }
    }

    #[test]
    fn prompt_rounds_to_two_decimals() {
        let prompt = build_prompt(&metrics());
        assert!(prompt.contains("RMS: 0.12\n"));
        assert!(prompt.contains("Peak: 0.80\n"));
        assert!(prompt.contains("Dynamic Range: 0.68\n"));
        assert!(prompt.contains("Spectral Centroid: 1534.20 Hz\n"));
        assert!(prompt.contains("Spectral Rolloff: 3012.50 Hz\n"));
        assert!(prompt.contains("\"makeup_gain\": (float value in dB)"));
    }

    #[test]
    fn splits_json_from_explanation() {
        let text = "{\"threshold\": -18, \"ratio\": 3, \"attack\": 20, \"release\": 150, \"makeup_gain\": 4}\n\nModerate ratio.\n\nSlow release.";
        let rec = parse_response(text);
        assert_eq!(rec.source, SettingsSource::Generated);
        assert_eq!(rec.settings.threshold, -18.0);
        assert_eq!(rec.settings.release, 150.0);
        assert_eq!(rec.explanation, "Moderate ratio.\nSlow release.");
    }

    #[test]
    fn malformed_json_uses_fallback() {
        let rec = parse_response("Here are my settings:\n\n{\"threshold\": -18}");
        assert!(rec.is_fallback());
        assert_eq!(rec.settings, CompressorSettings::fallback());
        assert_eq!(rec.explanation, "{\"threshold\": -18}");
    }

    #[test]
    fn response_without_blank_line_has_empty_explanation() {
        let rec = parse_response("not json at all");
        assert!(rec.is_fallback());
        assert_eq!(rec.explanation, "");
    }
}
