//! Chat-completions client used by the generative strategy.

use super::generative::{GenerativeConfig, TextGenerator};
use super::types::RecommendError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, config: &GenerativeConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout_read(Duration::from_secs(config.read_timeout_secs))
            .build();

        OpenAiClient {
            agent,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    /// Builds a client with the key taken from `config.api_key_env`.
    pub fn from_env(config: &GenerativeConfig) -> Result<Self, RecommendError> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RecommendError::MissingApiKey(config.api_key_env.clone()))?;
        Ok(Self::new(api_key, config))
    }
}

impl TextGenerator for OpenAiClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, RecommendError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!("POST {} (model {})", self.endpoint, self.model);
        let response = match self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(RecommendError::Http(format!("status {}: {}", code, body)));
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(RecommendError::Http(err.to_string()));
            }
        };

        let parsed: ChatResponse = response
            .into_json()
            .map_err(|e| RecommendError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RecommendError::InvalidResponse("response had no content".to_string()))
    }
}
