use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;

use crate::config::AiConfig;

use super::{
    inference::{build_request, parse_completion},
    AiError, TextGenerator,
};

const ERROR_BODY_LIMIT: usize = 512;

/// Client for OpenAI-compatible `/chat/completions` endpoints. Both the
/// Hugging Face router and OpenAI speak this protocol.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: Client,
    config: AiConfig,
    endpoint: String,
}

impl ChatCompletionsClient {
    pub fn new(http: Client, config: AiConfig) -> Self {
        let endpoint = format!("{}/chat/completions", config.base_url);
        Self {
            http,
            config,
            endpoint,
        }
    }

    fn provider(&self) -> &'static str {
        self.config.provider.label()
    }

    fn transport_error(&self, err: reqwest::Error) -> AiError {
        if err.is_timeout() {
            AiError::Timeout {
                provider: self.provider(),
            }
        } else {
            AiError::Transport {
                provider: self.provider(),
                source: err,
            }
        }
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let provider = self.provider();
        let request = build_request(
            &self.config.model,
            prompt,
            self.config.temperature,
            self.config.max_tokens,
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.config.api_key.expose_secret())
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            tracing::warn!(
                target: "ai",
                provider,
                status = status.as_u16(),
                "completion request rejected"
            );
            return Err(status_error(provider, status, body));
        }

        parse_completion(&body, provider)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn status_error(provider: &'static str, status: StatusCode, body: String) -> AiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::Unauthorized {
            provider,
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited { provider },
        _ => AiError::Status {
            provider,
            status: status.as_u16(),
            body: truncate_chars(body.trim(), ERROR_BODY_LIMIT),
        },
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
