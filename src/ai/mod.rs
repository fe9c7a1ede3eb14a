mod client;
mod error;
mod inference;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::AiConfig;

pub use client::ChatCompletionsClient;
pub use error::AiError;

/// A text-completion backend that turns a prompt into raw model output.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    fn model_name(&self) -> &str;
}

/// Builds the generator for the configured provider.
pub fn create_generator(http: Client, config: &AiConfig) -> Arc<dyn TextGenerator> {
    tracing::info!(
        target: "ai",
        provider = config.provider.label(),
        model = %config.model,
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        "AI provider configured"
    );
    Arc::new(ChatCompletionsClient::new(http, config.clone()))
}
