use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("request to {provider} timed out")]
    Timeout { provider: &'static str },
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} rejected the credentials (HTTP {status})")]
    Unauthorized { provider: &'static str, status: u16 },
    #[error("{provider} rate limit or quota exceeded")]
    RateLimited { provider: &'static str },
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("could not decode {provider} response: {reason}")]
    Decode {
        provider: &'static str,
        reason: String,
    },
    #[error("{provider} response did not contain any message content")]
    EmptyCompletion { provider: &'static str },
}
