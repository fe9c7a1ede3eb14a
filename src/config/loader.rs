use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use secrecy::SecretString;
use url::Url;

use super::env::{
    AiConfig, AiProvider, AppConfig, ConfigError, DirectoryConfig, LoggingConfig, ServerConfig,
};

const HUGGINGFACE_BASE_URL: &str = "https://router.huggingface.co/v1";
const HUGGINGFACE_MODEL: &str = "meta-llama/Llama-3.2-1B-Instruct";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let ai = load_ai_config(&var)?;

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or("PORT", var("PORT"), 8000)?;
        let bind_addr = SocketAddr::from_str(&format!("{host}:{port}")).map_err(|_| {
            ConfigError::Invalid {
                key: "HOST",
                value: host.clone(),
            }
        })?;

        let server = ServerConfig {
            bind_addr,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                var("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        };

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            ai,
            server,
            directories,
            logging,
        })
    }
}

fn load_ai_config(var: &impl Fn(&str) -> Option<String>) -> Result<AiConfig, ConfigError> {
    let provider = match var("AI_PROVIDER").map(|v| v.to_lowercase()).as_deref() {
        None | Some("huggingface") => AiProvider::HuggingFace,
        Some("openai") => AiProvider::OpenAi,
        Some(other) => {
            return Err(ConfigError::Invalid {
                key: "AI_PROVIDER",
                value: other.to_string(),
            })
        }
    };

    let config = match provider {
        AiProvider::HuggingFace => {
            let api_key = var("HF_TOKEN")
                .or_else(|| var("HUGGINGFACE_API_KEY"))
                .ok_or(ConfigError::Missing("HF_TOKEN"))?;
            let max_tokens = match var("HUGGINGFACE_MAX_TOKENS") {
                Some(value) => parse_or("HUGGINGFACE_MAX_TOKENS", Some(value), 300)?,
                None => parse_or(
                    "HUGGINGFACE_MAX_NEW_TOKENS",
                    var("HUGGINGFACE_MAX_NEW_TOKENS"),
                    300,
                )?,
            };
            AiConfig {
                provider,
                api_key: SecretString::from(api_key),
                base_url: base_url(
                    "HUGGINGFACE_ROUTER_BASE_URL",
                    var("HUGGINGFACE_ROUTER_BASE_URL"),
                    HUGGINGFACE_BASE_URL,
                )?,
                model: var("HUGGINGFACE_MODEL").unwrap_or_else(|| HUGGINGFACE_MODEL.to_string()),
                temperature: parse_or(
                    "HUGGINGFACE_TEMPERATURE",
                    var("HUGGINGFACE_TEMPERATURE"),
                    0.2,
                )?,
                max_tokens,
                timeout: Duration::from_secs(parse_or(
                    "AI_TIMEOUT_SECS",
                    var("AI_TIMEOUT_SECS"),
                    60,
                )?),
            }
        }
        AiProvider::OpenAi => {
            let api_key = var("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
            AiConfig {
                provider,
                api_key: SecretString::from(api_key),
                base_url: base_url("OPENAI_BASE_URL", var("OPENAI_BASE_URL"), OPENAI_BASE_URL)?,
                model: var("OPENAI_MODEL").unwrap_or_else(|| OPENAI_MODEL.to_string()),
                temperature: 0.2,
                max_tokens: 300,
                timeout: Duration::from_secs(parse_or(
                    "AI_TIMEOUT_SECS",
                    var("AI_TIMEOUT_SECS"),
                    30,
                )?),
            }
        }
    };

    Ok(config)
}

fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

fn base_url(
    key: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<String, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(raw.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}
