use serde::{Deserialize, Serialize};

use crate::classifier::SYSTEM_PROMPT;

use super::AiError;

pub fn build_request(
    model: &str,
    prompt: &str,
    temperature: f32,
    max_tokens: u32,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: SYSTEM_PROMPT.into(),
            },
            ChatMessage {
                role: "user".into(),
                content: prompt.to_string(),
            },
        ],
        temperature,
        max_tokens,
    }
}

/// Pulls the first choice's message text out of a chat completion body.
pub fn parse_completion(body: &str, provider: &'static str) -> Result<String, AiError> {
    let completion: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|err| AiError::Decode {
            provider,
            reason: err.to_string(),
        })?;

    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|msg| msg.content)
        .ok_or(AiError::EmptyCompletion { provider })?;

    Ok(content.trim().to_string())
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_system_contract_and_prompt() {
        let request = build_request("gpt-3.5-turbo", "Email: oi", 0.2, 300);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Email: oi");
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn extracts_trimmed_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  CATEGORIA: PRODUTIVO\nRESPOSTA: Ok \n"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(
            parse_completion(body, "openai").unwrap(),
            "CATEGORIA: PRODUTIVO\nRESPOSTA: Ok"
        );
    }

    #[test]
    fn empty_string_content_is_not_an_error() {
        let body = r#"{"choices":[{"message":{"content":""}}]}"#;
        assert_eq!(parse_completion(body, "openai").unwrap(), "");
    }

    #[test]
    fn missing_content_is_reported() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
        ] {
            assert!(matches!(
                parse_completion(body, "huggingface"),
                Err(AiError::EmptyCompletion { .. })
            ));
        }
        assert!(matches!(
            parse_completion("<html>bad gateway</html>", "huggingface"),
            Err(AiError::Decode { .. })
        ));
    }
}
