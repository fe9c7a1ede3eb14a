mod normalize;
mod parser;
mod prompt;

use std::sync::Arc;

use thiserror::Error;

use crate::{
    ai::{AiError, TextGenerator},
    domain::ClassificationResult,
};

pub use normalize::normalize;
pub use parser::{parse, parse_detailed, CategoryRule, ParseOutcome, ReplySource, DEFAULT_REPLY};
pub use prompt::{build_prompt, SYSTEM_PROMPT};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Erro ao comunicar com IA: {0}")]
    AiCommunication(#[source] AiError),
}

/// Classifies emails by delegating judgment to a text generator and parsing
/// its reply. One generator call per email; failures are surfaced, never
/// retried or defaulted.
pub struct EmailClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl EmailClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn classify(&self, email_text: &str) -> Result<ClassificationResult, ClassifyError> {
        // Not part of the decision yet; logged as a content signal.
        let normalized = normalize(email_text);
        tracing::debug!(
            target: "classifier",
            chars = email_text.chars().count(),
            tokens = normalized.split_whitespace().count(),
            "email normalized"
        );

        let prompt = build_prompt(email_text);
        let output = self.generator.generate(&prompt).await.map_err(|err| {
            tracing::error!(
                target: "classifier",
                model = self.generator.model_name(),
                error = %err,
                "AI call failed"
            );
            ClassifyError::AiCommunication(err)
        })?;

        let outcome = parse_detailed(&output);
        if outcome.deviated() {
            tracing::warn!(
                target: "classifier",
                model = self.generator.model_name(),
                category_rule = outcome.category_rule.label(),
                reply_defaulted = outcome.reply_source == ReplySource::Default,
                "model output deviated from the two-line format"
            );
        }
        tracing::info!(
            target: "classifier",
            category = %outcome.result.category,
            category_rule = outcome.category_rule.label(),
            "email classified"
        );

        Ok(outcome.result)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::ai::{AiError, TextGenerator};

    /// Generator that replays a canned answer and records prompts.
    pub struct ScriptedGenerator {
        answer: Mutex<Option<Result<String, AiError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn replying(text: &str) -> Self {
            Self::with(Ok(text.to_string()))
        }

        pub fn failing(err: AiError) -> Self {
            Self::with(Err(err))
        }

        fn with(answer: Result<String, AiError>) -> Self {
            Self {
                answer: Mutex::new(Some(answer)),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().push(prompt.to_string());
            self.answer
                .lock()
                .take()
                .expect("scripted generator called more than once")
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::{testing::ScriptedGenerator, *};
    use crate::domain::Category;

    #[tokio::test]
    async fn classifies_from_model_output() {
        let generator = Arc::new(ScriptedGenerator::replying(
            "CATEGORIA: IMPRODUTIVO\nRESPOSTA: Agradecemos as felicitações!",
        ));
        let classifier = EmailClassifier::new(generator.clone());

        let result = classifier
            .classify("Feliz Natal a toda a equipe!")
            .await
            .unwrap();

        assert_eq!(result.category, Category::Unproductive);
        assert_eq!(result.response, "Agradecemos as felicitações!");

        let prompts = generator.prompts.lock();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Feliz Natal a toda a equipe!"));
    }

    #[tokio::test]
    async fn off_contract_output_still_classifies() {
        let generator = Arc::new(ScriptedGenerator::replying("Claro! Posso ajudar."));
        let classifier = EmailClassifier::new(generator);

        let result = classifier.classify("Qual o status do chamado?").await.unwrap();

        assert_eq!(result.category, Category::Productive);
        assert_eq!(result.response, DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn generator_failure_is_surfaced_with_cause() {
        let generator = Arc::new(ScriptedGenerator::failing(AiError::RateLimited {
            provider: "openai",
        }));
        let classifier = EmailClassifier::new(generator.clone());

        let err = classifier.classify("Preciso de ajuda").await.unwrap_err();

        assert!(matches!(
            err,
            ClassifyError::AiCommunication(AiError::RateLimited { .. })
        ));
        assert!(err.to_string().starts_with("Erro ao comunicar com IA"));
        assert!(err.source().is_some());
        assert_eq!(generator.prompts.lock().len(), 1);
    }
}
