use std::sync::Arc;

use tracing::debug;

use localrag_core::prompt::PromptTemplate;
use localrag_core::traits::LanguageModel;
use localrag_core::{Error, Result};

/// Renders the prompt and asks the language model for a completion.
pub struct Synthesizer {
    model: Arc<dyn LanguageModel>,
    template: PromptTemplate,
}

impl Synthesizer {
    pub fn new(model: Arc<dyn LanguageModel>, template: PromptTemplate) -> Self {
        Self { model, template }
    }

    pub async fn synthesize(&self, history: &str, context: &str, question: &str) -> Result<String> {
        let prompt = self.template.render(history, context, question);
        debug!(prompt_chars = prompt.chars().count(), "calling language model");
        self.model.generate(&prompt).await.map_err(|e| Error::GenerationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Down;

    #[async_trait]
    impl LanguageModel for Down {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    struct Padded;

    #[async_trait]
    impl LanguageModel for Padded {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok("  Paris est la capitale.\n".to_string())
        }
    }

    #[tokio::test]
    async fn model_failure_is_generation_failed() {
        let synth = Synthesizer::new(Arc::new(Down), PromptTemplate::default());
        let err = synth.synthesize("", "ctx", "q").await.unwrap_err();
        assert!(matches!(err, Error::GenerationFailed(m) if m.contains("connection refused")));
    }

    #[tokio::test]
    async fn model_output_is_returned_verbatim() {
        let synth = Synthesizer::new(Arc::new(Padded), PromptTemplate::default());
        assert_eq!(synth.synthesize("", "ctx", "Quelle est la capitale ?").await.unwrap(), "  Paris est la capitale.\n");
    }
}
