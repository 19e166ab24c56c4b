//! Assistant pipeline: FAQ lookup, generative fallback, answer rendering

use std::sync::Arc;

use crate::agent::{ChatClient, APOLOGY};
use crate::knowledge::KnowledgeBase;
use crate::voice::RendererChain;

/// Ties the knowledge base, the generative fallback, and the renderer chain
/// into one question-in/answer-out flow
pub struct Assistant {
    knowledge: Arc<KnowledgeBase>,
    chat: Option<ChatClient>,
    renderers: RendererChain,
}

impl Assistant {
    /// Assemble the pipeline
    ///
    /// `chat` is optional: without it, FAQ misses answer with the fixed
    /// apology instead of a generated reply.
    #[must_use]
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        chat: Option<ChatClient>,
        renderers: RendererChain,
    ) -> Self {
        Self {
            knowledge,
            chat,
            renderers,
        }
    }

    /// The knowledge base behind this assistant
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Resolve a question to an answer
    ///
    /// FAQ match first; on a miss the generative fallback is consulted, and
    /// if that fails (or is not configured) the fixed apology is returned.
    /// This path never errors.
    pub async fn answer(&self, question: &str) -> String {
        if let Some(answer) = self.knowledge.lookup(question) {
            tracing::info!("answered from FAQ base");
            return answer;
        }

        match &self.chat {
            Some(chat) => match chat.answer(question).await {
                Ok(answer) => {
                    tracing::info!("answered from generative fallback");
                    answer
                }
                Err(e) => {
                    tracing::warn!(error = %e, "generative fallback failed");
                    APOLOGY.to_string()
                }
            },
            None => {
                tracing::debug!("no generative fallback configured");
                APOLOGY.to_string()
            }
        }
    }

    /// Resolve a question and deliver the answer through the renderer chain
    ///
    /// Returns the answer text; rendering failures are logged, not raised.
    pub async fn respond(&self, question: &str) -> String {
        let answer = self.answer(question).await;
        if let Err(e) = self.renderers.render(&answer).await {
            tracing::warn!(error = %e, "failed to render answer");
        }
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingConfig;
    use crate::knowledge::store::FaqStore;
    use crate::voice::TextRenderer;

    fn assistant_without_fallback(dir: &tempfile::TempDir) -> Assistant {
        let store = FaqStore::new(dir.path().join("faq.json"));
        let kb = Arc::new(KnowledgeBase::open(store, &MatchingConfig::default()));
        Assistant::new(
            kb,
            None,
            RendererChain::new(vec![Box::new(TextRenderer)]),
        )
    }

    #[tokio::test]
    async fn faq_hit_skips_the_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = assistant_without_fallback(&dir);
        assistant
            .knowledge()
            .add_entry("what is cairn", "A voice FAQ assistant.");

        let answer = assistant.answer("what is cairn").await;
        assert_eq!(answer, "A voice FAQ assistant.");
    }

    #[tokio::test]
    async fn miss_without_fallback_apologizes() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = assistant_without_fallback(&dir);

        let answer = assistant.answer("how do I bake sourdough bread").await;
        assert_eq!(answer, APOLOGY);
    }

    #[tokio::test]
    async fn respond_returns_the_answer_text() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = assistant_without_fallback(&dir);
        assistant
            .knowledge()
            .add_entry("what are flops", "Floating-point operations per second.");

        let answer = assistant.respond("what are flops").await;
        assert_eq!(answer, "Floating-point operations per second.");
    }
}
