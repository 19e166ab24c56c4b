//! Shared fixtures for integration tests

use cairn_assistant::config::MatchingConfig;
use cairn_assistant::{FaqStore, KnowledgeBase};

/// Build a knowledge base over a fresh store inside `dir`, seeded with the
/// given question/answer pairs (and nothing else)
pub fn seeded_base(dir: &tempfile::TempDir, pairs: &[(&str, &str)]) -> KnowledgeBase {
    let store = FaqStore::new(dir.path().join("faq_database.json"));
    store
        .save(&indexmap::IndexMap::new())
        .expect("seed empty FAQ document");

    let base = KnowledgeBase::open(store, &MatchingConfig::default());
    for (question, answer) in pairs {
        base.add_entry(question, answer);
    }
    base
}
