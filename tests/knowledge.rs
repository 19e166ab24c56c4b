//! Knowledge base integration tests
//!
//! Exercises the full matching pipeline (normalize → exact → cache → score)
//! against a temp-directory-backed store, without any network collaborator.

use cairn_assistant::config::MatchingConfig;
use cairn_assistant::{FaqStore, KnowledgeBase};

mod common;

use common::seeded_base;

const SUPERCOMPUTING_ANSWER: &str =
    "Extremely powerful computing used for complex problems like AI training, \
     scientific modeling, and big data analysis.";

fn club_base(dir: &tempfile::TempDir) -> KnowledgeBase {
    seeded_base(
        dir,
        &[
            ("what is supercomputing", SUPERCOMPUTING_ANSWER),
            (
                "what are flops",
                "Floating-point operations per second, a metric for computation speed.",
            ),
            (
                "who can join the club",
                "Any student passionate about AI, HPC, or computing technologies.",
            ),
        ],
    )
}

#[test]
fn exact_match_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let base = club_base(&dir);

    // Exact keys answer verbatim at any threshold, without scoring
    let answer = base.lookup_with_threshold("  What Is Supercomputing  ", 1.0);
    assert_eq!(answer.as_deref(), Some(SUPERCOMPUTING_ANSWER));
    assert_eq!(base.stats().scored_queries, 0);
}

#[test]
fn punctuation_variant_matches_above_default_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let base = club_base(&dir);

    let answer = base.lookup("what's supercomputing?");
    assert_eq!(answer.as_deref(), Some(SUPERCOMPUTING_ANSWER));
}

#[test]
fn unrelated_query_defers_to_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let base = club_base(&dir);

    assert_eq!(base.lookup("what's the weather today"), None);
}

#[test]
fn cache_consistency_on_repeated_queries() {
    let dir = tempfile::tempdir().unwrap();
    let base = club_base(&dir);

    let first = base.lookup("tell me about supercomputing");
    let second = base.lookup("tell me about supercomputing");
    assert_eq!(first, second);

    // The second call must not re-run vectorization
    let stats = base.stats();
    assert_eq!(stats.scored_queries, 1);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_entries, 1);
}

#[test]
fn add_entry_visibility() {
    let dir = tempfile::tempdir().unwrap();
    let base = club_base(&dir);

    base.add_entry("What is the NextGen AI Summit?", "The club's annual flagship event.");
    assert_eq!(
        base.lookup("what is the nextgen ai summit?"),
        Some("The club's annual flagship event.".to_string())
    );
}

#[test]
fn stale_negative_is_cleared_by_add() {
    let dir = tempfile::tempdir().unwrap();
    let base = club_base(&dir);

    assert_eq!(base.lookup("explain mixed precision training"), None);

    base.add_entry(
        "what is mixed precision training",
        "Using lower precision numbers like FP16 to speed up calculations.",
    );
    assert_eq!(
        base.lookup("explain mixed precision training"),
        Some("Using lower precision numbers like FP16 to speed up calculations.".to_string())
    );
}

#[test]
fn empty_knowledge_base_misses_quietly() {
    let dir = tempfile::tempdir().unwrap();
    let base = seeded_base(&dir, &[]);

    assert_eq!(base.count(), 0);
    assert_eq!(base.lookup("anything at all"), None);
    assert_eq!(base.lookup(""), None);
}

#[test]
fn persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("faq_database.json");

    {
        let base = KnowledgeBase::open(FaqStore::new(&path), &MatchingConfig::default());
        base.add_entry("what is cluster computing", "Cooperative computing tasks.");
    }

    let reopened = KnowledgeBase::open(FaqStore::new(&path), &MatchingConfig::default());
    let original = KnowledgeBase::open(FaqStore::new(&path), &MatchingConfig::default());

    assert_eq!(reopened.count(), original.count());
    assert_eq!(reopened.list_questions(), original.list_questions());
    assert_eq!(
        reopened.lookup("what is cluster computing"),
        Some("Cooperative computing tasks.".to_string())
    );
}

#[test]
fn bootstrap_then_reload_is_equivalent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("faq_database.json");

    // First open bootstraps the defaults to disk
    let first = KnowledgeBase::open(FaqStore::new(&path), &MatchingConfig::default());
    let questions = first.list_questions();
    assert!(!questions.is_empty());
    drop(first);

    // Second open reads them back in the same order
    let second = KnowledgeBase::open(FaqStore::new(&path), &MatchingConfig::default());
    assert_eq!(second.list_questions(), questions);
}

#[test]
fn rebuilds_are_reproducible_across_instances() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let a = club_base(&dir_a);
    let b = club_base(&dir_b);

    for query in [
        "what's supercomputing?",
        "how fast are flops",
        "can students join",
        "what's the weather today",
    ] {
        assert_eq!(a.lookup(query), b.lookup(query), "diverged on {query}");
    }
}

#[test]
fn concurrent_lookups_and_adds_do_not_corrupt_state() {
    use std::sync::Arc;

    let dir = tempfile::tempdir().unwrap();
    let base = Arc::new(club_base(&dir));

    let mut handles = Vec::new();
    for i in 0..4 {
        let base = Arc::clone(&base);
        handles.push(std::thread::spawn(move || {
            for j in 0..50 {
                if j % 10 == 0 {
                    base.add_entry(&format!("generated question {i} {j}"), "generated answer");
                }
                let _ = base.lookup("what is supercomputing");
                let _ = base.lookup("completely unrelated query text");
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // 3 seeded + 4 threads * 5 adds
    assert_eq!(base.count(), 23);
    assert_eq!(
        base.lookup("what is supercomputing").as_deref(),
        Some(SUPERCOMPUTING_ANSWER)
    );
}
