//! Cairn - Voice-driven FAQ assistant
//!
//! This library provides the core functionality for the Cairn assistant:
//! - FAQ matching engine (TF-IDF lexical index, bounded match cache,
//!   JSON persistence)
//! - Generative fallback for FAQ misses
//! - Voice glue (STT, TTS, answer renderer chain)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                        │
//! │        CLI  │  REPL  │  recorded audio              │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Knowledge Base                        │
//! │  normalize │ exact match │ cache │ TF-IDF scoring   │
//! └────────────────────┬────────────────────────────────┘
//!                      │ miss
//! ┌────────────────────▼────────────────────────────────┐
//! │           Generative fallback (chat API)             │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │     Renderer chain: TTS │ offline TTS │ text        │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod agent;
pub mod assistant;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod voice;

pub use agent::{ChatClient, APOLOGY};
pub use assistant::Assistant;
pub use config::Config;
pub use error::{Error, Result};
pub use knowledge::{cosine_similarity, normalize, KnowledgeBase, MatchStats};
pub use knowledge::index::LexicalIndex;
pub use knowledge::store::FaqStore;
pub use voice::{AnswerRenderer, RendererChain, SpeechToText, Synthesizer};
