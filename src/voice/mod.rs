//! Voice processing glue around the knowledge base
//!
//! - **stt**: Whisper transcription of recorded questions
//! - **tts**: hosted speech synthesis
//! - **render**: ordered answer-delivery strategies (speech, offline speech,
//!   plain text)
//!
//! None of this is consulted by the matching engine itself; it wraps the
//! facade at the system boundary.

mod render;
mod stt;
mod tts;

pub use render::{
    AnswerRenderer, OfflineSpeechRenderer, RendererChain, SpeechRenderer, TextRenderer,
};
pub use stt::SpeechToText;
pub use tts::Synthesizer;
