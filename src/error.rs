//! Error types for the Cairn assistant

use thiserror::Error;

/// Result type alias for Cairn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Cairn assistant
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// FAQ store error (load/save of the persisted document)
    #[error("store error: {0}")]
    Store(String),

    /// Lexical index error
    #[error("index error: {0}")]
    Index(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Generative answer source error
    #[error("answer error: {0}")]
    Answer(String),

    /// Answer rendering error
    #[error("render error: {0}")]
    Render(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
