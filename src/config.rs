//! Configuration management for the Cairn assistant
//!
//! Configuration is resolved in three layers: built-in defaults, an optional
//! TOML file at `~/.config/cairn/config.toml` (all fields optional, a partial
//! overlay on top of defaults), and environment variables. A missing or
//! unparseable file falls back to defaults with a warning.

use std::path::PathBuf;

use serde::Deserialize;

use crate::Result;

/// Default similarity threshold for FAQ matching
pub const DEFAULT_THRESHOLD: f32 = 0.25;

/// Default capacity of the bounded match cache
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Cairn assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory (FAQ database, scratch audio)
    pub data_dir: PathBuf,

    /// Path to the persisted FAQ document
    pub faq_path: PathBuf,

    /// FAQ matching configuration
    pub matching: MatchingConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Generative fallback configuration
    pub llm: LlmConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// FAQ matching configuration
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Minimum cosine similarity for a match (strict greater-than)
    pub threshold: f32,

    /// Capacity of the query result cache
    pub cache_capacity: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable speech output
    pub enabled: bool,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "nova".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// Generative fallback (chat completion) configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model identifier for chat completions
    pub model: String,

    /// Maximum tokens per generated answer
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// System prompt establishing the assistant persona
    pub system_prompt: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Fixed retry count on transport failure
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            temperature: 0.7,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout_secs: 8,
            max_retries: 1,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (chat, Whisper, and TTS)
    pub openai: Option<String>,
}

/// Default system prompt for the generative fallback
const DEFAULT_SYSTEM_PROMPT: &str = "You are Cairn, a friendly voice assistant. \
Answer questions about the knowledge base you host with enthusiasm, clarity, \
and a concise, approachable tone. When asked your name, always answer that \
your name is Cairn.";

/// Top-level TOML configuration file schema
///
/// Every field is optional so the file can override any subset of defaults
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    data_dir: Option<String>,

    #[serde(default)]
    matching: MatchingFileConfig,

    #[serde(default)]
    voice: VoiceFileConfig,

    #[serde(default)]
    llm: LlmFileConfig,

    #[serde(default)]
    api_keys: ApiKeysFileConfig,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingFileConfig {
    threshold: Option<f32>,
    cache_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct VoiceFileConfig {
    enabled: Option<bool>,
    stt_model: Option<String>,
    tts_model: Option<String>,
    tts_voice: Option<String>,
    tts_speed: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmFileConfig {
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    system_prompt: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiKeysFileConfig {
    openai: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = default_data_dir();
        let faq_path = data_dir.join("faq_database.json");
        Self {
            data_dir,
            faq_path,
            matching: MatchingConfig::default(),
            voice: VoiceConfig::default(),
            llm: LlmConfig::default(),
            api_keys: ApiKeys::default(),
        }
    }
}

impl Config {
    /// Load configuration from the standard file path, environment, and
    /// defaults
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; kept fallible so callers don't need
    /// to change when validation is added
    pub fn load() -> Result<Self> {
        let file = config_file_path().map_or_else(ConfigFile::default, load_config_file);
        Ok(Self::from_overlay(file))
    }

    /// Merge a parsed overlay file and environment variables onto defaults
    fn from_overlay(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(dir) = file.data_dir {
            config.data_dir = PathBuf::from(dir);
            config.faq_path = config.data_dir.join("faq_database.json");
        }

        if let Some(t) = file.matching.threshold {
            config.matching.threshold = t;
        }
        if let Some(c) = file.matching.cache_capacity {
            config.matching.cache_capacity = c;
        }

        if let Some(v) = file.voice.enabled {
            config.voice.enabled = v;
        }
        if let Some(m) = file.voice.stt_model {
            config.voice.stt_model = m;
        }
        if let Some(m) = file.voice.tts_model {
            config.voice.tts_model = m;
        }
        if let Some(v) = file.voice.tts_voice {
            config.voice.tts_voice = v;
        }
        if let Some(s) = file.voice.tts_speed {
            config.voice.tts_speed = s;
        }

        if let Some(m) = file.llm.model {
            config.llm.model = m;
        }
        if let Some(t) = file.llm.max_tokens {
            config.llm.max_tokens = t;
        }
        if let Some(t) = file.llm.temperature {
            config.llm.temperature = t;
        }
        if let Some(p) = file.llm.system_prompt {
            config.llm.system_prompt = p;
        }
        if let Some(t) = file.llm.timeout_secs {
            config.llm.timeout_secs = t;
        }
        if let Some(r) = file.llm.max_retries {
            config.llm.max_retries = r;
        }

        config.api_keys.openai = file.api_keys.openai;

        // Environment takes precedence over the file
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.api_keys.openai = Some(key);
            }
        }
        if let Ok(path) = std::env::var("CAIRN_FAQ_PATH") {
            if !path.is_empty() {
                config.faq_path = PathBuf::from(path);
            }
        }
        if let Ok(t) = std::env::var("CAIRN_THRESHOLD") {
            match t.parse::<f32>() {
                Ok(parsed) => config.matching.threshold = parsed,
                Err(e) => tracing::warn!(value = %t, error = %e, "ignoring invalid CAIRN_THRESHOLD"),
            }
        }

        config
    }
}

/// Standard config file path: `~/.config/cairn/config.toml`
fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("cairn").join("config.toml"))
}

/// Default data directory: `~/.local/share/cairn/` (platform equivalent)
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".cairn"),
        |dirs| dirs.data_dir().join("cairn"),
    )
}

/// Parse the overlay file, falling back to defaults on any failure
fn load_config_file(path: PathBuf) -> ConfigFile {
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return ConfigFile::default(),
    };

    match toml::from_str(&contents) {
        Ok(parsed) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            parsed
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
            ConfigFile::default()
        }
    }
}
