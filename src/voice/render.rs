//! Answer rendering strategies
//!
//! Rendering is an ordered chain of strategies with a uniform attempt/fail
//! contract: hosted TTS first, then an offline speech engine, then plain
//! text. The chain tries each in order until one succeeds, so a network or
//! audio failure degrades the answer's delivery, never the answer itself.

use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;

use crate::voice::Synthesizer;
use crate::{Error, Result};

/// One way of delivering an answer to the user
#[async_trait]
pub trait AnswerRenderer: Send + Sync {
    /// Strategy name, for logs
    fn name(&self) -> &'static str;

    /// Attempt to deliver the answer text
    async fn render(&self, text: &str) -> Result<()>;
}

/// Ordered list of renderers tried until one succeeds
pub struct RendererChain {
    renderers: Vec<Box<dyn AnswerRenderer>>,
}

impl RendererChain {
    /// Build a chain from an ordered list of strategies
    #[must_use]
    pub fn new(renderers: Vec<Box<dyn AnswerRenderer>>) -> Self {
        Self { renderers }
    }

    /// The default chain for a configuration: hosted TTS when voice is
    /// enabled and a key is present, then an offline engine if one is
    /// installed, then plain text
    #[must_use]
    pub fn for_config(config: &crate::Config) -> Self {
        let mut renderers: Vec<Box<dyn AnswerRenderer>> = Vec::new();

        if config.voice.enabled {
            if let Some(key) = &config.api_keys.openai {
                match Synthesizer::new(key.clone(), &config.voice) {
                    Ok(synth) => match SpeechRenderer::new(synth) {
                        Ok(renderer) => renderers.push(Box::new(renderer)),
                        Err(e) => tracing::warn!(error = %e, "speech renderer unavailable"),
                    },
                    Err(e) => tracing::warn!(error = %e, "TTS unavailable"),
                }
            }

            match OfflineSpeechRenderer::new() {
                Ok(renderer) => renderers.push(Box::new(renderer)),
                Err(e) => tracing::debug!(error = %e, "no offline speech engine found"),
            }
        }

        renderers.push(Box::new(TextRenderer));
        Self::new(renderers)
    }

    /// Deliver an answer through the first strategy that succeeds
    ///
    /// # Errors
    ///
    /// Returns error only when every strategy in the chain fails
    pub async fn render(&self, text: &str) -> Result<()> {
        for renderer in &self.renderers {
            match renderer.render(text).await {
                Ok(()) => {
                    tracing::debug!(renderer = renderer.name(), "answer rendered");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(renderer = renderer.name(), error = %e, "renderer failed, trying next");
                }
            }
        }

        Err(Error::Render("every renderer failed".to_string()))
    }

    /// Number of strategies in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Whether the chain has no strategies
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

/// Hosted TTS rendering: synthesize MP3 audio and hand it to a system player
pub struct SpeechRenderer {
    synthesizer: Synthesizer,
    player: PathBuf,
    player_args: Vec<&'static str>,
}

impl SpeechRenderer {
    /// Create a speech renderer, locating an installed audio player
    ///
    /// # Errors
    ///
    /// Returns error if no supported player is installed
    pub fn new(synthesizer: Synthesizer) -> Result<Self> {
        let candidates: &[(&str, &[&'static str])] = &[
            ("mpg123", &["-q"]),
            ("afplay", &[]),
            ("mpv", &["--really-quiet", "--no-video"]),
            ("ffplay", &["-autoexit", "-nodisp", "-loglevel", "quiet"]),
        ];

        for (name, args) in candidates {
            if let Ok(player) = which::which(name) {
                return Ok(Self {
                    synthesizer,
                    player,
                    player_args: args.to_vec(),
                });
            }
        }

        Err(Error::Render("no audio player found".to_string()))
    }
}

#[async_trait]
impl AnswerRenderer for SpeechRenderer {
    fn name(&self) -> &'static str {
        "speech"
    }

    async fn render(&self, text: &str) -> Result<()> {
        let audio = self.synthesizer.synthesize(text).await?;

        // The temp file must outlive the player process
        let mut file = tempfile::Builder::new()
            .prefix("cairn-answer-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&audio)?;
        file.flush()?;

        let status = tokio::process::Command::new(&self.player)
            .args(&self.player_args)
            .arg(file.path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if !status.success() {
            return Err(Error::Render(format!(
                "audio player exited with {status}"
            )));
        }
        Ok(())
    }
}

/// Offline speech rendering through an installed `espeak`/`say` engine
pub struct OfflineSpeechRenderer {
    engine: PathBuf,
}

impl OfflineSpeechRenderer {
    /// Create an offline renderer, locating an installed speech engine
    ///
    /// # Errors
    ///
    /// Returns error if no supported engine is installed
    pub fn new() -> Result<Self> {
        for name in ["espeak-ng", "espeak", "say"] {
            if let Ok(engine) = which::which(name) {
                return Ok(Self { engine });
            }
        }
        Err(Error::Render("no offline speech engine found".to_string()))
    }
}

#[async_trait]
impl AnswerRenderer for OfflineSpeechRenderer {
    fn name(&self) -> &'static str {
        "offline-speech"
    }

    async fn render(&self, text: &str) -> Result<()> {
        let status = tokio::process::Command::new(&self.engine)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if !status.success() {
            return Err(Error::Render(format!(
                "speech engine exited with {status}"
            )));
        }
        Ok(())
    }
}

/// Plain text rendering; always succeeds
pub struct TextRenderer;

#[async_trait]
impl AnswerRenderer for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    async fn render(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FailingRenderer {
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AnswerRenderer for FailingRenderer {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn render(&self, _text: &str) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(Error::Render("boom".to_string()))
        }
    }

    struct RecordingRenderer {
        rendered: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AnswerRenderer for RecordingRenderer {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn render(&self, _text: &str) -> Result<()> {
            self.rendered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn chain_falls_through_to_first_success() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let rendered = Arc::new(AtomicUsize::new(0));

        let chain = RendererChain::new(vec![
            Box::new(FailingRenderer {
                attempts: Arc::clone(&attempts),
            }),
            Box::new(RecordingRenderer {
                rendered: Arc::clone(&rendered),
            }),
            Box::new(RecordingRenderer {
                rendered: Arc::clone(&rendered),
            }),
        ]);

        chain.render("hello").await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        // Only the first succeeding renderer runs
        assert_eq!(rendered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn chain_errors_when_all_fail() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let chain = RendererChain::new(vec![
            Box::new(FailingRenderer {
                attempts: Arc::clone(&attempts),
            }),
            Box::new(FailingRenderer {
                attempts: Arc::clone(&attempts),
            }),
        ]);

        let result = chain.render("hello").await;
        assert!(matches!(result, Err(Error::Render(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn text_renderer_always_succeeds() {
        TextRenderer.render("plain answer").await.unwrap();
    }
}
