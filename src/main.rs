use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cairn_assistant::knowledge::store::FaqStore;
use cairn_assistant::voice::{RendererChain, SpeechToText, Synthesizer};
use cairn_assistant::{Assistant, ChatClient, Config, KnowledgeBase};

/// Cairn - Voice-driven FAQ assistant
#[derive(Parser)]
#[command(name = "cairn", version, about)]
struct Cli {
    /// Path to the FAQ database (overrides config)
    #[arg(long, env = "CAIRN_FAQ_PATH")]
    faq_path: Option<std::path::PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Speak answers aloud when possible
    #[arg(long)]
    speak: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a single question
    Ask {
        /// The question to answer
        #[arg(required_unless_present = "audio", conflicts_with = "audio")]
        question: Option<String>,

        /// Similarity threshold override (0.0 to 1.0)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Transcribe a recorded WAV file and answer the transcript
        #[arg(long, value_name = "WAV")]
        audio: Option<std::path::PathBuf>,
    },
    /// Add a question/answer pair to the FAQ base
    Add {
        /// The FAQ question
        question: String,
        /// The FAQ answer
        answer: String,
    },
    /// List all FAQ questions
    List,
    /// Show knowledge base statistics
    Stats,
    /// Interactive question loop
    Repl,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,cairn_assistant=info",
        1 => "info,cairn_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(path) = cli.faq_path {
        config.faq_path = path;
    }
    if cli.speak {
        config.voice.enabled = true;
    }

    match cli.command {
        Command::Ask {
            question,
            threshold,
            audio,
        } => cmd_ask(&config, question, threshold, audio).await,
        Command::Add { question, answer } => cmd_add(&config, &question, &answer),
        Command::List => cmd_list(&config),
        Command::Stats => cmd_stats(&config),
        Command::Repl => cmd_repl(&config).await,
        Command::TestTts { text } => cmd_test_tts(&config, &text).await,
    }
}

/// Open the knowledge base described by the configuration
fn open_knowledge(config: &Config) -> Arc<KnowledgeBase> {
    let store = FaqStore::new(config.faq_path.clone());
    Arc::new(KnowledgeBase::open(store, &config.matching))
}

/// Assemble the full pipeline (knowledge base, fallback, renderers)
fn build_assistant(config: &Config) -> Assistant {
    let knowledge = open_knowledge(config);

    let chat = config.api_keys.openai.as_ref().and_then(|key| {
        match ChatClient::new(key.clone(), &config.llm) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "generative fallback disabled");
                None
            }
        }
    });
    if chat.is_none() {
        tracing::info!("no generative fallback configured, FAQ-only mode");
    }

    Assistant::new(knowledge, chat, RendererChain::for_config(config))
}

/// Answer a single question, typed or transcribed from a recording
async fn cmd_ask(
    config: &Config,
    question: Option<String>,
    threshold: Option<f32>,
    audio: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    let question = match (question, audio) {
        (Some(q), None) => q,
        (None, Some(path)) => transcribe_question(config, &path).await?,
        // clap enforces exactly one of the two
        _ => anyhow::bail!("pass a question or --audio <WAV>"),
    };

    if let Some(t) = threshold {
        anyhow::ensure!((0.0..=1.0).contains(&t), "threshold must be in [0.0, 1.0]");
        let knowledge = open_knowledge(config);
        match knowledge.lookup_with_threshold(&question, t) {
            Some(answer) => println!("{answer}"),
            None => println!("No FAQ match above threshold {t}."),
        }
        return Ok(());
    }

    let assistant = build_assistant(config);
    assistant.respond(&question).await;
    Ok(())
}

/// Transcribe a recorded question via Whisper
async fn transcribe_question(
    config: &Config,
    path: &std::path::Path,
) -> anyhow::Result<String> {
    let key = config
        .api_keys
        .openai
        .clone()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required for transcription"))?;

    let stt = SpeechToText::new(key, config.voice.stt_model.clone())?;
    let transcript = stt.transcribe_file(path).await?;
    println!("Heard: \"{transcript}\"");
    Ok(transcript)
}

/// Add a question/answer pair
fn cmd_add(config: &Config, question: &str, answer: &str) -> anyhow::Result<()> {
    let knowledge = open_knowledge(config);
    knowledge.add_entry(question, answer);
    println!("Added FAQ ({} total).", knowledge.count());
    Ok(())
}

/// List all FAQ questions
fn cmd_list(config: &Config) -> anyhow::Result<()> {
    let knowledge = open_knowledge(config);
    for question in knowledge.list_questions() {
        println!("{question}");
    }
    Ok(())
}

/// Show knowledge base statistics
fn cmd_stats(config: &Config) -> anyhow::Result<()> {
    let knowledge = open_knowledge(config);
    let stats = knowledge.stats();
    println!("FAQ entries:    {}", stats.entries);
    println!("Cache entries:  {}", stats.cache_entries);
    println!("Cache hits:     {}", stats.cache_hits);
    println!("Exact hits:     {}", stats.exact_hits);
    println!("Scored queries: {}", stats.scored_queries);
    Ok(())
}

/// Interactive question loop over stdin
async fn cmd_repl(config: &Config) -> anyhow::Result<()> {
    let assistant = build_assistant(config);
    println!(
        "Cairn ready ({} FAQs loaded). Empty line quits.",
        assistant.knowledge().count()
    );

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            break;
        }

        assistant.respond(question).await;
    }

    println!("Bye!");
    Ok(())
}

/// Test TTS output
async fn cmd_test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    let key = config
        .api_keys
        .openai
        .clone()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required for TTS"))?;

    use cairn_assistant::voice::{AnswerRenderer, SpeechRenderer};

    let renderer = SpeechRenderer::new(Synthesizer::new(key, &config.voice)?)?;
    println!("Synthesizing and playing: \"{text}\"");
    renderer.render(text).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_accepts_a_typed_question() {
        let cli = Cli::try_parse_from(["cairn", "ask", "what is supercomputing"]).unwrap();
        match cli.command {
            Command::Ask {
                question, audio, ..
            } => {
                assert_eq!(question.as_deref(), Some("what is supercomputing"));
                assert!(audio.is_none());
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn ask_accepts_a_recorded_question() {
        let cli = Cli::try_parse_from(["cairn", "ask", "--audio", "question.wav"]).unwrap();
        match cli.command {
            Command::Ask {
                question, audio, ..
            } => {
                assert!(question.is_none());
                assert_eq!(
                    audio.as_deref(),
                    Some(std::path::Path::new("question.wav"))
                );
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn ask_rejects_question_and_audio_together() {
        let result = Cli::try_parse_from(["cairn", "ask", "hello", "--audio", "q.wav"]);
        assert!(result.is_err());
    }

    #[test]
    fn ask_requires_question_or_audio() {
        let result = Cli::try_parse_from(["cairn", "ask"]);
        assert!(result.is_err());
    }
}
