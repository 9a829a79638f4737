//! Speech recognition module
//!
//! Provides multiple recognizer backends:
//! - Vosk: local offline recognition
//! - Wyoming: remote recognition protocol (e.g., faster-whisper)

pub mod vosk;
pub mod wyoming;

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

// Re-export main types
pub use self::vosk::VoskRecognizer;
pub use self::wyoming::WyomingRecognizer;

/// One candidate transcript with recognizer confidence
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub confidence: f32,
}

/// Ranked candidate transcripts from one listening session; may be empty
#[derive(Debug, Clone, Default)]
pub struct Utterance {
    pub candidates: Vec<Transcript>,
}

impl Utterance {
    pub fn new(candidates: Vec<Transcript>) -> Self {
        Self { candidates }
    }

    /// Single-candidate utterance (network backends return one transcript)
    pub fn single(text: String, confidence: f32) -> Self {
        Self {
            candidates: vec![Transcript { text, confidence }],
        }
    }

    /// Highest-ranked candidate
    pub fn best(&self) -> Option<&Transcript> {
        self.candidates.first()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Parameters for one listening session
#[derive(Debug, Clone)]
pub struct SessionParams {
    /// Recognition language (free-form model)
    pub language: String,
    /// Maximum candidate transcripts to return
    pub max_transcripts: usize,
    /// Trailing silence that ends the utterance
    pub complete_silence: Duration,
    /// How long to wait for speech onset before giving up
    pub speech_wait: Duration,
    /// Whether intermediate results are wanted (the loop never wants them)
    pub partial_results: bool,
}

impl SessionParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.language.clone(),
            max_transcripts: config.max_transcripts,
            complete_silence: Duration::from_millis(config.complete_silence_ms),
            speech_wait: Duration::from_millis(config.speech_wait_ms),
            partial_results: false,
        }
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Why a listening session failed.
///
/// The display strings are the exact messages surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("Audio recording error")]
    Audio,
    #[error("Client side error")]
    Client,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("Network error")]
    Network,
    #[error("Network timeout")]
    NetworkTimeout,
    #[error("No match found - please try again")]
    NoMatch,
    #[error("Recognizer busy")]
    Busy,
    #[error("Server error")]
    Server,
    #[error("No speech detected - please try again")]
    SpeechTimeout,
}

/// Trait for speech recognizer engines.
///
/// One `listen` call is one session: it resolves with the ranked candidate
/// transcripts of a single utterance, or with a `RecognitionError`.
/// Implementations rebuild their decoder state per session so a failed
/// session cannot degrade the next one.
#[async_trait]
pub trait SpeechRecognizer: Send {
    async fn listen(&mut self, params: &SessionParams) -> Result<Utterance, RecognitionError>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Factory to create the configured recognizer engine.
///
/// Takes ownership of the capture channel. When the local vosk model cannot
/// be loaded and the config permits network use, falls back to the Wyoming
/// backend instead of failing.
pub fn create_engine(
    config: &Config,
    audio_rx: UnboundedReceiver<Vec<i16>>,
) -> Result<Box<dyn SpeechRecognizer>> {
    match config.asr_engine.as_str() {
        "wyoming" => Ok(Box::new(WyomingRecognizer::new(
            &config.wyoming_host,
            config.wyoming_port,
            audio_rx,
        ))),
        _ => match self::vosk::load_model(&config.vosk_model_path) {
            Ok(model) => Ok(Box::new(VoskRecognizer::new(model, audio_rx))),
            Err(e) if !config.prefer_offline => {
                warn!(
                    "⚠️ Local recognizer unavailable ({}), falling back to Wyoming at {}:{}",
                    e, config.wyoming_host, config.wyoming_port
                );
                Ok(Box::new(WyomingRecognizer::new(
                    &config.wyoming_host,
                    config.wyoming_port,
                    audio_rx,
                )))
            }
            Err(e) => Err(e),
        },
    }
}
