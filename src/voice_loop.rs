//! The voice command loop
//!
//! Alternates speaking and listening: speak a prompt, listen for one
//! utterance, classify it, dispatch a mode request or speak the retry
//! prompt, settle, listen again. Every terminal outcome (match,
//! no-match, any recognizer error) restarts the cycle; nothing short of
//! tearing the loop down stops it.

use crate::asr::{RecognitionError, SessionParams, SpeechRecognizer, Utterance};
use crate::audit;
use crate::chime::Chime;
use crate::intent::{self, Intent};
use crate::modes::ModeRequest;
use crate::tts::SpeechSynthesizer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, warn};

/// Spoken once when the loop starts
pub const WELCOME_PROMPT: &str =
    "Welcome to Saarthi. For navigation say Blind Navigation. \
     To read something say Reading Mode. To detect the currency say Currency Detection.";

/// Spoken when an utterance matches no command
pub const RETRY_PROMPT: &str = "Please say Blind Navigation, Currency Detection, or Reading Mode.";

/// Which phase of the speak/listen cycle currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListeningState {
    #[default]
    Idle,
    Speaking,
    Listening,
}

/// Terminal outcome of one listening session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A command matched and was handed to the mode coordinator
    Dispatched(Intent),
    /// Nothing matched; the retry prompt was spoken
    RetryPrompted,
    /// The recognizer failed; its message was surfaced
    Failed(RecognitionError),
    /// The mode coordinator is gone; the loop should stop
    Stopped,
    /// A session was already active; nothing happened
    Rejected,
}

pub struct VoiceCommandLoop {
    state: ListeningState,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    recognizer: Box<dyn SpeechRecognizer>,
    session: SessionParams,
    settle_delay: Duration,
    chime: Option<Chime>,
    modes: Sender<ModeRequest>,
}

impl VoiceCommandLoop {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        recognizer: Box<dyn SpeechRecognizer>,
        session: SessionParams,
        settle_delay: Duration,
        modes: Sender<ModeRequest>,
    ) -> Self {
        Self {
            state: ListeningState::Idle,
            synthesizer,
            recognizer,
            session,
            settle_delay,
            chime: None,
            modes,
        }
    }

    /// Play a short cue before each listening session
    pub fn with_chime(mut self, chime: Chime) -> Self {
        self.chime = Some(chime);
        self
    }

    pub fn state(&self) -> ListeningState {
        self.state
    }

    /// Speak a prompt to completion. Synthesis failure is logged and
    /// treated like completion; spoken feedback is best-effort and must
    /// never stall the loop.
    async fn speak(&mut self, text: &str) {
        self.state = ListeningState::Speaking;
        if let Err(e) = self.synthesizer.speak(text).await {
            warn!("⚠️ Synthesis failed: {}", e);
        }
        self.state = ListeningState::Idle;
    }

    /// Speak the welcome prompt. Listening may only begin once this has
    /// resolved, so synthesis and recognition never overlap.
    pub async fn start(&mut self) {
        info!("🗣️ Voice command loop starting");
        self.speak(WELCOME_PROMPT).await;
    }

    /// Run one listening session to its terminal outcome.
    ///
    /// Rejected unless the loop is Idle: a new session may only begin
    /// after the previous speaking/listening session has fully resolved.
    pub async fn listen_once(&mut self) -> SessionOutcome {
        if self.state != ListeningState::Idle {
            debug!("Listen rejected: loop is {:?}", self.state);
            return SessionOutcome::Rejected;
        }

        if let Some(chime) = &self.chime {
            chime.listen_start();
        }

        self.state = ListeningState::Listening;
        debug!(
            "Listening via '{}' (language {}, max {} candidates)",
            self.recognizer.name(),
            self.session.language,
            self.session.max_transcripts
        );
        let heard = self.recognizer.listen(&self.session).await;
        self.state = ListeningState::Idle;

        match heard {
            Ok(utterance) => self.handle_utterance(utterance).await,
            Err(error) => {
                // Surface the human-readable message; no error is fatal
                warn!("❌ Recognition error: {}", error);
                let _ = audit::log(&format!("Recognition error: {}", error));
                SessionOutcome::Failed(error)
            }
        }
    }

    async fn handle_utterance(&mut self, utterance: Utterance) -> SessionOutcome {
        let Some(best) = utterance.best() else {
            debug!("No speech results");
            return self.retry().await;
        };

        let spoken = best.text.trim().to_lowercase();
        info!("📝 Heard: '{}'", spoken);

        match intent::classify(&spoken) {
            Intent::Unrecognized => {
                debug!("Command not recognized: '{}'", spoken);
                let _ = audit::log(&format!("Command not recognized: {}", spoken));
                self.retry().await
            }
            matched => {
                info!("🎯 Matched command: {}", matched.name());
                let _ = audit::log(&format!(
                    "Command recognized: '{}' -> {}",
                    spoken,
                    matched.name()
                ));
                if self
                    .modes
                    .send(ModeRequest::Activate(matched))
                    .await
                    .is_err()
                {
                    warn!("Mode coordinator is gone, stopping loop");
                    return SessionOutcome::Stopped;
                }
                SessionOutcome::Dispatched(matched)
            }
        }
    }

    async fn retry(&mut self) -> SessionOutcome {
        self.speak(RETRY_PROMPT).await;
        SessionOutcome::RetryPrompted
    }

    /// Drive the loop until the coordinator goes away: welcome prompt,
    /// then listen and settle forever. The settling delay keeps a
    /// finished session from re-grabbing audio resources while the
    /// platform is still releasing them.
    pub async fn run(mut self) {
        self.start().await;

        loop {
            match self.listen_once().await {
                SessionOutcome::Stopped => break,
                _ => tokio::time::sleep(self.settle_delay).await,
            }
        }

        info!("Voice command loop stopped");
    }
}
