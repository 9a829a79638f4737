//! Mock speech recognizer for testing
//!
//! Provides scripted session outcomes for integration tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use saarthi::asr::{RecognitionError, SessionParams, SpeechRecognizer, Transcript, Utterance};

/// Mock recognizer that plays back a script of session outcomes
pub struct MockRecognizer {
    script: VecDeque<Result<Utterance, RecognitionError>>,
    /// Number of listen sessions run so far
    pub sessions: Arc<Mutex<usize>>,
}

impl MockRecognizer {
    pub fn new(script: Vec<Result<Utterance, RecognitionError>>) -> Self {
        Self {
            script: script.into(),
            sessions: Arc::new(Mutex::new(0)),
        }
    }

    /// Script a single session that hears one phrase
    pub fn with_phrase(text: &str, confidence: f32) -> Self {
        Self::new(vec![Ok(Utterance::new(vec![Transcript {
            text: text.to_string(),
            confidence,
        }]))])
    }

    pub fn session_count(&self) -> Arc<Mutex<usize>> {
        self.sessions.clone()
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn listen(&mut self, _params: &SessionParams) -> Result<Utterance, RecognitionError> {
        *self.sessions.lock().unwrap() += 1;

        // Past the end of the script nothing is heard
        self.script
            .pop_front()
            .unwrap_or(Err(RecognitionError::SpeechTimeout))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
