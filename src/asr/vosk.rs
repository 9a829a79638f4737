//! Local offline recognition using Vosk

use anyhow::{Context, Result};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};
use vosk::{Model, Recognizer};

use super::{RecognitionError, SessionParams, SpeechRecognizer, Transcript, Utterance};
use crate::audio::{self, SAMPLE_RATE};

/// Load the Vosk model from disk
pub fn load_model(model_path: &str) -> Result<Model> {
    let path = std::path::PathBuf::from(model_path);

    if !path.exists() {
        return Err(anyhow::anyhow!("Vosk model not found at {}", path.display()));
    }

    info!("Loading Vosk model from: {}", path.display());

    let model_str = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Vosk model path is not valid UTF-8: {}", path.display()))?;

    Model::new(model_str).context("Failed to load Vosk model")
}

/// Vosk-based recognizer engine.
///
/// Owns the shared model and the live audio channel. Each listening
/// session decodes one endpointed utterance with a freshly constructed
/// `vosk::Recognizer`, so decoder state never carries over between
/// sessions.
pub struct VoskRecognizer {
    model: Model,
    audio_rx: UnboundedReceiver<Vec<i16>>,
}

impl VoskRecognizer {
    pub fn new(model: Model, audio_rx: UnboundedReceiver<Vec<i16>>) -> Self {
        Self { model, audio_rx }
    }

    fn decode(&self, samples: &[i16], params: &SessionParams) -> Result<Utterance, RecognitionError> {
        let mut recognizer = Recognizer::new(&self.model, SAMPLE_RATE as f32)
            .ok_or(RecognitionError::Client)?;
        recognizer.set_max_alternatives(params.max_transcripts as u16);

        recognizer.accept_waveform(samples);

        let result = recognizer.final_result();
        let mut candidates: Vec<Transcript> = Vec::new();

        if let Some(multiple) = result.multiple() {
            for alternative in multiple.alternatives {
                let text = alternative.text.trim();
                if text.is_empty() {
                    continue;
                }
                candidates.push(Transcript {
                    text: text.to_string(),
                    confidence: alternative.confidence,
                });
            }
        }

        debug!("Decoded {} candidate transcript(s)", candidates.len());
        Ok(Utterance::new(candidates))
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for VoskRecognizer {
    async fn listen(&mut self, params: &SessionParams) -> Result<Utterance, RecognitionError> {
        let samples = audio::capture_utterance(
            &mut self.audio_rx,
            params.complete_silence,
            params.speech_wait,
        )
        .await?;

        // An empty decode is not an error: the loop speaks its retry
        // prompt on an empty candidate list
        self.decode(&samples, params)
    }

    fn name(&self) -> &str {
        "vosk"
    }
}
