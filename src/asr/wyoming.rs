//! Network recognition over the Wyoming protocol
//!
//! Wyoming is a simple protocol where events are JSON lines over TCP.
//! Each listening session captures one endpointed utterance locally and
//! ships it to the server for transcription.
//!
//! Reference: https://github.com/rhasspy/wyoming

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use super::{RecognitionError, SessionParams, SpeechRecognizer, Utterance};
use crate::audio::{self, SAMPLE_RATE};

/// Overall deadline for one transcription exchange with the server
const TRANSCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wyoming protocol recognizer.
///
/// Connects per session; a dead or unreachable server surfaces as a
/// recognition error and never halts the command loop.
pub struct WyomingRecognizer {
    host: String,
    port: u16,
    audio_rx: UnboundedReceiver<Vec<i16>>,
}

impl WyomingRecognizer {
    pub fn new(host: &str, port: u16, audio_rx: UnboundedReceiver<Vec<i16>>) -> Self {
        Self {
            host: host.to_string(),
            port,
            audio_rx,
        }
    }

    /// Check if the server is reachable
    pub async fn health_check(&self) -> bool {
        match TcpStream::connect((&*self.host, self.port)).await {
            Ok(_) => {
                debug!("Wyoming server available at {}:{}", self.host, self.port);
                true
            }
            Err(e) => {
                warn!("Wyoming server not available: {}", e);
                false
            }
        }
    }

    async fn transcribe(&self, samples: &[i16]) -> Result<String, RecognitionError> {
        let stream = TcpStream::connect((&*self.host, self.port))
            .await
            .map_err(|e| {
                warn!("Failed to connect to Wyoming server: {}", e);
                RecognitionError::Network
            })?;

        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        // i16 mono samples to little-endian PCM bytes
        let mut pcm = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            pcm.extend_from_slice(&sample.to_le_bytes());
        }

        let session = async {
            // Handshake
            let describe = serde_json::json!({"type": "describe"});
            writer.write_all(describe.to_string().as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;

            let mut line = String::new();
            reader.read_line(&mut line).await?;
            debug!("Wyoming handshake: {}", line.trim());

            // Stream the utterance as one chunk
            let audio_start = serde_json::json!({
                "type": "audio-start",
                "data": { "rate": SAMPLE_RATE, "width": 2, "channels": 1 }
            });
            writer.write_all(audio_start.to_string().as_bytes()).await?;
            writer.write_all(b"\n").await?;

            let audio_chunk = serde_json::json!({
                "type": "audio-chunk",
                "data": {
                    "rate": SAMPLE_RATE,
                    "width": 2,
                    "channels": 1,
                    "audio": STANDARD.encode(&pcm),
                    "timestamp": 0
                }
            });
            writer.write_all(audio_chunk.to_string().as_bytes()).await?;
            writer.write_all(b"\n").await?;

            let audio_stop = serde_json::json!({"type": "audio-stop"});
            writer.write_all(audio_stop.to_string().as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;

            debug!("Sent {} PCM bytes, waiting for transcript...", pcm.len());

            // Read events until the transcript arrives
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await? == 0 {
                    return Ok::<_, std::io::Error>(None);
                }

                if let Ok(event) = serde_json::from_str::<serde_json::Value>(&line) {
                    if event.get("type").and_then(|t| t.as_str()) == Some("transcript") {
                        let text = event
                            .get("data")
                            .and_then(|d| d.get("text"))
                            .and_then(|t| t.as_str())
                            .unwrap_or_default()
                            .to_string();
                        return Ok(Some(text));
                    }
                }
            }
        };

        match tokio::time::timeout(TRANSCRIPT_TIMEOUT, session).await {
            Ok(Ok(Some(text))) => {
                info!("📝 Wyoming transcript: '{}'", text);
                Ok(text)
            }
            Ok(Ok(None)) => {
                // Server closed the connection without a transcript
                warn!("Wyoming server closed connection without transcript");
                Err(RecognitionError::Server)
            }
            Ok(Err(e)) => {
                warn!("Wyoming session failed: {}", e);
                Err(RecognitionError::Network)
            }
            Err(_) => Err(RecognitionError::NetworkTimeout),
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for WyomingRecognizer {
    async fn listen(&mut self, params: &SessionParams) -> Result<Utterance, RecognitionError> {
        let samples = audio::capture_utterance(
            &mut self.audio_rx,
            params.complete_silence,
            params.speech_wait,
        )
        .await?;

        let text = self.transcribe(&samples).await?;
        if text.trim().is_empty() {
            return Ok(Utterance::default());
        }

        Ok(Utterance::single(text, 1.0))
    }

    fn name(&self) -> &str {
        "wyoming"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_start_event_shape() {
        let audio_start = serde_json::json!({
            "type": "audio-start",
            "data": { "rate": SAMPLE_RATE, "width": 2, "channels": 1 }
        });
        assert_eq!(audio_start["data"]["rate"], 16000);
        assert_eq!(audio_start["type"], "audio-start");
    }

    #[test]
    fn test_pcm_encoding_is_little_endian() {
        let samples = [0x0102i16, -1];
        let mut pcm = Vec::new();
        for sample in samples {
            pcm.extend_from_slice(&sample.to_le_bytes());
        }
        assert_eq!(pcm, vec![0x02, 0x01, 0xFF, 0xFF]);
    }
}
