//! Audio capture and utterance endpointing using cpal

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::asr::RecognitionError;

pub const SAMPLE_RATE: u32 = 16000;
pub const CHUNK_SIZE: usize = 1024;

/// RMS energy above which a chunk counts as speech
const SPEECH_ENERGY_THRESHOLD: f32 = 250.0;

/// Start audio capture and return a receiver for audio chunks.
///
/// The cpal stream is not `Send`, so a dedicated thread owns it for the
/// life of the process and forwards chunks over the channel.
pub fn start_capture(device_index: Option<usize>) -> Result<UnboundedReceiver<Vec<i16>>> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<String>>();

    std::thread::spawn(move || capture_thread(device_index, tx, ready_tx));

    match ready_rx.recv() {
        Ok(Ok(name)) => {
            info!("🎙️ Audio capture started on '{}'", name);
            Ok(rx)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(anyhow::anyhow!("Audio capture thread exited before starting")),
    }
}

fn capture_thread(
    device_index: Option<usize>,
    tx: UnboundedSender<Vec<i16>>,
    ready_tx: std::sync::mpsc::Sender<Result<String>>,
) {
    let started = (|| -> Result<(cpal::Stream, String)> {
        let host = cpal::default_host();

        // List available devices
        info!("Available audio input devices:");
        for (i, device) in host.input_devices()?.enumerate() {
            let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
            let marker = if device_index == Some(i) { "*" } else { " " };
            info!("  {} [{}] {}", marker, i, name);
        }

        // Select device
        let device = if let Some(idx) = device_index {
            host.input_devices()?
                .nth(idx)
                .context("Device index out of range")?
        } else {
            host.default_input_device()
                .context("No default input device")?
        };

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        // Configure stream
        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Fixed(CHUNK_SIZE as u32),
        };

        let stream = device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                // Receiver dropped means the assistant is shutting down
                let _ = tx.send(data.to_vec());
            },
            |err| {
                warn!("Audio stream error: {}", err);
            },
            None,
        )?;

        stream.play()?;
        Ok((stream, device_name))
    })();

    match started {
        Ok((stream, name)) => {
            let _ = ready_tx.send(Ok(name));
            // Keep the stream alive on this thread until the process exits
            let _stream = stream;
            loop {
                std::thread::park();
            }
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
        }
    }
}

/// Calculate RMS audio energy for endpointing
pub fn calculate_energy(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: i64 = samples.iter().map(|&s| (s as i64).pow(2)).sum();
    (sum as f32 / samples.len() as f32).sqrt()
}

/// Decision after feeding one audio chunk to the endpointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointDecision {
    /// No speech heard yet
    Waiting,
    /// Speech in progress (or a pause shorter than the silence threshold)
    Speaking,
    /// Trailing silence reached the threshold; the utterance is complete
    Complete,
    /// No speech onset within the wait window
    TimedOut,
}

/// End-of-utterance detector.
///
/// Waits for speech onset, then finalizes once trailing silence reaches
/// the configured threshold. Pauses shorter than the threshold stay part
/// of the same utterance.
pub struct Endpointer {
    complete_silence: Duration,
    speech_wait: Duration,
    speech_seen: bool,
    trailing_silence: Duration,
    waited: Duration,
}

impl Endpointer {
    pub fn new(complete_silence: Duration, speech_wait: Duration) -> Self {
        Self {
            complete_silence,
            speech_wait,
            speech_seen: false,
            trailing_silence: Duration::ZERO,
            waited: Duration::ZERO,
        }
    }

    /// Feed the energy of one chunk covering `chunk_duration` of audio
    pub fn push(&mut self, energy: f32, chunk_duration: Duration) -> EndpointDecision {
        if energy >= SPEECH_ENERGY_THRESHOLD {
            self.speech_seen = true;
            self.trailing_silence = Duration::ZERO;
            return EndpointDecision::Speaking;
        }

        if self.speech_seen {
            self.trailing_silence += chunk_duration;
            if self.trailing_silence >= self.complete_silence {
                EndpointDecision::Complete
            } else {
                EndpointDecision::Speaking
            }
        } else {
            self.waited += chunk_duration;
            if self.waited >= self.speech_wait {
                EndpointDecision::TimedOut
            } else {
                EndpointDecision::Waiting
            }
        }
    }
}

/// Capture one endpointed utterance from the live audio channel.
///
/// Chunks buffered before the call (e.g. microphone input captured while
/// the synthesizer was speaking) are discarded so the session starts from
/// a clean state. Leading silence is dropped; everything from speech onset
/// through the trailing silence is returned.
pub async fn capture_utterance(
    rx: &mut UnboundedReceiver<Vec<i16>>,
    complete_silence: Duration,
    speech_wait: Duration,
) -> Result<Vec<i16>, RecognitionError> {
    // Discard stale audio from before this session
    while rx.try_recv().is_ok() {}

    let mut endpointer = Endpointer::new(complete_silence, speech_wait);
    let mut samples: Vec<i16> = Vec::new();

    loop {
        let chunk = rx.recv().await.ok_or(RecognitionError::Audio)?;
        let chunk_duration = Duration::from_secs_f64(chunk.len() as f64 / SAMPLE_RATE as f64);

        match endpointer.push(calculate_energy(&chunk), chunk_duration) {
            EndpointDecision::Waiting => {}
            EndpointDecision::Speaking => samples.extend_from_slice(&chunk),
            EndpointDecision::Complete => {
                samples.extend_from_slice(&chunk);
                return Ok(samples);
            }
            EndpointDecision::TimedOut => return Err(RecognitionError::SpeechTimeout),
        }
    }
}
