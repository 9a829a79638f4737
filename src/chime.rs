//! Listen-start cue tone
//!
//! Plays a short tone just before each listening session so the user
//! knows the microphone is open. Uses a channel-based architecture to
//! handle rodio's non-Send stream: a dedicated audio thread owns the
//! playback infrastructure.

use rodio::source::{SineWave, Source};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

const CUE_FREQ_HZ: f32 = 880.0;
const CUE_DURATION: Duration = Duration::from_millis(120);
const CUE_AMPLITUDE: f32 = 0.2;

enum ChimeCommand {
    ListenStart,
}

/// Thread-safe handle to the cue-tone player
#[derive(Clone)]
pub struct Chime {
    sender: mpsc::Sender<ChimeCommand>,
}

impl std::fmt::Debug for Chime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chime").finish()
    }
}

impl Chime {
    pub fn new() -> anyhow::Result<Self> {
        let (sender, receiver) = mpsc::channel::<ChimeCommand>();

        // Spawn dedicated audio thread
        thread::spawn(move || {
            Self::audio_thread(receiver);
        });

        Ok(Self { sender })
    }

    fn audio_thread(receiver: mpsc::Receiver<ChimeCommand>) {
        use rodio::{OutputStream, Sink};

        // Initialize audio output on this thread
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(s) => s,
            Err(e) => {
                warn!("🔇 Failed to initialize cue audio output: {}", e);
                return;
            }
        };

        // Keep stream alive
        let _stream = stream;
        let sink = match Sink::try_new(&stream_handle) {
            Ok(s) => s,
            Err(e) => {
                warn!("🔇 Failed to create cue audio sink: {}", e);
                return;
            }
        };

        info!("🔔 Cue tone thread started");

        while let Ok(cmd) = receiver.recv() {
            match cmd {
                ChimeCommand::ListenStart => {
                    let source = SineWave::new(CUE_FREQ_HZ)
                        .take_duration(CUE_DURATION)
                        .amplify(CUE_AMPLITUDE);
                    sink.append(source);
                    sink.sleep_until_end();
                }
            }
        }

        info!("🔇 Cue tone thread stopped");
    }

    /// Queue the listen-start cue; best-effort
    pub fn listen_start(&self) {
        let _ = self.sender.send(ChimeCommand::ListenStart);
    }
}
