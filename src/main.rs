//! Saarthi - Voice-Guided Accessibility Assistant
//!
//! Speaks a welcome prompt, then listens continuously for one of three
//! commands (Blind Navigation, Currency Detection, Reading Mode) and
//! activates the matching assistive mode.

use anyhow::Result;
use clap::Parser;
use saarthi::asr::SessionParams;
use saarthi::camera::DeviceCamera;
use saarthi::chime::Chime;
use saarthi::config::Config;
use saarthi::error::SaarthiError;
use saarthi::modes::ModeCoordinator;
use saarthi::voice_loop::VoiceCommandLoop;
use saarthi::{asr, audio, permissions, tts};
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Audio input device index
    #[arg(short, long)]
    device: Option<usize>,

    /// Override the TTS engine (speechd, system)
    #[arg(long)]
    tts: Option<String>,

    /// Override the ASR engine (vosk, wyoming)
    #[arg(long)]
    asr: Option<String>,

    /// Override the Vosk model path
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🧭 Saarthi v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load config and apply CLI overrides
    let mut config = Config::load()?;
    if let Some(engine) = args.tts {
        config.tts_engine = engine;
    }
    if let Some(engine) = args.asr {
        config.asr_engine = engine;
    }
    if let Some(path) = args.model {
        config.vosk_model_path = path;
    }

    // Initialize TTS first so a permission denial can be spoken
    let synthesizer = tts::create_engine(&config).await?;

    // Permission gate: without device access the loop never starts
    let report = permissions::check_all(&config.camera_device);
    if !report.all_granted() {
        let message = report.denial_message();
        warn!("🛑 {}", message);
        synthesizer.speak(&message).await.ok();
        return Err(SaarthiError::Permission(message).into());
    }

    // Audio capture and recognizer
    let audio_rx = audio::start_capture(args.device)?;
    let recognizer = asr::create_engine(&config, audio_rx)?;
    info!("🎤 Recognizer '{}' ready", recognizer.name());

    // Mode coordinator task
    let camera = DeviceCamera::new(&config.camera_device);
    let (mode_tx, coordinator) = ModeCoordinator::new(synthesizer.clone(), camera);
    let coordinator_task = tokio::spawn(coordinator.run());

    // The command loop itself
    let mut vloop = VoiceCommandLoop::new(
        synthesizer,
        recognizer,
        SessionParams::from_config(&config),
        Duration::from_millis(config.settle_delay_ms),
        mode_tx,
    );
    if config.listen_chime {
        match Chime::new() {
            Ok(chime) => vloop = vloop.with_chime(chime),
            Err(e) => warn!("⚠️ Listen cue disabled: {}", e),
        }
    }

    info!("✅ Saarthi ready - say Blind Navigation, Currency Detection, or Reading Mode");

    tokio::select! {
        _ = vloop.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    // Dropping the loop closed the mode channel; let the coordinator
    // release the active mode before exiting
    coordinator_task.await.ok();

    Ok(())
}
