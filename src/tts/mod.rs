//! Speech synthesis module
//!
//! Provides a unified interface for multiple TTS backends.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub mod speechd;
pub mod system;

/// Trait for speech synthesizer engines.
///
/// `speak` resolves only once the utterance has finished (or failed); the
/// command loop relies on this so recognition never overlaps synthesis.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + std::fmt::Debug {
    /// Speak the given text to completion
    async fn speak(&self, text: &str) -> Result<()>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Factory to create the configured synthesizer engine
pub async fn create_engine(config: &Config) -> Result<Arc<dyn SpeechSynthesizer>> {
    info!("🛠️ Creating TTS engine: {}", config.tts_engine);
    let engine: Arc<dyn SpeechSynthesizer> = match config.tts_engine.as_str() {
        "speechd_ng" | "speechd" => match speechd::SpeechdEngine::connect().await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!("  - speechd-ng unavailable ({}), using system fallback", e);
                Arc::new(system::SystemEngine::new(config))
            }
        },
        "system" => {
            info!("  - Using System TTS");
            Arc::new(system::SystemEngine::new(config))
        }
        _ => {
            warn!(
                "  - Unknown engine '{}', falling back to System",
                config.tts_engine
            );
            Arc::new(system::SystemEngine::new(config))
        }
    };
    info!("✅ TTS engine '{}' initialized", engine.name());
    Ok(engine)
}
