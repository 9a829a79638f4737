//! Assistive modes and their coordinator
//!
//! The voice loop never touches a mode directly: it sends a request over
//! a channel and the coordinator owns activation, announcements, and the
//! camera hand-off. This keeps command classification testable without
//! any mode machinery attached.

pub mod currency;
pub mod navigation;
pub mod reading;

use crate::audit;
use crate::camera::DeviceCamera;
use crate::intent::Intent;
use crate::tts::SpeechSynthesizer;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{info, warn};

pub use currency::CurrencyDetection;
pub use navigation::BlindNavigation;
pub use reading::Reading;

/// Request sent from the voice loop to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    Activate(Intent),
}

/// Trait for assistive modes
#[async_trait]
pub trait Mode: Send {
    fn name(&self) -> &'static str;

    /// Spoken when the mode becomes active
    fn announcement(&self) -> &'static str;

    async fn activate(&mut self) -> Result<()>;

    async fn deactivate(&mut self) -> Result<()>;
}

/// Routes mode requests from the voice loop to the assistive modes.
///
/// At most one mode is active; activating a new one deactivates the
/// previous mode first. Activation failures are spoken and logged but
/// never stop the coordinator.
pub struct ModeCoordinator {
    rx: Receiver<ModeRequest>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    camera: DeviceCamera,
    active: Option<Box<dyn Mode>>,
}

impl ModeCoordinator {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        camera: DeviceCamera,
    ) -> (Sender<ModeRequest>, Self) {
        let (tx, rx) = mpsc::channel(8);
        (
            tx,
            Self {
                rx,
                synthesizer,
                camera,
                active: None,
            },
        )
    }

    fn build_mode(&self, intent: Intent) -> Option<Box<dyn Mode>> {
        match intent {
            Intent::BlindNavigation => Some(Box::new(BlindNavigation::new(self.camera.clone()))),
            Intent::CurrencyDetection => {
                Some(Box::new(CurrencyDetection::new(self.camera.clone())))
            }
            Intent::ReadingMode => Some(Box::new(Reading::new(self.camera.clone()))),
            Intent::Unrecognized => None,
        }
    }

    async fn switch_to(&mut self, intent: Intent) {
        let Some(mut mode) = self.build_mode(intent) else {
            return;
        };

        if let Some(mut previous) = self.active.take() {
            if let Err(e) = previous.deactivate().await {
                warn!("⚠️ Failed to deactivate {}: {}", previous.name(), e);
            }
        }

        match mode.activate().await {
            Ok(()) => {
                info!("🚀 Mode activated: {}", mode.name());
                let _ = audit::log(&format!("Mode activated: {}", mode.name()));
                if let Err(e) = self.synthesizer.speak(mode.announcement()).await {
                    warn!("⚠️ Could not announce {}: {}", mode.name(), e);
                }
                self.active = Some(mode);
            }
            Err(e) => {
                warn!("❌ Could not activate {}: {}", mode.name(), e);
                let _ = audit::log(&format!("Mode activation failed: {}: {}", mode.name(), e));
                let message = format!("Error starting {}. {}", mode.name(), e);
                if let Err(e) = self.synthesizer.speak(&message).await {
                    warn!("⚠️ Could not speak activation error: {}", e);
                }
            }
        }
    }

    /// Run until the request channel closes, then release the active mode
    pub async fn run(mut self) {
        while let Some(ModeRequest::Activate(intent)) = self.rx.recv().await {
            self.switch_to(intent).await;
        }

        if let Some(mut mode) = self.active.take() {
            if let Err(e) = mode.deactivate().await {
                warn!("⚠️ Failed to deactivate {} on shutdown: {}", mode.name(), e);
            }
        }
        info!("Mode coordinator stopped");
    }
}
