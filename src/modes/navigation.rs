//! Blind navigation mode
//!
//! Streams the camera while active so the surroundings can be analyzed
//! for obstacles. The analysis pipeline lives outside this crate; this
//! mode owns the device hand-off and the spoken activation feedback.

use super::Mode;
use crate::camera::{CameraSession, CaptureMode, DeviceCamera};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub struct BlindNavigation {
    camera: DeviceCamera,
    session: Option<CameraSession>,
}

impl BlindNavigation {
    pub fn new(camera: DeviceCamera) -> Self {
        Self {
            camera,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }
}

#[async_trait]
impl Mode for BlindNavigation {
    fn name(&self) -> &'static str {
        "Blind Navigation"
    }

    fn announcement(&self) -> &'static str {
        "Blind Navigation mode activated. Camera is now streaming. \
         Point your device towards objects to detect them. \
         The system will continuously analyze your surroundings."
    }

    async fn activate(&mut self) -> Result<()> {
        self.session = Some(self.camera.open(CaptureMode::Stream)?);
        Ok(())
    }

    async fn deactivate(&mut self) -> Result<()> {
        if self.session.take().is_some() {
            debug!("Blind navigation camera released");
        }
        Ok(())
    }
}
