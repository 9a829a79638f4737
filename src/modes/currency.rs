//! Currency detection mode
//!
//! Holds the camera in low-latency capture so individual notes can be
//! photographed and classified by the external detection pipeline.

use super::Mode;
use crate::camera::{CameraSession, CaptureMode, DeviceCamera};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub struct CurrencyDetection {
    camera: DeviceCamera,
    session: Option<CameraSession>,
}

impl CurrencyDetection {
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
impl Mode for CurrencyDetection {
    fn name(&self) -> &'static str {
        "Currency Detection"
    }

    fn announcement(&self) -> &'static str {
        "Currency Detection mode activated. \
         Hold the note steady in front of the camera and it will be identified."
    }

    async fn activate(&mut self) -> Result<()> {
        self.session = Some(self.camera.open(CaptureMode::MinimizeLatency)?);
        Ok(())
    }

    async fn deactivate(&mut self) -> Result<()> {
        if self.session.take().is_some() {
            debug!("Currency detection camera released");
        }
        Ok(())
    }
}
