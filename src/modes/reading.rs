//! Reading mode
//!
//! Streams the camera for printed-text capture; the text extraction
//! itself is an external collaborator.

use super::Mode;
use crate::camera::{CameraSession, CaptureMode, DeviceCamera};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub struct Reading {
    camera: DeviceCamera,
    session: Option<CameraSession>,
}

impl Reading {
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
impl Mode for Reading {
    fn name(&self) -> &'static str {
        "Reading Mode"
    }

    fn announcement(&self) -> &'static str {
        "Reading mode activated. \
         Point the camera at the text you want to read aloud."
    }

    async fn activate(&mut self) -> Result<()> {
        self.session = Some(self.camera.open(CaptureMode::Stream)?);
        Ok(())
    }

    async fn deactivate(&mut self) -> Result<()> {
        if self.session.take().is_some() {
            debug!("Reading mode camera released");
        }
        Ok(())
    }
}
