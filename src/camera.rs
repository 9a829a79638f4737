//! Camera session handling
//!
//! The assistant's modes hold an open camera device while active; frame
//! acquisition and analysis happen outside this crate. A session is an
//! opaque handle on the V4L2 device node that closes on drop.

use crate::error::{SaarthiError, SaarthiResult};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How the camera is driven while a mode holds it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Continuous preview stream
    Stream,
    /// Single captures tuned for latency over quality
    MinimizeLatency,
}

/// An open camera device held by the active mode
#[derive(Debug)]
pub struct CameraSession {
    device: PathBuf,
    mode: CaptureMode,
    // Held so the device stays open for the life of the session
    _handle: File,
}

impl CameraSession {
    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        debug!("Camera session on {} released", self.device.display());
    }
}

/// Opens camera sessions on a configured device node
#[derive(Debug, Clone)]
pub struct DeviceCamera {
    device: PathBuf,
}

impl DeviceCamera {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }

    /// Open the device for a mode.
    ///
    /// Fails with `SaarthiError::Camera` when the node is missing or not
    /// accessible; modes surface that to the user and stay inactive.
    pub fn open(&self, mode: CaptureMode) -> SaarthiResult<CameraSession> {
        if !self.device.exists() {
            return Err(SaarthiError::Camera(format!(
                "Camera device {} not found",
                self.device.display()
            )));
        }

        let handle = File::open(&self.device).map_err(|e| {
            SaarthiError::Camera(format!(
                "Cannot open camera device {}: {}",
                self.device.display(),
                e
            ))
        })?;

        info!(
            "📷 Camera session opened on {} ({:?})",
            self.device.display(),
            mode
        );

        Ok(CameraSession {
            device: self.device.clone(),
            mode,
            _handle: handle,
        })
    }
}
