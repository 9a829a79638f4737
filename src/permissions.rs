//! Device-access permission checks
//!
//! Stands in for the platform permission grant flow: before the command
//! loop may start, the microphone and camera device nodes must be
//! accessible. A denied microphone blocks the loop entirely; it is
//! reported once, spoken and printed, and never retried automatically.

use std::fmt;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Microphone,
    Camera,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Microphone => write!(f, "microphone"),
            Permission::Camera => write!(f, "camera"),
        }
    }
}

/// Outcome of checking all required permissions
#[derive(Debug, Clone, Default)]
pub struct PermissionReport {
    pub granted: Vec<Permission>,
    pub denied: Vec<Permission>,
}

impl PermissionReport {
    pub fn all_granted(&self) -> bool {
        self.denied.is_empty()
    }

    /// Human-readable summary of what is missing
    pub fn denial_message(&self) -> String {
        let names: Vec<String> = self.denied.iter().map(|p| p.to_string()).collect();
        format!(
            "Please grant access to the {} to use the app",
            names.join(" and ")
        )
    }
}

/// Check every permission the assistant needs
pub fn check_all(camera_device: &str) -> PermissionReport {
    let mut report = PermissionReport::default();

    check(
        Permission::Microphone,
        Path::new("/dev/snd"),
        "add your user to the 'audio' group",
        &mut report,
    );
    check(
        Permission::Camera,
        Path::new(camera_device),
        "add your user to the 'video' group",
        &mut report,
    );

    report
}

fn check(permission: Permission, node: &Path, hint: &str, report: &mut PermissionReport) {
    if node.exists() {
        info!("✅ {} access ok ({})", permission, node.display());
        report.granted.push(permission);
    } else {
        warn!("⚠️ No {} device at {}", permission, node.display());
        warn!("   If the hardware is present: {}", hint);
        report.denied.push(permission);
    }
}
