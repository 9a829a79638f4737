use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Write an entry to the audit log.
///
/// Records recognized commands, mode switches, and recognition errors so
/// a caregiver can reconstruct what the assistant heard and did.
pub fn log(entry: &str) -> Result<()> {
    // Determine config directory (respecting XDG)
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
    let log_dir = config_dir.join("saarthi");
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("audit.log");

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        entry
    )?;
    Ok(())
}
