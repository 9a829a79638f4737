use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Speech engines
    pub asr_engine: String,
    pub tts_engine: String,
    pub vosk_model_path: String,
    pub language: String,
    pub speech_rate: f32,
    pub speech_pitch: f32,

    // Listening session
    pub max_transcripts: usize,
    pub complete_silence_ms: u64,
    pub speech_wait_ms: u64,
    pub settle_delay_ms: u64,
    pub listen_chime: bool,
    pub prefer_offline: bool,

    // Wyoming (network ASR)
    pub wyoming_host: String,
    pub wyoming_port: u16,

    // Camera
    pub camera_device: String,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asr_engine: "vosk".to_string(),
            tts_engine: "speechd".to_string(),
            vosk_model_path: dirs::data_dir()
                .unwrap_or_default()
                .join("saarthi/models/vosk-model-small-en-in")
                .to_string_lossy()
                .to_string(),
            language: "en".to_string(),
            speech_rate: 0.95,
            speech_pitch: 1.0,
            max_transcripts: 5,
            complete_silence_ms: 2000,
            speech_wait_ms: 8000,
            settle_delay_ms: 500,
            listen_chime: true,
            prefer_offline: false,
            wyoming_host: "localhost".to_string(),
            wyoming_port: 10300,
            camera_device: "/dev/video0".to_string(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            match serde_json::from_str(&content) {
                Ok(config) => Ok(config),
                Err(e) => {
                    // Graceful degradation: log warning and use defaults
                    tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                    // Backup corrupt file for debugging
                    let backup_path = config_path.with_extension("json.corrupt");
                    let _ = std::fs::rename(config_path, &backup_path);
                    Ok(Self::default())
                }
            }
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("saarthi")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.asr_engine, "vosk");
        assert_eq!(config.tts_engine, "speechd");
        assert_eq!(config.max_transcripts, 5);
        assert_eq!(config.complete_silence_ms, 2000);
        assert_eq!(config.settle_delay_ms, 500);
        assert!(!config.prefer_offline);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.asr_engine = "wyoming".to_string();
        config.speech_wait_ms = 4000;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.asr_engine, "wyoming");
        assert_eq!(loaded.speech_wait_ms, 4000);
    }

    #[test]
    fn test_corrupt_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.asr_engine, "vosk");

        // Corrupt file is moved aside, not deleted
        assert!(path.with_extension("json.corrupt").exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(loaded.tts_engine, "speechd");
    }
}
