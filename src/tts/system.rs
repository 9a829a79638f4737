//! System TTS engine via spd-say / espeak-ng
//!
//! Runs the system speech command and waits for it to exit, so `speak`
//! resolves at utterance completion.

use super::SpeechSynthesizer;
use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug)]
pub struct SystemEngine {
    /// Words-per-minute style rate multiplier, 1.0 = default voice rate
    rate: f32,
    pitch: f32,
}

impl SystemEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            rate: config.speech_rate,
            pitch: config.speech_pitch,
        }
    }

    /// spd-say expects rate/pitch in -100..100 relative to the voice default
    fn spd_scale(multiplier: f32) -> i32 {
        (((multiplier - 1.0) * 100.0).round() as i32).clamp(-100, 100)
    }

    /// espeak-ng expects absolute words per minute (default 175) and
    /// pitch 0..99 (default 50)
    fn espeak_rate(multiplier: f32) -> i32 {
        ((175.0 * multiplier).round() as i32).max(80)
    }

    fn espeak_pitch(multiplier: f32) -> i32 {
        ((50.0 * multiplier).round() as i32).clamp(0, 99)
    }
}

#[async_trait]
impl SpeechSynthesizer for SystemEngine {
    async fn speak(&self, text: &str) -> Result<()> {
        debug!("System speaking: {}", text);

        // Try spd-say (speech-dispatcher) first; -w blocks until done
        let spd = Command::new("spd-say")
            .arg("-w")
            .arg("-r")
            .arg(Self::spd_scale(self.rate).to_string())
            .arg("-p")
            .arg(Self::spd_scale(self.pitch).to_string())
            .arg(text)
            .status()
            .await;

        if let Ok(status) = spd {
            if status.success() {
                return Ok(());
            }
        }

        // Fall back to espeak-ng
        let espeak = Command::new("espeak-ng")
            .arg("-s")
            .arg(Self::espeak_rate(self.rate).to_string())
            .arg("-p")
            .arg(Self::espeak_pitch(self.pitch).to_string())
            .arg(text)
            .status()
            .await;

        match espeak {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(anyhow::anyhow!("espeak-ng exited with {}", status)),
            Err(_) => Err(anyhow::anyhow!(
                "No system TTS command found (tried spd-say, espeak-ng)"
            )),
        }
    }

    fn name(&self) -> &str {
        "system"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spd_scale_is_relative() {
        assert_eq!(SystemEngine::spd_scale(1.0), 0);
        assert_eq!(SystemEngine::spd_scale(0.95), -5);
        assert_eq!(SystemEngine::spd_scale(2.5), 100);
    }

    #[test]
    fn test_espeak_ranges() {
        assert_eq!(SystemEngine::espeak_rate(1.0), 175);
        assert_eq!(SystemEngine::espeak_rate(0.95), 166);
        assert_eq!(SystemEngine::espeak_pitch(1.0), 50);
        assert_eq!(SystemEngine::espeak_pitch(3.0), 99);
    }
}
