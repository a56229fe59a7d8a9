//! Player settings and preferences
//!
//! Persisted as JSON next to the executable's working directory. Missing or
//! unreadable files fall back to defaults; a settings problem must never stop
//! the game from launching.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Assist, presentation and accessibility preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Driving assists ===
    /// Start the engine automatically when the throttle is pressed
    pub auto_start: bool,
    /// Engage first gear automatically after throttle is held in neutral
    pub auto_first_gear: bool,

    // === Presentation ===
    /// Camera shake on pothole hits
    pub camera_shake: bool,
    /// Backseat-instructor commentary
    pub snark: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses shake regardless of `camera_shake`)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Assists on by default; purists can turn them off
            auto_start: true,
            auto_first_gear: true,

            camera_shake: true,
            snark: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    const STORAGE_FILE: &'static str = "panelak_drive_settings.json";

    /// Shake intensity multiplier after preferences are applied.
    pub fn camera_shake_scale(&self) -> f32 {
        if self.camera_shake && !self.reduced_motion {
            1.0
        } else {
            0.0
        }
    }

    /// Load settings from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new(Self::STORAGE_FILE))
    }

    fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("settings file unreadable ({err}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to disk. Failures are logged and swallowed.
    pub fn save(&self) {
        self.save_to(Path::new(Self::STORAGE_FILE));
    }

    fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::warn!("could not save settings: {err}");
                } else {
                    log::info!("settings saved");
                }
            }
            Err(err) => log::warn!("could not serialize settings: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_assists() {
        let settings = Settings::default();
        assert!(settings.auto_start);
        assert!(settings.auto_first_gear);
        assert!(settings.snark);
        assert!(!settings.reduced_motion);
    }

    #[test]
    fn test_camera_shake_scale_respects_reduced_motion() {
        let mut settings = Settings::default();
        assert_eq!(settings.camera_shake_scale(), 1.0);
        settings.reduced_motion = true;
        assert_eq!(settings.camera_shake_scale(), 0.0);
        settings.reduced_motion = false;
        settings.camera_shake = false;
        assert_eq!(settings.camera_shake_scale(), 0.0);
    }

    #[test]
    fn test_settings_round_trip_json() {
        let settings = Settings {
            auto_start: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(!back.auto_start);
        assert!(back.snark);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = Settings::load_from(Path::new("definitely/not/here.json"));
        assert!(settings.auto_start);
    }
}
