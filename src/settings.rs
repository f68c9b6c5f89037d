//! Player configuration
//!
//! JSON in LocalStorage on the web, a JSON file natively. Missing fields
//! take their defaults so old settings keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::TARGET_TPS;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pattern RNG seed
    pub seed: u64,
    /// Seconds into the song to start from (practice mode)
    pub start_offset: f32,
    /// Hits the avatar survives minus one
    pub avatar_health: u32,

    // === Loop ===
    /// Ticks per second the loop paces to
    pub target_tps: u32,
    /// Upper bound on a single tick's dt (seconds)
    pub max_frame_dt: f32,
    /// Restart immediately on death instead of waiting for the restart key.
    /// Always on for headless runs.
    pub auto_restart: bool,

    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Track name, without extension
    pub music_track: String,

    /// Native driver run length (seconds)
    pub headless_seconds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            start_offset: 0.0,
            avatar_health: 1,

            target_tps: TARGET_TPS,
            max_frame_dt: 0.1,
            auto_restart: true,

            music_volume: 0.7,
            music_track: "Aeternus".to_string(),

            headless_seconds: 60.0,
        }
    }
}

impl Settings {
    /// Parse settings, replacing out-of-range values with their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::sanitized)
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.max_frame_dt.is_nan() || self.max_frame_dt < 0.0 {
            log::warn!(
                "max_frame_dt {} out of range; using {}",
                self.max_frame_dt,
                defaults.max_frame_dt
            );
            self.max_frame_dt = defaults.max_frame_dt;
        }
        if !self.music_volume.is_finite() {
            self.music_volume = defaults.music_volume;
        }
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Fixed tick length implied by `target_tps`
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.target_tps.max(1) as f32
    }

    /// Load from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot read settings {}: {}; using defaults", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Environment variable naming a settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub const ENV_VAR: &'static str = "AETERNUS_SETTINGS";

    /// Settings from `$AETERNUS_SETTINGS` or the first CLI argument
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = std::env::var_os(Self::ENV_VAR).or_else(|| std::env::args_os().nth(1));
        match path {
            Some(path) => Self::load_from(std::path::Path::new(&path)),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Headless runs have no restart key, so deaths always restart
    #[cfg(not(target_arch = "wasm32"))]
    pub fn for_headless(mut self) -> Self {
        if !self.auto_restart {
            log::warn!("auto_restart is off but headless runs cannot restart; enabling it");
            self.auto_restart = true;
        }
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "aeternus_settings";

    /// Load settings from LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(Ok(Some(json))) = storage.map(|s| s.get_item(Self::STORAGE_KEY)) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Invalid stored settings: {}; using defaults", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"seed": 9, "start_offset": 36.0}"#).unwrap();
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.start_offset, 36.0);
        assert_eq!(settings.avatar_health, 1);
        assert!(settings.auto_restart);
        assert_eq!(settings.music_track, "Aeternus");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{ seed: ").is_err());
        assert!(Settings::from_json(r#"{"avatar_health": "lots"}"#).is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let settings = Settings {
            seed: 3,
            auto_restart: false,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_negative_frame_cap_falls_back() {
        let settings = Settings::from_json(r#"{"max_frame_dt": -0.5}"#).unwrap();
        assert_eq!(settings.max_frame_dt, 0.1);
        let loud = Settings::from_json(r#"{"music_volume": 3.0}"#).unwrap();
        assert_eq!(loud.music_volume, 1.0);
    }

    #[test]
    fn test_tick_dt() {
        assert_eq!(Settings::default().tick_dt(), 1.0 / 60.0);
        let zero = Settings {
            target_tps: 0,
            ..Default::default()
        };
        assert_eq!(zero.tick_dt(), 1.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_headless_forces_auto_restart() {
        let settings = Settings {
            auto_restart: false,
            seed: 4,
            ..Default::default()
        }
        .for_headless();
        assert!(settings.auto_restart);
        assert_eq!(settings.seed, 4);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_from(std::path::Path::new("/nonexistent/aeternus.json"));
        assert_eq!(settings, Settings::default());
    }
}
