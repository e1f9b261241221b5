//! Game settings
//!
//! Read once at startup. Native builds take an optional JSON file named by
//! `HELLS_MATCHES_CONFIG`; the web build uses defaults. Nothing is written
//! back, the menu only edits the in-memory copy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Environment variable naming a JSON settings file (native only)
pub const CONFIG_ENV: &str = "HELLS_MATCHES_CONFIG";

/// Background ids known to the asset catalog
pub const BACKGROUNDS: [&str; 3] = ["a", "b", "c"];

/// Looping music themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    Chiptune,
    JingleBells,
    #[default]
    CursedDream,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Chiptune, Theme::JingleBells, Theme::CursedDream];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Chiptune => "Chiptune",
            Theme::JingleBells => "Jingle Bells",
            Theme::CursedDream => "Cursed Dream",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Global volume (0 - 100)
    pub audio_volume: u8,
    pub audio_theme: Theme,

    // === Display ===
    /// Gameplay background id, one of [`BACKGROUNDS`]
    pub background: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub target_fps: u32,

    // === Timing ===
    pub intro_duration_ms: u64,
    pub transition_duration_ms: u64,

    /// Fixed gameplay seed; the host clock is used when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_volume: 25,
            audio_theme: Theme::default(),
            background: "a".to_string(),
            screen_width: consts::SCREEN_WIDTH,
            screen_height: consts::SCREEN_HEIGHT,
            target_fps: consts::TARGET_FPS,
            intro_duration_ms: consts::CARD_DURATION_MS,
            transition_duration_ms: consts::TRANSITION_DURATION_MS,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, then clamp out-of-range values
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    fn sanitize(&mut self) {
        self.audio_volume = self.audio_volume.min(100);
        if !BACKGROUNDS.contains(&self.background.as_str()) {
            log::warn!("Unknown background {:?}, using \"a\"", self.background);
            self.background = "a".to_string();
        }
        self.screen_width = self.screen_width.max(1);
        self.screen_height = self.screen_height.max(1);
        self.target_fps = self.target_fps.max(1);
        // The cross-fade needs two non-empty halves
        self.transition_duration_ms = self.transition_duration_ms.max(2);
    }

    /// Viewport as floats
    pub fn viewport(&self) -> (f32, f32) {
        (self.screen_width as f32, self.screen_height as f32)
    }

    /// Load settings from the file named by [`CONFIG_ENV`], if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let json = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path);
                Ok(settings)
            }
            Err(_) => {
                log::info!("{} not set, using default settings", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, ConfigError> {
        log::info!("Using default settings");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.audio_volume, 25);
        assert_eq!(s.audio_theme, Theme::CursedDream);
        assert_eq!(s.background, "a");
        assert_eq!((s.screen_width, s.screen_height), (1600, 800));
        assert_eq!(s.transition_duration_ms, 1000);
        assert!(s.seed.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "audio_volume": 80, "seed": 7 }"#).unwrap();
        assert_eq!(s.audio_volume, 80);
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.intro_duration_ms, 5000);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let s = Settings::from_json(r#"{ "audio_volume": 250, "background": "zzz" }"#).unwrap();
        assert_eq!(s.audio_volume, 100);
        assert_eq!(s.background, "a");
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
