//! Game settings and preferences
//!
//! Persisted separately from the best time, as JSON.

use serde::{Deserialize, Serialize};

use crate::platform::storage::Storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// All audio off
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no shield pulse)
    pub reduced_motion: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.6,
            sfx_volume: 0.8,
            muted: false,
            mute_on_blur: true,
            reduced_motion: false,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "mascot_game_settings";

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume.clamp(0.0, 1.0) }
    }

    /// Effective sfx volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume.clamp(0.0, 1.0) }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Load settings, falling back to defaults
    pub fn load(storage: &impl Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings; failures are logged
    pub fn save(&self, storage: &mut impl Storage) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode settings: {}", e);
                return;
            }
        };
        match storage.set_item(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
