//! Best survival time
//!
//! Persisted to storage as a plain number so older saves (which wrote the
//! float's string form) keep loading.

use crate::platform::storage::{Storage, StorageError};

/// Best survival time backed by a key/value store
#[derive(Debug, Clone)]
pub struct BestTimeStore<S: Storage> {
    storage: S,
    best: f32,
}

impl<S: Storage> BestTimeStore<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "mascot_game_records";

    /// Read the stored record; anything missing or unreadable counts as 0
    pub fn open(storage: S) -> Self {
        let best = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => parse_time(&raw).unwrap_or_else(|| {
                log::warn!("Ignoring unreadable best time {:?}", raw);
                0.0
            }),
            Ok(None) => {
                log::info!("No best time found, starting fresh");
                0.0
            }
            Err(e) => {
                log::warn!("Failed to read best time: {}", e);
                0.0
            }
        };
        if best > 0.0 {
            log::info!("Loaded best time {:.1}s", best);
        }
        Self { storage, best }
    }

    pub fn load_best_time(&self) -> f32 {
        self.best
    }

    /// Persist `time` if it beats the record. Returns true on a new record.
    ///
    /// Write failures keep the in-memory record and are only logged.
    pub fn save_best_time(&mut self, time: f32) -> bool {
        if !(time > self.best) {
            return false;
        }
        self.best = time;
        match self.write(time) {
            Ok(()) => log::info!("New best time {:.1}s saved", time),
            Err(e) => log::warn!("Failed to save best time: {}", e),
        }
        true
    }

    fn write(&mut self, time: f32) -> Result<(), StorageError> {
        let json = serde_json::to_string(&time)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        self.storage.set_item(Self::STORAGE_KEY, &json)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

fn parse_time(raw: &str) -> Option<f32> {
    serde_json::from_str::<f32>(raw.trim())
        .ok()
        .filter(|t| t.is_finite() && *t >= 0.0)
}

/// Format seconds the way the HUD shows them
pub fn format_time(seconds: f32) -> String {
    format!("{:.1}s", seconds)
}
