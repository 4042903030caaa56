//! Mascot Dodge - a 2D browser arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game phases)
//! - `app`: Frame driver gluing clock, input, simulation and records together
//! - `platform`: Browser/native platform abstraction (clock, input, storage)
//! - `assets`: Asset manifest and loading with placeholder fallback
//! - `records`: Best survival time persistence
//! - `tuning`: Data-driven game balance
//! - `renderer`, `audio`: Canvas 2D drawing and music/sfx (wasm only)

pub mod app;
pub mod assets;
pub mod platform;
pub mod records;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use app::{App, AppCommand, SoundCue};
pub use records::BestTimeStore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Largest frame delta fed to the accumulator (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum substeps per frame; covers a full MAX_FRAME_DT
    pub const MAX_SUBSTEPS: u32 = 12;

    /// Player sprite size
    pub const PLAYER_SIZE: f32 = 70.0;
    /// Falling object sprite size
    pub const FALLING_OBJECT_SIZE: f32 = 50.0;
    /// Bonus pickup size
    pub const BONUS_SIZE: f32 = 40.0;
    /// Bonuses rest this far above the bottom edge
    pub const BONUS_FLOOR_OFFSET: f32 = 45.0;

    /// Hit point bounds
    pub const MAX_HP: u8 = 100;

    /// Number of falling object image variants
    pub const FALLING_OBJECT_VARIANTS: usize = 5;
    /// Damage dealt by variant 0
    pub const HEAVY_DAMAGE: u8 = 25;
    /// Damage dealt by every other variant
    pub const LIGHT_DAMAGE: u8 = 10;
}
