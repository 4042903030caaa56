//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only advances through `tick`'s `dt`
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod effects;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use effects::{ActiveEffects, EffectTimer};
pub use spawn::{BonusSchedule, SpawnSchedule};
pub use state::{Bonus, BonusKind, FallingObject, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, apply_bonus, tick};
