//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (`requestAnimationFrame` timestamps)
//! - Keyboard input
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod clock;
pub mod input;
pub mod storage;

pub use clock::{FixedStep, FrameClock};
pub use input::{InputState, Key};
pub use storage::{MemoryStorage, Storage, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
