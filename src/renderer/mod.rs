//! Canvas 2D rendering module
//!
//! Paints a read-only view of the game each frame. No gameplay effect.

pub mod canvas;

pub use canvas::{CanvasRenderer, RenderFrame};
