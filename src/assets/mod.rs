//! Asset manifest and load tracking
//!
//! Every asset resolves: either one of its candidate sources loads, or it
//! falls back to a generated placeholder (or, for the mascot and background,
//! to a flat colour painted by the renderer). The menu opens once all of
//! them have resolved.

#[cfg(target_arch = "wasm32")]
pub mod loader;

use crate::consts::{BONUS_SIZE, FALLING_OBJECT_SIZE, FALLING_OBJECT_VARIANTS};
use crate::sim::BonusKind;

const IMAGE_DIR: &str = "assets/images";

/// Identifies an image slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    Mascot,
    Background,
    /// Falling object variant (0-based)
    FallingObject(usize),
    Bonus(BonusKind),
}

/// What to use when every source fails
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// Nothing generated; the renderer paints a flat colour
    SolidFill,
    /// Square of a random hue
    RandomHue { size: u32 },
    /// Coloured square with a glyph in the middle
    Swatch {
        size: u32,
        color: &'static str,
        glyph: &'static str,
    },
}

/// One entry of the manifest
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSpec {
    pub id: AssetId,
    /// Candidate URLs, tried in order
    pub sources: Vec<String>,
    pub fallback: Fallback,
}

/// Fallback swatch for a bonus kind
pub fn bonus_swatch(kind: BonusKind) -> Fallback {
    let (color, glyph) = match kind {
        BonusKind::Potion => ("green", "+"),
        BonusKind::Shield => ("blue", "S"),
        BonusKind::Slow => ("purple", "T"),
    };
    Fallback::Swatch {
        size: BONUS_SIZE as u32,
        color,
        glyph,
    }
}

fn bonus_file(kind: BonusKind) -> &'static str {
    match kind {
        BonusKind::Potion => "health_potion.png",
        BonusKind::Shield => "shield_item.png",
        BonusKind::Slow => "slow_time.png",
    }
}

/// Everything the game loads before showing the menu
pub fn manifest() -> Vec<AssetSpec> {
    let mut specs = vec![
        AssetSpec {
            id: AssetId::Mascot,
            sources: vec![format!("{IMAGE_DIR}/mascot.png")],
            fallback: Fallback::SolidFill,
        },
        AssetSpec {
            id: AssetId::Background,
            sources: vec![format!("{IMAGE_DIR}/background.png")],
            fallback: Fallback::SolidFill,
        },
    ];

    for variant in 0..FALLING_OBJECT_VARIANTS {
        let number = variant + 1;
        specs.push(AssetSpec {
            id: AssetId::FallingObject(variant),
            sources: ["png", "jpg"]
                .iter()
                .map(|ext| format!("{IMAGE_DIR}/falling_object_{number}.{ext}"))
                .collect(),
            fallback: Fallback::RandomHue {
                size: FALLING_OBJECT_SIZE as u32,
            },
        });
    }

    for kind in BonusKind::ALL {
        specs.push(AssetSpec {
            id: AssetId::Bonus(kind),
            sources: vec![format!("{IMAGE_DIR}/{}", bonus_file(kind))],
            fallback: bonus_swatch(kind),
        });
    }

    specs
}

/// How an asset resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    Loaded,
    FellBack,
}

/// Shared load counter feeding the loading screen
#[derive(Debug, Clone, Default)]
pub struct LoadProgress {
    resolved: usize,
    fell_back: usize,
    total: usize,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self {
            resolved: 0,
            fell_back: 0,
            total,
        }
    }

    /// Record one resolved asset (loaded or fallen back)
    pub fn record(&mut self, outcome: AssetOutcome) {
        self.resolved = (self.resolved + 1).min(self.total);
        if outcome == AssetOutcome::FellBack {
            self.fell_back += 1;
        }
        log::info!(
            "Assets resolved: {}/{} ({}%)",
            self.resolved,
            self.total,
            self.percent()
        );
    }

    /// Whole-number percentage, 0..=100
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (self.resolved * 100 / self.total) as u32
    }

    pub fn fraction(&self) -> f32 {
        self.percent() as f32 / 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.resolved >= self.total
    }

    pub fn fell_back(&self) -> usize {
        self.fell_back
    }
}
