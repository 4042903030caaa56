//! Game state and core simulation types
//!
//! Everything a session needs lives in `GameState`; the tick function is the
//! only thing that mutates it while the game is running.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::effects::ActiveEffects;
use super::spawn::{BonusSchedule, SpawnSchedule};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Assets still resolving
    Loading,
    /// Assets ready, waiting for the start action
    Menu,
    /// Simulation active
    Running,
    /// Player ran out of hit points, waiting for retry
    Dead,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Heals the player
    Potion,
    /// Temporary damage immunity
    Shield,
    /// Temporarily slows falling objects
    Slow,
}

impl BonusKind {
    pub const ALL: [BonusKind; 3] = [BonusKind::Potion, BonusKind::Shield, BonusKind::Slow];

    pub fn as_str(&self) -> &'static str {
        match self {
            BonusKind::Potion => "potion",
            BonusKind::Shield => "shield",
            BonusKind::Slow => "slow",
        }
    }
}

/// Something the simulation reports to the outside world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A falling object hit the player and dealt damage
    PlayerHit { damage: u8, hp: u8 },
    /// A falling object hit the player while the shield was up
    HitBlocked,
    /// A bonus was collected
    BonusCollected(BonusKind),
    /// Shield ran out
    ShieldExpired,
    /// Slow ran out
    SlowExpired,
    /// Hit points reached zero; carries the survival time
    Died { session_time: f32 },
}

/// The player-controlled mascot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub hp: u8,
    /// Current horizontal speed (boosted while airborne)
    pub speed: f32,
}

impl Player {
    pub fn new(base_speed: f32) -> Self {
        Self {
            pos: Vec2::new(
                GAME_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
                GAME_HEIGHT - PLAYER_SIZE,
            ),
            vel: Vec2::ZERO,
            size: Vec2::splat(PLAYER_SIZE),
            grounded: true,
            facing: 1.0,
            hp: MAX_HP,
            speed: base_speed,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Y coordinate of the player's top edge when standing on the floor
    pub fn floor_y(&self) -> f32 {
        GAME_HEIGHT - self.size.y
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage, saturating at zero. Returns the remaining hit points.
    pub fn take_damage(&mut self, damage: u8) -> u8 {
        self.hp = self.hp.saturating_sub(damage);
        self.hp
    }

    /// Restore hit points, capped at `MAX_HP`
    pub fn heal(&mut self, amount: u8) {
        self.hp = self.hp.saturating_add(amount).min(MAX_HP);
    }
}

/// A hazard descending from the top of the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    /// Image variant (0..FALLING_OBJECT_VARIANTS)
    pub variant: usize,
    pub damage: u8,
    pub remove: bool,
}

impl FallingObject {
    /// Spawn just above the playfield at horizontal position `x`
    pub fn new(x: f32, variant: usize) -> Self {
        Self {
            pos: Vec2::new(x, -FALLING_OBJECT_SIZE),
            size: Vec2::splat(FALLING_OBJECT_SIZE),
            vy: 0.0,
            variant,
            damage: damage_for_variant(variant),
            remove: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Variant 0 is the heavy hitter
pub fn damage_for_variant(variant: usize) -> u8 {
    if variant == 0 { HEAVY_DAMAGE } else { LIGHT_DAMAGE }
}

/// A power-up resting near the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub kind: BonusKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub remove: bool,
}

impl Bonus {
    pub fn new(kind: BonusKind, x: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(x, GAME_HEIGHT - BONUS_FLOOR_OFFSET),
            size: Vec2::splat(BONUS_SIZE),
            remove: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Complete game state for one browser tab
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current session
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Seconds survived in the current session
    pub elapsed: f32,
    pub player: Player,
    pub falling_objects: Vec<FallingObject>,
    pub bonuses: Vec<Bonus>,
    pub effects: ActiveEffects,
    pub spawn: SpawnSchedule,
    pub bonus_schedule: BonusSchedule,
    /// Session RNG (positions, variants, bonus timing)
    pub(crate) rng: Pcg32,
    /// Events produced since the last drain
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state in the Loading phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn = SpawnSchedule::new(&tuning);
        let bonus_schedule = BonusSchedule::new(&tuning, &mut rng);
        Self {
            seed,
            player: Player::new(tuning.player_speed),
            tuning,
            phase: GamePhase::Loading,
            elapsed: 0.0,
            falling_objects: Vec::new(),
            bonuses: Vec::new(),
            effects: ActiveEffects::default(),
            spawn,
            bonus_schedule,
            rng,
            events: Vec::new(),
        }
    }

    /// LOADING -> MENU once every asset resolved. Returns whether the phase changed.
    pub fn assets_ready(&mut self) -> bool {
        if self.phase != GamePhase::Loading {
            return false;
        }
        self.phase = GamePhase::Menu;
        log::info!("All assets resolved, showing menu");
        true
    }

    /// Begin a new session (MENU -> RUNNING, or DEAD -> RUNNING on retry).
    /// Resets every piece of session state. Returns whether a session started.
    pub fn start_session(&mut self, seed: u64) -> bool {
        match self.phase {
            GamePhase::Menu | GamePhase::Dead => {}
            phase => {
                log::debug!("Ignoring start request in {:?}", phase);
                return false;
            }
        }

        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.elapsed = 0.0;
        self.player = Player::new(self.tuning.player_speed);
        self.falling_objects.clear();
        self.bonuses.clear();
        self.effects = ActiveEffects::default();
        self.spawn = SpawnSchedule::new(&self.tuning);
        self.bonus_schedule = BonusSchedule::new(&self.tuning, &mut self.rng);
        self.events.clear();
        self.phase = GamePhase::Running;

        log::info!("Session started with seed {}", seed);
        true
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn one falling object at a random column with a random variant
    pub(crate) fn spawn_falling_object(&mut self) {
        let x = self.rng.random_range(0.0..GAME_WIDTH - FALLING_OBJECT_SIZE);
        let variant = self.rng.random_range(0..FALLING_OBJECT_VARIANTS);
        self.falling_objects.push(FallingObject::new(x, variant));
    }

    /// Spawn one bonus of a random kind at a random column
    pub(crate) fn spawn_bonus(&mut self) -> BonusKind {
        let kind = BonusKind::ALL[self.rng.random_range(0..BonusKind::ALL.len())];
        let x = self.rng.random_range(0.0..GAME_WIDTH - BONUS_SIZE);
        self.bonuses.push(Bonus::new(kind, x));
        kind
    }
}
