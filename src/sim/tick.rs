//! Simulation tick
//!
//! Advances a running session by `dt` seconds. Step order matters and is
//! fixed: effect timers, spawning, player input, falling objects and their
//! collisions, bonus pickups, pruning, then player physics.

use super::state::{BonusKind, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Held logical keys for a single tick (sampled once per frame)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the game state by `dt` seconds. Only runs in `GamePhase::Running`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    let dt = dt.max(0.0);

    state.elapsed += dt;

    update_effects(state, dt);
    run_spawners(state);
    apply_input(state, input);
    update_falling_objects(state, dt);

    if state.phase == GamePhase::Running {
        collect_bonuses(state);
    }

    state.falling_objects.retain(|o| !o.remove);
    state.bonuses.retain(|b| !b.remove);

    if state.phase == GamePhase::Running {
        integrate_player(state, dt);
    }
}

fn update_effects(state: &mut GameState, dt: f32) {
    let expired = state.effects.update(dt);
    if expired.shield {
        log::debug!("Shield expired");
        state.events.push(GameEvent::ShieldExpired);
    }
    if expired.slow {
        log::debug!("Slow expired");
        state.events.push(GameEvent::SlowExpired);
    }
}

fn run_spawners(state: &mut GameState) {
    if state
        .bonus_schedule
        .poll(state.elapsed, &state.tuning, &mut state.rng)
    {
        let kind = state.spawn_bonus();
        log::debug!(
            "Bonus {} spawned at {:.1}s, next at {:.1}s",
            kind.as_str(),
            state.elapsed,
            state.bonus_schedule.next_bonus_time()
        );
    }

    if let Some(batch) = state.spawn.poll(state.elapsed, &state.tuning) {
        log::debug!(
            "Spawning {} at {:.1}s, next {} at {:.1}s{}",
            batch,
            state.elapsed,
            state.spawn.next_batch(),
            state.spawn.next_spawn_time(),
            if state.spawn.in_tail(&state.tuning) { " (tail)" } else { "" }
        );
        for _ in 0..batch {
            // Over the cap: drop, don't queue
            if state.falling_objects.len() < state.tuning.max_falling_objects {
                state.spawn_falling_object();
            }
        }
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    player.vel.x = 0.0;
    if input.left {
        player.vel.x = -player.speed;
        player.facing = -1.0;
    }
    // Evaluated second, so right wins when both are held
    if input.right {
        player.vel.x = player.speed;
        player.facing = 1.0;
    }

    if input.jump && player.grounded {
        player.vel.y = -state.tuning.jump_force;
        player.grounded = false;
        player.speed = state.tuning.airborne_speed();
    }
}

fn update_falling_objects(state: &mut GameState, dt: f32) {
    let gravity = state.tuning.gravity;
    let k = state.effects.slow_coefficient;
    let player_box = state.player.bounds();

    for obj in &mut state.falling_objects {
        obj.vy += gravity * dt * k;
        obj.pos.y += obj.vy * dt * k;

        if obj.bounds().overlaps(&player_box) {
            obj.remove = true;

            if state.phase != GamePhase::Running {
                // Already dead this tick
            } else if state.effects.shield_active() {
                state.events.push(GameEvent::HitBlocked);
            } else {
                let hp = state.player.take_damage(obj.damage);
                log::debug!("Hit for {} damage, {} hp left", obj.damage, hp);
                state.events.push(GameEvent::PlayerHit {
                    damage: obj.damage,
                    hp,
                });
                if !state.player.is_alive() {
                    state.phase = GamePhase::Dead;
                    state.events.push(GameEvent::Died {
                        session_time: state.elapsed,
                    });
                    log::info!("Player died after {:.1}s", state.elapsed);
                }
            }
        }

        // Missed: fell past the bottom edge
        if obj.pos.y > GAME_HEIGHT {
            obj.remove = true;
        }
    }
}

fn collect_bonuses(state: &mut GameState) {
    let player_box = state.player.bounds();
    let mut collected: Vec<BonusKind> = Vec::new();

    for bonus in &mut state.bonuses {
        if bonus.bounds().overlaps(&player_box) {
            bonus.remove = true;
            collected.push(bonus.kind);
        }
    }

    for kind in collected {
        apply_bonus(state, kind);
        state.events.push(GameEvent::BonusCollected(kind));
    }
}

/// Apply a bonus effect to the session
pub fn apply_bonus(state: &mut GameState, kind: BonusKind) {
    let tuning = &state.tuning;
    match kind {
        BonusKind::Potion => {
            state.player.heal(tuning.potion_heal);
            log::debug!("Potion: hp now {}", state.player.hp);
        }
        BonusKind::Shield => {
            state.effects.activate_shield(tuning.shield_duration);
            log::debug!("Shield active for {}s", tuning.shield_duration);
        }
        BonusKind::Slow => {
            state
                .effects
                .activate_slow(tuning.slow_duration, tuning.slow_coefficient);
            log::debug!("Slow active for {}s", tuning.slow_duration);
        }
    }
}

fn integrate_player(state: &mut GameState, dt: f32) {
    let player = &mut state.player;

    player.vel.y += state.tuning.gravity * dt;
    player.pos += player.vel * dt;

    let floor_y = player.floor_y();
    if player.pos.y > floor_y {
        player.pos.y = floor_y;
        player.vel.y = 0.0;
        player.grounded = true;
        player.speed = state.tuning.player_speed;
    }

    player.pos.x = player.pos.x.clamp(0.0, GAME_WIDTH - player.size.x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bonus, FallingObject};
    use crate::tuning::Tuning;
    use glam::Vec2;

    /// A running session whose spawners never fire, so tests own every entity
    fn running_state() -> GameState {
        let tuning = Tuning {
            spawn_intervals: vec![1.0e6],
            bonus_delay_min: 1.0e6,
            bonus_delay_max: 2.0e6,
            ..Tuning::default()
        };
        let mut state = GameState::new(12345, tuning);
        state.assets_ready();
        state.start_session(12345);
        state
    }

    /// An object overlapping the player's current box
    fn object_on_player(state: &GameState, variant: usize) -> FallingObject {
        let mut obj = FallingObject::new(state.player.pos.x, variant);
        obj.pos.y = state.player.pos.y + 5.0;
        obj
    }

    #[test]
    fn test_tick_only_runs_while_running() {
        let mut state = GameState::new(1, Tuning::default());
        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.elapsed, 0.0);

        state.assets_ready();
        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_grounded_player_stays_on_floor() {
        let mut state = running_state();
        let floor = state.player.floor_y();
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.player.pos.y, floor);
        assert_eq!(state.player.vel.y, 0.0);
        assert!(state.player.grounded);
    }

    #[test]
    fn test_first_frame_spawns_two() {
        let mut state = GameState::new(9, Tuning::default());
        state.assets_ready();
        state.start_session(9);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.falling_objects.len(), 2);
        assert_eq!(state.spawn.next_spawn_time(), 3.0);
    }

    #[test]
    fn test_spawn_at_three_seconds() {
        let mut state = GameState::new(9, Tuning::default());
        state.assets_ready();
        state.start_session(9);
        tick(&mut state, &TickInput::default(), 0.0);
        state.falling_objects.clear();

        // Both values are exact in binary, so elapsed lands on 3.0 exactly
        state.elapsed = 2.992_187_5;
        tick(&mut state, &TickInput::default(), 0.007_812_5);
        assert_eq!(state.elapsed, 3.0);
        assert_eq!(state.falling_objects.len(), 2);
        assert!((state.spawn.next_spawn_time() - 5.8).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_cap_drops_excess() {
        let mut state = GameState::new(9, Tuning::default());
        state.tuning.max_falling_objects = 3;
        state.assets_ready();
        state.start_session(9);
        // Park objects well above the playfield so they live long
        for _ in 0..2 {
            let mut obj = FallingObject::new(0.0, 1);
            obj.pos.y = -1.0e5;
            state.falling_objects.push(obj);
        }
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.falling_objects.len(), 3);
    }

    #[test]
    fn test_right_wins_when_both_held() {
        let mut state = running_state();
        let x = state.player.pos.x;
        let input = TickInput {
            left: true,
            right: true,
            jump: false,
        };
        tick(&mut state, &input, 0.1);
        assert_eq!(state.player.facing, 1.0);
        assert!((state.player.pos.x - (x + 25.0)).abs() < 0.001);

        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.1);
        assert_eq!(state.player.facing, -1.0);
        assert!((state.player.pos.x - x).abs() < 0.001);
    }

    #[test]
    fn test_jump_boosts_speed_until_landing() {
        let mut state = running_state();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, 0.1);
        assert!(!state.player.grounded);
        assert!(state.player.vel.y < 0.0);
        assert!((state.player.speed - 350.0).abs() < 0.001);

        // Holding jump mid-air does nothing
        let vy = state.player.vel.y;
        tick(&mut state, &jump, SIM_DT);
        assert!(state.player.vel.y > vy);

        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.speed, 250.0);
    }

    #[test]
    fn test_player_clamped_to_screen() {
        let mut state = running_state();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &right, 0.1);
        }
        assert_eq!(state.player.pos.x, GAME_WIDTH - PLAYER_SIZE);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &left, 0.1);
        }
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_hit_deals_damage() {
        let mut state = running_state();
        let obj = object_on_player(&state, 2);
        state.falling_objects.push(obj);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player.hp, 90);
        assert!(state.falling_objects.is_empty());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PlayerHit { damage: 10, hp: 90 })
        );
    }

    #[test]
    fn test_lethal_hit_clamps_and_kills() {
        let mut state = running_state();
        state.player.hp = 10;
        let obj = object_on_player(&state, 0);
        state.falling_objects.push(obj);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player.hp, 0);
        assert_eq!(state.phase, GamePhase::Dead);
        let deaths = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Died { .. }))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_dies_once_with_multiple_hits() {
        let mut state = running_state();
        state.player.hp = 10;
        for variant in [0, 1, 2] {
            let obj = object_on_player(&state, variant);
            state.falling_objects.push(obj);
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Dead);
        let events = state.drain_events();
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        let deaths = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Died { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(deaths, 1);

        // Frozen until reset
        let pos = state.player.pos;
        let obj = object_on_player(&state, 0);
        state.falling_objects.push(obj);
        tick(&mut state, &TickInput { right: true, ..Default::default() }, 0.1);
        assert_eq!(state.player.pos, pos);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_shield_blocks_damage_for_window() {
        let mut state = running_state();
        apply_bonus(&mut state, BonusKind::Shield);

        // Hits spread across the whole window are absorbed
        for _ in 0..9 {
            tick(&mut state, &TickInput::default(), 1.0);
            let obj = object_on_player(&state, 0);
            state.falling_objects.push(obj);
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.player.hp, 100);
        }
        tick(&mut state, &TickInput::default(), 0.9);
        assert!(state.effects.shield_active());
        let obj = object_on_player(&state, 0);
        state.falling_objects.push(obj);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.hp, 100);
        assert!(state.drain_events().contains(&GameEvent::HitBlocked));

        // Expires, damage resumes on the next collision
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(!state.effects.shield_active());
        let obj = object_on_player(&state, 0);
        state.falling_objects.push(obj);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.hp, 75);
    }

    #[test]
    fn test_slow_scales_fall_speed() {
        let dt = 0.1;
        let mut normal = running_state();
        normal.falling_objects.push(FallingObject::new(0.0, 1));
        tick(&mut normal, &TickInput::default(), dt);

        let mut slowed = running_state();
        apply_bonus(&mut slowed, BonusKind::Slow);
        slowed.falling_objects.push(FallingObject::new(0.0, 1));
        tick(&mut slowed, &TickInput::default(), dt);

        let ratio = slowed.falling_objects[0].vy / normal.falling_objects[0].vy;
        assert!((ratio - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_slow_expires_after_five_seconds() {
        let mut state = running_state();
        apply_bonus(&mut state, BonusKind::Slow);
        for _ in 0..4 {
            tick(&mut state, &TickInput::default(), 1.0);
        }
        assert!(state.effects.slow_active());
        tick(&mut state, &TickInput::default(), 1.0);
        assert!(!state.effects.slow_active());
        assert_eq!(state.effects.slow_coefficient, 1.0);
        assert!(state.drain_events().contains(&GameEvent::SlowExpired));
    }

    #[test]
    fn test_potion_heals_capped() {
        let mut state = running_state();
        state.player.hp = 50;
        state.bonuses.push(Bonus::new(BonusKind::Potion, state.player.pos.x));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.hp, 65);
        assert!(state.bonuses.is_empty());

        state.player.hp = 95;
        apply_bonus(&mut state, BonusKind::Potion);
        assert_eq!(state.player.hp, 100);
    }

    #[test]
    fn test_bonus_out_of_reach_stays() {
        let mut state = running_state();
        let far = if state.player.pos.x > GAME_WIDTH / 2.0 { 0.0 } else { GAME_WIDTH - BONUS_SIZE };
        state.bonuses.push(Bonus::new(BonusKind::Shield, far));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.bonuses.len(), 1);
        assert!(!state.effects.shield_active());
    }

    #[test]
    fn test_missed_objects_are_removed() {
        let mut state = running_state();
        let mut obj = FallingObject::new(0.0, 1);
        obj.pos = Vec2::new(0.0, GAME_HEIGHT - 1.0);
        obj.vy = 100.0;
        state.player.pos.x = GAME_WIDTH - PLAYER_SIZE;
        state.falling_objects.push(obj);
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.falling_objects.is_empty());
        assert_eq!(state.player.hp, 100);
    }

    #[test]
    fn test_bonus_spawns_on_schedule() {
        let mut state = GameState::new(4, Tuning::default());
        state.assets_ready();
        state.start_session(4);
        let due = state.bonus_schedule.next_bonus_time();
        assert!((25.0..80.0).contains(&due));

        tick(&mut state, &TickInput::default(), due - 0.5);
        assert!(state.bonuses.is_empty());
        state.drain_events();

        tick(&mut state, &TickInput::default(), 0.6);
        // Either still lying there or picked up straight away
        let collected = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BonusCollected(_)))
            .count();
        assert_eq!(state.bonuses.len() + collected, 1);
        assert!(state.bonus_schedule.next_bonus_time() > due + 24.0);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput { right: true, ..Default::default() },
            TickInput { jump: true, ..Default::default() },
            TickInput { left: true, ..Default::default() },
            TickInput::default(),
        ];

        let run = || {
            let mut state = GameState::new(99999, Tuning::default());
            state.assets_ready();
            state.start_session(99999);
            for step in 0..6000 {
                tick(&mut state, &inputs[(step / 90) % inputs.len()], SIM_DT);
            }
            state
        };
        let (a, b) = (run(), run());

        assert_eq!(a.elapsed, b.elapsed);
        assert_eq!(a.player.hp, b.player.hp);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.falling_objects.len(), b.falling_objects.len());
        assert_eq!(a.player.pos, b.player.pos);
    }
}
