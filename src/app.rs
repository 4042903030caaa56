//! Frame driver
//!
//! Owns the session state, clock, input and records, and turns phase
//! transitions into commands for the browser glue (music, buttons, sounds).
//! Nothing here touches the DOM, so the whole flow runs under `cargo test`.

use crate::consts::SIM_DT;
use crate::platform::clock::{FixedStep, FrameClock};
use crate::platform::input::InputState;
use crate::platform::storage::Storage;
use crate::records::BestTimeStore;
use crate::settings::Settings;
use crate::sim::{BonusKind, GameEvent, GamePhase, GameState, tick};
use crate::tuning::Tuning;

/// Short sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Hit,
    Blocked,
    Pickup(BonusKind),
    Death,
}

/// Side effects the browser glue must carry out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Show the start button (menu reached)
    ShowStart,
    /// Hide start and retry buttons (session began)
    HideButtons,
    /// Show the retry affordance
    ShowRetry,
    /// Restart ambient music from the beginning
    PlayMusic,
    StopMusic,
    PlaySound(SoundCue),
    /// Settings changed and were saved
    SettingsChanged,
}

/// The game, minus the browser
pub struct App<S: Storage> {
    pub state: GameState,
    pub input: InputState,
    pub settings: Settings,
    records: BestTimeStore<S>,
    clock: FrameClock,
    stepper: FixedStep,
    commands: Vec<AppCommand>,
}

impl<S: Storage> App<S> {
    /// Create the app in the Loading phase, reading settings and records from `storage`
    pub fn new(seed: u64, tuning: Tuning, storage: S) -> Self {
        let settings = Settings::load(&storage);
        Self {
            state: GameState::new(seed, tuning),
            input: InputState::new(),
            settings,
            records: BestTimeStore::open(storage),
            clock: FrameClock::new(),
            stepper: FixedStep::default(),
            commands: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn best_time(&self) -> f32 {
        self.records.load_best_time()
    }

    /// Seconds survived in the current (or last) session
    pub fn session_time(&self) -> f32 {
        self.state.elapsed
    }

    /// Seconds of frame time seen since startup
    pub fn uptime(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Every asset resolved: LOADING -> MENU
    pub fn assets_ready(&mut self) {
        if self.state.assets_ready() {
            self.commands.push(AppCommand::ShowStart);
        }
    }

    /// Start button or retry: enter RUNNING with a fresh session
    pub fn start(&mut self, seed: u64) {
        if !self.state.start_session(seed) {
            return;
        }
        self.clock.reset();
        self.stepper.clear();
        self.commands.push(AppCommand::HideButtons);
        self.commands.push(AppCommand::PlayMusic);
    }

    /// Run one display frame worth of simulation
    pub fn frame(&mut self, timestamp_ms: f64) {
        let dt = self.clock.advance(timestamp_ms);
        if self.state.phase != GamePhase::Running {
            return;
        }

        let steps = self.stepper.steps(dt);
        let input = self.input.snapshot();
        for _ in 0..steps {
            tick(&mut self.state, &input, SIM_DT);
            if self.state.phase != GamePhase::Running {
                break;
            }
        }

        for event in self.state.drain_events() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::PlayerHit { .. } => self.commands.push(AppCommand::PlaySound(SoundCue::Hit)),
            GameEvent::HitBlocked => self.commands.push(AppCommand::PlaySound(SoundCue::Blocked)),
            GameEvent::BonusCollected(kind) => {
                self.commands.push(AppCommand::PlaySound(SoundCue::Pickup(kind)))
            }
            GameEvent::ShieldExpired | GameEvent::SlowExpired => {}
            GameEvent::Died { session_time } => {
                self.commands.push(AppCommand::StopMusic);
                self.commands.push(AppCommand::PlaySound(SoundCue::Death));
                self.records.save_best_time(session_time);
                self.commands.push(AppCommand::ShowRetry);
            }
        }
    }

    /// Flip mute and persist the change
    pub fn toggle_mute(&mut self) {
        self.settings.toggle_mute();
        self.settings.save(self.records.storage_mut());
        log::info!("Muted: {}", self.settings.muted);
        self.commands.push(AppCommand::SettingsChanged);
    }

    /// Window lost focus: keyup events won't arrive, so forget held keys
    pub fn blur(&mut self) {
        self.input.clear();
    }

    /// Take every pending command
    pub fn drain_commands(&mut self) -> Vec<AppCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStorage;
    use crate::sim::FallingObject;

    fn app() -> App<MemoryStorage> {
        App::new(7, Tuning::default(), MemoryStorage::new())
    }

    /// Drop a lethal object onto the player
    fn kill(app: &mut App<MemoryStorage>) {
        app.state.player.hp = 10;
        let mut obj = FallingObject::new(app.state.player.pos.x, 0);
        obj.pos.y = app.state.player.pos.y + 5.0;
        app.state.falling_objects.push(obj);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut app = app();
        assert_eq!(app.phase(), GamePhase::Loading);

        // Start is ignored until the menu is up
        app.start(1);
        assert_eq!(app.phase(), GamePhase::Loading);
        assert!(app.drain_commands().is_empty());

        app.assets_ready();
        assert_eq!(app.phase(), GamePhase::Menu);
        assert_eq!(app.drain_commands(), vec![AppCommand::ShowStart]);

        app.start(1);
        assert_eq!(app.phase(), GamePhase::Running);
        assert_eq!(
            app.drain_commands(),
            vec![AppCommand::HideButtons, AppCommand::PlayMusic]
        );

        app.frame(0.0);
        for i in 1..=60 {
            app.frame(i as f64 * 16.0);
        }
        assert!(app.session_time() > 0.9);
        assert!((app.uptime() - app.session_time() as f64).abs() < 0.05);

        kill(&mut app);
        app.frame(61.0 * 16.0);
        assert_eq!(app.phase(), GamePhase::Dead);
        let commands = app.drain_commands();
        assert!(commands.contains(&AppCommand::StopMusic));
        assert!(commands.contains(&AppCommand::ShowRetry));
        assert!(commands.contains(&AppCommand::PlaySound(SoundCue::Death)));
        assert!(app.best_time() > 0.9);

        // Dead: frames don't advance anything
        let elapsed = app.session_time();
        app.frame(62.0 * 16.0);
        assert_eq!(app.session_time(), elapsed);

        // Retry goes through the same reset path
        app.start(2);
        assert_eq!(app.phase(), GamePhase::Running);
        assert_eq!(app.session_time(), 0.0);
        assert_eq!(app.state.player.hp, 100);
    }

    #[test]
    fn test_shorter_session_keeps_record() {
        let mut app = app();
        app.assets_ready();
        app.start(1);
        app.frame(0.0);
        for i in 1..=120 {
            app.frame(i as f64 * 16.0);
        }
        kill(&mut app);
        app.frame(121.0 * 16.0);
        let best = app.best_time();
        assert!(best > 1.9);

        app.start(2);
        app.frame(10_000.0);
        kill(&mut app);
        app.frame(10_016.0);
        assert_eq!(app.phase(), GamePhase::Dead);
        assert_eq!(app.best_time(), best);
    }

    #[test]
    fn test_each_death_shows_retry_once() {
        let mut app = app();
        app.assets_ready();
        app.drain_commands();

        for round in 0..3u64 {
            app.start(round);
            assert!(app.drain_commands().contains(&AppCommand::HideButtons));

            let t = round as f64 * 1000.0;
            app.frame(t);
            kill(&mut app);
            app.frame(t + 16.0);
            assert_eq!(app.phase(), GamePhase::Dead);

            let retries = app
                .drain_commands()
                .into_iter()
                .filter(|c| *c == AppCommand::ShowRetry)
                .count();
            assert_eq!(retries, 1);

            // Frames while dead never ask for the button again
            app.frame(t + 32.0);
            assert!(app.drain_commands().is_empty());
        }
    }

    #[test]
    fn test_input_is_sampled() {
        let mut app = app();
        app.assets_ready();
        app.start(1);
        let x = app.state.player.pos.x;

        app.input.press("ArrowRight");
        app.frame(0.0);
        app.frame(100.0);
        assert!(app.state.player.pos.x > x);
        assert_eq!(app.state.player.facing, 1.0);

        app.blur();
        let x = app.state.player.pos.x;
        app.frame(200.0);
        assert_eq!(app.state.player.pos.x, x);
    }

    #[test]
    fn test_toggle_mute_persists() {
        let mut app = app();
        app.toggle_mute();
        assert!(app.settings.muted);
        assert_eq!(app.drain_commands(), vec![AppCommand::SettingsChanged]);
        assert!(Settings::load(app.records.storage()).muted);
    }
}
