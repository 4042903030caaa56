//! Mascot Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use mascot_dodge::assets::loader::{Assets, load_all};
    use mascot_dodge::assets::{LoadProgress, manifest};
    use mascot_dodge::audio::AudioManager;
    use mascot_dodge::platform::input::should_prevent_default;
    use mascot_dodge::platform::storage::LocalStorage;
    use mascot_dodge::renderer::{CanvasRenderer, RenderFrame};
    use mascot_dodge::sim::GamePhase;
    use mascot_dodge::{App, AppCommand, Tuning};

    const RETRY_BUTTON_ID: &str = "retry-button";

    /// Game state wrapper for the browser
    struct Game {
        app: App<LocalStorage>,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        assets: Option<Assets>,
        progress: Rc<RefCell<LoadProgress>>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, total_assets: usize) -> Self {
            let app = App::new(seed, tuning, LocalStorage::new());
            let audio = AudioManager::new(&app.settings);
            Self {
                app,
                renderer: None,
                audio,
                assets: None,
                progress: Rc::new(RefCell::new(LoadProgress::new(total_assets))),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance the app and carry out whatever it asked for
        fn update(&mut self, time: f64) {
            self.app.frame(time);
            self.handle_commands();

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn render(&self) {
            let Some(renderer) = &self.renderer else { return };
            let progress = self.progress.borrow();
            let frame = RenderFrame {
                state: &self.app.state,
                progress: &progress,
                assets: self.assets.as_ref(),
                best_time: self.app.best_time(),
                settings: &self.app.settings,
                fps: self.fps,
            };
            if let Err(e) = renderer.render(&frame) {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn handle_commands(&mut self) {
            for command in self.app.drain_commands() {
                match command {
                    AppCommand::ShowStart => set_visible("start-button", true),
                    AppCommand::HideButtons => {
                        set_visible("start-button", false);
                        set_visible(RETRY_BUTTON_ID, false);
                    }
                    AppCommand::ShowRetry => set_visible(RETRY_BUTTON_ID, true),
                    AppCommand::PlayMusic => {
                        self.audio.resume();
                        self.audio.play_music();
                    }
                    AppCommand::StopMusic => self.audio.stop_music(),
                    AppCommand::PlaySound(cue) => self.audio.play(cue),
                    AppCommand::SettingsChanged => self.audio.apply_settings(&self.app.settings),
                }
            }
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.app.start(seed);
            if self.app.phase() == GamePhase::Running {
                log::info!("Started new session with seed: {}", seed);
            }
            self.handle_commands();
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_visible(id: &str, visible: bool) {
        let Some(el) = document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let display = if visible { "block" } else { "none" };
        let _ = el.style().set_property("display", display);
    }

    /// Build the (hidden) retry button over the canvas; shown on every death
    fn create_retry_button(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .get_element_by_id("game-container")
            .ok_or_else(|| JsValue::from_str("no #game-container"))?;

        let btn: HtmlElement = document.create_element("button")?.dyn_into()?;
        btn.set_id(RETRY_BUTTON_ID);
        btn.set_text_content(Some("reTRY AGAIN"));
        let style = btn.style();
        for (prop, value) in [
            ("position", "absolute"),
            ("left", "50%"),
            ("top", "70%"),
            ("transform", "translate(-50%, -50%)"),
            ("padding", "15px 30px"),
            ("font-size", "24px"),
            ("font-weight", "bold"),
            ("color", "white"),
            ("background-color", "#8a2be2"),
            ("border", "2px solid white"),
            ("border-radius", "10px"),
            ("cursor", "pointer"),
            ("display", "none"),
        ] {
            style.set_property(prop, value)?;
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            game.borrow_mut().start();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();

        container.append_child(&btn)?;
        Ok(())
    }

    /// Tuning overrides from an inline `<script id="game-tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("game-tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Mascot Dodge starting...");

        let Some(document) = document() else {
            log::error!("No document");
            return;
        };

        let specs = manifest();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            load_tuning(&document),
            specs.len(),
        )));

        match document
            .get_element_by_id("game-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            Some(canvas) => match CanvasRenderer::new(&canvas) {
                Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
                Err(e) => log::error!("Failed to create renderer: {:?}", e),
            },
            None => log::error!("No #game-canvas element"),
        }

        set_visible("start-button", false);
        setup_input_handlers(game.clone());
        setup_start_button(game.clone());
        if let Err(e) = create_retry_button(game.clone()) {
            log::warn!("Failed to create retry button: {:?}", e);
        }
        setup_focus_handlers(game.clone());

        // Loading screen animates while images resolve
        request_animation_frame(game.clone());

        let progress = game.borrow().progress.clone();
        let assets = load_all(specs, progress.clone()).await;
        log::info!(
            "Assets ready ({} fell back to placeholders)",
            progress.borrow().fell_back()
        );

        let mut g = game.borrow_mut();
        g.assets = Some(assets);
        g.app.assets_ready();
        g.handle_commands();
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if should_prevent_default(&code) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                if code == "KeyM" && !event.repeat() {
                    g.app.toggle_mute();
                    g.handle_commands();
                    return;
                }
                g.app.input.press(&code);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().app.input.release(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("start-button")) else {
            log::warn!("No #start-button element");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            game.borrow_mut().start();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Window blur (click outside, tab switch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.app.blur();
                if g.app.settings.mute_on_blur && g.app.phase() == GamePhase::Running {
                    g.audio.suspend();
                    log::info!("Audio suspended (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let g = game.borrow();
                if g.app.settings.mute_on_blur && g.app.phase() == GamePhase::Running {
                    g.audio.resume_music();
                }
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mascot Dodge (native) starting...");
    log::info!("Native mode runs a headless session - build for wasm32 to play");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| mascot_dodge::Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => mascot_dodge::Tuning::default(),
    };

    headless_session(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one scripted session at 60 FPS and report how long the mascot lasted
#[cfg(not(target_arch = "wasm32"))]
fn headless_session(tuning: mascot_dodge::Tuning) {
    use mascot_dodge::platform::storage::MemoryStorage;
    use mascot_dodge::records::format_time;
    use mascot_dodge::sim::GamePhase;
    use mascot_dodge::App;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const TIME_LIMIT_MS: f64 = 180_000.0;

    let mut app = App::new(42, tuning, MemoryStorage::new());
    app.assets_ready();
    app.start(42);

    let mut time = 0.0;
    while app.phase() == GamePhase::Running && time < TIME_LIMIT_MS {
        // Sweep back and forth, hopping every few seconds
        let phase = (time / 2000.0) as u64;
        let (press, release) = if phase % 2 == 0 {
            ("ArrowRight", "ArrowLeft")
        } else {
            ("ArrowLeft", "ArrowRight")
        };
        app.input.release(release);
        app.input.press(press);
        if (time as u64 / 100) % 30 == 0 {
            app.input.press("Space");
        } else {
            app.input.release("Space");
        }

        app.frame(time);
        app.drain_commands();
        time += FRAME_MS;
    }

    let hp = app.state.player.hp;
    log::info!(
        "Session over: survived {} with {} HP, best {} ({:.1}s of frames)",
        format_time(app.session_time()),
        hp,
        format_time(app.best_time()),
        app.uptime()
    );
}
