//! Splat Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent};

    use splat_dodge::audio::{AudioManager, SoundEffect};
    use splat_dodge::render::DomRenderer;
    use splat_dodge::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use splat_dodge::{HighScore, Settings};

    /// Which overlay the shell is currently showing
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Screen {
        Menu,
        Playing,
        GameOver,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        screen: Screen,
        input: TickInput,
        renderer: DomRenderer,
        audio: AudioManager,
        high_score: HighScore,
        settings: Settings,
    }

    impl Game {
        /// Begin a fresh round seeded from the wall clock
        fn start_round(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.state = GameState::new(seed, performance_now());
            self.input = TickInput::default();
            self.renderer.clear();
            self.screen = Screen::Playing;
            self.audio.play(SoundEffect::Start);
            self.audio.start_background();
            show_screen(Screen::Playing);
            log::info!("Round started with seed: {}", seed);
        }

        /// The final score arrives here exactly once per round
        fn finish_round(&mut self, score: u64) {
            self.screen = Screen::GameOver;
            self.audio.stop_background();
            self.audio.play(SoundEffect::GameOver);
            let new_best = self.high_score.submit(score);

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&score.to_string()));
                }
                for id in ["gameover-highscore", "menu-highscore"] {
                    if let Some(el) = document.get_element_by_id(id) {
                        el.set_text_content(Some(&self.high_score.best.to_string()));
                    }
                }
                if let Some(el) = document.get_element_by_id("new-highscore") {
                    let _ = el.set_attribute("class", if new_best { "" } else { "hidden" });
                }
            }
            show_screen(Screen::GameOver);
            log::info!("Round over: score {} (best {})", score, self.high_score.best);
        }

        /// Forward simulation events to the audio collaborator, fire-and-forget
        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::Hit => self.audio.play(SoundEffect::Hit),
                GameEvent::Splat => self.audio.play(SoundEffect::Splat),
                GameEvent::PowerUpCollected(_) => self.audio.play(SoundEffect::PowerUp),
                GameEvent::StormWarning => self.audio.play(SoundEffect::Warning),
                GameEvent::EnemySpawned => {}
                GameEvent::RoundOver { score } => self.finish_round(score),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Splat Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let renderer = DomRenderer::new(&document).expect("missing #game-field element");

        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let high_score = HighScore::load();
        if let Some(el) = document.get_element_by_id("menu-highscore") {
            el.set_text_content(Some(&high_score.best.to_string()));
        }

        let game = Rc::new(RefCell::new(Game {
            // Placeholder round; never ticked until Start replaces it
            state: GameState::new(0, 0.0),
            screen: Screen::Menu,
            input: TickInput::default(),
            renderer,
            audio,
            high_score,
            settings,
        }));

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_fullscreen(&document);
        show_screen(Screen::Menu);

        log::info!("Splat Dodge ready");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Mouse move - map to field-relative percent; the sim does the clamping
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.screen != Screen::Playing {
                    return;
                }
                let Some(field) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("game-field"))
                else {
                    return;
                };
                let rect = field.get_bounding_client_rect();
                if rect.width() <= 0.0 {
                    return;
                }
                let x = event.client_x() as f64 - rect.left();
                g.input.pointer_x = Some((x / rect.width() * 100.0) as f32);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - discrete move steps, counted per frame
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.move_left += 1,
                    "ArrowRight" | "d" | "D" => g.input.move_right += 1,
                    "m" | "M" => {
                        let muted = !g.audio.muted();
                        g.audio.set_muted(muted);
                        g.settings.muted = muted;
                        g.settings.save();
                        log::info!("Audio muted: {}", muted);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    {
                        let mut g = game.borrow_mut();
                        if g.screen == Screen::Playing {
                            return;
                        }
                        g.start_round();
                    }
                    request_animation_frame(game.clone());
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_fullscreen(document: &Document) {
        if let Some(btn) = document.get_element_by_id("fullscreen-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                if document.fullscreen_element().is_some() {
                    document.exit_fullscreen();
                } else if let Some(root) = document.document_element() {
                    if let Err(err) = root.request_fullscreen() {
                        log::error!("Failed to enter fullscreen: {:?}", err);
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keep the button label in sync however fullscreen was toggled
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                let active = document.fullscreen_element().is_some();
                if let Some(btn) = document.get_element_by_id("fullscreen-btn") {
                    btn.set_text_content(Some(if active {
                        "Exit Fullscreen"
                    } else {
                        "Fullscreen"
                    }));
                }
            });
            let _ = document.add_event_listener_with_callback(
                "fullscreenchange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;

            let field = g.renderer.measure();
            let input = std::mem::take(&mut g.input);
            let events = tick(&mut g.state, &input, time, field);
            for event in events {
                g.handle_event(event);
            }
            g.renderer.sync(&g.state);

            g.state.phase == GamePhase::Playing
        };

        // The driver stops rescheduling the moment the round ends
        if keep_running {
            request_animation_frame(game);
        }
    }

    fn show_screen(screen: Screen) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        set_hidden(&document, "menu", screen != Screen::Menu);
        set_hidden(&document, "game-over", screen != Screen::GameOver);
        set_hidden(&document, "hud", screen != Screen::Playing);
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn performance_now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Splat Dodge (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the browser version");

    run_headless_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive an unattended round at 60fps against a fixed field and report the
/// outcome. Useful as a smoke test of the full simulation.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_round() {
    use splat_dodge::sim::{FieldSize, GameEvent, GamePhase, GameState, TickInput, tick};

    let field = FieldSize::new(800.0, 600.0);
    let mut state = GameState::new(12345, 0.0);
    let mut input = TickInput::default();
    let mut now: f64 = 0.0;

    while state.phase == GamePhase::Playing && now < 300_000.0 {
        now += 1000.0 / 60.0;
        // Sweep the pointer so the player dodges some of the time
        input.pointer_x = Some(50.0 + ((now / 400.0).sin() * 40.0) as f32);
        for event in tick(&mut state, &input, now, field) {
            if let GameEvent::RoundOver { score } = event {
                println!("Round over after {:.1}s - score {}", now / 1000.0, score);
            }
        }
    }

    println!(
        "Final: score {} lives {} hazards {} splats {}",
        state.score,
        state.lives,
        state.hazards.len(),
        state.splats.len()
    );
}
