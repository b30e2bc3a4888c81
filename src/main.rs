//! Pokeball Toss entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, MouseEvent};

    use pokeball_toss::audio::{AudioManager, MusicTrack};
    use pokeball_toss::renderer::{DomHud, DomRenderer};
    use pokeball_toss::{Game, Settings, Tuning};

    /// Browser side of the session: the game plus frame timing
    struct App {
        game: Game,
        settings: Settings,
        last_time: f64,
        /// First click switches from menu to level music
        started: bool,
    }

    /// Read an optional JSON attribute from `#game-container`
    fn container_json(document: &Document, attr: &str) -> Option<String> {
        document
            .get_element_by_id("game-container")?
            .get_attribute(attr)
    }

    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = container_json(document, "data-tuning") else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Rejected data-tuning ({}), using defaults", e);
                Tuning::default()
            }
        }
    }

    fn load_settings(document: &Document) -> Settings {
        let Some(json) = container_json(document, "data-settings") else {
            return Settings::default();
        };
        Settings::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Rejected data-settings ({}), using defaults", e);
            Settings::default()
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Pokeball Toss starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let tuning = load_tuning(&document);
        let settings = load_settings(&document);

        let Some(renderer) = DomRenderer::new(document.clone(), settings.reduced_motion) else {
            log::error!("No #game-container element");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(tuning, seed)
            .with_renderer(renderer)
            .with_hud(DomHud::new(&document))
            .with_audio(AudioManager::new(settings.clone()));
        game.present();
        game.audio_mut().play_music(MusicTrack::Menu);

        let app = Rc::new(RefCell::new(App {
            game,
            settings,
            last_time: 0.0,
            started: false,
        }));

        setup_input_handlers(&document, app.clone());
        setup_restart_button(&document, app.clone());
        setup_auto_pause(&document, app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Pokeball Toss running!");
    }

    fn setup_input_handlers(document: &Document, app: Rc<RefCell<App>>) {
        let Some(container) = document
            .get_element_by_id("game-container")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };

        // Click - throw toward the pointer
        let container_clone = container.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut a = app.borrow_mut();
            if !a.started {
                a.started = true;
                a.game.audio_mut().play_music(MusicTrack::Level);
            }
            let rect = container_clone.get_bounding_client_rect();
            let aim = Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            );
            a.game.queue_throw(aim);
        });
        let _ = container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("restart-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Keep the click from reaching the arena as a throw
                event.stop_propagation();
                let mut a = app.borrow_mut();
                a.started = true;
                a.game.queue_restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, app: Rc<RefCell<App>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            if !a.settings.mute_on_hidden {
                return;
            }
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                a.game.audio_mut().pause_music();
                log::info!("Music paused (tab hidden)");
            } else {
                a.game.audio_mut().resume_music();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt_ms = if a.last_time > 0.0 {
                (time - a.last_time) as f32
            } else {
                0.0
            };
            a.last_time = time;

            a.game.update(dt_ms);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Autoplay step cap for the native smoke run
#[cfg(not(target_arch = "wasm32"))]
const MAX_AUTOPLAY_STEPS: u32 = 20_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pokeball_toss::sim::GamePhase;
    use pokeball_toss::{Game, Tuning};

    env_logger::init();
    log::info!("Pokeball Toss (native) starting...");
    log::info!("Native mode runs a headless autoplay session - run with `trunk serve` for the web version");

    let tuning = match std::env::var("POKEBALL_TOSS_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => Tuning::default(),
    };

    let seed = std::env::var("POKEBALL_TOSS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let mut game = Game::new(tuning, seed);
    game.set_idle_mode(true);

    let mut steps = 0;
    while game.state().phase != GamePhase::Victory && steps < MAX_AUTOPLAY_STEPS {
        game.step();
        steps += 1;
    }

    let state = game.state();
    println!(
        "{} after {} steps ({:.1}s simulated): pokedex {}/{}",
        if state.phase == GamePhase::Victory {
            "Victory"
        } else {
            "Stopped"
        },
        steps,
        steps as f32 * state.tuning.step_ms / 1000.0,
        state.captured_count(),
        state.total_targets()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
