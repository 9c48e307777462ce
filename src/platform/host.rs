//! Browser host entry points
//!
//! The page calls `startGame(elementId, configJson)` and keeps the returned
//! handle; `handle.stop()` tears the session down when the view goes away.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::dom::{ARENA_ELEMENT_ID, DomView, InputListeners};
use crate::audio::AudioManager;
use crate::settings::Settings;
use crate::sim::{GameEvent, Session, TickInput};

/// Longest stretch of simulated time a single frame may cover (ms)
const MAX_FRAME_MS: f64 = 250.0;

struct Game {
    session: Session,
    view: DomView,
    audio: AudioManager,
    listeners: Option<InputListeners>,
    last_time: f64,
    /// Sub-millisecond remainder carried between frames
    carry_ms: f64,
}

impl Game {
    fn handle_input(&mut self, input: TickInput) {
        self.session.apply_input(&input);
        // Shots fired from input should sound right away
        self.dispatch_events();
    }

    fn update(&mut self, time: f64) {
        let dt = if self.last_time > 0.0 {
            (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.last_time = time;

        let total = dt + self.carry_ms;
        let whole = total.floor();
        self.carry_ms = total - whole;
        self.session.advance(whole as u64);
    }

    fn dispatch_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                GameEvent::Sound { cue } => self.audio.play(cue),
                GameEvent::RoundEnded {
                    winner,
                    rounds_won,
                    rounds_lost,
                } => log::info!("{:?} took the round ({}-{})", winner, rounds_won, rounds_lost),
                _ => {}
            }
        }
    }

    fn render(&mut self) {
        self.view.render(&self.session.snapshot());
    }

    fn stop(&mut self) {
        if let Some(mut listeners) = self.listeners.take() {
            listeners.detach();
        }
        self.session.teardown();
        self.view.clear();
    }
}

/// Handle to a running game, returned to the host page
#[wasm_bindgen]
pub struct GameHandle {
    game: Rc<RefCell<Game>>,
}

#[wasm_bindgen]
impl GameHandle {
    /// Stop every timer, unhook input and remove the game's nodes.
    /// Calling it again does nothing.
    pub fn stop(&self) {
        self.game.borrow_mut().stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.game.borrow().session.is_running()
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger init failed: {e}").into());
    }
}

/// Start a game inside the element with `element_id` (the default arena id
/// when empty), configured by the page's camelCase JSON settings
#[wasm_bindgen(js_name = startGame)]
pub fn start_game(element_id: &str, config_json: &str) -> Result<GameHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let settings = Settings::from_host_config(config_json, js_sys::Date::now() as u64)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let (width, height) = (settings.width, settings.height);
    let seed = settings.seed;
    let session = Session::new(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let element_id = if element_id.is_empty() {
        ARENA_ELEMENT_ID
    } else {
        element_id
    };
    let view = DomView::attach(document, element_id, width, height)?;
    let arena = view.arena().clone();

    let game = Rc::new(RefCell::new(Game {
        session,
        view,
        audio: AudioManager::new(),
        listeners: None,
        last_time: 0.0,
        carry_ms: 0.0,
    }));

    let listeners = {
        let game = game.clone();
        InputListeners::install(&arena, width, move |input| {
            game.borrow_mut().handle_input(input);
        })?
    };
    game.borrow_mut().listeners = Some(listeners);

    request_animation_frame(game.clone());

    log::info!("Meteor Duel running in #{} (seed {:?})", element_id, seed);
    Ok(GameHandle { game })
}

fn request_animation_frame(game: Rc<RefCell<Game>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(game, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
    {
        let mut g = game.borrow_mut();
        // Stopped by the host; the loop ends here
        if !g.session.is_running() {
            return;
        }
        g.update(time);
        g.dispatch_events();
        g.render();
    }

    request_animation_frame(game);
}
