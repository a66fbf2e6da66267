//! Sky Gap entry point
//!
//! Browser builds drive the canvas game loop; native builds run a headless
//! autopilot session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
        KeyboardEvent, MouseEvent,
    };

    use sky_gap::GameConfig;
    use sky_gap::leaderboard::{
        self, LEADERBOARD_URL, REFRESH_INTERVAL_MS, ScoreSubmission, leaderboard_html,
    };
    use sky_gap::renderer::{CanvasSurface, Palette, render};
    use sky_gap::sim::{GameEvent, GameState};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        surface: CanvasSurface,
        palette: Palette,
        /// A ledger write is in flight
        submitting: bool,
    }

    impl Game {
        /// One tick: simulate, paint, then update the page
        fn frame(&mut self) {
            self.state.step();
            render(&self.state, &self.palette, &mut self.surface);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::SessionStarted => {
                        set_display("gameOverlay", "none");
                        set_display("gameOverOverlay", "none");
                        set_text("scoreDisplay", "0");
                    }
                    GameEvent::Scored { score } => set_text("scoreDisplay", &score.to_string()),
                    GameEvent::SessionEnded { cause, .. } => {
                        log::info!("Game over ({:?})", cause);
                    }
                    GameEvent::Jumped | GameEvent::ObstacleSpawned => {}
                }
            }

            if let Some(final_score) = self.state.take_ended() {
                set_text("finalScore", &final_score.to_string());
                set_display("gameOverOverlay", "flex");
            }
        }

        fn start(&mut self) {
            self.state.start();
            // Paint right away so the overlay never uncovers a stale frame
            render(&self.state, &self.palette, &mut self.surface);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element<T: JsCast>(id: &str) -> Option<T> {
        document()?.get_element_by_id(id)?.dyn_into::<T>().ok()
    }

    fn set_display(id: &str, value: &str) {
        if let Some(el) = element::<HtmlElement>(id) {
            let _ = el.style().set_property("display", value);
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element::<HtmlElement>(id) {
            el.set_text_content(Some(text));
        }
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn set_submit_button(label: &str, disabled: bool) {
        if let Some(btn) = element::<HtmlButtonElement>("submitScore") {
            btn.set_disabled(disabled);
            btn.set_text_content(Some(label));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sky Gap starting...");

        let canvas: HtmlCanvasElement = element("gameCanvas").expect("no canvas");
        let Some(surface) = CanvasSurface::new(&canvas) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let config = GameConfig {
            width: canvas.width() as f32,
            height: canvas.height() as f32,
            ..GameConfig::load()
        };
        let seed = js_sys::Date::now() as u64;
        let state = match GameState::new(config, seed) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start game: {}", e);
                return;
            }
        };
        // Remember the effective tuning; a stale stored surface is replaced
        config.save();
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            surface,
            palette: Palette::default(),
            submitting: false,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_leaderboard_refresh();

        request_animation_frame(game);

        log::info!("Sky Gap running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down on the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().state.trigger_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space anywhere except text fields; keep the page from scrolling
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() != "Space" || event.repeat() {
                    return;
                }
                let in_text_field = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if in_text_field {
                    return;
                }
                event.prevent_default();
                game.borrow_mut().state.trigger_jump();
            });
            if let Some(document) = document() {
                let _ = document
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        for id in ["playBtn", "playAgainBtn"] {
            if let Some(btn) = element::<HtmlButtonElement>(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = element::<HtmlButtonElement>("submitScore") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                submit_score(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Send the frozen final score to the ledger; the game keeps running
    fn submit_score(game: Rc<RefCell<Game>>) {
        let (final_score, busy) = {
            let g = game.borrow();
            (g.state.final_score(), g.submitting)
        };
        let Some(score) = final_score else {
            log::warn!("No finished session to submit");
            return;
        };
        if busy {
            return;
        }

        let name = element::<HtmlInputElement>("playerName")
            .map(|input| input.value())
            .unwrap_or_default();
        let submission = match ScoreSubmission::new(u64::from(score), &name) {
            Ok(submission) => submission,
            Err(e) => {
                alert(&format!("Please fix your name: {}", e));
                return;
            }
        };

        game.borrow_mut().submitting = true;
        set_submit_button("Submitting...", true);

        wasm_bindgen_futures::spawn_local(async move {
            match leaderboard::submit_to_ledger(&submission).await {
                Ok(()) => {
                    log::info!("Score {} submitted", submission.score);
                    alert("Score submitted successfully!");
                    load_leaderboard();
                    set_display("gameOverOverlay", "none");
                    set_display("gameOverlay", "flex");
                }
                Err(e) => {
                    log::error!("Score submission failed: {}", e);
                    alert("Failed to submit score. Please try again.");
                }
            }
            game.borrow_mut().submitting = false;
            set_submit_button("Submit to Blockchain", false);
        });
    }

    fn load_leaderboard() {
        wasm_bindgen_futures::spawn_local(async {
            match leaderboard::fetch_leaderboard(LEADERBOARD_URL).await {
                Ok(entries) => {
                    if let Some(el) = element::<HtmlElement>("leaderboard") {
                        let now = (js_sys::Date::now() / 1000.0) as u64;
                        el.set_inner_html(&leaderboard_html(&entries, now));
                    }
                }
                Err(e) => log::warn!("Leaderboard unavailable: {}", e),
            }
        });
    }

    fn setup_leaderboard_refresh() {
        load_leaderboard();

        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(load_leaderboard);
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            REFRESH_INTERVAL_MS,
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use sky_gap::GameConfig;
    use sky_gap::leaderboard::{MemorySubmitter, ScoreSubmission, ScoreSubmitter};
    use sky_gap::renderer::{Palette, RecordingSurface, render};
    use sky_gap::sim::{GameEvent, GameState, autopilot};

    /// Stop after five minutes of 60 Hz frames
    const MAX_FRAMES: u64 = 5 * 60 * 60;

    pub fn run(seed: u64) -> Result<(), Box<dyn std::error::Error>> {
        let config = GameConfig::load();
        let mut state = GameState::new(config, seed)?;
        let mut surface = RecordingSurface::new(config.width, config.height);
        let palette = Palette::default();
        let mut ledger = MemorySubmitter::new();

        state.start();
        while state.is_running() && state.frame < MAX_FRAMES {
            if autopilot::wants_jump(&state) {
                state.trigger_jump();
            }
            state.step();

            surface.clear();
            render(&state, &palette, &mut surface);

            for event in state.drain_events() {
                if let GameEvent::Scored { score } = event {
                    log::debug!("Frame {}: score {}", state.frame, score);
                }
            }
        }

        log::debug!("Final frame: {}", serde_json::to_string(&state.snapshot())?);

        match state.take_ended() {
            Some(final_score) => {
                log::info!("Autopilot crashed after {} frames", state.frame);
                ledger.submit(&ScoreSubmission::new(u64::from(final_score), "autopilot")?)?;
            }
            None => log::info!("Autopilot still flying after {} frames", state.frame),
        }

        for entry in ledger.leaderboard(0) {
            log::info!("#{} {} {}", entry.rank, entry.name, entry.score);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    log::info!("Sky Gap (native) headless run with seed {}", seed);

    if let Err(e) = headless::run(seed) {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
