//! Booger Blaster entry point
//!
//! In the browser this wires DOM input, the animation-frame loop, the HUD and
//! the commentary fetch to a [`RoundController`]. Natively it plays one
//! scripted round headless and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, PointerEvent};

    use booger_blaster::commentary::fetch_commentary;
    use booger_blaster::consts::*;
    use booger_blaster::renderer::CanvasRenderer;
    use booger_blaster::round::{CommentaryStatus, RoundController, RoundPhase};
    use booger_blaster::sim::{FrameStatus, SimEvent};
    use booger_blaster::{CommentaryConfig, HighScore, InputMode, Settings};

    const NOSEBLEED_FLASH_MS: f64 = 800.0;

    /// Game instance holding all state
    struct Game {
        controller: RoundController,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
        document: Document,
        /// An animation frame is scheduled
        looping: bool,
        /// Nosebleed banner stays up until this timestamp
        nosebleed_until_ms: f64,
    }

    impl Game {
        /// Client coordinates to field coordinates
        fn to_field(&self, event: &PointerEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let sx = if rect.width() > 0.0 { FIELD_WIDTH as f64 / rect.width() } else { 1.0 };
            let sy = if rect.height() > 0.0 { FIELD_HEIGHT as f64 / rect.height() } else { 1.0 };
            Vec2::new(
                ((event.client_x() as f64 - rect.left()) * sx) as f32,
                ((event.client_y() as f64 - rect.top()) * sy) as f32,
            )
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if visible {
                    classes.remove_1("hidden")
                } else {
                    classes.add_1("hidden")
                };
            }
        }

        /// Apply simulation events to the HUD
        fn apply_events(&mut self) {
            for event in self.controller.drain_events() {
                match event {
                    SimEvent::ScoreChanged { score } => {
                        self.set_text("hud-score", &score.to_string())
                    }
                    SimEvent::TimeChanged { remaining } => {
                        self.set_text("hud-time", &format!("{}", remaining.ceil() as u32))
                    }
                    SimEvent::Nosebleed => {
                        self.nosebleed_until_ms = now_ms() + NOSEBLEED_FLASH_MS;
                    }
                    _ => {}
                }
            }
        }

        /// Show the panels for the current phase
        fn update_overlay(&self) {
            let phase = self.controller.phase();
            self.set_visible("menu", phase == RoundPhase::Menu);
            self.set_visible("hud", phase == RoundPhase::Playing);
            self.set_visible("game-over", phase == RoundPhase::GameOver);
            self.set_text("hud-best", &self.controller.high_score().to_string());
            self.set_text("mode-btn", self.controller.input_mode().as_str());

            if let Some(summary) = self.controller.last_summary() {
                self.set_text("final-score", &summary.score.to_string());
                self.set_text("final-best", &summary.high_score.to_string());
                self.set_visible("new-best", summary.new_high_score);
            }

            let loading = self.controller.is_loading_commentary();
            self.set_visible("commentary-loading", loading);
            let text = match self.controller.commentary() {
                CommentaryStatus::Ready(text) => text.as_str(),
                _ => "",
            };
            self.set_text("commentary", text);
        }

        /// Show or hide the nosebleed banner for this frame
        fn update_nosebleed(&self, now_ms: f64) {
            let showing = self.controller.phase() == RoundPhase::Playing
                && now_ms < self.nosebleed_until_ms;
            self.set_visible("nosebleed", showing);
        }

        fn render(&self) {
            if let Err(e) = self.renderer.render(&self.controller.snapshot()) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Booger Blaster starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(&canvas)?;

        let commentary_config = CommentaryConfig::from_build_env();
        if !commentary_config.has_credential() {
            log::warn!("GEMINI_API_KEY not set at build time, commentary disabled");
        }

        let game = Rc::new(RefCell::new(Game {
            controller: RoundController::new(
                Settings::load(),
                HighScore::load(),
                commentary_config,
            ),
            renderer,
            canvas: canvas.clone(),
            document: document.clone(),
            looping: false,
            nosebleed_until_ms: 0.0,
        }));

        {
            let g = game.borrow();
            g.update_overlay();
            g.render();
        }

        setup_pointer_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone())?;

        log::info!("Booger Blaster ready");
        Ok(())
    }

    fn setup_pointer_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Pointer down
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                // Keep receiving moves when the drag leaves the canvas
                let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                let mut g = game.borrow_mut();
                let pos = g.to_field(&event);
                g.controller.pointer_down(pos, event.time_stamp());
            });
            canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let pos = g.to_field(&event);
                g.controller.pointer_move(pos, event.time_stamp());
            });
            canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer up / cancel
        for name in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let pos = g.to_field(&event);
                g.controller.pointer_up(pos, event.time_stamp());
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Start and play-again both begin a new round
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    start_round(game.clone());
                });
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("mode-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                let next = match g.controller.input_mode() {
                    InputMode::Flick => InputMode::DirectAim,
                    InputMode::DirectAim => InputMode::Flick,
                };
                if g.controller.set_input_mode(next) {
                    if let Err(e) = g.controller.settings().save() {
                        log::warn!("Could not save settings: {}", e);
                    }
                    log::info!("Input mode: {}", next.as_str());
                }
                g.update_overlay();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn start_round(game: Rc<RefCell<Game>>) {
        let schedule = {
            let mut g = game.borrow_mut();
            let seed = js_sys::Date::now() as u64;
            if !g.controller.start(now_ms(), seed) {
                return;
            }
            g.apply_events();
            g.update_overlay();
            // A loop from the previous round may still be winding down
            let schedule = !g.looping;
            g.looping = true;
            schedule
        };
        if schedule {
            request_animation_frame(game);
        }
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
        let status = {
            let mut g = game.borrow_mut();
            let status = g.controller.frame(time);
            g.apply_events();
            g.update_nosebleed(now_ms());
            g.render();
            if status == FrameStatus::Ended {
                g.looping = false;
                g.update_overlay();
            }
            status
        };

        match status {
            FrameStatus::Continue => request_animation_frame(game),
            FrameStatus::Ended => request_commentary(game),
        }
    }

    /// Fire the round's commentary request, if one is waiting
    fn request_commentary(game: Rc<RefCell<Game>>) {
        let (request, config) = {
            let mut g = game.borrow_mut();
            match g.controller.take_commentary_request() {
                Some(request) => (request, g.controller.commentary_config().clone()),
                None => return,
            }
        };

        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_commentary(&config, request.score).await;
            let mut g = game.borrow_mut();
            if g.controller.deliver_commentary(request.generation, result) {
                g.update_overlay();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Booger Blaster (native) starting...");
    log::info!("The game itself runs in the browser - build with `trunk serve`");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    headless::play_scripted_round(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// One round with a bot flicking straight up at the lowest bug
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use booger_blaster::commentary::resolve;
    use booger_blaster::consts::*;
    use booger_blaster::round::CommentaryStatus;
    use booger_blaster::sim::{FrameStatus, SimEvent};
    use booger_blaster::{CommentaryConfig, CommentaryError, HighScore, RoundController, Settings};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const SHOT_EVERY_FRAMES: u32 = 20;

    pub fn play_scripted_round(seed: u64) {
        let mut controller = RoundController::new(
            Settings::default(),
            HighScore::load(),
            CommentaryConfig::from_build_env(),
        );

        let mut now = 0.0;
        controller.start(now, seed);
        let mut frame = 0u32;
        let mut squashed = 0u32;

        loop {
            now += FRAME_MS;
            frame += 1;

            if frame % SHOT_EVERY_FRAMES == 0 {
                let target = controller
                    .sim()
                    .bugs
                    .iter()
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|bug| bug.pos.x);
                if let Some(x) = target {
                    let x = x.clamp(BOOGER_SIDE_MARGIN, FIELD_WIDTH - BOOGER_SIDE_MARGIN);
                    let y = FIELD_HEIGHT - 60.0;
                    controller.pointer_down(Vec2::new(x, y), now);
                    controller.pointer_move(Vec2::new(x, y - 20.0), now + 10.0);
                    controller.pointer_up(Vec2::new(x, y - 60.0), now + 30.0);
                }
            }

            let status = controller.frame(now);
            for event in controller.drain_events() {
                if let SimEvent::BugSquashed { kind, points, .. } = event {
                    squashed += 1;
                    log::info!("Squashed a {} (+{})", kind.as_str(), points);
                }
            }
            if status == FrameStatus::Ended {
                break;
            }
        }

        if let Some(summary) = controller.last_summary() {
            log::info!(
                "Round over: {} points, {} bugs, best {} (seed {})",
                summary.score,
                squashed,
                summary.high_score,
                summary.seed
            );
        }

        // No network natively: answer a pending request with the offline fallback
        if let Some(request) = controller.take_commentary_request() {
            controller.deliver_commentary(
                request.generation,
                Err(CommentaryError::Network("offline".into())),
            );
        }
        let text = match controller.commentary() {
            CommentaryStatus::Ready(text) => text.clone(),
            _ => resolve(Err(CommentaryError::EmptyResponse)),
        };
        println!("Score: {}", controller.score());
        println!("{}", text);
    }
}
