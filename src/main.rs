//! Ultra Ping Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use ultra_ping_pong::audio::{AudioManager, SoundSink};
    use ultra_ping_pong::consts::*;
    use ultra_ping_pong::hud::{HudView, PAUSE_HINT};
    use ultra_ping_pong::platform;
    use ultra_ping_pong::settings::Settings;
    use ultra_ping_pong::share::{self, ShareMessage};
    use ultra_ping_pong::sim::{
        GameClock, GameEvent, GameState, InputAction, InputController, MatchPhase,
    };

    /// Game instance holding all state
    struct Game {
        clock: GameClock,
        input: InputController,
        audio: AudioManager,
        settings: Settings,
        /// Handle of the running AI poll interval
        ai_timer: Option<i32>,
        /// AI poll callback, created once and reused by every interval
        ai_poll: Option<Closure<dyn FnMut()>>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let audio = AudioManager::new();
            audio.set_muted(!settings.sound_enabled);
            Self {
                clock: GameClock::new(seed, platform::viewport()),
                input: InputController::new(),
                audio,
                settings,
                ai_timer: None,
                ai_poll: None,
            }
        }

        /// Apply a command from the input layer
        fn apply(&mut self, action: InputAction) {
            match action {
                InputAction::SetDirection(dir) => self.clock.set_direction(dir),
                InputAction::StartOrPause => {
                    self.audio.resume();
                    match self.clock.phase() {
                        MatchPhase::Idle | MatchPhase::GameOver => {
                            self.clock.start();
                        }
                        MatchPhase::Playing | MatchPhase::Paused => {
                            self.clock.toggle_pause();
                        }
                    }
                }
            }
            self.sync_ai_timer();
        }

        /// Keep the AI interval running exactly while the match is playing
        fn sync_ai_timer(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let playing = self.clock.phase() == MatchPhase::Playing;

            match (playing, self.ai_timer) {
                (true, None) => {
                    let Some(poll) = &self.ai_poll else { return };
                    match window.set_interval_with_callback_and_timeout_and_arguments_0(
                        poll.as_ref().unchecked_ref(),
                        AI_POLL_INTERVAL_MS,
                    ) {
                        Ok(handle) => self.ai_timer = Some(handle),
                        Err(e) => log::warn!("Failed to start AI timer: {:?}", e),
                    }
                }
                (false, Some(handle)) => {
                    window.clear_interval_with_handle(handle);
                    self.ai_timer = None;
                }
                _ => {}
            }
        }

        /// Run one display frame
        fn update(&mut self, time: f64) {
            let events = self.clock.tick(time);
            if events.is_empty() {
                return;
            }
            self.audio.play_events(&events);
            if events.iter().any(|e| matches!(e, GameEvent::GameOver(_))) {
                self.sync_ai_timer();
            }
        }

        fn start_fresh(&mut self) {
            self.clock.reset();
            self.clock.start();
            self.input.clear();
            self.sync_ai_timer();
        }

        fn toggle_sound(&mut self) {
            let enabled = self.settings.toggle_sound();
            self.audio.set_muted(!enabled);
            if enabled {
                self.audio.resume();
            }
            self.settings.save();
        }

        fn share_result(&self) {
            let state = self.clock.state();
            let url = web_sys::window()
                .and_then(|w| w.location().href().ok())
                .unwrap_or_default();
            share::share(ShareMessage::new(state.player_score, state.ai_score, &url));
        }
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn place(document: &Document, id: &str, x: f32, y: f32) {
        if let Some(el) = element(document, id) {
            let _ = el
                .style()
                .set_property("transform", &format!("translate({x:.1}px, {y:.1}px)"));
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Draw the snapshot. The DOM never writes back into the simulation.
    fn render(document: &Document, state: &GameState, settings: &Settings) {
        let ball = &state.ball;
        place(
            document,
            "ball",
            ball.pos.x - ball.half_size(),
            ball.pos.y - ball.half_size(),
        );
        place(
            document,
            "player-paddle",
            state.player_paddle.pos.x,
            state.player_paddle.pos.y,
        );
        place(document, "ai-paddle", state.ai_paddle.pos.x, state.ai_paddle.pos.y);

        let hud = HudView::from_state(state);
        set_text(document, "player-score", &hud.player_score);
        set_text(document, "ai-score", &hud.ai_score);

        set_hidden(document, "start-overlay", !hud.start_overlay);
        set_hidden(document, "pause-overlay", !hud.pause_overlay);
        set_hidden(document, "game-over", !hud.game_over_overlay);
        set_hidden(document, "pause-btn", !hud.pause_control);
        set_hidden(document, "pause-hint", !hud.pause_control);

        if let Some((title, final_score)) = &hud.result {
            set_text(document, "game-over-title", title);
            set_text(document, "final-score", final_score);
        }
        set_hidden(document, "share-btn", !settings.share_enabled);
        set_text(
            document,
            "sound-toggle",
            if settings.sound_enabled { "🔊" } else { "🔇" },
        );
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Ultra Ping Pong starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        set_hidden(&document, "loading", true);
        set_text(&document, "pause-hint", PAUSE_HINT);

        let seed = platform::seed();
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // AI poll callback shared by every interval the game starts
        {
            let weak = Rc::downgrade(&game);
            let poll = Closure::<dyn FnMut()>::new(move || {
                if let Some(game) = weak.upgrade() {
                    let now = platform::now_ms();
                    game.borrow_mut().clock.poll_ai(now);
                }
            });
            game.borrow_mut().ai_poll = Some(poll);
        }

        share::signal_ready();

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Ultra Ping Pong running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(action) = g.input.key_down(&event.key()) {
                    if action == InputAction::StartOrPause {
                        event.prevent_default();
                    }
                    g.apply(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(action) = g.input.key_up(&event.key()) {
                    g.apply(action);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(document) = window.document() else { return };
        let Some(field) = document.get_element_by_id("field") else {
            log::warn!("No #field element - pointer input disabled");
            return;
        };

        // Presses anywhere except on a button count as field presses, so
        // the overlays start a match too

        // Touch: double tap pauses/resumes, otherwise press or steer
        {
            let game = game.clone();
            let field = field.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if on_button(&event) {
                    return;
                }
                let Some(touch) = event.touches().get(0) else { return };
                let mut g = game.borrow_mut();
                let (x, y) = (touch.client_x() as f32, touch.client_y() as f32);
                let phase = g.clock.phase();
                let starting = event.type_() == "touchstart";

                if starting
                    && matches!(phase, MatchPhase::Playing | MatchPhase::Paused)
                    && g.input.tap(platform::now_ms(), x, y)
                {
                    event.prevent_default();
                    g.apply(InputAction::StartOrPause);
                    return;
                }

                // A drag only steers; it never starts a match
                if !starting && phase != MatchPhase::Playing {
                    return;
                }
                if let Some(action) = g.input.press(phase, x, field_center_x(&field)) {
                    g.apply(action);
                }
            });
            for kind in ["touchstart", "touchmove"] {
                let _ = document
                    .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Mouse: press to start, hold to steer
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if on_button(&event) {
                    return;
                }
                let mut g = game.borrow_mut();
                let phase = g.clock.phase();
                let x = event.client_x() as f32;
                if let Some(action) = g.input.press(phase, x, field_center_x(&field)) {
                    g.apply(action);
                }
            });
            let _ = document
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release stops the paddle
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let action = g.input.pointer_up();
                g.apply(action);
            });
            for kind in ["touchend", "mouseup"] {
                let _ = document
                    .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    /// True when the event started on (or inside) a button
    fn on_button(event: &web_sys::Event) -> bool {
        event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("button").ok().flatten())
            .is_some()
    }

    fn field_center_x(field: &Element) -> f32 {
        let rect = field.get_bounding_client_rect();
        (rect.left() + rect.width() / 2.0) as f32
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        {
            let game = game.clone();
            on_click(&document, "start-btn", move || {
                game.borrow_mut().apply(InputAction::StartOrPause);
            });
        }
        {
            let game = game.clone();
            on_click(&document, "pause-btn", move || {
                game.borrow_mut().apply(InputAction::StartOrPause);
            });
        }
        {
            let game = game.clone();
            on_click(&document, "resume-btn", move || {
                game.borrow_mut().apply(InputAction::StartOrPause);
            });
        }
        {
            let game = game.clone();
            on_click(&document, "play-again-btn", move || {
                game.borrow_mut().start_fresh();
            });
        }
        {
            let game = game.clone();
            on_click(&document, "share-btn", move || {
                game.borrow().share_result();
            });
        }
        on_click(&document, "sound-toggle", move || {
            game.borrow_mut().toggle_sound();
        });
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().clock.set_viewport(platform::viewport());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                render(&document, g.clock.state(), &g.settings);
            }
        }

        // The loop keeps running while idle or over; the clock ignores those frames
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
    use ultra_ping_pong::consts::*;
    use ultra_ping_pong::platform;
    use ultra_ping_pong::sim::{Direction, GameClock, GameEvent, MatchPhase};

    env_logger::init();
    log::info!("Ultra Ping Pong (native) starting...");
    log::info!("Native mode plays a headless demo match - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(platform::seed);
    let mut clock = GameClock::new(seed, platform::viewport());
    clock.start();
    log::info!("Demo match seed: {}", seed);

    // Autopilot for the bottom paddle: chase the ball with a little slack
    let mut now = 0.0;
    for _ in 0..1_000_000 {
        if clock.phase() != MatchPhase::Playing {
            break;
        }
        let state = clock.state();
        let diff = state.ball.pos.x - state.player_paddle.center_x();
        let dir = if diff.abs() < PADDLE_WIDTH / 4.0 {
            Direction::Still
        } else if diff < 0.0 {
            Direction::Left
        } else {
            Direction::Right
        };
        clock.set_direction(dir);

        now += FRAME_INTERVAL_MS;
        clock.poll_ai(now);
        for event in clock.tick(now) {
            if let GameEvent::Scored(side) = event {
                let state = clock.state();
                log::info!(
                    "{} scores: {} - {}",
                    side.as_str(),
                    state.player_score,
                    state.ai_score
                );
            }
        }
    }

    let state = clock.state();
    match state.winner {
        Some(winner) => println!(
            "Final score {} - {} ({} wins after {} ticks)",
            state.player_score,
            state.ai_score,
            winner.as_str(),
            clock.time_ticks()
        ),
        None => println!(
            "Demo stopped at {} - {} after {} ticks",
            state.player_score,
            state.ai_score,
            clock.time_ticks()
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
