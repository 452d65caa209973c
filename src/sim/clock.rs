//! Fixed timestep simulation clock
//!
//! Owns the authoritative `GameState` and advances it one tick at a time.
//! The host calls `tick` once per display frame; ticks closer together
//! than `FRAME_INTERVAL_MS` are dropped. The AI samples on its own timer
//! through `poll_ai`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ai::AiController;
use super::input::Direction;
use super::physics::{self, Contact};
use super::state::{GameEvent, GameState, MatchPhase, Paddle, Side, Viewport};
use crate::consts::*;

/// Mixed into the match seed to give the AI its own stream
const AI_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Slack for float rounding when comparing frame timestamps (ms)
const FRAME_GATE_EPSILON_MS: f64 = 1e-6;

#[derive(Debug)]
pub struct GameClock {
    state: GameState,
    ai: AiController,
    /// Player paddle direction signal, written by input, read each tick
    direction: Direction,
    viewport: Viewport,
    rng: Pcg32,
    /// Timestamp of the last processed tick (ms)
    last_tick_ms: Option<f64>,
    /// Processed simulation ticks since construction
    time_ticks: u64,
}

impl GameClock {
    /// A new idle match
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = fresh_state(&viewport, &mut rng, MatchPhase::Idle);
        Self {
            state,
            ai: AiController::new(seed ^ AI_SEED_SALT, &viewport),
            direction: Direction::Still,
            viewport,
            rng,
            last_tick_ms: None,
            time_ticks: 0,
        }
    }

    /// Read-only snapshot for the presentation layer
    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn ai(&self) -> &AiController {
        &self.ai
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Resize notification. Paddles are re-clamped and re-pinned at once;
    /// the ball adapts on its next tick.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for paddle in [&mut self.state.player_paddle, &mut self.state.ai_paddle] {
            let x = paddle.pos.x;
            paddle.set_x(x, &viewport);
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Start a match from Idle or GameOver. Scores are zeroed, paddles
    /// centered and a random side serves.
    pub fn start(&mut self) -> bool {
        if !matches!(self.state.phase, MatchPhase::Idle | MatchPhase::GameOver) {
            return false;
        }

        self.state = fresh_state(&self.viewport, &mut self.rng, MatchPhase::Playing);
        self.ai.reset(&self.viewport);
        self.ai.activate();
        self.last_tick_ms = None;
        log::info!("Match started");
        true
    }

    /// Playing <-> Paused. Returns false in any other phase.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase {
            MatchPhase::Playing => {
                self.state.phase = MatchPhase::Paused;
                self.ai.deactivate();
                log::info!("Paused");
                true
            }
            MatchPhase::Paused => {
                self.state.phase = MatchPhase::Playing;
                self.ai.activate();
                // Measure the frame gate from resume, not from before the pause
                self.last_tick_ms = None;
                log::info!("Resumed");
                true
            }
            _ => false,
        }
    }

    /// Back to Idle with zeroed scores and centered paddles. The host's
    /// scheduler may keep calling `tick`; it does nothing until `start`.
    pub fn reset(&mut self) {
        self.state = fresh_state(&self.viewport, &mut self.rng, MatchPhase::Idle);
        self.ai.reset(&self.viewport);
        self.direction = Direction::Still;
        self.last_tick_ms = None;
        log::info!("Match reset");
    }

    /// AI timer callback. The AI only ever sees the ball by reference.
    pub fn poll_ai(&mut self, now_ms: f64) -> bool {
        if self.state.phase != MatchPhase::Playing {
            return false;
        }
        self.ai.sample(&self.state.ball, now_ms)
    }

    /// Display-frame callback: run one step if a full frame interval has
    /// passed since the last processed tick
    pub fn tick(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if self.state.phase != MatchPhase::Playing {
            return Vec::new();
        }
        if let Some(last) = self.last_tick_ms {
            if now_ms - last + FRAME_GATE_EPSILON_MS < FRAME_INTERVAL_MS {
                return Vec::new();
            }
        }
        self.last_tick_ms = Some(now_ms);
        self.step()
    }

    /// Advance exactly one simulation tick, ignoring the frame gate
    pub fn step(&mut self) -> Vec<GameEvent> {
        if self.state.phase != MatchPhase::Playing {
            return Vec::new();
        }

        self.time_ticks += 1;
        let viewport = self.viewport;
        let mut events = Vec::new();
        let state = &mut self.state;

        // Paddles
        let player_x = state.player_paddle.pos.x + self.direction.signum() * PADDLE_SPEED;
        state.player_paddle.set_x(player_x, &viewport);
        let ai_x = self.ai.steer(&state.ai_paddle, &viewport);
        state.ai_paddle.set_x(ai_x, &viewport);

        // Ball
        state.ball.integrate();
        match physics::resolve_collisions(
            &mut state.ball,
            &state.player_paddle,
            &state.ai_paddle,
            &viewport,
        ) {
            Some(Contact::Paddle(side)) => events.push(GameEvent::PaddleHit(side)),
            Some(Contact::Wall) => events.push(GameEvent::WallBounce),
            None => {}
        }

        // Scoring
        if let Some(scorer) = physics::goal(&state.ball, &viewport) {
            let total = state.award_point(scorer);
            events.push(GameEvent::Scored(scorer));
            state.ball = physics::serve(Some(scorer.opponent()), &viewport, &mut self.rng);
            log::debug!(
                "{} scored ({} - {})",
                scorer.as_str(),
                state.player_score,
                state.ai_score
            );

            if total >= WINNING_SCORE {
                state.phase = MatchPhase::GameOver;
                state.winner = Some(scorer);
                self.ai.deactivate();
                events.push(GameEvent::GameOver(scorer));
                log::info!(
                    "Game over: {} wins {} - {}",
                    scorer.as_str(),
                    state.player_score,
                    state.ai_score
                );
            }
        }

        events
    }
}

fn fresh_state(viewport: &Viewport, rng: &mut Pcg32, phase: MatchPhase) -> GameState {
    GameState {
        ball: physics::serve(None, viewport, rng),
        player_paddle: Paddle::new(Side::Player, viewport),
        ai_paddle: Paddle::new(Side::Ai, viewport),
        player_score: 0,
        ai_score: 0,
        phase,
        winner: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn playing_clock(seed: u64) -> GameClock {
        let mut clock = GameClock::new(seed, Viewport::new(600.0, 900.0));
        assert!(clock.start());
        clock
    }

    /// Put the ball one tick away from crossing the top edge, clear of the AI paddle
    fn ball_about_to_pass_top(clock: &mut GameClock) {
        let paddle_x = clock.state.ai_paddle.pos.x;
        let x = if paddle_x > 300.0 { 50.0 } else { 550.0 };
        clock.state.ball.pos = Vec2::new(x, 10.0);
        clock.state.ball.vel = Vec2::new(0.0, -9.0);
    }

    #[test]
    fn test_idle_does_not_advance() {
        let mut clock = GameClock::new(1, Viewport::default());
        assert_eq!(clock.phase(), MatchPhase::Idle);
        let before = clock.state().clone();
        assert!(clock.tick(0.0).is_empty());
        assert!(clock.step().is_empty());
        assert_eq!(clock.state(), &before);
        assert_eq!(clock.time_ticks(), 0);
    }

    #[test]
    fn test_start_only_from_idle_or_game_over() {
        let mut clock = playing_clock(2);
        assert_eq!(clock.phase(), MatchPhase::Playing);
        assert!(clock.ai().is_active());
        assert!(!clock.start());

        clock.toggle_pause();
        assert!(!clock.start());
    }

    #[test]
    fn test_frame_gate() {
        let mut clock = playing_clock(3);
        clock.tick(1_000.0);
        assert_eq!(clock.time_ticks(), 1);

        clock.tick(1_000.0 + FRAME_INTERVAL_MS / 2.0);
        assert_eq!(clock.time_ticks(), 1);

        clock.tick(1_000.0 + FRAME_INTERVAL_MS);
        assert_eq!(clock.time_ticks(), 2);
    }

    #[test]
    fn test_frame_gate_accepts_exact_interval_cadence() {
        let mut clock = playing_clock(12);
        for i in 0..600 {
            // Keep the rally alive so the phase never changes
            clock.state.ball.pos = Vec2::new(300.0, 450.0);
            clock.tick(5_000.0 + i as f64 * FRAME_INTERVAL_MS);
        }
        assert_eq!(clock.time_ticks(), 600);
    }

    #[test]
    fn test_player_paddle_pins_at_bounds() {
        let mut clock = playing_clock(4);
        let max_x = 600.0 - PADDLE_WIDTH;

        clock.set_direction(Direction::Right);
        for _ in 0..100 {
            clock.state.ball.pos = Vec2::new(300.0, 450.0);
            clock.step();
            assert!(clock.state().player_paddle.pos.x <= max_x);
        }
        assert_eq!(clock.state().player_paddle.pos.x, max_x);

        clock.set_direction(Direction::Left);
        for _ in 0..100 {
            clock.state.ball.pos = Vec2::new(300.0, 450.0);
            clock.step();
            assert!(clock.state().player_paddle.pos.x >= 0.0);
        }
        assert_eq!(clock.state().player_paddle.pos.x, 0.0);
        assert_eq!(
            clock.state().player_paddle.pos.y,
            900.0 - PADDLE_HEIGHT - PLAYER_PADDLE_OFFSET
        );
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut clock = playing_clock(5);
        assert!(clock.toggle_pause());
        assert_eq!(clock.phase(), MatchPhase::Paused);
        assert!(!clock.ai().is_active());

        let frozen = clock.state().clone();
        for i in 0..10 {
            clock.tick(i as f64 * 100.0);
            clock.poll_ai(i as f64 * 100.0);
        }
        assert_eq!(clock.state(), &frozen);

        assert!(clock.toggle_pause());
        assert_eq!(clock.phase(), MatchPhase::Playing);
        assert!(clock.ai().is_active());
    }

    #[test]
    fn test_goal_scores_and_reserves_from_loser() {
        let mut clock = playing_clock(6);
        ball_about_to_pass_top(&mut clock);

        let events = clock.step();
        assert!(events.contains(&GameEvent::Scored(Side::Player)));
        assert_eq!(clock.state().player_score, 1);
        assert_eq!(clock.state().ai_score, 0);

        // AI conceded, so the AI serves: ball heads down from the top
        let ball = clock.state().ball;
        assert!(ball.vel.y > 0.0);
        assert_eq!(ball.speed, BALL_INITIAL_SPEED);
        assert!(ball.pos.y < 450.0);
    }

    #[test]
    fn test_winning_goal_ends_match() {
        let mut clock = playing_clock(7);
        clock.state.player_score = WINNING_SCORE - 1;
        clock.state.ai_score = 4;
        ball_about_to_pass_top(&mut clock);

        let events = clock.step();
        assert_eq!(
            events,
            vec![GameEvent::Scored(Side::Player), GameEvent::GameOver(Side::Player)]
        );
        assert_eq!(clock.phase(), MatchPhase::GameOver);
        assert_eq!(clock.state().winner, Some(Side::Player));
        assert_eq!(clock.state().player_score, WINNING_SCORE);
        assert_eq!(clock.state().ai_score, 4);
        assert!(!clock.ai().is_active());

        // Further frames are dormant
        let over = clock.state().clone();
        assert!(clock.tick(10_000.0).is_empty());
        assert_eq!(clock.state(), &over);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut clock = playing_clock(8);
        clock.state.ai_score = 5;
        clock.set_direction(Direction::Left);
        clock.step();

        clock.reset();
        let state = clock.state();
        assert_eq!(state.phase, MatchPhase::Idle);
        assert_eq!((state.player_score, state.ai_score), (0, 0));
        assert_eq!(state.winner, None);
        assert!((state.player_paddle.center_x() - 300.0).abs() < 1e-4);
        assert!((state.ai_paddle.center_x() - 300.0).abs() < 1e-4);
        assert_eq!(clock.direction(), Direction::Still);
        assert!(!clock.ai().is_active());
        assert!(!clock.poll_ai(1_000.0));
    }

    #[test]
    fn test_wall_bounce_event() {
        let mut clock = playing_clock(9);
        clock.state.ball.pos = Vec2::new(8.0, 450.0);
        clock.state.ball.vel = Vec2::new(-5.0, 3.0);

        let events = clock.step();
        assert_eq!(events, vec![GameEvent::WallBounce]);
        assert_eq!(clock.state().ball.vel.x, 5.0);
    }

    #[test]
    fn test_paddle_hit_event() {
        let mut clock = playing_clock(10);
        let paddle = clock.state().player_paddle;
        clock.state.ball.pos = Vec2::new(paddle.center_x(), paddle.pos.y - 8.0);
        clock.state.ball.vel = Vec2::new(0.0, 5.0);
        clock.state.ball.speed = 12.0;

        let events = clock.step();
        assert_eq!(events, vec![GameEvent::PaddleHit(Side::Player)]);
        assert!(clock.state().ball.vel.y < 0.0);
        assert_eq!(clock.state().ball.speed, 12.5);
    }

    #[test]
    fn test_resize_reclamps_paddles() {
        let mut clock = playing_clock(11);
        clock.set_direction(Direction::Right);
        for _ in 0..60 {
            clock.state.ball.pos = Vec2::new(100.0, 450.0);
            clock.step();
        }

        clock.set_viewport(Viewport::new(300.0, 500.0));
        let state = clock.state();
        assert_eq!(state.player_paddle.pos.x, 300.0 - PADDLE_WIDTH);
        assert_eq!(
            state.player_paddle.pos.y,
            500.0 - PADDLE_HEIGHT - PLAYER_PADDLE_OFFSET
        );
        assert!(state.ai_paddle.pos.x <= 300.0 - PADDLE_WIDTH);
    }

    #[test]
    fn test_same_seed_same_match() {
        let mut a = playing_clock(99_999);
        let mut b = playing_clock(99_999);

        for i in 0..600 {
            let now = i as f64 * 17.0;
            let dir = Direction::from_signum((i / 40) % 3 - 1);
            a.set_direction(dir);
            b.set_direction(dir);
            a.poll_ai(now);
            b.poll_ai(now);
            assert_eq!(a.tick(now), b.tick(now));
        }
        assert_eq!(a.state(), b.state());
        assert_eq!(a.ai().target_x(), b.ai().target_x());
    }
}
