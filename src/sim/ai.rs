//! Reactive AI opponent for the top paddle
//!
//! The AI re-reads the ball on its own polling timer, but only after its
//! reaction delay has elapsed and only while the ball is heading toward the
//! top edge. A receding ball leaves the old target in place. Random noise
//! on every new target is what makes the AI beatable.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Ball, Paddle, Viewport};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct AiController {
    /// Horizontal coordinate the paddle center steers toward
    target_x: f32,
    /// Time of the last accepted sample (ms)
    last_sample_ms: Option<f64>,
    /// Cleared on reset/game over so stray timer callbacks do nothing
    active: bool,
    rng: Pcg32,
}

impl AiController {
    pub fn new(seed: u64, viewport: &Viewport) -> Self {
        Self {
            target_x: viewport.center_x(),
            last_sample_ms: None,
            active: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn target_x(&self) -> f32 {
        self.target_x
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin sampling (match started or resumed)
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stop sampling; `sample` becomes a no-op until reactivated
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Forget the target and stop sampling
    pub fn reset(&mut self, viewport: &Viewport) {
        self.target_x = viewport.center_x();
        self.last_sample_ms = None;
        self.active = false;
    }

    /// Poll the ball. Called on the AI's own interval, finer than the
    /// simulation tick. Returns true if the target moved.
    pub fn sample(&mut self, ball: &Ball, now_ms: f64) -> bool {
        if !self.active {
            return false;
        }
        if let Some(last) = self.last_sample_ms {
            if now_ms - last <= AI_REACTION_DELAY_MS {
                return false;
            }
        }
        self.last_sample_ms = Some(now_ms);

        // Only track a ball coming at us (upward on screen)
        if ball.vel.y >= 0.0 || !ball.pos.x.is_finite() {
            return false;
        }

        let error = (self.rng.random::<f32>() - 0.5) * AI_ERROR_MARGIN;
        let target = ball.pos.x + error;
        let changed = target != self.target_x;
        self.target_x = target;
        changed
    }

    /// Next x for the paddle: one capped step toward the target, or stay
    /// put inside the deadband. Clamped to the viewport.
    pub fn steer(&self, paddle: &Paddle, viewport: &Viewport) -> f32 {
        let diff = self.target_x - paddle.center_x();
        if diff.abs() < AI_DEADBAND {
            return paddle.pos.x;
        }

        let step = PADDLE_SPEED * AI_SPEED_MULTIPLIER;
        let x = paddle.pos.x + step.copysign(diff);
        x.clamp(0.0, viewport.max_paddle_x(paddle.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Side;
    use glam::Vec2;

    fn ball(x: f32, vy: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, 400.0),
            vel: Vec2::new(3.0, vy),
            size: BALL_SIZE,
            speed: BALL_INITIAL_SPEED,
        }
    }

    fn active_ai() -> (AiController, Viewport) {
        let vp = Viewport::new(600.0, 900.0);
        let mut ai = AiController::new(42, &vp);
        ai.activate();
        (ai, vp)
    }

    #[test]
    fn test_tracks_approaching_ball() {
        let (mut ai, _vp) = active_ai();

        assert!(ai.sample(&ball(100.0, -5.0), 0.0));
        let first = ai.target_x();
        assert!((first - 100.0).abs() <= AI_ERROR_MARGIN / 2.0);

        assert!(ai.sample(&ball(450.0, -5.0), 100.0));
        let second = ai.target_x();
        assert!((second - 450.0).abs() <= AI_ERROR_MARGIN / 2.0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_ignores_receding_ball() {
        let (mut ai, vp) = active_ai();
        let start = ai.target_x();
        assert_eq!(start, vp.center_x());

        for (i, x) in [50.0, 200.0, 550.0].into_iter().enumerate() {
            assert!(!ai.sample(&ball(x, 5.0), i as f64 * 100.0));
            assert_eq!(ai.target_x(), start);
        }
    }

    #[test]
    fn test_reaction_delay_gates_samples() {
        let (mut ai, _vp) = active_ai();
        assert!(ai.sample(&ball(100.0, -5.0), 1_000.0));
        let target = ai.target_x();

        // Inside the delay window nothing changes
        assert!(!ai.sample(&ball(500.0, -5.0), 1_000.0 + AI_REACTION_DELAY_MS / 2.0));
        assert_eq!(ai.target_x(), target);

        // After it, the new position is picked up
        assert!(ai.sample(&ball(500.0, -5.0), 1_000.0 + AI_REACTION_DELAY_MS + 1.0));
        assert!((ai.target_x() - 500.0).abs() <= AI_ERROR_MARGIN / 2.0);
    }

    #[test]
    fn test_inactive_does_not_sample() {
        let vp = Viewport::new(600.0, 900.0);
        let mut ai = AiController::new(1, &vp);
        assert!(!ai.sample(&ball(100.0, -5.0), 0.0));
        assert_eq!(ai.target_x(), 300.0);

        ai.activate();
        ai.sample(&ball(100.0, -5.0), 0.0);
        ai.reset(&vp);
        assert!(!ai.is_active());
        assert_eq!(ai.target_x(), 300.0);
    }

    #[test]
    fn test_steer_steps_toward_target() {
        let (mut ai, vp) = active_ai();
        let paddle = Paddle::new(Side::Ai, &vp);
        ai.sample(&ball(50.0, -5.0), 0.0);

        let x = ai.steer(&paddle, &vp);
        let step = PADDLE_SPEED * AI_SPEED_MULTIPLIER;
        assert!((x - (paddle.pos.x - step)).abs() < 1e-4);
    }

    #[test]
    fn test_steer_deadband_holds_position() {
        let (ai, vp) = active_ai();
        // Target starts at center, paddle starts centered
        let paddle = Paddle::new(Side::Ai, &vp);
        assert_eq!(ai.steer(&paddle, &vp), paddle.pos.x);
    }

    #[test]
    fn test_steer_clamps_to_viewport() {
        let (mut ai, vp) = active_ai();
        let mut paddle = Paddle::new(Side::Ai, &vp);
        paddle.set_x(1.0, &vp);
        ai.sample(&ball(0.0, -5.0), 0.0);
        ai.target_x = -100.0;

        assert_eq!(ai.steer(&paddle, &vp), 0.0);
    }
}
