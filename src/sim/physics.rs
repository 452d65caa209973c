//! Collision detection and response for the vertical field
//!
//! Pure functions over ball/paddle geometry: overlap tests, paddle bounce
//! angles, side walls, goals and serves. The clock applies them in a fixed
//! order each tick.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, Paddle, Side, Viewport};
use crate::consts::*;

/// What the ball touched during collision resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Paddle(Side),
    Wall,
}

/// AABB overlap between the ball's bounding square and a paddle
pub fn collides(ball: &Ball, paddle: &Paddle) -> bool {
    let half = ball.half_size();
    ball.pos.x - half < paddle.pos.x + paddle.width
        && ball.pos.x + half > paddle.pos.x
        && ball.pos.y - half < paddle.pos.y + paddle.height
        && ball.pos.y + half > paddle.pos.y
}

/// Speed after one more paddle hit
#[inline]
pub fn next_speed(speed: f32) -> f32 {
    (speed + BALL_SPEED_INCREMENT).min(BALL_MAX_SPEED)
}

/// Outgoing velocity for a ball striking `paddle`
///
/// The hit offset from the paddle center maps linearly onto
/// [-MAX_BOUNCE_ANGLE, MAX_BOUNCE_ANGLE]. The vertical sign depends only on
/// which edge the paddle defends, never on the incoming velocity.
pub fn bounce(ball: &Ball, paddle: &Paddle) -> Vec2 {
    let half_width = (paddle.width / 2.0).max(f32::EPSILON);
    let relative = (paddle.center_x() - ball.pos.x) / half_width;
    let relative = if relative.is_finite() {
        relative.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let angle = relative * MAX_BOUNCE_ANGLE;
    let speed = next_speed(ball.speed);

    let raw_vx = speed * angle.sin();
    let vx = enforce_floor(raw_vx, signum_or_neg(raw_vx), MIN_BOUNCE_VELOCITY, MIN_BOUNCE_VELOCITY);
    // Keep |v| == speed after flooring vx
    let vy = (speed * speed - vx * vx)
        .max(MIN_BOUNCE_VELOCITY * MIN_BOUNCE_VELOCITY)
        .sqrt();

    Vec2::new(vx, paddle.side.outward() * vy)
}

/// Apply a paddle bounce: new velocity, raised speed, and the ball moved
/// clear of the paddle face so it cannot hit again next tick
pub fn resolve_paddle_hit(ball: &mut Ball, paddle: &Paddle) {
    ball.vel = bounce(ball, paddle);
    ball.speed = next_speed(ball.speed);
    ball.pos.y = match paddle.side {
        Side::Player => paddle.pos.y - ball.half_size() - SEPARATION_GAP,
        Side::Ai => paddle.pos.y + paddle.height + ball.half_size() + SEPARATION_GAP,
    };
}

/// Reflect off the left/right walls. Returns true on contact.
pub fn resolve_wall(ball: &mut Ball, viewport: &Viewport) -> bool {
    let half = ball.half_size();
    if ball.pos.x - half <= 0.0 {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = half;
        true
    } else if ball.pos.x + half >= viewport.width {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = viewport.width - half;
        true
    } else {
        false
    }
}

/// Resolve at most one contact for this tick
///
/// Paddles win over walls: once a paddle bounce is applied the wall test is
/// skipped, so velocity is never inverted twice in one step.
pub fn resolve_collisions(
    ball: &mut Ball,
    player: &Paddle,
    ai: &Paddle,
    viewport: &Viewport,
) -> Option<Contact> {
    for paddle in [player, ai] {
        if collides(ball, paddle) {
            resolve_paddle_hit(ball, paddle);
            return Some(Contact::Paddle(paddle.side));
        }
    }

    resolve_wall(ball, viewport).then_some(Contact::Wall)
}

/// Which side scored, if the ball's leading edge reached the top or bottom
///
/// Top edge scores for the player (the AI missed), bottom edge for the AI.
pub fn goal(ball: &Ball, viewport: &Viewport) -> Option<Side> {
    let half = ball.half_size();
    if ball.pos.y - half <= 0.0 {
        Some(Side::Player)
    } else if ball.pos.y + half >= viewport.height {
        Some(Side::Ai)
    } else {
        None
    }
}

/// A fresh ball leaving the serving side's paddle
///
/// The ball starts at horizontal center just off the paddle face and heads
/// away from it within MAX_SERVE_ANGLE of vertical, horizontal sign random.
/// A `None` side is picked 50/50.
pub fn serve<R: Rng + ?Sized>(side: Option<Side>, viewport: &Viewport, rng: &mut R) -> Ball {
    let side = side.unwrap_or_else(|| {
        if rng.random_bool(0.5) {
            Side::Player
        } else {
            Side::Ai
        }
    });

    let half = BALL_SIZE / 2.0;
    let y = match side {
        Side::Player => Paddle::home_y(side, viewport) - half - SEPARATION_GAP,
        Side::Ai => Paddle::home_y(side, viewport) + PADDLE_HEIGHT + half + SEPARATION_GAP,
    };

    let angle = rng.random_range(0.0..=MAX_SERVE_ANGLE);
    let h_sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let v_sign = side.outward();

    let vx = h_sign * BALL_INITIAL_SPEED * angle.sin();
    let vy = v_sign * BALL_INITIAL_SPEED * angle.cos();

    Ball {
        pos: Vec2::new(viewport.center_x(), y),
        vel: Vec2::new(
            enforce_floor(vx, h_sign, MIN_SERVE_VELOCITY, SERVE_VELOCITY_FLOOR),
            enforce_floor(vy, v_sign, MIN_SERVE_VELOCITY, SERVE_VELOCITY_FLOOR),
        ),
        size: BALL_SIZE,
        speed: BALL_INITIAL_SPEED,
    }
}

/// Replace a component smaller than `threshold` with `sign * floor`
#[inline]
fn enforce_floor(v: f32, sign: f32, threshold: f32, floor: f32) -> f32 {
    if v.abs() < threshold { sign * floor } else { v }
}

#[inline]
fn signum_or_neg(v: f32) -> f32 {
    if v > 0.0 { 1.0 } else { -1.0 }
}
