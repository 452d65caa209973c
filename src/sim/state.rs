//! Game state and core simulation types
//!
//! The clock owns one `GameState`; everything else sees it read-only.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One of the two competitors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Human player, defends the bottom edge
    Player,
    /// Computer opponent, defends the top edge
    Ai,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Vertical direction a ball travels when leaving this side's paddle
    /// (-1 = up, +1 = down)
    pub fn outward(self) -> f32 {
        match self {
            Side::Player => -1.0,
            Side::Ai => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Ai => "ai",
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for the start command
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Gameplay suspended, resumable
    Paused,
    /// A side reached the winning score
    GameOver,
}

/// Play field dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    /// Build a viewport, substituting the default for any dimension that is
    /// non-finite or not positive
    pub fn new(width: f32, height: f32) -> Self {
        let fallback = Self::default();
        let sane = |v: f32, default: f32| if v.is_finite() && v > 0.0 { v } else { default };
        Self {
            width: sane(width, fallback.width),
            height: sane(height, fallback.height),
        }
    }

    /// Rightmost legal x for a paddle of the given width
    #[inline]
    pub fn max_paddle_x(&self, paddle_width: f32) -> f32 {
        (self.width - paddle_width).max(0.0)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}

/// The ball. `pos` is the center; the collision shape is a square of side `size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Cached speed, raised on paddle hits and reset on every serve
    pub speed: f32,
}

impl Ball {
    #[inline]
    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// Euler step: one tick of travel
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

/// A horizontal paddle. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// A paddle centered horizontally on its home edge
    pub fn new(side: Side, viewport: &Viewport) -> Self {
        let mut paddle = Self {
            side,
            pos: Vec2::ZERO,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        };
        paddle.recenter(viewport);
        paddle
    }

    /// Y coordinate of the paddle's top edge when resting on its home edge
    pub fn home_y(side: Side, viewport: &Viewport) -> f32 {
        match side {
            Side::Player => (viewport.height - PADDLE_HEIGHT - PLAYER_PADDLE_OFFSET).max(0.0),
            Side::Ai => AI_PADDLE_Y,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Move to `x`, clamped so the paddle stays fully inside the viewport,
    /// and re-pin y to the home edge
    pub fn set_x(&mut self, x: f32, viewport: &Viewport) {
        let x = if x.is_finite() { x } else { self.pos.x };
        self.pos.x = x.clamp(0.0, viewport.max_paddle_x(self.width));
        self.pos.y = Self::home_y(self.side, viewport);
    }

    /// Back to the horizontal center of the home edge
    pub fn recenter(&mut self, viewport: &Viewport) {
        self.set_x(viewport.center_x() - self.width / 2.0, viewport);
    }
}

/// Something that happened during a tick, for audio and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the given side's paddle
    PaddleHit(Side),
    /// Ball bounced off the left or right wall
    WallBounce,
    /// The given side scored a point
    Scored(Side),
    /// The given side reached the winning score
    GameOver(Side),
}

/// Complete authoritative match state, handed to the presentation layer
/// as a read-only snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub ball: Ball,
    pub player_paddle: Paddle,
    pub ai_paddle: Paddle,
    pub player_score: u32,
    pub ai_score: u32,
    pub phase: MatchPhase,
    /// Set only once the match is over
    pub winner: Option<Side>,
}

impl GameState {
    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_score,
            Side::Ai => self.ai_score,
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Player => &self.player_paddle,
            Side::Ai => &self.ai_paddle,
        }
    }

    /// Add one point and return the new total
    pub fn award_point(&mut self, side: Side) -> u32 {
        let score = match side {
            Side::Player => &mut self.player_score,
            Side::Ai => &mut self.ai_score,
        };
        *score += 1;
        *score
    }
}
