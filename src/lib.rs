//! Ultra Ping Pong - A vertical Pong game against a reactive AI
//!
//! Core modules:
//! - `sim`: Simulation core (physics, AI, clock, input)
//! - `audio`: Fire-and-forget sound effects
//! - `hud`: Overlay/score view model for the host
//! - `share`: Score sharing (social composer, clipboard fallback)
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Persisted user preferences

pub mod audio;
pub mod hud;
pub mod platform;
pub mod settings;
pub mod share;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
///
/// Distances are CSS pixels, velocities are pixels per simulation tick.
pub mod consts {
    /// Fallback viewport when no rendering surface is available yet
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 600.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 900.0;

    /// Paddle defaults (horizontal paddles, vertical play field)
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Gap between the player paddle and the bottom edge
    pub const PLAYER_PADDLE_OFFSET: f32 = 30.0;
    /// The AI paddle sits flush with the top edge
    pub const AI_PADDLE_Y: f32 = 0.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 12.0;
    pub const BALL_INITIAL_SPEED: f32 = 9.0;
    pub const BALL_MAX_SPEED: f32 = 18.0;
    /// Added to the ball speed on every paddle hit
    pub const BALL_SPEED_INCREMENT: f32 = 0.5;
    /// Maximum bounce angle off a paddle (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Smallest velocity component allowed after a paddle bounce
    pub const MIN_BOUNCE_VELOCITY: f32 = 0.5;
    /// Maximum serve deviation from vertical (45 degrees)
    pub const MAX_SERVE_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
    /// Serve components below this magnitude are replaced...
    pub const MIN_SERVE_VELOCITY: f32 = 1.0;
    /// ...by this signed magnitude
    pub const SERVE_VELOCITY_FLOOR: f32 = 1.5;
    /// Gap left between a freshly served or bounced ball and the paddle
    pub const SEPARATION_GAP: f32 = 1.0;

    /// AI tuning
    pub const AI_REACTION_DELAY_MS: f64 = 80.0;
    pub const AI_POLL_INTERVAL_MS: i32 = 16;
    /// Width of the uniform noise band added to the AI target
    pub const AI_ERROR_MARGIN: f32 = 25.0;
    pub const AI_SPEED_MULTIPLIER: f32 = 0.85;
    /// The AI stops steering when this close to its target
    pub const AI_DEADBAND: f32 = 2.0;

    /// Scoring
    pub const WINNING_SCORE: u32 = 11;

    /// Simulation cadence
    pub const TARGET_FPS: f64 = 60.0;
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / TARGET_FPS;
}
