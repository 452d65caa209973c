//! Input mapping: keys, pointer and touch to paddle commands
//!
//! Raw events become a signed direction for the player paddle, or a
//! start/pause toggle. Edge-triggered, last write wins.

use serde::{Deserialize, Serialize};

use super::state::MatchPhase;

/// Horizontal direction for the player paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Still,
    Right,
}

impl Direction {
    /// Signed unit value (-1, 0, 1)
    pub fn signum(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Still => 0.0,
            Direction::Right => 1.0,
        }
    }

    pub fn from_signum(v: i32) -> Self {
        match v.signum() {
            -1 => Direction::Left,
            1 => Direction::Right,
            _ => Direction::Still,
        }
    }
}

/// Command produced by an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    SetDirection(Direction),
    /// Start when idle/over, otherwise toggle pause
    StartOrPause,
}

/// Max gap between taps of a double tap (ms)
pub const DOUBLE_TAP_WINDOW_MS: f64 = 300.0;
/// Max distance between taps of a double tap (px, per axis)
pub const DOUBLE_TAP_RADIUS: f32 = 50.0;

/// Translates raw input events into `InputAction`s
///
/// Holds no direction of its own: the clock keeps the one direction
/// signal and the host forwards every `SetDirection` to it.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    last_tap: Option<(f64, f32, f32)>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key press (`KeyboardEvent.key` values)
    pub fn key_down(&self, key: &str) -> Option<InputAction> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(InputAction::SetDirection(Direction::Left)),
            "ArrowRight" | "d" | "D" => Some(InputAction::SetDirection(Direction::Right)),
            " " | "Space" | "Spacebar" => Some(InputAction::StartOrPause),
            _ => None,
        }
    }

    /// Key release. Releasing any directional key stops the paddle.
    pub fn key_up(&self, key: &str) -> Option<InputAction> {
        match key {
            "ArrowLeft" | "a" | "A" | "ArrowRight" | "d" | "D" => {
                Some(InputAction::SetDirection(Direction::Still))
            }
            _ => None,
        }
    }

    /// Pointer held at `x` on a surface centered at `center_x`
    pub fn pointer_down(&self, x: f32, center_x: f32) -> InputAction {
        if x < center_x {
            InputAction::SetDirection(Direction::Left)
        } else {
            InputAction::SetDirection(Direction::Right)
        }
    }

    /// Pointer/touch released
    pub fn pointer_up(&self) -> InputAction {
        InputAction::SetDirection(Direction::Still)
    }

    /// Press on the play field. Starts a match when none is running,
    /// steers while playing, and is ignored while paused.
    pub fn press(&self, phase: MatchPhase, x: f32, center_x: f32) -> Option<InputAction> {
        match phase {
            MatchPhase::Idle | MatchPhase::GameOver => Some(InputAction::StartOrPause),
            MatchPhase::Playing => Some(self.pointer_down(x, center_x)),
            MatchPhase::Paused => None,
        }
    }

    /// A tap at (`x`, `y`). Returns true when it completes a double tap;
    /// the tap history is cleared so a third tap starts over.
    pub fn tap(&mut self, now_ms: f64, x: f32, y: f32) -> bool {
        if let Some((t, lx, ly)) = self.last_tap {
            if now_ms - t < DOUBLE_TAP_WINDOW_MS
                && (x - lx).abs() < DOUBLE_TAP_RADIUS
                && (y - ly).abs() < DOUBLE_TAP_RADIUS
            {
                self.last_tap = None;
                return true;
            }
        }
        self.last_tap = Some((now_ms, x, y));
        false
    }

    /// Drop tap history
    pub fn clear(&mut self) {
        self.last_tap = None;
    }
}
