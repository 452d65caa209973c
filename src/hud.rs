//! HUD view model
//!
//! What the overlay and controls should show for a snapshot. The host
//! copies it into the DOM; keeping it here lets it be tested natively.

use crate::sim::{GameState, MatchPhase, Side};

/// Hint shown while a match is running
pub const PAUSE_HINT: &str = "Press SPACE or double tap to pause";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub player_score: String,
    pub ai_score: String,
    pub start_overlay: bool,
    pub pause_overlay: bool,
    pub game_over_overlay: bool,
    /// On-screen pause button and the pause hint
    pub pause_control: bool,
    /// Game over title and final score line, once a winner exists
    pub result: Option<(&'static str, String)>,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        let result = state.winner.map(|winner| {
            let title = match winner {
                Side::Player => "VICTORY!",
                Side::Ai => "DEFEAT!",
            };
            (
                title,
                format!("Final Score: {} - {}", state.player_score, state.ai_score),
            )
        });

        Self {
            player_score: state.player_score.to_string(),
            ai_score: state.ai_score.to_string(),
            start_overlay: state.phase == MatchPhase::Idle,
            pause_overlay: state.phase == MatchPhase::Paused,
            game_over_overlay: state.phase == MatchPhase::GameOver,
            pause_control: state.phase == MatchPhase::Playing,
            result,
        }
    }
}
