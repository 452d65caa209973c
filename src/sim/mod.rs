//! Simulation module
//!
//! All gameplay logic lives here. It has no rendering or platform
//! dependencies:
//! - Fixed timestep only
//! - Seeded RNG only
//! - One owner (`GameClock`) mutates state; everyone else reads snapshots

pub mod ai;
pub mod clock;
pub mod input;
pub mod physics;
pub mod state;

pub use ai::AiController;
pub use clock::GameClock;
pub use input::{Direction, InputAction, InputController};
pub use physics::{Contact, bounce, collides, goal, serve};
pub use state::{Ball, GameEvent, GameState, MatchPhase, Paddle, Side, Viewport};
