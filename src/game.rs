//! Active question declaration
//!
//! This module defines the server's statement of which question is currently
//! active. A new snapshot arrives on every question advance and fully
//! replaces the previous one; the engine never derives question transitions
//! from its own timer.

use serde::{Deserialize, Serialize};
use web_time::SystemTime;

use crate::room_code::RoomCode;

/// Lifecycle status of the running game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Questions are being played
    InProgress,
    /// The game has finished
    Completed,
}

/// The server's declaration of the currently active question
///
/// Within a session, `current_question_index` is monotonically
/// non-decreasing and always less than `total_questions`; the controller
/// discards snapshots that would violate this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// The room this game belongs to
    pub code: RoomCode,
    /// Ordinal position of the active question
    pub current_question_index: usize,
    /// Total number of questions in the session
    pub total_questions: usize,
    /// Nominal start instant of the active question
    pub started_at: SystemTime,
    /// Lifecycle status of the game
    pub status: GameStatus,
}

impl GameState {
    /// Returns whether the active question is the last one
    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.total_questions
    }
}
