//! Room and participant entities
//!
//! This module defines the room snapshot the server broadcasts and the
//! participants inside it. Rooms are replaced wholesale on every
//! authoritative snapshot; the only client-side edits are targeted
//! participant additions and removals, applied optimistically ahead of the
//! next snapshot.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay, skip_serializing_none};
use uuid::Uuid;
use web_time::SystemTime;

use crate::{
    question::{Question, QuizId},
    room_code::RoomCode,
};

/// A unique identifier for a participant
///
/// Participant identity comes from the embedding's authentication layer and
/// persists across the whole session.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Creates a new random participant ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    /// Creates a new random participant ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ParticipantId {
    /// Formats the ID as a UUID string
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ParticipantId {
    type Err = uuid::Error;

    /// Parses an ID from a UUID string
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A participant in a quiz room
///
/// Participants are added via join events and removed via leave events;
/// they are never mutated otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier of the participant
    pub id: ParticipantId,
    /// Display name shown on rosters and leaderboards
    pub name: String,
    /// When the participant joined the room
    pub joined_at: SystemTime,
}

/// Lifecycle status of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    /// Waiting for the host to start the game
    Waiting,
    /// The game is running
    InProgress,
    /// The game has finished
    Completed,
}

/// A joinable session instance identified by a short code
///
/// The room holds the fixed question set and the participant roster. The
/// question list is immutable once the room is received; `started_at` is
/// set only when the status transitions to [`RoomStatus::InProgress`].
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// The short join code identifying this room
    pub code: RoomCode,
    /// The quiz this room plays
    pub quiz_id: QuizId,
    /// The participant hosting the session
    pub host_id: ParticipantId,
    /// The ordered question set, fixed for the session
    pub questions: Vec<Question>,
    /// The current participant roster
    pub participants: Vec<Participant>,
    /// Lifecycle status of the room
    pub status: RoomStatus,
    /// When the room was created
    pub created_at: SystemTime,
    /// When the game started, if it has
    pub started_at: Option<SystemTime>,
}

impl Room {
    /// Returns whether the given participant is the host
    pub fn is_host(&self, id: ParticipantId) -> bool {
        self.host_id == id
    }

    /// Finds a participant by ID
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Returns the question at the given ordinal position
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}
