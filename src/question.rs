//! Quiz question types
//!
//! This module defines the question entity and its identifiers. A question
//! carries four answer options keyed by letter; because the option set is an
//! enum, a submitted answer is one of the question's valid options by
//! construction.

use std::{fmt::Display, str::FromStr};

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a quiz
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuizId(Uuid);

impl QuizId {
    /// Creates a new random quiz ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuizId {
    /// Creates a new random quiz ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl Display for QuizId {
    /// Formats the ID as a UUID string
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for QuizId {
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

/// A unique identifier for a question within a quiz
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Creates a new random question ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuestionId {
    /// Creates a new random question ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl Display for QuestionId {
    /// Formats the ID as a UUID string
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for QuestionId {
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

/// One of the four answer options of a multiple choice question
///
/// Options serialize as their letter, matching how participants see and
/// discuss them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Enum,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum AnswerOption {
    /// The first option
    A,
    /// The second option
    B,
    /// The third option
    C,
    /// The fourth option
    D,
}

/// A multiple choice question
///
/// Questions are authored ahead of a session and arrive inside the room
/// snapshot; the engine treats them as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier of this question
    pub id: QuestionId,
    /// The quiz this question belongs to
    pub quiz_id: QuizId,
    /// The question text shown to participants
    pub content: String,
    /// The answer options keyed by letter
    pub options: EnumMap<AnswerOption, String>,
    /// The letter of the correct option
    pub correct_option: AnswerOption,
}

impl Question {
    /// Returns the text of the given answer option
    pub fn option_text(&self, option: AnswerOption) -> &str {
        &self.options[option]
    }

    /// Returns whether the given option is the correct one
    pub fn is_correct(&self, option: AnswerOption) -> bool {
        self.correct_option == option
    }
}
