//! # Quizling Session Engine
//!
//! This library provides the client-side session synchronization engine for
//! a live multiplayer quiz. It owns the room, game, and leaderboard state,
//! reconciles it against real-time events pushed by the server, derives a
//! locally-ticking countdown for the active question, and sequences the
//! answer-submission protocol exactly once per question per participant.
//!
//! The engine is sans-IO: the embedding supplies the transport (a
//! [`channel::Channel`] implementation), the clock (a [`clock::Clock`]
//! implementation), and a once-per-second call to
//! [`controller::SessionController::tick`].

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use web_time::Duration;

pub mod channel;
pub mod clock;
pub mod constants;
pub mod controller;
pub mod countdown;
pub mod game;
pub mod leaderboard;
pub mod question;
pub mod report;
pub mod room;
pub mod room_code;
pub mod store;
pub mod submission;

use game::GameState;
use leaderboard::LeaderboardSnapshot;
use question::{AnswerOption, QuestionId, QuizId};
use report::AnswerReport;
use room::{ParticipantId, Room};
use room_code::RoomCode;

/// Events pushed by the server over the real-time channel
///
/// This enum represents every inbound message the session engine recognizes.
/// Dispatch is a single exhaustive match in the controller, so reordering
/// tolerance (full-entity replacement rather than incremental deltas) is an
/// explicit property of each handler rather than an accident of
/// registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerEvent {
    /// A room was created on behalf of this participant (session initiator)
    RoomCreated(Room),
    /// This participant joined a room that has not started yet
    RoomJoined(Room),
    /// This participant joined a room whose game is already in progress
    RoomJoinedInProgress {
        /// The authoritative room snapshot
        room: Room,
        /// The currently active question declaration
        game: GameState,
        /// The authoritative scores at the moment of joining
        leaderboard: LeaderboardSnapshot,
    },
    /// Another participant joined; carries the full updated room
    ParticipantJoined(Room),
    /// A participant left the room
    ParticipantLeft(ParticipantId),
    /// The server advanced to a new question
    QuestionAdvanced(GameState),
    /// The active question's answer window closed
    QuestionEnded(LeaderboardSnapshot),
    /// The game finished; carries the final per-answer report
    GameEnded(AnswerReport),
    /// An explicit error signaled by the server
    ChannelError(String),
}

impl ServerEvent {
    /// Parses a server event from its JSON wire representation
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the message is not a recognized
    /// event or its payload does not match the expected shape.
    pub fn from_message(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }
}

/// Remote operations invoked by the session engine
///
/// Each variant corresponds to one named server invocation. The engine
/// builds these values and hands them to the embedding's
/// [`channel::Channel`] for transmission; it never performs network I/O
/// itself.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Invocation {
    /// Join an existing room by its code
    JoinRoom {
        /// The room to join
        code: RoomCode,
        /// The joining participant
        participant_id: ParticipantId,
    },
    /// Create a new room backed by a quiz
    CreateRoom {
        /// The quiz the room will play
        quiz_id: QuizId,
        /// The creating participant (becomes the host)
        participant_id: ParticipantId,
    },
    /// Start the game in a waiting room (host only)
    StartGame {
        /// The room to start
        code: RoomCode,
    },
    /// Submit an answer for the active question
    SubmitAnswer {
        /// The room the answer belongs to
        code: RoomCode,
        /// The answering participant
        participant_id: ParticipantId,
        /// The question being answered
        question_id: QuestionId,
        /// The chosen option
        option: AnswerOption,
        /// Time taken to answer, capped at the question duration
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        elapsed: Duration,
    },
}

impl Invocation {
    /// Converts the invocation to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_to_message() {
        let invocation = Invocation::StartGame {
            code: "123456".parse().unwrap(),
        };
        let json_str = invocation.to_message();

        assert!(json_str.contains("StartGame"));
        assert!(json_str.contains("123456"));
    }

    #[test]
    fn test_submit_answer_elapsed_as_milliseconds() {
        let invocation = Invocation::SubmitAnswer {
            code: "123456".parse().unwrap(),
            participant_id: ParticipantId::new(),
            question_id: QuestionId::new(),
            option: AnswerOption::B,
            elapsed: Duration::from_millis(4_200),
        };
        let json_str = invocation.to_message();

        assert!(json_str.contains("\"elapsed\":4200"));
        assert!(json_str.contains("\"option\":\"B\""));
    }

    #[test]
    fn test_server_event_from_message() {
        let json = "{\"ChannelError\":\"room not found\"}";
        let event = ServerEvent::from_message(json).unwrap();

        assert!(matches!(event, ServerEvent::ChannelError(msg) if msg == "room not found"));
    }

    #[test]
    fn test_server_event_from_message_unknown_event() {
        let json = "{\"SomethingElse\":4}";
        assert!(ServerEvent::from_message(json).is_err());
    }

    #[test]
    fn test_server_event_participant_left_payload() {
        let id = ParticipantId::new();
        let json = format!("{{\"ParticipantLeft\":\"{id}\"}}");
        let event = ServerEvent::from_message(&json).unwrap();

        assert!(matches!(event, ServerEvent::ParticipantLeft(left) if left == id));
    }
}
