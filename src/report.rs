//! Final answer report
//!
//! This module defines the terminal payload the server sends when a game
//! ends: every answer recorded during the session, with correctness, points,
//! and time taken. The per-participant grouping is computed once on first
//! access and cached, since the results screen reads it repeatedly.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use web_time::Duration;

use crate::{
    question::{AnswerOption, QuestionId},
    room::ParticipantId,
    room_code::RoomCode,
};

/// One recorded answer from the finished game
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The participant who answered
    pub participant_id: ParticipantId,
    /// The question that was answered
    pub question_id: QuestionId,
    /// The option the participant chose
    pub selected_option: AnswerOption,
    /// Whether the chosen option was correct
    pub correct: bool,
    /// Points awarded for this answer
    pub points: u64,
    /// Time taken to answer, in milliseconds on the wire
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub time_taken: Duration,
}

/// The complete answer report of a finished game
///
/// Receiving this report is a terminal state: no further countdown ticking
/// and no further submissions are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerReport {
    /// The room the report belongs to
    pub code: RoomCode,
    /// Every answer recorded during the game
    pub answers: Vec<AnswerRecord>,

    /// Answers grouped by participant (computed once when needed)
    #[serde(skip)]
    by_participant: once_cell_serde::sync::OnceCell<HashMap<ParticipantId, Vec<AnswerRecord>>>,
}

impl AnswerReport {
    /// Creates a report from its room code and answer records
    pub fn new(code: RoomCode, answers: Vec<AnswerRecord>) -> Self {
        Self {
            code,
            answers,
            by_participant: once_cell_serde::sync::OnceCell::new(),
        }
    }

    /// Gets or computes the per-participant grouping with caching
    fn by_participant(&self) -> &HashMap<ParticipantId, Vec<AnswerRecord>> {
        self.by_participant.get_or_init(|| {
            self.answers
                .iter()
                .map(|record| (record.participant_id, record.clone()))
                .into_group_map()
        })
    }

    /// Returns the answers of a specific participant
    ///
    /// Answers keep their recorded order. Participants with no recorded
    /// answers get an empty slice.
    pub fn answers_for(&self, participant_id: ParticipantId) -> &[AnswerRecord] {
        self.by_participant()
            .get(&participant_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Computes a participant's accuracy as a rounded percentage
    ///
    /// Accuracy is the share of the session's questions the participant
    /// answered correctly; unanswered questions count against it.
    pub fn accuracy(&self, participant_id: ParticipantId, total_questions: usize) -> u8 {
        if total_questions == 0 {
            return 0;
        }
        let correct = self
            .answers_for(participant_id)
            .iter()
            .filter(|record| record.correct)
            .count();
        ((correct as f64 / total_questions as f64) * 100.0).round() as u8
    }
}
