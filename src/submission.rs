//! Answer submission protocol
//!
//! This module enforces at-most-one submission per participant per question
//! and builds the submit invocation with the clamped elapsed-time
//! measurement. The gate only closes after a successful send, so a failed
//! send leaves the participant free to retry while time remains; the
//! protocol itself never retries.

use thiserror::Error;
use tracing::debug;
use web_time::Duration;

use crate::{
    Invocation,
    question::{AnswerOption, Question},
    room::ParticipantId,
    room_code::RoomCode,
};

/// Errors rejected locally before any network call
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An answer was already submitted for this question
    #[error("answer already submitted for this question")]
    AlreadySubmitted,
    /// The answer window has closed
    #[error("time has expired for this question")]
    TimeExpired,
    /// No question is currently active
    #[error("no active question")]
    NoActiveQuestion,
    /// No option has been selected
    #[error("no answer selected")]
    NoSelection,
}

/// Per-question selection and submission gate
///
/// Both fields are reset whenever a new question arrives; `has_submitted`
/// flips only after the controller confirms a successful send.
#[derive(Debug, Default)]
pub struct Submission {
    /// The option tentatively chosen for the active question
    selected: Option<AnswerOption>,
    /// Whether an answer has been successfully submitted
    has_submitted: bool,
}

impl Submission {
    /// Creates a submission state with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a tentative answer choice
    ///
    /// Ignored once an answer has been submitted; the locked choice stays
    /// visible until the next question.
    pub fn select(&mut self, option: AnswerOption) {
        if !self.has_submitted {
            self.selected = Some(option);
        }
    }

    /// Resets selection and gate for a new question
    pub fn reset(&mut self) {
        self.selected = None;
        self.has_submitted = false;
    }

    /// Returns the tentatively chosen option
    pub fn selected(&self) -> Option<AnswerOption> {
        self.selected
    }

    /// Returns whether an answer has been submitted for this question
    pub fn has_submitted(&self) -> bool {
        self.has_submitted
    }

    /// Marks the submission as sent after a successful round-trip
    pub fn mark_submitted(&mut self) {
        self.has_submitted = true;
    }

    /// Builds the submit invocation after checking local preconditions
    ///
    /// Preconditions are checked in order: not already submitted, time
    /// remaining, an active question present, and a selection made. The
    /// caller sends the returned invocation and flips the gate via
    /// [`Submission::mark_submitted`] only on success.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition; no network call is made in
    /// that case.
    pub fn submit(
        &self,
        code: RoomCode,
        participant_id: ParticipantId,
        question: Option<&Question>,
        time_remaining: u64,
        elapsed: Duration,
    ) -> Result<Invocation, Error> {
        if self.has_submitted {
            return Err(Error::AlreadySubmitted);
        }
        if time_remaining == 0 {
            return Err(Error::TimeExpired);
        }
        let question = question.ok_or(Error::NoActiveQuestion)?;
        let option = self.selected.ok_or(Error::NoSelection)?;

        debug!(%option, ?elapsed, question = %question.id, "submitting answer");

        Ok(Invocation::SubmitAnswer {
            code,
            participant_id,
            question_id: question.id,
            option,
            elapsed,
        })
    }
}
