//! Session controller and orchestration
//!
//! This module ties the engine together: it dispatches inbound server
//! events through a single exhaustive match, drives the state store and the
//! countdown, guards the user operations (join, create, start, select,
//! submit), and exposes the reconciled view to the presentation layer.
//!
//! Handlers run to completion and tolerate events arriving in any order by
//! replacing entities wholesale rather than applying deltas. Dropping the
//! controller is teardown; no callback can mutate state afterwards because
//! nothing else owns it.

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use thiserror::Error;
use tracing::{debug, warn};
use web_time::Duration;

use crate::{
    Invocation, ServerEvent,
    channel::{self, Channel},
    clock::Clock,
    constants,
    countdown::Countdown,
    game::GameState,
    leaderboard::{LeaderboardSnapshot, Standing},
    question::{AnswerOption, Question, QuizId},
    report::{AnswerRecord, AnswerReport},
    room::{ParticipantId, Room},
    room_code::RoomCode,
    store::SessionStore,
    submission::{self, Submission},
};

/// Validates that the configured question duration is within bounds
fn validate_question_duration(val: &Duration) -> garde::Result {
    let bounds = constants::session::MIN_QUESTION_DURATION
        ..=constants::session::MAX_QUESTION_DURATION;
    if bounds.contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "question_duration is outside of the bounds [{},{}]",
            constants::session::MIN_QUESTION_DURATION,
            constants::session::MAX_QUESTION_DURATION,
        )))
    }
}

/// Tunable configuration of a session
///
/// The one tunable is the per-question duration; it defaults to the fixed
/// duration the quiz domain uses and is validated at controller
/// construction.
#[serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct SessionOptions {
    /// Duration participants have to answer each question
    #[garde(custom(|v, _| validate_question_duration(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    question_duration: Duration,
}

impl Default for SessionOptions {
    /// Defaults to the fixed 15-second question duration
    fn default() -> Self {
        Self {
            question_duration: Duration::from_secs(
                constants::session::QUESTION_DURATION_SECONDS,
            ),
        }
    }
}

impl SessionOptions {
    /// Returns the configured per-question duration
    pub fn question_duration(&self) -> Duration {
        self.question_duration
    }
}

/// The phase of the session as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SessionPhase {
    /// No room yet; joining or creating is possible
    Idle,
    /// In a room, waiting for the host to start
    Waiting,
    /// A question is active
    InProgress,
    /// The game has ended; the final report is available
    Ended,
}

/// Errors returned by the controller's user operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A join or create request is already awaiting its acknowledgment
    #[error("a join request is already pending")]
    JoinPending,
    /// A start request is already awaiting its acknowledgment
    #[error("a start request is already pending")]
    StartPending,
    /// No room has been joined or created
    #[error("no room")]
    NoRoom,
    /// Only the host may start the game
    #[error("only the host can start the game")]
    NotHost,
    /// The game can only start from the waiting phase
    #[error("the game is not in the waiting phase")]
    NotWaiting,
    /// The room has no participants to play with
    #[error("the room has no participants")]
    EmptyRoom,
    /// A submission precondition was violated
    #[error(transparent)]
    Submission(#[from] submission::Error),
    /// The channel failed to deliver the invocation
    #[error(transparent)]
    Channel(#[from] channel::Error),
}

/// The session synchronization engine
///
/// One controller instance exists per mounted session view. It owns the
/// state store, the countdown, and the submission gate; the embedding feeds
/// it inbound events, a once-per-second tick, and user actions, and reads
/// the reconciled view back through the accessor methods.
#[derive(Debug)]
pub struct SessionController {
    /// The authenticated participant this controller acts for
    identity: ParticipantId,
    /// Validated session configuration
    options: SessionOptions,
    /// Canonical session entities
    store: SessionStore,
    /// Countdown for the active question
    countdown: Countdown,
    /// Selection and at-most-once submission gate
    submission: Submission,
    /// Current phase of the session
    phase: SessionPhase,
    /// Whether this participant joined a game already in progress
    joined_mid_game: bool,
    /// Whether a join or create invocation awaits acknowledgment
    join_pending: bool,
    /// Whether a start invocation awaits acknowledgment
    start_pending: bool,
    /// Last surfaced error message, consumed by the presentation layer
    last_error: Option<String>,
}

impl SessionController {
    /// Creates a controller for the given participant identity
    ///
    /// # Errors
    ///
    /// Returns a validation report if the options are out of bounds.
    pub fn new(identity: ParticipantId, options: SessionOptions) -> Result<Self, garde::Report> {
        options.validate()?;
        Ok(Self {
            identity,
            options,
            store: SessionStore::new(),
            countdown: Countdown::new(options.question_duration),
            submission: Submission::new(),
            phase: SessionPhase::Idle,
            joined_mid_game: false,
            join_pending: false,
            start_pending: false,
            last_error: None,
        })
    }

    /// Handles one inbound server event
    ///
    /// Every handler is idempotent under reordering: entities are replaced
    /// wholesale, stale question snapshots are discarded, and repeated
    /// events re-apply the same effect.
    pub fn handle_event(&mut self, event: ServerEvent, clock: &impl Clock) {
        match event {
            ServerEvent::RoomCreated(room) | ServerEvent::RoomJoined(room) => {
                self.join_pending = false;
                self.joined_mid_game = false;
                self.store.replace_room(room);
                self.phase = SessionPhase::Waiting;
            }
            ServerEvent::RoomJoinedInProgress {
                room,
                game,
                leaderboard,
            } => {
                self.join_pending = false;
                self.joined_mid_game = true;
                self.submission.reset();
                match room.started_at {
                    Some(started_at) => {
                        self.countdown
                            .reconcile(started_at, game.current_question_index, clock);
                    }
                    None => {
                        warn!("in-progress room without a start timestamp, starting fresh");
                        self.countdown.fresh_reset(clock);
                    }
                }
                self.store.replace_room(room);
                self.store.replace_game(game);
                self.store.replace_leaderboard(leaderboard);
                self.phase = SessionPhase::InProgress;
            }
            ServerEvent::ParticipantJoined(room) => {
                self.store.replace_room(room);
            }
            ServerEvent::ParticipantLeft(participant_id) => {
                self.store.remove_participant(participant_id);
            }
            ServerEvent::QuestionAdvanced(game) => {
                if self.phase == SessionPhase::Ended {
                    warn!("discarding question advance after game end");
                    return;
                }
                if game.current_question_index >= game.total_questions {
                    warn!(
                        index = game.current_question_index,
                        total = game.total_questions,
                        "discarding out-of-range question snapshot"
                    );
                    return;
                }
                if let Some(current) = self.store.game()
                    && game.current_question_index < current.current_question_index
                {
                    warn!(
                        index = game.current_question_index,
                        current = current.current_question_index,
                        "discarding stale question snapshot"
                    );
                    return;
                }
                self.store.replace_game(game);
                self.submission.reset();
                self.countdown.fresh_reset(clock);
                self.start_pending = false;
                self.phase = SessionPhase::InProgress;
            }
            ServerEvent::QuestionEnded(leaderboard) => {
                self.store.replace_leaderboard(leaderboard);
                self.countdown.expire();
            }
            ServerEvent::GameEnded(report) => {
                debug!("game ended");
                self.store.store_report(report);
                self.countdown.expire();
                self.phase = SessionPhase::Ended;
            }
            ServerEvent::ChannelError(message) => {
                self.join_pending = false;
                self.start_pending = false;
                self.last_error = Some(message);
            }
        }
    }

    /// Advances the countdown by one second
    ///
    /// Called by the embedding once per elapsed local second. A no-op
    /// unless a question is active; local expiry never advances the
    /// question, that transition is server-driven.
    pub fn tick(&mut self) {
        if self.phase == SessionPhase::InProgress {
            self.countdown.tick();
        }
    }

    /// Requests to join an existing room
    ///
    /// # Errors
    ///
    /// Returns [`Error::JoinPending`] if a join or create is already in
    /// flight, or a channel error if the send fails.
    pub fn join_room(&mut self, code: RoomCode, channel: &impl Channel) -> Result<(), Error> {
        if self.join_pending {
            return Err(Error::JoinPending);
        }
        channel.invoke(&Invocation::JoinRoom {
            code,
            participant_id: self.identity,
        })?;
        self.join_pending = true;
        Ok(())
    }

    /// Requests to create a room backed by a quiz
    ///
    /// # Errors
    ///
    /// Returns [`Error::JoinPending`] if a join or create is already in
    /// flight, or a channel error if the send fails.
    pub fn create_room(&mut self, quiz_id: QuizId, channel: &impl Channel) -> Result<(), Error> {
        if self.join_pending {
            return Err(Error::JoinPending);
        }
        channel.invoke(&Invocation::CreateRoom {
            quiz_id,
            participant_id: self.identity,
        })?;
        self.join_pending = true;
        Ok(())
    }

    /// Requests to start the game (host only)
    ///
    /// # Errors
    ///
    /// Rejected locally unless the caller is the host of a waiting,
    /// non-empty room with no start already pending; channel errors
    /// propagate.
    pub fn start_game(&mut self, channel: &impl Channel) -> Result<(), Error> {
        let room = self.store.room().ok_or(Error::NoRoom)?;
        if !room.is_host(self.identity) {
            return Err(Error::NotHost);
        }
        if self.phase != SessionPhase::Waiting {
            return Err(Error::NotWaiting);
        }
        if room.participants.is_empty() {
            return Err(Error::EmptyRoom);
        }
        if self.start_pending {
            return Err(Error::StartPending);
        }
        channel.invoke(&Invocation::StartGame { code: room.code })?;
        self.start_pending = true;
        Ok(())
    }

    /// Records a tentative answer choice for the active question
    ///
    /// Ignored while locked: after submission, after time expiry, or when
    /// no question is active.
    pub fn select_answer(&mut self, option: AnswerOption) {
        if self.phase == SessionPhase::InProgress
            && !self.countdown.is_expired()
            && self.store.game().is_some()
        {
            self.submission.select(option);
        }
    }

    /// Submits the selected answer for the active question
    ///
    /// Local preconditions are checked before any network call; the
    /// submission gate closes only after a successful send, so a channel
    /// failure leaves the participant free to retry while time remains.
    ///
    /// # Errors
    ///
    /// Returns the violated precondition or the channel failure.
    pub fn submit_answer(
        &mut self,
        clock: &impl Clock,
        channel: &impl Channel,
    ) -> Result<(), Error> {
        let room = self
            .store
            .room()
            .ok_or(submission::Error::NoActiveQuestion)?;
        let question = self
            .store
            .game()
            .and_then(|game| room.question(game.current_question_index));

        let invocation = self.submission.submit(
            room.code,
            self.identity,
            question,
            self.countdown.time_remaining(),
            self.countdown.elapsed(clock),
        )?;
        channel.invoke(&invocation)?;
        self.submission.mark_submitted();
        Ok(())
    }

    /// Returns the current session phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the current room snapshot
    pub fn room(&self) -> Option<&Room> {
        self.store.room()
    }

    /// Returns the active question declaration
    pub fn game(&self) -> Option<&GameState> {
        self.store.game()
    }

    /// Returns the current score table
    pub fn leaderboard(&self) -> Option<&LeaderboardSnapshot> {
        self.store.leaderboard()
    }

    /// Returns the final answer report, once the game has ended
    pub fn report(&self) -> Option<&AnswerReport> {
        self.store.report()
    }

    /// Returns the whole seconds left in the answer window
    pub fn time_remaining(&self) -> u64 {
        self.countdown.time_remaining()
    }

    /// Returns whether the answer window has closed locally
    pub fn is_time_up(&self) -> bool {
        self.countdown.is_expired()
    }

    /// Returns the tentatively selected answer option
    pub fn selected_answer(&self) -> Option<AnswerOption> {
        self.submission.selected()
    }

    /// Returns whether an answer has been submitted for this question
    pub fn has_submitted(&self) -> bool {
        self.submission.has_submitted()
    }

    /// Returns the question currently being played
    pub fn current_question(&self) -> Option<&Question> {
        let room = self.store.room()?;
        let game = self.store.game()?;
        room.question(game.current_question_index)
    }

    /// Returns whether a submit action would currently be accepted
    ///
    /// Used to drive the enabled state of the submit control.
    pub fn can_submit(&self) -> bool {
        self.phase == SessionPhase::InProgress
            && !self.submission.has_submitted()
            && !self.countdown.is_expired()
            && self.submission.selected().is_some()
            && self.current_question().is_some()
    }

    /// Returns whether this participant hosts the current room
    pub fn is_host(&self) -> bool {
        self.store
            .room()
            .is_some_and(|room| room.is_host(self.identity))
    }

    /// Returns this participant's rank and points
    pub fn standing(&self) -> Option<Standing> {
        self.store
            .leaderboard()
            .and_then(|board| board.standing(self.identity))
    }

    /// Returns this participant's recorded answers from the final report
    pub fn own_answers(&self) -> &[AnswerRecord] {
        self.store
            .report()
            .map_or(&[], |report| report.answers_for(self.identity))
    }

    /// Returns this participant's accuracy percentage from the final report
    pub fn accuracy(&self) -> Option<u8> {
        let report = self.store.report()?;
        let room = self.store.room()?;
        Some(report.accuracy(self.identity, room.questions.len()))
    }

    /// Returns whether this participant joined a game already in progress
    pub fn joined_mid_game(&self) -> bool {
        self.joined_mid_game
    }

    /// Returns whether a join or create invocation awaits acknowledgment
    pub fn join_pending(&self) -> bool {
        self.join_pending
    }

    /// Returns whether a start invocation awaits acknowledgment
    pub fn start_pending(&self) -> bool {
        self.start_pending
    }

    /// Takes the last surfaced error message, if any
    ///
    /// The message is handed to the presentation layer once and cleared.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }
}
