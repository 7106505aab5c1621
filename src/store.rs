//! Session state store
//!
//! This module owns the three canonical session entities (room, game state,
//! leaderboard) plus the terminal answer report. Every mutation is a
//! full-entity replace except participant removal, which is a targeted list
//! edit applied optimistically ahead of the next authoritative snapshot.
//! There is no merge logic beyond that: a stale-but-just-arrived snapshot
//! may briefly overwrite a local edit, and the next snapshot self-corrects.

use tracing::debug;

use crate::{
    game::GameState,
    leaderboard::LeaderboardSnapshot,
    report::AnswerReport,
    room::{ParticipantId, Room},
};

/// Holder of the canonical session entities
///
/// Owned by exactly one controller per mounted session. Until the first
/// authoritative leaderboard push arrives, the store re-synthesizes a
/// zero-score snapshot from the roster on every room change, so the
/// leaderboard view is never empty and always mirrors the participant set.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// The current room snapshot
    room: Option<Room>,
    /// The active question declaration
    game: Option<GameState>,
    /// The current score table
    leaderboard: Option<LeaderboardSnapshot>,
    /// The terminal answer report, once the game has ended
    report: Option<AnswerReport>,
    /// Whether the leaderboard came from a server push rather than seeding
    authoritative_leaderboard: bool,
}

impl SessionStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the room wholesale
    ///
    /// While no authoritative leaderboard has arrived, the default
    /// zero-score snapshot is re-seeded from the new roster.
    pub fn replace_room(&mut self, room: Room) {
        debug!(code = %room.code, participants = room.participants.len(), "replacing room");
        self.room = Some(room);
        self.reseed_leaderboard();
    }

    /// Replaces the active question declaration wholesale
    pub fn replace_game(&mut self, game: GameState) {
        debug!(
            index = game.current_question_index,
            total = game.total_questions,
            "replacing game state"
        );
        self.game = Some(game);
    }

    /// Replaces the leaderboard with an authoritative server push
    ///
    /// After the first push, roster changes no longer re-seed the snapshot;
    /// only further pushes replace it.
    pub fn replace_leaderboard(&mut self, leaderboard: LeaderboardSnapshot) {
        debug!(entries = leaderboard.len(), "replacing leaderboard");
        self.leaderboard = Some(leaderboard);
        self.authoritative_leaderboard = true;
    }

    /// Stores the terminal answer report
    pub fn store_report(&mut self, report: AnswerReport) {
        debug!(answers = report.answers.len(), "storing final report");
        self.report = Some(report);
    }

    /// Removes a participant from the roster optimistically
    ///
    /// Removing a participant who is not present is a no-op. The edit is
    /// eventually corrected by the next authoritative room snapshot.
    pub fn remove_participant(&mut self, participant_id: ParticipantId) {
        if let Some(room) = &mut self.room {
            room.participants.retain(|p| p.id != participant_id);
        }
        self.reseed_leaderboard();
    }

    /// Re-synthesizes the zero-score leaderboard while it is still seeded
    fn reseed_leaderboard(&mut self) {
        if self.authoritative_leaderboard {
            return;
        }
        if let Some(room) = &self.room {
            self.leaderboard = Some(LeaderboardSnapshot::seeded_from(room));
        }
    }

    /// Returns the current room snapshot
    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    /// Returns the active question declaration
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// Returns the current score table
    pub fn leaderboard(&self) -> Option<&LeaderboardSnapshot> {
        self.leaderboard.as_ref()
    }

    /// Returns the terminal answer report, if the game has ended
    pub fn report(&self) -> Option<&AnswerReport> {
        self.report.as_ref()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use web_time::SystemTime;

    use crate::{
        question::QuizId,
        room::{Participant, RoomStatus},
        room_code::RoomCode,
    };

    use super::*;

    fn room_with(ids: &[ParticipantId]) -> Room {
        let now = SystemTime::now();
        Room {
            code: "123456".parse().unwrap(),
            quiz_id: QuizId::new(),
            host_id: ids[0],
            questions: Vec::new(),
            participants: ids
                .iter()
                .map(|&id| Participant {
                    id,
                    name: "p".to_owned(),
                    joined_at: now,
                })
                .collect(),
            status: RoomStatus::Waiting,
            created_at: now,
            started_at: None,
        }
    }

    fn authoritative(code: RoomCode, id: ParticipantId, score: u64) -> LeaderboardSnapshot {
        LeaderboardSnapshot {
            code,
            entries: vec![crate::leaderboard::ScoreEntry {
                participant_id: id,
                score,
            }],
        }
    }

    #[test]
    fn test_room_replacement_seeds_leaderboard() {
        let ids = [ParticipantId::new(), ParticipantId::new()];
        let mut store = SessionStore::new();
        store.replace_room(room_with(&ids));

        let board = store.leaderboard().unwrap();
        assert_eq!(board.len(), 2);
        assert!(board.entries.iter().all(|entry| entry.score == 0));
        assert!(
            board
                .entries
                .iter()
                .zip(ids)
                .all(|(entry, id)| entry.participant_id == id)
        );
    }

    #[test]
    fn test_roster_change_reseeds_until_authoritative_push() {
        let ids = [ParticipantId::new(), ParticipantId::new()];
        let mut store = SessionStore::new();
        store.replace_room(room_with(&ids));
        store.remove_participant(ids[1]);

        assert_eq!(store.leaderboard().unwrap().len(), 1);
    }

    #[test]
    fn test_authoritative_push_stops_seeding() {
        let ids = [ParticipantId::new(), ParticipantId::new()];
        let mut store = SessionStore::new();
        store.replace_room(room_with(&ids));
        store.replace_leaderboard(authoritative("123456".parse().unwrap(), ids[0], 80));

        // Roster edits no longer touch the leaderboard
        store.remove_participant(ids[0]);
        let board = store.leaderboard().unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries[0].score, 80);
    }

    #[test]
    fn test_remove_absent_participant_is_noop() {
        let ids = [ParticipantId::new()];
        let mut store = SessionStore::new();
        store.replace_room(room_with(&ids));

        store.remove_participant(ParticipantId::new());
        assert_eq!(store.room().unwrap().participants.len(), 1);
    }

    #[test]
    fn test_remove_participant_without_room() {
        let mut store = SessionStore::new();
        store.remove_participant(ParticipantId::new());
        assert!(store.room().is_none());
        assert!(store.leaderboard().is_none());
    }
}
