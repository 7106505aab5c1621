//! Leaderboard snapshots and standings
//!
//! This module holds the authoritative per-participant score table the
//! server pushes after each question, plus the zero-score default that is
//! synthesized locally from the room roster so the view is never empty
//! before the first server push. Scores are never incremented locally.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    room::{ParticipantId, Room},
    room_code::RoomCode,
};

/// One participant's score within a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// The scored participant
    pub participant_id: ParticipantId,
    /// The participant's total score
    pub score: u64,
}

/// A participant's rank and points derived from a snapshot
///
/// Positions are 1-indexed and computed by descending score, matching the
/// order the presentation layer displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Total points of the participant
    pub points: u64,
    /// Position in the leaderboard (1-indexed)
    pub position: usize,
}

/// The authoritative score table at a point in time
///
/// Entries are kept in arrival order; every server push replaces the whole
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    /// The room this snapshot belongs to
    pub code: RoomCode,
    /// Per-participant scores in arrival order
    pub entries: Vec<ScoreEntry>,
}

impl LeaderboardSnapshot {
    /// Synthesizes the zero-score default snapshot from a room roster
    ///
    /// Used between receiving a room and the first authoritative push, so
    /// the entry set exactly mirrors the participant set of the room.
    pub fn seeded_from(room: &Room) -> Self {
        Self {
            code: room.code,
            entries: room
                .participants
                .iter()
                .map(|participant| ScoreEntry {
                    participant_id: participant.id,
                    score: 0,
                })
                .collect(),
        }
    }

    /// Returns the entries sorted by descending score
    pub fn descending(&self) -> Vec<ScoreEntry> {
        self.entries
            .iter()
            .copied()
            .sorted_by_key(|entry| std::cmp::Reverse(entry.score))
            .collect_vec()
    }

    /// Computes the rank and points of a participant
    ///
    /// # Returns
    ///
    /// `Some(Standing)` with the participant's points and 1-indexed
    /// position, or `None` if the participant has no entry.
    pub fn standing(&self, participant_id: ParticipantId) -> Option<Standing> {
        self.descending()
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.participant_id == participant_id)
            .map(|(index, entry)| Standing {
                points: entry.score,
                position: index + 1,
            })
    }

    /// Returns the number of entries in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the snapshot has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use web_time::SystemTime;

    use crate::{
        question::QuizId,
        room::{Participant, RoomStatus},
    };

    use super::*;

    fn snapshot(scores: &[(ParticipantId, u64)]) -> LeaderboardSnapshot {
        LeaderboardSnapshot {
            code: "123456".parse().unwrap(),
            entries: scores
                .iter()
                .map(|&(participant_id, score)| ScoreEntry {
                    participant_id,
                    score,
                })
                .collect(),
        }
    }

    #[test]
    fn test_seeded_from_mirrors_roster() {
        let ids = [ParticipantId::new(), ParticipantId::new()];
        let now = SystemTime::now();
        let room = Room {
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
        };

        let seeded = LeaderboardSnapshot::seeded_from(&room);

        assert_eq!(seeded.len(), 2);
        for (entry, id) in seeded.entries.iter().zip(ids) {
            assert_eq!(entry.participant_id, id);
            assert_eq!(entry.score, 0);
        }
    }

    #[test]
    fn test_descending_order() {
        let first = ParticipantId::new();
        let second = ParticipantId::new();
        let third = ParticipantId::new();
        let board = snapshot(&[(first, 30), (second, 90), (third, 60)]);

        let ordered = board.descending();
        assert_eq!(ordered[0].participant_id, second);
        assert_eq!(ordered[1].participant_id, third);
        assert_eq!(ordered[2].participant_id, first);
    }

    #[test]
    fn test_standing() {
        let first = ParticipantId::new();
        let second = ParticipantId::new();
        let board = snapshot(&[(first, 30), (second, 90)]);

        assert_eq!(
            board.standing(second),
            Some(Standing {
                points: 90,
                position: 1,
            })
        );
        assert_eq!(
            board.standing(first),
            Some(Standing {
                points: 30,
                position: 2,
            })
        );
    }

    #[test]
    fn test_standing_absent_participant() {
        let board = snapshot(&[(ParticipantId::new(), 10)]);
        assert!(board.standing(ParticipantId::new()).is_none());
    }

    #[test]
    fn test_empty_snapshot() {
        let board = snapshot(&[]);
        assert!(board.is_empty());
        assert!(board.descending().is_empty());
    }
}
