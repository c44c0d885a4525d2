//! Presentation-facing view of the session.

use serde::{Deserialize, Serialize};

use crate::domain::state::{CardRank, MatchId, Phase, PlayedRound, Winner};
use crate::session::history::HistoryEntry;

/// UI-level session status. Mirrors the match phase plus the states the
/// match itself cannot express (nothing created yet, creation in flight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No match.
    Idle,
    /// Creation in flight.
    Starting,
    /// Rounds being resolved.
    Active,
    /// Terminal; winner known.
    Finished,
}

/// Immutable snapshot handed to the rendering layer. Everything the UI
/// shows comes from here; it never reaches into the controller's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub match_id: Option<MatchId>,
    pub phase: Phase,
    pub player_hand: Vec<CardRank>,
    pub opponent_hand: Vec<CardRank>,
    pub last_played: Option<PlayedRound>,
    pub player_score: u8,
    pub opponent_score: u8,
    /// Rounds resolved so far.
    pub round: u8,
    pub is_loading: bool,
    pub opponent_thinking: bool,
    pub error: Option<String>,
    pub winner: Option<Winner>,
    /// Most recent history lines, oldest first.
    pub history: Vec<HistoryEntry>,
}
