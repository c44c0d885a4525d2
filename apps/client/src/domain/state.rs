use serde::{Deserialize, Serialize};

/// Card rank, 1..=10. Higher rank wins a round.
pub type CardRank = u8;

/// Opaque match identifier assigned by the oracle (or synthesized locally
/// in simulated play).
pub type MatchId = u64;

/// Overall match progression phases, mirroring the oracle's
/// `0=Waiting, 1=Playing, 2=Finished` encoding.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Match created but hands not yet dealt/visible.
    Waiting,
    /// Rounds being resolved.
    InProgress,
    /// Terminal: no further mutation permitted.
    Finished,
}

/// Outcome of a single resolved round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum RoundOutcome {
    PlayerWins,
    OpponentWins,
    Tie,
}

/// Final match outcome.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Opponent,
    Tie,
}

/// One resolved round: the pair of cards and the 0-based round index.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayedRound {
    pub player_card: CardRank,
    pub opponent_card: CardRank,
    pub round_index: u8,
}

/// Entire match container, sufficient for pure domain operations.
///
/// Invariants (maintained by `rules::resolve_round`, checked by tests):
/// - `rounds_played == played_history.len()`
/// - `player_hand.len() + opponent_hand.len() == 10 - 2 * rounds_played`
/// - `phase == Finished` iff `rounds_played == TOTAL_ROUNDS` (or a hand
///   emptied early, a defensive secondary terminal condition)
/// - `player_score + opponent_score <= rounds_played`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// Oracle-assigned id; `None` before creation confirms.
    pub match_id: Option<MatchId>,
    /// Current phase.
    pub phase: Phase,
    /// Player's remaining hand, ordered as dealt/fetched.
    pub player_hand: Vec<CardRank>,
    /// Opponent's remaining hand.
    pub opponent_hand: Vec<CardRank>,
    /// Rounds resolved so far (0..=5).
    pub rounds_played: u8,
    pub player_score: u8,
    pub opponent_score: u8,
    /// All resolved rounds, append-only.
    pub played_history: Vec<PlayedRound>,
}

impl MatchState {
    /// Fresh match with dealt hands, no rounds resolved.
    pub fn new(player_hand: Vec<CardRank>, opponent_hand: Vec<CardRank>) -> Self {
        Self {
            match_id: None,
            phase: Phase::InProgress,
            player_hand,
            opponent_hand,
            rounds_played: 0,
            player_score: 0,
            opponent_score: 0,
            played_history: Vec::new(),
        }
    }

    /// Empty pre-deal state.
    pub fn waiting() -> Self {
        Self {
            match_id: None,
            phase: Phase::Waiting,
            player_hand: Vec::new(),
            opponent_hand: Vec::new(),
            rounds_played: 0,
            player_score: 0,
            opponent_score: 0,
            played_history: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Most recently resolved round, if any.
    pub fn last_played(&self) -> Option<&PlayedRound> {
        self.played_history.last()
    }
}
