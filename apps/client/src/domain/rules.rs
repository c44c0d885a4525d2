//! Pure round-resolution and win-condition rules.
//!
//! All state mutation goes through [`resolve_round`]; everything else in
//! this module is read-only. Nothing here performs I/O or touches clocks.

use crate::domain::state::{CardRank, MatchState, Phase, PlayedRound, RoundOutcome, Winner};
use crate::errors::domain::{DomainError, InvalidMoveKind};

/// Number of distinct ranks in the deck (1..=10).
pub const DECK_SIZE: u8 = 10;
/// Cards dealt to each side.
pub const HAND_SIZE: u8 = 5;
/// A match always runs exactly this many rounds.
pub const TOTAL_ROUNDS: u8 = 5;

/// The full deck in rank order: `[1, 2, ..., 10]`.
pub fn full_deck() -> Vec<CardRank> {
    (1..=DECK_SIZE).collect()
}

/// Result of resolving one round, describing what changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResolution {
    pub outcome: RoundOutcome,
    /// 0-based index of the round that was just resolved.
    pub round_index: u8,
    pub player_card: CardRank,
    pub opponent_card: CardRank,
    /// Whether this resolution made the match terminal.
    pub finished: bool,
}

/// Resolve one round: remove the played cards, compare, score, record.
///
/// Preconditions (violations are returned as [`DomainError`], never
/// silently ignored): the match is in progress, and each played card is
/// held by its side.
pub fn resolve_round(
    state: &mut MatchState,
    player_card: CardRank,
    opponent_card: CardRank,
) -> Result<RoundResolution, DomainError> {
    match state.phase {
        Phase::InProgress => {}
        Phase::Finished => {
            return Err(DomainError::invalid_move(
                InvalidMoveKind::MatchFinished,
                "match already finished",
            ));
        }
        Phase::Waiting => {
            return Err(DomainError::invalid_move(
                InvalidMoveKind::PhaseMismatch,
                "match not started",
            ));
        }
    }

    if state.player_hand.is_empty() || state.opponent_hand.is_empty() {
        return Err(DomainError::no_cards(format!(
            "hands exhausted after {} rounds",
            state.rounds_played
        )));
    }

    // Locate both cards before mutating either hand.
    let player_pos = state
        .player_hand
        .iter()
        .position(|&c| c == player_card)
        .ok_or_else(|| {
            DomainError::invalid_move(
                InvalidMoveKind::CardNotInHand,
                format!("player does not hold card {player_card}"),
            )
        })?;
    let opponent_pos = state
        .opponent_hand
        .iter()
        .position(|&c| c == opponent_card)
        .ok_or_else(|| {
            DomainError::invalid_move(
                InvalidMoveKind::CardNotInHand,
                format!("opponent does not hold card {opponent_card}"),
            )
        })?;

    state.player_hand.remove(player_pos);
    state.opponent_hand.remove(opponent_pos);

    // Strict comparison: higher rank wins, equal ranks tie with no points.
    let outcome = if player_card > opponent_card {
        state.player_score += 1;
        RoundOutcome::PlayerWins
    } else if opponent_card > player_card {
        state.opponent_score += 1;
        RoundOutcome::OpponentWins
    } else {
        RoundOutcome::Tie
    };

    let round_index = state.rounds_played;
    state.rounds_played += 1;
    state.played_history.push(PlayedRound {
        player_card,
        opponent_card,
        round_index,
    });

    state.phase = check_terminal(state);
    let finished = state.phase == Phase::Finished;

    Ok(RoundResolution {
        outcome,
        round_index,
        player_card,
        opponent_card,
        finished,
    })
}

/// Terminal check: finished after [`TOTAL_ROUNDS`] resolved rounds, or
/// (defensively) once either hand empties. With a fixed 5/5 deal the two
/// conditions coincide.
pub fn check_terminal(state: &MatchState) -> Phase {
    if state.rounds_played >= TOTAL_ROUNDS
        || state.player_hand.is_empty()
        || state.opponent_hand.is_empty()
    {
        Phase::Finished
    } else {
        state.phase
    }
}

/// Final winner by strict score comparison; equal scores tie.
pub fn determine_winner(state: &MatchState) -> Winner {
    if state.player_score > state.opponent_score {
        Winner::Player
    } else if state.opponent_score > state.player_score {
        Winner::Opponent
    } else {
        Winner::Tie
    }
}
