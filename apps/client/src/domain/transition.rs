use crate::domain::rules::determine_winner;
use crate::domain::state::{MatchState, Phase, PlayedRound, RoundOutcome, Winner};

/// Edge-triggered transitions derived from two authoritative snapshots.
///
/// The session controller reconciles oracle (or simulation) state by
/// wholesale replacement; this diff is the single place where replaced
/// snapshots become user-visible events, regardless of which orchestrator
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTransition {
    /// Match moved out of Waiting: hands are dealt and play can begin.
    MatchStarted,

    /// A round was resolved (one per new history entry).
    RoundResolved {
        round: PlayedRound,
        outcome: RoundOutcome,
        player_score: u8,
        opponent_score: u8,
    },

    /// Match reached its terminal phase.
    MatchFinished { winner: Winner },
}

/// Derive transitions from before/after match snapshots.
pub fn derive_match_transitions(before: &MatchState, after: &MatchState) -> Vec<MatchTransition> {
    let mut transitions = Vec::new();

    // 1. Start. The oracle keeps reporting Waiting until the first play,
    // so dealt hands count as started too.
    let started = |s: &MatchState| s.phase != Phase::Waiting || !s.player_hand.is_empty();
    if !started(before) && started(after) {
        transitions.push(MatchTransition::MatchStarted);
    }

    // 2. One RoundResolved per history entry the 'before' snapshot lacked.
    // Scores attached to each transition are reconstructed by replaying
    // the deltas so intermediate rounds report the score as of that round,
    // not the final one.
    let known = before.played_history.len().min(after.played_history.len());
    let mut player_score: u8 = before.player_score;
    let mut opponent_score: u8 = before.opponent_score;
    for round in &after.played_history[known..] {
        let outcome = if round.player_card > round.opponent_card {
            player_score += 1;
            RoundOutcome::PlayerWins
        } else if round.opponent_card > round.player_card {
            opponent_score += 1;
            RoundOutcome::OpponentWins
        } else {
            RoundOutcome::Tie
        };
        transitions.push(MatchTransition::RoundResolved {
            round: *round,
            outcome,
            player_score,
            opponent_score,
        });
    }

    // 3. Finish (!Finished -> Finished)
    if before.phase != Phase::Finished && after.phase == Phase::Finished {
        transitions.push(MatchTransition::MatchFinished {
            winner: determine_winner(after),
        });
    }

    transitions
}
