//! Domain layer: pure turn-protocol types and rules.

pub mod dealing;
pub mod rules;
pub mod state;
pub mod transition;

#[cfg(test)]
mod tests_dealing;
#[cfg(test)]
mod tests_props_rules;
#[cfg(test)]
mod tests_rules;

// Re-exports for ergonomics
pub use dealing::{deal_hands, deal_hands_seeded, deal_hands_with_rng};
pub use rules::{check_terminal, determine_winner, resolve_round, RoundResolution};
pub use state::{CardRank, MatchId, MatchState, Phase, PlayedRound, RoundOutcome, Winner};
pub use transition::{derive_match_transitions, MatchTransition};
