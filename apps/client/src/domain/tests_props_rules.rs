//! Property tests over random deals and random full play sequences.

use proptest::prelude::*;

use crate::domain::dealing::deal_hands_seeded;
use crate::domain::rules::{determine_winner, resolve_round, DECK_SIZE, TOTAL_ROUNDS};
use crate::domain::state::{MatchState, Phase, RoundOutcome, Winner};

proptest! {
    #[test]
    fn dealt_hands_partition_the_deck(seed in any::<u64>()) {
        let (player, opponent) = deal_hands_seeded(seed);
        prop_assert_eq!(player.len(), 5);
        prop_assert_eq!(opponent.len(), 5);

        let mut all: Vec<u8> = player.iter().chain(opponent.iter()).copied().collect();
        all.sort_unstable();
        let expected: Vec<u8> = (1..=DECK_SIZE).collect();
        prop_assert_eq!(all, expected);
    }

    /// Play a full match with arbitrary (valid) card choices and check
    /// every structural invariant after every round.
    #[test]
    fn full_match_preserves_invariants(
        seed in any::<u64>(),
        picks in proptest::collection::vec((0usize..5, 0usize..5), 5),
    ) {
        let (player, opponent) = deal_hands_seeded(seed);
        let mut state = MatchState::new(player, opponent);

        for (round, &(pi, oi)) in picks.iter().enumerate() {
            let player_card = state.player_hand[pi % state.player_hand.len()];
            let opponent_card = state.opponent_hand[oi % state.opponent_hand.len()];
            let res = resolve_round(&mut state, player_card, opponent_card).unwrap();

            prop_assert_eq!(res.round_index as usize, round);
            prop_assert_eq!(state.rounds_played as usize, state.played_history.len());
            prop_assert_eq!(
                state.player_hand.len() + state.opponent_hand.len(),
                (DECK_SIZE - 2 * state.rounds_played) as usize
            );
            prop_assert!(state.player_score + state.opponent_score <= state.rounds_played);

            let expect_finished = state.rounds_played == TOTAL_ROUNDS;
            prop_assert_eq!(state.phase == Phase::Finished, expect_finished);
            prop_assert_eq!(res.finished, expect_finished);
        }

        prop_assert!(state.player_hand.is_empty());
        prop_assert!(state.opponent_hand.is_empty());
    }

    /// Round outcomes and the final winner follow the total order on
    /// ranks and scores respectively.
    #[test]
    fn outcomes_follow_total_order(
        seed in any::<u64>(),
        picks in proptest::collection::vec((0usize..5, 0usize..5), 5),
    ) {
        let (player, opponent) = deal_hands_seeded(seed);
        let mut state = MatchState::new(player, opponent);

        for &(pi, oi) in &picks {
            let player_card = state.player_hand[pi % state.player_hand.len()];
            let opponent_card = state.opponent_hand[oi % state.opponent_hand.len()];
            let before = (state.player_score, state.opponent_score);
            let res = resolve_round(&mut state, player_card, opponent_card).unwrap();

            match res.outcome {
                RoundOutcome::PlayerWins => {
                    prop_assert!(player_card > opponent_card);
                    prop_assert_eq!((state.player_score, state.opponent_score), (before.0 + 1, before.1));
                }
                RoundOutcome::OpponentWins => {
                    prop_assert!(opponent_card > player_card);
                    prop_assert_eq!((state.player_score, state.opponent_score), (before.0, before.1 + 1));
                }
                RoundOutcome::Tie => {
                    prop_assert_eq!(player_card, opponent_card);
                    prop_assert_eq!((state.player_score, state.opponent_score), before);
                }
            }
        }

        let winner = determine_winner(&state);
        match state.player_score.cmp(&state.opponent_score) {
            std::cmp::Ordering::Greater => prop_assert_eq!(winner, Winner::Player),
            std::cmp::Ordering::Less => prop_assert_eq!(winner, Winner::Opponent),
            std::cmp::Ordering::Equal => prop_assert_eq!(winner, Winner::Tie),
        }
    }
}
