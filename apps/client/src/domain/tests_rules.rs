use crate::domain::rules::{check_terminal, determine_winner, resolve_round, TOTAL_ROUNDS};
use crate::domain::state::{MatchState, Phase, RoundOutcome, Winner};
use crate::errors::domain::{DomainError, InvalidMoveKind};

fn fresh() -> MatchState {
    MatchState::new(vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10])
}

#[test]
fn higher_player_card_wins_round() {
    let mut state = MatchState::new(vec![9, 2], vec![3, 4]);
    let res = resolve_round(&mut state, 9, 3).unwrap();
    assert_eq!(res.outcome, RoundOutcome::PlayerWins);
    assert_eq!(state.player_score, 1);
    assert_eq!(state.opponent_score, 0);
}

#[test]
fn higher_opponent_card_wins_round() {
    let mut state = fresh();
    let res = resolve_round(&mut state, 1, 10).unwrap();
    assert_eq!(res.outcome, RoundOutcome::OpponentWins);
    assert_eq!(state.player_score, 0);
    assert_eq!(state.opponent_score, 1);
}

#[test]
fn equal_cards_tie_without_points() {
    // Hands within a real deal are disjoint; resolve_round itself only
    // requires each card to be held by its side, so a mirrored deal is a
    // legitimate way to force ties.
    let mut state = MatchState::new(vec![4], vec![4]);
    let res = resolve_round(&mut state, 4, 4).unwrap();
    assert_eq!(res.outcome, RoundOutcome::Tie);
    assert_eq!(state.player_score, 0);
    assert_eq!(state.opponent_score, 0);
}

#[test]
fn resolve_removes_exactly_one_card_per_side() {
    let mut state = fresh();
    resolve_round(&mut state, 3, 8).unwrap();
    assert_eq!(state.player_hand, vec![1, 2, 4, 5]);
    assert_eq!(state.opponent_hand, vec![6, 7, 9, 10]);
    assert_eq!(state.rounds_played, 1);
    assert_eq!(state.played_history.len(), 1);
}

#[test]
fn replaying_an_already_played_card_fails() {
    let mut state = fresh();
    resolve_round(&mut state, 3, 8).unwrap();
    let err = resolve_round(&mut state, 3, 9).unwrap_err();
    assert_eq!(
        err,
        DomainError::invalid_move(
            InvalidMoveKind::CardNotInHand,
            "player does not hold card 3"
        )
    );
    // Failed resolution leaves the state untouched.
    assert_eq!(state.rounds_played, 1);
    assert_eq!(state.opponent_hand.len(), 4);
}

#[test]
fn card_not_held_is_rejected() {
    let mut state = fresh();
    let err = resolve_round(&mut state, 7, 6).unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidMove(InvalidMoveKind::CardNotInHand, _)
    ));
}

#[test]
fn play_after_finish_is_rejected() {
    let mut state = fresh();
    for (p, o) in [(1, 6), (2, 7), (3, 8), (4, 9), (5, 10)] {
        resolve_round(&mut state, p, o).unwrap();
    }
    assert_eq!(state.phase, Phase::Finished);
    let err = resolve_round(&mut state, 1, 6).unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidMove(InvalidMoveKind::MatchFinished, _)
    ));
}

#[test]
fn play_before_deal_is_rejected() {
    let mut state = MatchState::waiting();
    let err = resolve_round(&mut state, 1, 6).unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidMove(InvalidMoveKind::PhaseMismatch, _)
    ));
}

#[test]
fn empty_hand_fails_with_no_cards_available() {
    // Defensive path: a state that should not arise under a fixed deal.
    let mut state = MatchState::new(Vec::new(), vec![6]);
    let err = resolve_round(&mut state, 1, 6).unwrap_err();
    assert!(matches!(err, DomainError::NoCardsAvailable(_)));
}

#[test]
fn five_rounds_terminate_with_empty_hands() {
    let mut state = fresh();
    for (p, o) in [(5, 6), (4, 7), (3, 8), (2, 9), (1, 10)] {
        resolve_round(&mut state, p, o).unwrap();
    }
    assert_eq!(state.rounds_played, TOTAL_ROUNDS);
    assert_eq!(state.phase, Phase::Finished);
    assert!(state.player_hand.is_empty());
    assert!(state.opponent_hand.is_empty());
}

#[test]
fn terminal_check_is_stable_before_five_rounds() {
    let mut state = fresh();
    resolve_round(&mut state, 1, 6).unwrap();
    assert_eq!(check_terminal(&state), Phase::InProgress);
}

#[test]
fn winner_follows_strict_score_comparison() {
    let mut state = fresh();
    state.player_score = 3;
    state.opponent_score = 2;
    assert_eq!(determine_winner(&state), Winner::Player);

    state.player_score = 1;
    assert_eq!(determine_winner(&state), Winner::Opponent);

    state.opponent_score = 1;
    assert_eq!(determine_winner(&state), Winner::Tie);
}

/// Concrete scenario: the bot out-ranks the player every round.
#[test]
fn scenario_bot_sweeps_zero_to_five() {
    let mut state = fresh();
    let pairs = [(1, 6), (2, 7), (3, 8), (4, 9), (5, 10)];
    for (p, o) in pairs {
        let res = resolve_round(&mut state, p, o).unwrap();
        assert_eq!(res.outcome, RoundOutcome::OpponentWins);
    }
    assert_eq!(state.player_score, 0);
    assert_eq!(state.opponent_score, 5);
    assert_eq!(state.rounds_played, 5);
    assert_eq!(state.played_history.len(), 5);
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(determine_winner(&state), Winner::Opponent);
}

/// Concrete scenario: mirrored hands paired index-wise tie every round.
#[test]
fn scenario_mirrored_hands_tie() {
    let mut state = MatchState::new(vec![1, 2, 3, 4, 5], vec![1, 2, 3, 4, 5]);
    for card in 1..=5 {
        let res = resolve_round(&mut state, card, card).unwrap();
        assert_eq!(res.outcome, RoundOutcome::Tie);
    }
    assert_eq!(state.player_score, 0);
    assert_eq!(state.opponent_score, 0);
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(determine_winner(&state), Winner::Tie);
}
