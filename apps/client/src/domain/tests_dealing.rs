use std::collections::BTreeSet;

use crate::domain::dealing::{deal_hands, deal_hands_seeded};
use crate::domain::rules::{DECK_SIZE, HAND_SIZE};

#[test]
fn deal_splits_deck_five_and_five() {
    let (player, opponent) = deal_hands();
    assert_eq!(player.len(), HAND_SIZE as usize);
    assert_eq!(opponent.len(), HAND_SIZE as usize);
}

#[test]
fn deal_covers_every_rank_exactly_once() {
    let (player, opponent) = deal_hands();
    let union: BTreeSet<u8> = player.iter().chain(opponent.iter()).copied().collect();
    assert_eq!(union, (1..=DECK_SIZE).collect::<BTreeSet<u8>>());
}

#[test]
fn hands_are_disjoint() {
    let (player, opponent) = deal_hands();
    assert!(player.iter().all(|c| !opponent.contains(c)));
}

#[test]
fn seeded_deal_is_reproducible() {
    let a = deal_hands_seeded(42);
    let b = deal_hands_seeded(42);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_differ() {
    // Not guaranteed in principle, but 64 seeds colliding on the same
    // permutation of 10 ranks would point at a broken shuffle.
    let reference = deal_hands_seeded(0);
    let any_differs = (1..64u64).any(|s| deal_hands_seeded(s) != reference);
    assert!(any_differs);
}
