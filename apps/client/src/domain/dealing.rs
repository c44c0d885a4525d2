//! Card dealing for the 10-rank deck.
//!
//! The surrounding system exposes no seed, so the default entry point
//! draws from OS entropy; the seeded variant exists for tests and for
//! reproducible simulated matches.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::domain::rules::{full_deck, HAND_SIZE};
use crate::domain::state::CardRank;

/// Unbiased Fisher-Yates shuffle of the 10 ranks, first 5 to the player,
/// next 5 to the opponent. Every rank appears exactly once across the two
/// hands.
pub fn deal_hands() -> (Vec<CardRank>, Vec<CardRank>) {
    let mut rng = StdRng::from_os_rng();
    deal_hands_with_rng(&mut rng)
}

/// Deterministic deal for a given seed.
pub fn deal_hands_seeded(seed: u64) -> (Vec<CardRank>, Vec<CardRank>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deal_hands_with_rng(&mut rng)
}

/// Deal using the caller's RNG.
pub fn deal_hands_with_rng<R: Rng + ?Sized>(rng: &mut R) -> (Vec<CardRank>, Vec<CardRank>) {
    let mut deck = full_deck();
    deck.shuffle(rng);

    let opponent = deck.split_off(HAND_SIZE as usize);
    (deck, opponent)
}
