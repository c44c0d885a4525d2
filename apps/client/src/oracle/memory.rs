//! In-memory oracle: a faithful stand-in for the deployed mock contract.
//!
//! Used by the demo binary and by integration tests. Holds the
//! authoritative game state the way the contract does: `play_card`
//! validates the move, auto-plays the bot, and resolves the round within
//! the same call.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::network::SEPOLIA_CHAIN_ID;
use crate::domain::dealing::deal_hands_with_rng;
use crate::oracle::trait_def::{GameOracle, GameRecord, OracleError};

const TOTAL_ROUNDS: u64 = 5;

/// Game-state encoding used on the wire.
pub const STATE_WAITING: u64 = 0;
pub const STATE_PLAYING: u64 = 1;
pub const STATE_FINISHED: u64 = 2;

#[derive(Debug, Clone)]
struct ContractGame {
    owner: String,
    player_hand: Vec<u64>,
    bot_hand: Vec<u64>,
    played_cards: Vec<u64>,
    player_score: u64,
    bot_score: u64,
    current_round: u64,
    state: u64,
    /// Reads to swallow before the dealt hands become visible, emulating
    /// confirmation latency between `create_game` and state materializing.
    reveal_after: u32,
}

struct Inner {
    games: HashMap<u64, ContractGame>,
    next_game_id: u64,
    rng: ChaCha8Rng,
}

/// In-memory implementation of [`GameOracle`].
pub struct InMemoryOracle {
    inner: Mutex<Inner>,
    chain_id: u64,
    reveal_after: u32,
}

impl InMemoryOracle {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> InMemoryOracleBuilder {
        InMemoryOracleBuilder::default()
    }

    fn with(builder: InMemoryOracleBuilder) -> Self {
        let rng = match builder.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            inner: Mutex::new(Inner {
                games: HashMap::new(),
                next_game_id: 1,
                rng,
            }),
            chain_id: builder.chain_id,
            reveal_after: builder.reveal_after,
        }
    }
}

impl Default for InMemoryOracle {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for test/demo configuration of the in-memory oracle.
#[derive(Debug, Clone)]
pub struct InMemoryOracleBuilder {
    seed: Option<u64>,
    chain_id: u64,
    reveal_after: u32,
}

impl Default for InMemoryOracleBuilder {
    fn default() -> Self {
        Self {
            seed: None,
            chain_id: SEPOLIA_CHAIN_ID,
            reveal_after: 0,
        }
    }
}

impl InMemoryOracleBuilder {
    /// Deterministic dealing and bot play.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Pretend to be deployed on a different chain.
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Number of hand reads that return empty before the deal becomes
    /// visible (emulates slow on-chain confirmation).
    pub fn reveal_after(mut self, reads: u32) -> Self {
        self.reveal_after = reads;
        self
    }

    pub fn build(self) -> InMemoryOracle {
        InMemoryOracle::with(self)
    }
}

impl Inner {
    fn game(&self, game_id: u64) -> Result<&ContractGame, OracleError> {
        self.games
            .get(&game_id)
            .ok_or(OracleError::UnknownGame(game_id))
    }
}

#[async_trait]
impl GameOracle for InMemoryOracle {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn create_game(&self) -> Result<u64, OracleError> {
        let mut inner = self.inner.lock();
        let (player, bot) = deal_hands_with_rng(&mut inner.rng);
        let game_id = inner.next_game_id;
        inner.next_game_id += 1;
        inner.games.insert(
            game_id,
            ContractGame {
                owner: "0xplayer".to_owned(),
                player_hand: player.into_iter().map(u64::from).collect(),
                bot_hand: bot.into_iter().map(u64::from).collect(),
                played_cards: Vec::new(),
                player_score: 0,
                bot_score: 0,
                current_round: 0,
                state: STATE_WAITING,
                reveal_after: self.reveal_after,
            },
        );
        Ok(game_id)
    }

    async fn play_card(&self, game_id: u64, card_value: u64) -> Result<(), OracleError> {
        let mut inner = self.inner.lock();

        // Contract-side validation, mirrored error messages.
        let game = inner.game(game_id)?;
        if game.state == STATE_FINISHED || game.current_round >= TOTAL_ROUNDS {
            return Err(OracleError::Rejected(
                "game not in a playable state".to_owned(),
            ));
        }
        let Some(player_pos) = game.player_hand.iter().position(|&c| c == card_value) else {
            return Err(OracleError::Rejected("card not held".to_owned()));
        };

        let bot_pos = {
            let len = inner
                .games
                .get(&game_id)
                .map(|g| g.bot_hand.len())
                .unwrap_or(0);
            inner.rng.random_range(0..len)
        };

        let game = inner
            .games
            .get_mut(&game_id)
            .ok_or(OracleError::UnknownGame(game_id))?;
        let player_card = game.player_hand.remove(player_pos);
        let bot_card = game.bot_hand.remove(bot_pos);

        if player_card > bot_card {
            game.player_score += 1;
        } else if bot_card > player_card {
            game.bot_score += 1;
        }
        game.played_cards.push(player_card);
        game.played_cards.push(bot_card);
        game.current_round += 1;
        game.state = if game.current_round >= TOTAL_ROUNDS {
            STATE_FINISHED
        } else {
            STATE_PLAYING
        };

        Ok(())
    }

    async fn get_player_hand(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        let mut inner = self.inner.lock();
        let game = inner
            .games
            .get_mut(&game_id)
            .ok_or(OracleError::UnknownGame(game_id))?;
        if game.reveal_after > 0 {
            game.reveal_after -= 1;
            return Ok(Vec::new());
        }
        Ok(game.player_hand.clone())
    }

    async fn get_bot_hand(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        let inner = self.inner.lock();
        let game = inner.game(game_id)?;
        if game.reveal_after > 0 {
            return Ok(Vec::new());
        }
        Ok(game.bot_hand.clone())
    }

    async fn get_game_scores(&self, game_id: u64) -> Result<(u64, u64), OracleError> {
        let inner = self.inner.lock();
        let game = inner.game(game_id)?;
        Ok((game.player_score, game.bot_score))
    }

    async fn get_played_cards(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        let inner = self.inner.lock();
        Ok(inner.game(game_id)?.played_cards.clone())
    }

    async fn games(&self, game_id: u64) -> Result<GameRecord, OracleError> {
        let inner = self.inner.lock();
        let game = inner.game(game_id)?;
        Ok(GameRecord {
            owner: game.owner.clone(),
            current_round: game.current_round,
        })
    }

    async fn get_game_state(&self, game_id: u64) -> Result<u64, OracleError> {
        let inner = self.inner.lock();
        Ok(inner.game(game_id)?.state)
    }
}
