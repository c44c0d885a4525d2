//! Oracle seam: the on-chain contract surface the client consumes.
//!
//! The oracle owns the true match state; the client never re-implements
//! round resolution for remote play, it only reads results back. Values
//! cross this boundary as wide integers the way they arrive off the wire;
//! normalization to the domain model happens in the remote match client.

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced at the oracle boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle rejected the operation for a domain reason
    /// ("card not held", "not your game", "game not in playable state").
    #[error("oracle rejected operation: {0}")]
    Rejected(String),

    /// Transport or node failure.
    #[error("oracle unreachable: {0}")]
    Unreachable(String),

    /// No game exists under this id.
    #[error("unknown game id {0}")]
    UnknownGame(u64),
}

/// Per-game bookkeeping exposed by the contract's `games(id)` getter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub owner: String,
    pub current_round: u64,
}

/// The fixed contract surface (treated as external, never duplicated).
///
/// Game-state encoding: `0 = Waiting`, `1 = Playing`, `2 = Finished`.
#[async_trait]
pub trait GameOracle: Send + Sync {
    /// Chain the oracle is deployed on; the client refuses any other.
    fn chain_id(&self) -> u64;

    /// Create a game; asynchronous confirmation, returns the new game id.
    async fn create_game(&self) -> Result<u64, OracleError>;

    /// Play a card. The contract auto-plays the bot and resolves the
    /// round within the same transaction.
    async fn play_card(&self, game_id: u64, card_value: u64) -> Result<(), OracleError>;

    async fn get_player_hand(&self, game_id: u64) -> Result<Vec<u64>, OracleError>;

    async fn get_bot_hand(&self, game_id: u64) -> Result<Vec<u64>, OracleError>;

    /// `(player_score, bot_score)`.
    async fn get_game_scores(&self, game_id: u64) -> Result<(u64, u64), OracleError>;

    /// Flat sequence of `(player, bot)` pairs in emission order.
    async fn get_played_cards(&self, game_id: u64) -> Result<Vec<u64>, OracleError>;

    async fn games(&self, game_id: u64) -> Result<GameRecord, OracleError>;

    async fn get_game_state(&self, game_id: u64) -> Result<u64, OracleError>;
}
