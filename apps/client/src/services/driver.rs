//! Unified orchestrator seam for the session controller.
//!
//! Remote play and offline simulation expose the same capability set
//! (create / submit / fetch state / fetch winner) and the same snapshot
//! vocabulary, so the controller is written once against this trait and
//! the mode is chosen at construction.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::state::{CardRank, MatchId, MatchState, Winner};
use crate::error::ClientError;

/// Which orchestrator backs the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Authoritative state lives in the on-chain oracle.
    Remote,
    /// Authoritative state lives in the local simulation engine.
    Simulated,
}

/// Capability set shared by the remote client and the local simulation.
///
/// Failure policy: `submit_move` fails softly (`false`) and `fetch_*`
/// return `None` on any failure; the reason is captured by
/// [`last_error`](MatchDriver::last_error). Only `create_match` surfaces
/// typed errors, because the caller branches on them (retry budget
/// exhausted vs. wrong network vs. creation refused).
#[async_trait]
pub trait MatchDriver: Send + Sync {
    async fn create_match(&self) -> Result<MatchId, ClientError>;

    async fn submit_move(&self, match_id: MatchId, card: CardRank) -> bool;

    async fn fetch_state(&self, match_id: MatchId) -> Option<MatchState>;

    async fn fetch_winner(&self, match_id: MatchId) -> Option<Winner>;

    /// Last captured failure reason, if any.
    fn last_error(&self) -> Option<String>;

    /// Version channel bumped whenever authoritative state changed behind
    /// the caller's back. `None` for drivers whose state only changes in
    /// response to the caller's own operations.
    fn updates(&self) -> Option<watch::Receiver<u64>> {
        None
    }

    /// Whether the opponent is currently "thinking" (simulation only).
    fn opponent_thinking(&self) -> bool {
        false
    }

    /// Cancel any internal tasks. Idempotent.
    fn shutdown(&self) {}
}
