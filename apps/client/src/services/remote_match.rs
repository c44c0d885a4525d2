//! Remote game client: bridges the oracle surface to the local match
//! representation.
//!
//! This layer does not resolve rounds. It submits plays, waits out
//! confirmation latency, and maps authoritative oracle reads onto
//! [`MatchState`]. Every oracle failure is absorbed here into `None` /
//! `false` plus a captured last-error string; nothing propagates to the
//! session controller as an uncaught failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::network::NetworkConfig;
use crate::domain::state::{CardRank, MatchId, MatchState, Phase, PlayedRound, Winner};
use crate::error::ClientError;
use crate::oracle::trait_def::GameOracle;
use crate::services::driver::MatchDriver;
use crate::utils::retry::retry_until_some;

/// Polling budget for waiting on the oracle to materialize initial state.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(1),
        }
    }
}

/// Client for a match whose authoritative state lives in the oracle.
pub struct RemoteMatchClient {
    oracle: Arc<dyn GameOracle>,
    network: NetworkConfig,
    poll: PollConfig,
    /// Wait after a confirmed play before the state is considered
    /// re-readable (the contract settles bot play in the same
    /// transaction, but reads lag confirmation).
    confirmation_delay: Duration,
    last_error: Mutex<Option<String>>,
}

impl RemoteMatchClient {
    pub fn new(oracle: Arc<dyn GameOracle>, network: NetworkConfig) -> Self {
        Self {
            oracle,
            network,
            poll: PollConfig::default(),
            confirmation_delay: Duration::from_secs(2),
            last_error: Mutex::new(None),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.confirmation_delay = delay;
        self
    }

    fn record_error(&self, detail: impl Into<String>) {
        *self.last_error.lock() = Some(detail.into());
    }

    /// Create a match and poll until the oracle has materialized its
    /// initial state (hands populated).
    pub async fn create_match(&self) -> Result<MatchId, ClientError> {
        self.network.ensure_chain(self.oracle.chain_id())?;

        let game_id = self.oracle.create_game().await.map_err(|err| {
            self.record_error(err.to_string());
            ClientError::creation_failed(err.to_string())
        })?;
        info!(game_id, "match created, waiting for state to materialize");

        let state = retry_until_some(self.poll.max_attempts, self.poll.interval, || async {
            self.fetch_state(game_id)
                .await
                .filter(|s| !s.player_hand.is_empty())
        })
        .await
        .map_err(|timeout| {
            self.record_error(format!(
                "state for game {game_id} unavailable after {} attempts",
                timeout.attempts
            ));
            ClientError::StateUnavailable {
                attempts: timeout.attempts,
            }
        })?;

        debug!(game_id, hand = ?state.player_hand, "initial state available");
        Ok(game_id)
    }

    /// Submit a play. Soft failure: oracle rejections (card not held,
    /// wrong turn, finished game) come back as `false` with the message
    /// captured, and the caller surfaces it.
    pub async fn submit_move(&self, match_id: MatchId, card: CardRank) -> bool {
        debug!(game_id = match_id, card, "submitting play");
        match self.oracle.play_card(match_id, u64::from(card)).await {
            Ok(()) => {
                tokio::time::sleep(self.confirmation_delay).await;
                true
            }
            Err(err) => {
                warn!(game_id = match_id, card, %err, "play rejected");
                self.record_error(err.to_string());
                false
            }
        }
    }

    /// Single-shot authoritative read of all oracle-held fields. Any read
    /// failure (including values that do not fit the match model) yields
    /// `None`; this never fails loudly.
    pub async fn fetch_state(&self, match_id: MatchId) -> Option<MatchState> {
        let (player_hand, bot_hand, scores, played, record, game_state) = tokio::join!(
            self.oracle.get_player_hand(match_id),
            self.oracle.get_bot_hand(match_id),
            self.oracle.get_game_scores(match_id),
            self.oracle.get_played_cards(match_id),
            self.oracle.games(match_id),
            self.oracle.get_game_state(match_id),
        );

        let read = (|| -> Result<MatchState, String> {
            let player_hand = normalize_hand(player_hand.map_err(|e| e.to_string())?)?;
            let opponent_hand = normalize_hand(bot_hand.map_err(|e| e.to_string())?)?;
            let (player_score, opponent_score) = {
                let (p, b) = scores.map_err(|e| e.to_string())?;
                (narrow(p)?, narrow(b)?)
            };
            let played_history = pair_played_cards(played.map_err(|e| e.to_string())?)?;
            let rounds_played = narrow(record.map_err(|e| e.to_string())?.current_round)?;
            let phase = decode_phase(game_state.map_err(|e| e.to_string())?)?;

            Ok(MatchState {
                match_id: Some(match_id),
                phase,
                player_hand,
                opponent_hand,
                rounds_played,
                player_score,
                opponent_score,
                played_history,
            })
        })();

        match read {
            Ok(state) => Some(state),
            Err(detail) => {
                warn!(game_id = match_id, detail, "state read failed");
                self.record_error(detail);
                None
            }
        }
    }

    /// Winner is only meaningful once the oracle reports Finished.
    pub async fn fetch_winner(&self, match_id: MatchId) -> Option<Winner> {
        let state = self.oracle.get_game_state(match_id).await.ok()?;
        if decode_phase(state).ok()? != Phase::Finished {
            return None;
        }
        let (player, bot) = self.oracle.get_game_scores(match_id).await.ok()?;
        Some(if player > bot {
            Winner::Player
        } else if bot > player {
            Winner::Opponent
        } else {
            Winner::Tie
        })
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

/// Lossless downcast of a wire integer to a model-width field.
fn narrow(value: u64) -> Result<u8, String> {
    u8::try_from(value).map_err(|_| format!("oracle value {value} out of model range"))
}

fn normalize_hand(hand: Vec<u64>) -> Result<Vec<CardRank>, String> {
    hand.into_iter().map(narrow).collect()
}

/// The oracle emits played cards as a flat `(player, bot)*` sequence.
fn pair_played_cards(flat: Vec<u64>) -> Result<Vec<PlayedRound>, String> {
    if flat.len() % 2 != 0 {
        return Err(format!("odd played-cards sequence of length {}", flat.len()));
    }
    flat.chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            Ok(PlayedRound {
                player_card: narrow(pair[0])?,
                opponent_card: narrow(pair[1])?,
                round_index: u8::try_from(i).map_err(|_| "round index overflow".to_owned())?,
            })
        })
        .collect()
}

fn decode_phase(raw: u64) -> Result<Phase, String> {
    match raw {
        0 => Ok(Phase::Waiting),
        1 => Ok(Phase::InProgress),
        2 => Ok(Phase::Finished),
        other => Err(format!("unknown game state {other}")),
    }
}

#[async_trait]
impl MatchDriver for RemoteMatchClient {
    async fn create_match(&self) -> Result<MatchId, ClientError> {
        RemoteMatchClient::create_match(self).await
    }

    async fn submit_move(&self, match_id: MatchId, card: CardRank) -> bool {
        RemoteMatchClient::submit_move(self, match_id, card).await
    }

    async fn fetch_state(&self, match_id: MatchId) -> Option<MatchState> {
        RemoteMatchClient::fetch_state(self, match_id).await
    }

    async fn fetch_winner(&self, match_id: MatchId) -> Option<Winner> {
        RemoteMatchClient::fetch_winner(self, match_id).await
    }

    fn last_error(&self) -> Option<String> {
        RemoteMatchClient::last_error(self)
    }
}
