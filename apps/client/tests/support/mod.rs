//! Shared test doubles for the oracle boundary.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use client::oracle::trait_def::{GameOracle, GameRecord, OracleError};
use client::InMemoryOracle;

/// Delegating oracle that counts write invocations and can add artificial
/// confirmation latency, for asserting the at-most-one-in-flight rule.
pub struct CountingOracle {
    inner: InMemoryOracle,
    plays: AtomicU32,
    creates: AtomicU32,
    latency: Duration,
}

impl CountingOracle {
    pub fn new(inner: InMemoryOracle) -> Self {
        Self {
            inner,
            plays: AtomicU32::new(0),
            creates: AtomicU32::new(0),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn play_count(&self) -> u32 {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> u32 {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameOracle for CountingOracle {
    fn chain_id(&self) -> u64 {
        self.inner.chain_id()
    }

    async fn create_game(&self) -> Result<u64, OracleError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_game().await
    }

    async fn play_card(&self, game_id: u64, card_value: u64) -> Result<(), OracleError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.inner.play_card(game_id, card_value).await
    }

    async fn get_player_hand(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        self.inner.get_player_hand(game_id).await
    }

    async fn get_bot_hand(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        self.inner.get_bot_hand(game_id).await
    }

    async fn get_game_scores(&self, game_id: u64) -> Result<(u64, u64), OracleError> {
        self.inner.get_game_scores(game_id).await
    }

    async fn get_played_cards(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        self.inner.get_played_cards(game_id).await
    }

    async fn games(&self, game_id: u64) -> Result<GameRecord, OracleError> {
        self.inner.games(game_id).await
    }

    async fn get_game_state(&self, game_id: u64) -> Result<u64, OracleError> {
        self.inner.get_game_state(game_id).await
    }
}

/// Oracle whose reads can be switched to fail, for exercising the
/// null-on-failure policy of the remote client.
pub struct FlakyOracle {
    inner: InMemoryOracle,
    reads_fail: AtomicBool,
}

impl FlakyOracle {
    pub fn new(inner: InMemoryOracle) -> Self {
        Self {
            inner,
            reads_fail: AtomicBool::new(false),
        }
    }

    pub fn set_reads_fail(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), OracleError> {
        if self.reads_fail.load(Ordering::SeqCst) {
            Err(OracleError::Unreachable("injected read failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GameOracle for FlakyOracle {
    fn chain_id(&self) -> u64 {
        self.inner.chain_id()
    }

    async fn create_game(&self) -> Result<u64, OracleError> {
        self.inner.create_game().await
    }

    async fn play_card(&self, game_id: u64, card_value: u64) -> Result<(), OracleError> {
        self.inner.play_card(game_id, card_value).await
    }

    async fn get_player_hand(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        self.check()?;
        self.inner.get_player_hand(game_id).await
    }

    async fn get_bot_hand(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        self.check()?;
        self.inner.get_bot_hand(game_id).await
    }

    async fn get_game_scores(&self, game_id: u64) -> Result<(u64, u64), OracleError> {
        self.check()?;
        self.inner.get_game_scores(game_id).await
    }

    async fn get_played_cards(&self, game_id: u64) -> Result<Vec<u64>, OracleError> {
        self.check()?;
        self.inner.get_played_cards(game_id).await
    }

    async fn games(&self, game_id: u64) -> Result<GameRecord, OracleError> {
        self.check()?;
        self.inner.games(game_id).await
    }

    async fn get_game_state(&self, game_id: u64) -> Result<u64, OracleError> {
        self.check()?;
        self.inner.get_game_state(game_id).await
    }
}

/// Wait until the session reports the given predicate or the timeout
/// elapses; panics on timeout.
pub async fn wait_for(
    controller: &client::SessionController,
    timeout: Duration,
    mut predicate: impl FnMut(&client::SessionSnapshot) -> bool,
) {
    let mut rx = controller.subscribe();
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if predicate(&controller.snapshot()) {
            return;
        }
        let remaining = deadline
            .checked_duration_since(tokio::time::Instant::now())
            .expect("timed out waiting for session state");
        tokio::time::timeout(remaining, rx.changed())
            .await
            .expect("timed out waiting for session state")
            .expect("session version channel closed");
    }
}
