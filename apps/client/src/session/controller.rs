//! Session controller: single source of truth for UI-facing state.
//!
//! Owns the active match snapshot, the mode selection, and the history
//! log. Dispatches to the configured [`MatchDriver`] (remote oracle or
//! local simulation) and reconciles every authoritative fetch by
//! wholesale replacement; [`derive_match_transitions`] over the replaced
//! snapshots is the only place history lines are produced from game
//! state.
//!
//! Concurrency rules enforced here: at most one in-flight write per
//! match (a re-entrant call while loading is ignored, not queued); no
//! moves after the terminal phase; every async continuation checks the
//! cancellation token before touching shared state, so nothing mutates
//! after `dispose`; every post-await mutation re-checks the session
//! epoch, so nothing mutates after `reset` either.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::network::NetworkConfig;
use crate::domain::state::{CardRank, MatchId, MatchState, Phase, RoundOutcome, Winner};
use crate::domain::transition::{derive_match_transitions, MatchTransition};
use crate::error::ClientError;
use crate::oracle::trait_def::GameOracle;
use crate::services::driver::{MatchDriver, Mode};
use crate::services::remote_match::RemoteMatchClient;
use crate::services::simulation::{LocalSimulation, SimTiming};
use crate::session::history::HistoryLog;
use crate::session::snapshot::{SessionSnapshot, SessionStatus};

/// History lines included in each snapshot.
const HISTORY_WINDOW: usize = 50;

struct SessionState {
    status: SessionStatus,
    match_id: Option<MatchId>,
    /// Displayed match state; may carry a speculative local delta while a
    /// move is in flight.
    match_state: Option<MatchState>,
    /// Last authoritative state, kept only while `match_state` is
    /// speculative; restored on failure, diffed against on success.
    confirmed: Option<MatchState>,
    /// Cancels the update-watcher of the current match.
    watcher: Option<CancellationToken>,
    is_loading: bool,
    winner: Option<Winner>,
    error: Option<String>,
    history: HistoryLog,
    /// Bumped on every start and reset. Async flows capture it at their
    /// gate and re-check it under the lock before each post-await
    /// mutation; a mismatch means the match was discarded or superseded
    /// and the continuation must not touch state.
    epoch: u64,
}

struct Inner {
    driver: Box<dyn MatchDriver>,
    mode: Mode,
    state: Mutex<SessionState>,
    version: watch::Sender<u64>,
    cancel: CancellationToken,
    disposed: AtomicBool,
}

impl Inner {
    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

/// Top-level orchestrator owning UI-facing state, with explicit lifecycle
/// (construct, use, `dispose`) instead of module-level shared state.
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    /// Remote play against the given oracle, gated to the configured
    /// network.
    pub fn remote(oracle: Arc<dyn GameOracle>, network: NetworkConfig) -> Self {
        Self::with_driver(
            Mode::Remote,
            Box::new(RemoteMatchClient::new(oracle, network)),
        )
    }

    /// Offline demo: the simulation plays both sides.
    pub fn simulated(timing: SimTiming) -> Self {
        Self::with_driver(Mode::Simulated, Box::new(LocalSimulation::new(timing)))
    }

    /// Deterministic offline demo.
    pub fn simulated_seeded(timing: SimTiming, seed: u64) -> Self {
        Self::with_driver(
            Mode::Simulated,
            Box::new(LocalSimulation::with_seed(timing, Some(seed))),
        )
    }

    /// Build over any driver; the seam the integration tests use.
    pub fn with_driver(mode: Mode, driver: Box<dyn MatchDriver>) -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(Inner {
                driver,
                mode,
                state: Mutex::new(SessionState {
                    status: SessionStatus::Idle,
                    match_id: None,
                    match_state: None,
                    confirmed: None,
                    watcher: None,
                    is_loading: false,
                    winner: None,
                    error: None,
                    history: HistoryLog::default(),
                    epoch: 0,
                }),
                version,
                cancel: CancellationToken::new(),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn mode(&self) -> Mode {
        self.inner.mode
    }

    /// Version channel bumped on every observable state change; the
    /// presentation layer re-reads [`snapshot`](Self::snapshot) on each
    /// bump.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    /// Create a new match and wait until its initial state is available.
    ///
    /// Ignored (returns `Ok`) if another write is already in flight.
    pub async fn start_new_match(&self) -> Result<(), ClientError> {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return Err(ClientError::Disposed);
        }

        let epoch = {
            let mut s = self.inner.state.lock();
            if s.is_loading {
                debug!("creation already in flight; ignoring");
                return Ok(());
            }
            if let Some(token) = s.watcher.take() {
                token.cancel();
            }
            s.epoch += 1;
            s.is_loading = true;
            s.status = SessionStatus::Starting;
            s.match_id = None;
            s.match_state = None;
            s.confirmed = None;
            s.winner = None;
            s.error = None;
            s.history.push(match self.inner.mode {
                Mode::Remote => "Starting match...",
                Mode::Simulated => "Starting demo match...",
            });
            s.epoch
        };
        self.inner.bump();

        let created = tokio::select! {
            _ = self.inner.cancel.cancelled() => return Err(ClientError::Disposed),
            result = self.inner.driver.create_match() => result,
        };

        let match_id = match created {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "match creation failed");
                let mut s = self.inner.state.lock();
                if s.epoch == epoch {
                    s.is_loading = false;
                    s.status = SessionStatus::Idle;
                    s.error = Some(err.to_string());
                    s.history.push(format!("Failed to start match: {err}"));
                    drop(s);
                    self.inner.bump();
                }
                return Err(err);
            }
        };

        let fetched = tokio::select! {
            _ = self.inner.cancel.cancelled() => return Err(ClientError::Disposed),
            state = self.inner.driver.fetch_state(match_id) => state,
        };

        let updates = self.inner.driver.updates();
        let token = self.inner.cancel.child_token();
        {
            let mut s = self.inner.state.lock();
            if s.epoch != epoch {
                debug!(match_id, "creation superseded; discarding");
                return Err(ClientError::Disposed);
            }
            s.match_id = Some(match_id);
            s.is_loading = false;
            s.status = SessionStatus::Active;
            match fetched {
                Some(new_state) => {
                    reconcile(&mut s, new_state);
                }
                None => {
                    s.error = Some(
                        self.inner
                            .driver
                            .last_error()
                            .unwrap_or_else(|| "initial state unavailable".to_owned()),
                    );
                }
            }
            if updates.is_some() {
                s.watcher = Some(token.clone());
            }
        }
        self.inner.bump();
        info!(match_id, mode = ?self.inner.mode, "match started");

        // Push-style drivers (the simulation) report changes through a
        // version channel; mirror them into our own state as they land.
        if let Some(rx) = updates {
            tokio::spawn(watch_updates(
                Arc::clone(&self.inner),
                match_id,
                rx,
                token,
            ));
        }

        Ok(())
    }

    /// Play a card. Returns whether a move actually reached the driver;
    /// rejection reasons (finished match, in-flight write, card not held,
    /// oracle refusal) are reflected in the snapshot, never thrown.
    pub async fn play_card(&self, card: CardRank) -> bool {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return false;
        }

        enum Gate {
            Silent,
            Noted,
            Proceed(MatchId, u64),
        }

        let gate = {
            let mut s = self.inner.state.lock();
            if s.status == SessionStatus::Finished {
                debug!("match finished; move rejected");
                Gate::Silent
            } else if s.status != SessionStatus::Active || s.is_loading {
                debug!(card, "no active match or write in flight; move ignored");
                Gate::Silent
            } else if self.inner.mode == Mode::Simulated {
                // The demo plays itself; a selection is only acknowledged.
                s.history.push(format!("Selected card {card} (demo plays both sides)"));
                Gate::Noted
            } else {
                let held = s
                    .match_state
                    .as_ref()
                    .is_some_and(|m| m.player_hand.contains(&card));
                match s.match_id {
                    Some(id) if held => {
                        s.is_loading = true;
                        s.error = None;
                        // Speculative delta for responsiveness: drop the
                        // card from the displayed hand now, replace
                        // wholesale once the authoritative fetch returns.
                        if let Some(current) = s.match_state.take() {
                            let mut optimistic = current.clone();
                            optimistic.player_hand.retain(|&c| c != card);
                            s.confirmed = Some(current);
                            s.match_state = Some(optimistic);
                        }
                        s.history.push(format!("Playing card {card}"));
                        s.history.push("Opponent is thinking...");
                        Gate::Proceed(id, s.epoch)
                    }
                    Some(_) => {
                        s.error = Some(format!("card {card} is not in your hand"));
                        s.history.push(format!("Cannot play card {card}: not in hand"));
                        Gate::Noted
                    }
                    None => Gate::Silent,
                }
            }
        };

        let (match_id, epoch) = match gate {
            Gate::Silent => return false,
            Gate::Noted => {
                self.inner.bump();
                return false;
            }
            Gate::Proceed(id, epoch) => (id, epoch),
        };
        self.inner.bump();

        let submitted = tokio::select! {
            _ = self.inner.cancel.cancelled() => return false,
            ok = self.inner.driver.submit_move(match_id, card) => ok,
        };

        if !submitted {
            let detail = self
                .inner
                .driver
                .last_error()
                .unwrap_or_else(|| "failed to play card".to_owned());
            warn!(match_id, card, detail, "move submission failed");
            let mut s = self.inner.state.lock();
            if s.epoch != epoch {
                return false;
            }
            if let Some(confirmed) = s.confirmed.take() {
                s.match_state = Some(confirmed);
            }
            s.error = Some(detail.clone());
            s.history.push(format!("Play failed: {detail}"));
            s.is_loading = false;
            drop(s);
            self.inner.bump();
            return false;
        }

        let fetched = tokio::select! {
            _ = self.inner.cancel.cancelled() => return false,
            state = self.inner.driver.fetch_state(match_id) => state,
        };

        let finished = {
            let mut s = self.inner.state.lock();
            if s.epoch != epoch {
                return false;
            }
            let finished = match fetched {
                Some(new_state) => reconcile(&mut s, new_state),
                None => {
                    // Keep the last confirmed state; the player can retry.
                    if let Some(confirmed) = s.confirmed.take() {
                        s.match_state = Some(confirmed);
                    }
                    let detail = self
                        .inner
                        .driver
                        .last_error()
                        .unwrap_or_else(|| "state refresh failed".to_owned());
                    s.error = Some(detail);
                    s.history.push("State refresh failed; showing last confirmed state");
                    false
                }
            };
            s.is_loading = false;
            finished
        };
        self.inner.bump();

        if finished {
            self.settle_winner(match_id, epoch).await;
        }
        true
    }

    /// Authoritative winner read once the terminal phase is observed.
    /// The locally derived winner is already in place if this fails.
    async fn settle_winner(&self, match_id: MatchId, epoch: u64) {
        let winner = tokio::select! {
            _ = self.inner.cancel.cancelled() => return,
            w = self.inner.driver.fetch_winner(match_id) => w,
        };
        if let Some(winner) = winner {
            let mut s = self.inner.state.lock();
            if s.epoch != epoch {
                return;
            }
            s.winner = Some(winner);
            drop(s);
            self.inner.bump();
        }
    }

    /// Discard the current match and return to `Idle`. Any in-flight
    /// continuation for the discarded match finds a newer epoch and
    /// drops out without mutating state.
    pub fn reset(&self) {
        let mut s = self.inner.state.lock();
        if let Some(token) = s.watcher.take() {
            token.cancel();
        }
        s.epoch += 1;
        s.status = SessionStatus::Idle;
        s.match_id = None;
        s.match_state = None;
        s.confirmed = None;
        s.winner = None;
        s.error = None;
        s.is_loading = false;
        s.history.clear();
        drop(s);
        self.inner.bump();
    }

    /// Tear the session down: cancels pending timers and in-flight
    /// polling; any still-running continuation is discarded before it can
    /// mutate state. Idempotent.
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
        self.inner.cancel.cancel();
        self.inner.driver.shutdown();
    }

    /// Current presentation-facing view.
    pub fn snapshot(&self) -> SessionSnapshot {
        let s = self.inner.state.lock();
        let m = s.match_state.as_ref();
        SessionSnapshot {
            status: s.status,
            match_id: s.match_id,
            phase: m.map(|m| m.phase).unwrap_or(Phase::Waiting),
            player_hand: m.map(|m| m.player_hand.clone()).unwrap_or_default(),
            opponent_hand: m.map(|m| m.opponent_hand.clone()).unwrap_or_default(),
            last_played: m.and_then(|m| m.last_played().copied()),
            player_score: m.map(|m| m.player_score).unwrap_or(0),
            opponent_score: m.map(|m| m.opponent_score).unwrap_or(0),
            round: m.map(|m| m.rounds_played).unwrap_or(0),
            is_loading: s.is_loading,
            opponent_thinking: self.inner.driver.opponent_thinking(),
            error: s.error.clone(),
            winner: s.winner,
            history: s.history.recent(HISTORY_WINDOW),
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn winner_label(winner: Winner) -> &'static str {
    match winner {
        Winner::Player => "Player",
        Winner::Opponent => "Opponent",
        Winner::Tie => "Tie",
    }
}

/// Wholesale replacement of the displayed state by an authoritative one,
/// translating the diff into history lines. Returns whether the new
/// state is terminal.
fn reconcile(s: &mut SessionState, new_state: MatchState) -> bool {
    let before = s
        .confirmed
        .take()
        .or_else(|| s.match_state.take())
        .unwrap_or_else(MatchState::waiting);

    for transition in derive_match_transitions(&before, &new_state) {
        match transition {
            MatchTransition::MatchStarted => {
                s.history.push("Hands dealt - match started");
                s.history
                    .push(format!("Your hand: {:?}", new_state.player_hand));
            }
            MatchTransition::RoundResolved {
                round,
                outcome,
                player_score,
                opponent_score,
            } => {
                s.history.push(format!(
                    "Round {}: player {} vs opponent {}",
                    round.round_index + 1,
                    round.player_card,
                    round.opponent_card
                ));
                s.history.push(match outcome {
                    RoundOutcome::PlayerWins => "Player wins the round (+1 point)",
                    RoundOutcome::OpponentWins => "Opponent wins the round (+1 point)",
                    RoundOutcome::Tie => "Round tied (no points)",
                });
                s.history
                    .push(format!("Score: player {player_score} - opponent {opponent_score}"));
            }
            MatchTransition::MatchFinished { winner } => {
                s.winner = Some(winner);
                s.status = SessionStatus::Finished;
                s.history.push(format!(
                    "Match finished - final score: player {} - opponent {}",
                    new_state.player_score, new_state.opponent_score
                ));
                s.history.push(format!("Winner: {}", winner_label(winner)));
            }
        }
    }

    let finished = new_state.is_terminal();
    s.match_state = Some(new_state);
    finished
}

/// Mirror a push-style driver's changes into the session, one
/// authoritative fetch per change notification. Stops at the terminal
/// phase, on cancellation, or when the match is superseded.
async fn watch_updates(
    inner: Arc<Inner>,
    match_id: MatchId,
    mut rx: watch::Receiver<u64>,
    token: CancellationToken,
) {
    let mut was_thinking = false;
    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            changed = rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
        if inner.disposed.load(Ordering::SeqCst) {
            return;
        }

        let thinking = inner.driver.opponent_thinking();
        let fetched = tokio::select! {
            _ = token.cancelled() => return,
            state = inner.driver.fetch_state(match_id) => state,
        };

        let finished = {
            let mut s = inner.state.lock();
            if s.match_id != Some(match_id) {
                return;
            }
            if thinking && !was_thinking {
                let next_round = s
                    .match_state
                    .as_ref()
                    .map(|m| m.rounds_played + 1)
                    .unwrap_or(1);
                s.history
                    .push(format!("Round {next_round} starting - opponent thinking"));
            }
            match fetched {
                Some(new_state) => reconcile(&mut s, new_state),
                None => false,
            }
        };
        was_thinking = thinking;
        inner.bump();

        if finished {
            let winner = tokio::select! {
                _ = token.cancelled() => return,
                w = inner.driver.fetch_winner(match_id) => w,
            };
            if let Some(winner) = winner {
                inner.state.lock().winner = Some(winner);
                inner.bump();
            }
            return;
        }
    }
}
