//! Local simulation engine: the same turn protocol with no oracle.
//!
//! Used for unauthenticated/offline demonstration. Deals via the domain
//! core, then auto-plays both sides on a timer: a fixed "thinking" delay
//! before each selection, a fixed pause between rounds, five rounds to
//! the terminal phase. Card selection is random; the protocol shape is
//! not.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::dealing::deal_hands_with_rng;
use crate::domain::rules::{determine_winner, resolve_round};
use crate::domain::state::{CardRank, MatchId, MatchState, Winner};
use crate::error::ClientError;
use crate::services::driver::MatchDriver;

/// Delays driving the simulated protocol. Defaults match the original
/// demo pacing; [`SimTiming::fast`] collapses them for tests and headless
/// runs.
#[derive(Debug, Clone, Copy)]
pub struct SimTiming {
    /// Delay before the first round starts.
    pub start_delay: Duration,
    /// Artificial "thinking" delay before each selection.
    pub think_delay: Duration,
    /// Pause between a resolved round and the next one.
    pub round_delay: Duration,
}

impl Default for SimTiming {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_secs(3),
            think_delay: Duration::from_millis(2500),
            round_delay: Duration::from_secs(5),
        }
    }
}

impl SimTiming {
    pub fn fast() -> Self {
        Self {
            start_delay: Duration::from_millis(5),
            think_delay: Duration::from_millis(5),
            round_delay: Duration::from_millis(5),
        }
    }
}

struct SimState {
    match_state: Option<MatchState>,
    /// Bumped per created match; a stale round task sees the mismatch and
    /// stops instead of mutating the replacement match.
    generation: u64,
    next_match_id: MatchId,
    last_error: Option<String>,
}

struct Shared {
    state: Mutex<SimState>,
    version: watch::Sender<u64>,
    thinking: AtomicBool,
    cancel: CancellationToken,
}

impl Shared {
    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

/// Offline [`MatchDriver`]: authoritative state lives in this process.
pub struct LocalSimulation {
    shared: Arc<Shared>,
    timing: SimTiming,
    seed: Option<u64>,
}

impl LocalSimulation {
    pub fn new(timing: SimTiming) -> Self {
        Self::with_seed(timing, None)
    }

    /// Deterministic dealing and card selection for a given seed.
    pub fn with_seed(timing: SimTiming, seed: Option<u64>) -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SimState {
                    match_state: None,
                    generation: 0,
                    next_match_id: 1,
                    last_error: None,
                }),
                version,
                thinking: AtomicBool::new(false),
                cancel: CancellationToken::new(),
            }),
            timing,
            seed,
        }
    }

    fn rng(&self) -> Box<dyn RngCore + Send> {
        match self.seed {
            Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_os_rng()),
        }
    }
}

#[async_trait]
impl MatchDriver for LocalSimulation {
    async fn create_match(&self) -> Result<MatchId, ClientError> {
        let mut rng = self.rng();
        let (player, opponent) = deal_hands_with_rng(&mut *rng);

        let (match_id, generation) = {
            let mut sim = self.shared.state.lock();
            let match_id = sim.next_match_id;
            sim.next_match_id += 1;
            sim.generation += 1;

            let mut state = MatchState::new(player, opponent);
            state.match_id = Some(match_id);
            sim.match_state = Some(state);
            (match_id, sim.generation)
        };
        self.shared.bump();
        info!(match_id, "simulated match dealt");

        tokio::spawn(run_rounds(
            Arc::clone(&self.shared),
            self.timing,
            rng,
            generation,
        ));

        Ok(match_id)
    }

    /// The demo plays itself; player card selection is not accepted.
    async fn submit_move(&self, _match_id: MatchId, _card: CardRank) -> bool {
        self.shared.state.lock().last_error = Some("simulated match plays itself".to_owned());
        false
    }

    async fn fetch_state(&self, match_id: MatchId) -> Option<MatchState> {
        let sim = self.shared.state.lock();
        sim.match_state
            .as_ref()
            .filter(|s| s.match_id == Some(match_id))
            .cloned()
    }

    async fn fetch_winner(&self, match_id: MatchId) -> Option<Winner> {
        let sim = self.shared.state.lock();
        sim.match_state
            .as_ref()
            .filter(|s| s.match_id == Some(match_id) && s.is_terminal())
            .map(determine_winner)
    }

    fn last_error(&self) -> Option<String> {
        self.shared.state.lock().last_error.clone()
    }

    fn updates(&self) -> Option<watch::Receiver<u64>> {
        Some(self.shared.version.subscribe())
    }

    fn opponent_thinking(&self) -> bool {
        self.shared.thinking.load(Ordering::SeqCst)
    }

    fn shutdown(&self) {
        self.shared.cancel.cancel();
    }
}

impl Drop for LocalSimulation {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

/// Cancellable sleep; `false` means the simulation was torn down and the
/// caller must not touch shared state again.
async fn pause(shared: &Shared, duration: Duration) -> bool {
    tokio::select! {
        _ = shared.cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

async fn run_rounds(
    shared: Arc<Shared>,
    timing: SimTiming,
    mut rng: Box<dyn RngCore + Send>,
    generation: u64,
) {
    if !pause(&shared, timing.start_delay).await {
        return;
    }

    loop {
        // Round starting: opponent "thinks" before cards are selected.
        shared.thinking.store(true, Ordering::SeqCst);
        shared.bump();
        if !pause(&shared, timing.think_delay).await {
            shared.thinking.store(false, Ordering::SeqCst);
            return;
        }

        let finished = {
            let mut sim = shared.state.lock();
            if sim.generation != generation {
                // A newer match replaced this one; stop quietly.
                shared.thinking.store(false, Ordering::SeqCst);
                return;
            }
            let Some(state) = sim.match_state.as_mut() else {
                shared.thinking.store(false, Ordering::SeqCst);
                return;
            };

            let player_card = state.player_hand[rng.random_range(0..state.player_hand.len())];
            let opponent_card =
                state.opponent_hand[rng.random_range(0..state.opponent_hand.len())];

            match resolve_round(state, player_card, opponent_card) {
                Ok(res) => {
                    debug!(
                        round = res.round_index + 1,
                        player_card, opponent_card, outcome = ?res.outcome,
                        "simulated round resolved"
                    );
                    res.finished
                }
                Err(err) => {
                    // Cannot happen with cards drawn from the hands above.
                    error!(%err, "simulated round resolution failed");
                    sim.last_error = Some(err.to_string());
                    true
                }
            }
        };
        shared.thinking.store(false, Ordering::SeqCst);
        shared.bump();

        if finished {
            return;
        }
        if !pause(&shared, timing.round_delay).await {
            return;
        }
    }
}
