#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Client for the FHE card duel: a 5-round card-comparison game whose
//! authoritative state lives in an on-chain oracle contract.
//!
//! Layering, leaf to root: `domain` (pure turn protocol), `oracle` (the
//! external contract surface), `services` (remote bridge and local
//! simulation behind one driver seam), `session` (UI-facing controller).

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod oracle;
pub mod services;
pub mod session;
pub mod telemetry;
pub mod utils;

// Re-exports for public API
pub use config::network::{NetworkConfig, SEPOLIA_CHAIN_ID};
pub use domain::state::{CardRank, MatchId, MatchState, Phase, PlayedRound, RoundOutcome, Winner};
pub use error::ClientError;
pub use oracle::memory::InMemoryOracle;
pub use oracle::trait_def::{GameOracle, OracleError};
pub use services::driver::{MatchDriver, Mode};
pub use services::remote_match::{PollConfig, RemoteMatchClient};
pub use services::simulation::{LocalSimulation, SimTiming};
pub use session::controller::SessionController;
pub use session::snapshot::{SessionSnapshot, SessionStatus};
