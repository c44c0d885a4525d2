//! Orchestrators: remote oracle bridge and local simulation, unified
//! behind the [`driver::MatchDriver`] seam.

pub mod driver;
pub mod remote_match;
pub mod simulation;

pub use driver::{MatchDriver, Mode};
pub use remote_match::{PollConfig, RemoteMatchClient};
pub use simulation::{LocalSimulation, SimTiming};
