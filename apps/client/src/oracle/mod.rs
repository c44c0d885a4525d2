//! The oracle boundary: contract surface trait and the in-memory
//! stand-in used for tests and offline demos.

pub mod memory;
pub mod trait_def;

pub use memory::{InMemoryOracle, InMemoryOracleBuilder};
pub use trait_def::{GameOracle, GameRecord, OracleError};
