//! Network configuration for remote play.
//!
//! The game contract is only considered reachable on one fixed chain;
//! any other active network is a configuration error surfaced to the
//! user, never attempted.

use crate::error::ClientError;

/// Sepolia testnet, where the mock FHE contract is deployed.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Environment variable overriding the expected chain id.
pub const CHAIN_ID_ENV: &str = "CARD_DUEL_CHAIN_ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The only chain id remote play is attempted on.
    pub chain_id: u64,
}

impl NetworkConfig {
    pub fn sepolia() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
        }
    }

    /// Read the expected chain from the environment, falling back to
    /// Sepolia. A malformed value falls back rather than failing: the
    /// mismatch against the oracle will surface the problem anyway.
    pub fn from_env() -> Self {
        let chain_id = std::env::var(CHAIN_ID_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(SEPOLIA_CHAIN_ID);
        Self { chain_id }
    }

    /// Reject any chain other than the configured one.
    pub fn ensure_chain(&self, actual: u64) -> Result<(), ClientError> {
        if actual == self.chain_id {
            Ok(())
        } else {
            Err(ClientError::WrongNetwork {
                expected: self.chain_id,
                actual,
            })
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::sepolia()
    }
}
