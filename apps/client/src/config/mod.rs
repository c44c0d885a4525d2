pub mod network;

pub use network::{NetworkConfig, SEPOLIA_CHAIN_ID};
