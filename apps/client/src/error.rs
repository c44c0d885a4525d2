use thiserror::Error;

use crate::errors::domain::DomainError;

/// Client-level error taxonomy surfaced to callers of the orchestration
/// layer. Oracle failures are absorbed below this level (converted to
/// `None`/`false` plus a captured error string); what remains here is the
/// small set of outcomes the session controller actually branches on.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The oracle could not produce a match.
    #[error("match creation failed: {detail}")]
    CreationFailed { detail: String },

    /// The match was created but its state never materialized within the
    /// polling budget.
    #[error("match state unavailable after {attempts} attempts")]
    StateUnavailable { attempts: u32 },

    /// The oracle lives on a different chain than the one configured.
    #[error("wrong network: expected chain {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The oracle could not be reached at all.
    #[error("oracle unreachable: {detail}")]
    OracleUnreachable { detail: String },

    /// The session was torn down while the operation was in flight.
    /// Discarded silently by callers, never shown to the user.
    #[error("session disposed")]
    Disposed,

    /// Internal error: a domain precondition failed despite the
    /// controller's gating.
    #[error("internal error: {detail}")]
    Internal { detail: String },
}

impl ClientError {
    pub fn creation_failed(detail: impl Into<String>) -> Self {
        Self::CreationFailed {
            detail: detail.into(),
        }
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self::OracleUnreachable {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        ClientError::internal(format!("domain error: {err}"))
    }
}
