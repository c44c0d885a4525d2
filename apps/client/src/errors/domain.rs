//! Domain-level error type used by the turn protocol core.
//!
//! This error type is transport- and UI-agnostic. Orchestrators should
//! return `Result<T, crate::error::ClientError>` and convert from
//! `DomainError` using the provided `From<DomainError> for ClientError`
//! implementation.
//!
//! Under the session controller's own gating these errors should never
//! surface: they signal a broken caller contract, not a user mistake.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Kinds of invalid-move precondition failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidMoveKind {
    /// The played card is not in the acting side's hand.
    CardNotInHand,
    /// The match is not in a phase that accepts plays.
    PhaseMismatch,
    /// The match already reached its terminal phase.
    MatchFinished,
}

/// Central domain error type for the turn protocol core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A play violated its preconditions.
    InvalidMove(InvalidMoveKind, String),
    /// A side had no cards left to play (defensive; a fixed 5/5 deal
    /// played for 5 rounds cannot reach this).
    NoCardsAvailable(String),
    /// Catch-all for broken internal invariants.
    Other(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::InvalidMove(kind, d) => write!(f, "invalid move {kind:?}: {d}"),
            DomainError::NoCardsAvailable(d) => write!(f, "no cards available: {d}"),
            DomainError::Other(d) => write!(f, "domain error: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn invalid_move(kind: InvalidMoveKind, detail: impl Into<String>) -> Self {
        Self::InvalidMove(kind, detail.into())
    }

    pub fn no_cards(detail: impl Into<String>) -> Self {
        Self::NoCardsAvailable(detail.into())
    }

    pub fn other(detail: impl Into<String>) -> Self {
        Self::Other(detail.into())
    }
}
