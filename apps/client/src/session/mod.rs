//! UI-facing session layer: controller, history log, snapshot DTO.

pub mod controller;
pub mod history;
pub mod snapshot;

pub use controller::SessionController;
pub use history::{HistoryEntry, HistoryLog, DEFAULT_HISTORY_CAP};
pub use snapshot::{SessionSnapshot, SessionStatus};
