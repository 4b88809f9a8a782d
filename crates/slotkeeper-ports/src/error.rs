use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("not found")]
    NotFound,
    /// The store refused a write because an active booking already overlaps it.
    #[error("slot taken by another booking")]
    SlotTaken,
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("lock unavailable: {0}")]
    LockUnavailable(String),
}
