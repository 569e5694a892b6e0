use thiserror::Error;

use crate::native::HandleKind;

/// Errors surfaced by the player facade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The wrapper was disposed; nothing was sent to the engine.
    #[error("{0} used after it was released")]
    Disposed(HandleKind),
    /// The engine returned a null handle from a constructor.
    #[error("native engine failed to create a {0}")]
    CreateFailed(HandleKind),
    /// A native command returned a non-zero status, carried unchanged.
    #[error("{op} rejected by native engine (status {status})")]
    Rejected { op: &'static str, status: i32 },
    #[error("string contains an interior NUL byte: {0:?}")]
    InteriorNul(String),
    #[error("native engine instance could not be initialized")]
    EngineInit,
}

impl PlayerError {
    /// Map a native status to `Ok(())` for `0` and [`PlayerError::Rejected`] otherwise.
    pub fn check(op: &'static str, status: i32) -> Result<()> {
        if status == 0 {
            Ok(())
        } else {
            Err(PlayerError::Rejected { op, status })
        }
    }
}

/// Result type for player operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
