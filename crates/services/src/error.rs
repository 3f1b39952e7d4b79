//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, SettingsError};
use storage::StorageError;

/// Errors emitted by session services.
///
/// Invalid intents are never errors; they are ignored by `QuizSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("quiz runtime has stopped")]
    Closed,
    #[error("quiz runtime task failed: {0}")]
    Runtime(String),
}
