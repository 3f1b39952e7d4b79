use async_trait::async_trait;
use quiz_core::model::{BankError, QuestionBank, QuestionDraft};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("invalid question bank: {0}")]
    Bank(#[from] BankError),
}

/// Source of the static question configuration.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Load every question record in configured order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be read or decoded.
    async fn load_questions(&self) -> Result<Vec<QuestionDraft>, StorageError>;
}

/// Load and validate a bank from any repository.
///
/// # Errors
///
/// Returns `StorageError::Bank` when the records do not form a valid bank, or
/// whatever the repository reports while loading.
pub async fn load_bank(repo: &dyn QuestionRepository) -> Result<QuestionBank, StorageError> {
    let drafts = repo.load_questions().await?;
    let count = drafts.len();
    let bank = QuestionBank::from_drafts(drafts)?;
    tracing::debug!(count, "question bank loaded");
    Ok(bank)
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<QuestionDraft>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: Vec<QuestionDraft>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
        }
    }

    /// Append a record; order of insertion is the configured order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the inner lock is poisoned.
    pub fn push(&self, draft: QuestionDraft) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(draft);
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn load_questions(&self) -> Result<Vec<QuestionDraft>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}
