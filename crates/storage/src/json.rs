use async_trait::async_trait;
use quiz_core::model::QuestionDraft;
use std::path::{Path, PathBuf};

use crate::repository::{QuestionRepository, StorageError};

/// Reads a JSON array of question records from disk.
///
/// ```json
/// [{"id": 1, "prompt": "...", "choices": ["a", "b"], "correct_index": 0, "explanation": "..."}]
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionRepository for JsonFileRepository {
    async fn load_questions(&self) -> Result<Vec<QuestionDraft>, StorageError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| StorageError::Read {
                path: self.path.clone(),
                source,
            })?;
        let drafts: Vec<QuestionDraft> =
            serde_json::from_slice(&raw).map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), count = drafts.len(), "read question file");
        Ok(drafts)
    }
}
