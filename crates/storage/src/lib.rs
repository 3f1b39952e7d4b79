#![forbid(unsafe_code)]

pub mod builtin;
pub mod json;
pub mod repository;

pub use builtin::builtin_questions;
pub use json::JsonFileRepository;
pub use repository::{InMemoryRepository, QuestionRepository, StorageError, load_bank};
