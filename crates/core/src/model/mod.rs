mod bank;
mod ids;
mod question;
mod settings;

pub use ids::{ParseIdError, QuestionId};

pub use bank::{BankError, QuestionBank, SessionOrder};
pub use question::{Question, QuestionDraft, QuestionError};
pub use settings::{QuizSettings, SettingsError};
