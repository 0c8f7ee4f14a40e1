//! Quiz session engine: turns tabular multiple-choice rows into shuffled
//! sessions and tracks answers, navigation and score.

pub mod assembler;
pub mod category;
pub mod config;
pub mod error;
pub mod loader;
pub mod progress;
pub mod question;
pub mod quiz;
pub mod session;

pub use assembler::assemble;
pub use category::{normalize_label, CategoryKey};
pub use error::{ConfigError, LoadError, MalformedQuestion, SessionError};
pub use progress::{progress, Progress, SkipPolicy};
pub use question::{Question, QuestionRow};
pub use quiz::Quiz;
pub use session::{CheckOutcome, Feedback, Session, SessionState};
