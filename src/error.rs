use thiserror::Error;

/// Errors returned by [`Session`](crate::session::Session) operations.
///
/// None of these leave the session in a modified state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question index {index} is out of range for {len} questions")]
    InvalidIndex { index: usize, len: usize },

    #[error("the session has no questions")]
    EmptyQuestionSet,

    #[error("{option:?} is not an option of question {index}")]
    UnknownOption { index: usize, option: String },

    #[error("question {index} has already been checked")]
    AnswerLocked { index: usize },

    #[error("expected {expected} selections but got {actual}")]
    SelectionCountMismatch { expected: usize, actual: usize },
}

/// Why a raw row cannot become a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedQuestion {
    #[error("question text is empty")]
    MissingText,

    #[error("need at least 2 distinct options, found {found}")]
    TooFewOptions { found: usize },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("no column matching {0:?} in the header row")]
    MissingColumn(String),

    #[error("no usable questions found")]
    NoQuestions,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
