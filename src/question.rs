use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::MalformedQuestion;

/// A raw source row that has passed validation.
///
/// Holds the option cells in source order (blank cells included) and the
/// 1-based index of the correct option as read from the source, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRow {
    text: String,
    options: Vec<String>,
    answer: Option<usize>,
    category: Option<String>,
}

impl QuestionRow {
    /// Validates a raw row.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedQuestion`] when the question text is blank or fewer
    /// than two distinct non-blank options are present.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        answer: Option<usize>,
    ) -> Result<Self, MalformedQuestion> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(MalformedQuestion::MissingText);
        }

        let options: Vec<String> = options.into_iter().map(|o| o.trim().to_string()).collect();
        let distinct = dedup(present(&options)).len();
        if distinct < 2 {
            return Err(MalformedQuestion::TooFewOptions { found: distinct });
        }

        Ok(Self {
            text,
            options,
            answer,
            category: None,
        })
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> Option<usize> {
        self.answer
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// One quiz item as presented to the user. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_option: Option<String>,
    category: Option<String>,
}

impl Question {
    /// Builds a question from a validated row, shuffling its options.
    ///
    /// The correct option is resolved against the unshuffled, non-blank
    /// options and carried as a value, so display order never affects it.
    /// An answer index that is missing or out of range leaves the question
    /// without a correct option; such a question can never be answered
    /// correctly.
    pub fn build<R: Rng + ?Sized>(row: &QuestionRow, rng: &mut R) -> Self {
        let raw_options = present(&row.options);

        let correct_option = match row.answer {
            Some(n) if (1..=raw_options.len()).contains(&n) => Some(raw_options[n - 1].to_string()),
            other => {
                warn!(
                    "Unresolved correct answer {:?} for {:?} ({} options)",
                    other,
                    row.text,
                    raw_options.len()
                );
                None
            }
        };

        let mut options: Vec<String> = dedup(raw_options).into_iter().map(str::to_owned).collect();
        options.shuffle(rng);

        Self {
            text: row.text.clone(),
            options,
            correct_option,
            category: row.category.clone(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Options in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// `None` when the source row's answer index could not be resolved.
    pub fn correct_option(&self) -> Option<&str> {
        self.correct_option.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// An absent selection and an unresolved correct option never match.
    pub fn is_correct(&self, selection: Option<&str>) -> bool {
        matches!(
            (selection, self.correct_option()),
            (Some(selected), Some(correct)) if selected == correct
        )
    }
}

fn present(cells: &[String]) -> Vec<&str> {
    cells
        .iter()
        .map(String::as_str)
        .filter(|c| !c.is_empty())
        .collect()
}

fn dedup(options: Vec<&str>) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(options.len());
    for option in options {
        if !out.contains(&option) {
            out.push(option);
        }
    }
    out
}
