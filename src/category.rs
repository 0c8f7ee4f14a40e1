use std::collections::HashSet;
use std::fmt;

use unicode_normalization::UnicodeNormalization;

use crate::question::QuestionRow;

/// Labels that select every row instead of a single topic.
const ALL_LABELS: [&str; 4] = ["all", "todas", "todos", "*"];

/// Canonical form used whenever two free-text labels are compared.
///
/// Accents are stripped, case is folded, punctuation becomes whitespace and
/// whitespace runs collapse to a single space. `"  Matemáticas (I) "` and
/// `"matematicas i"` normalize to the same key.
pub fn normalize_label(label: &str) -> String {
    let folded: String = label
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() || c == '*' { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Partition key over the loaded rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryKey {
    #[default]
    All,
    /// Holds the normalized form of the label.
    Named(String),
}

impl CategoryKey {
    pub fn from_label(label: &str) -> Self {
        let key = normalize_label(label);
        if key.is_empty() || ALL_LABELS.contains(&key.as_str()) {
            CategoryKey::All
        } else {
            CategoryKey::Named(key)
        }
    }

    /// Whether a row tagged with `category` belongs to this key.
    ///
    /// Untagged rows only belong to [`CategoryKey::All`].
    pub fn matches(&self, category: Option<&str>) -> bool {
        match self {
            CategoryKey::All => true,
            CategoryKey::Named(key) => {
                category.is_some_and(|label| normalize_label(label) == *key)
            }
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::All => write!(f, "all categories"),
            CategoryKey::Named(key) => write!(f, "{}", key),
        }
    }
}

/// Distinct category labels in first-appearance order.
///
/// Labels that normalize to the same key are reported once, using the first
/// spelling seen.
pub fn categories(rows: &[QuestionRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.category())
        .filter(|label| {
            let key = normalize_label(label);
            !key.is_empty() && seen.insert(key)
        })
        .map(str::to_owned)
        .collect()
}
