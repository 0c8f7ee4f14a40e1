use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::category::CategoryKey;
use crate::question::{Question, QuestionRow};

/// Builds the ordered question list for one session.
///
/// Rows not matching `category` are dropped, the remaining row order is
/// shuffled, then each row is turned into a [`Question`] with its own option
/// shuffle. Every call draws fresh randomness from `rng`.
pub fn assemble<R: Rng + ?Sized>(
    rows: &[QuestionRow],
    category: &CategoryKey,
    rng: &mut R,
) -> Vec<Question> {
    let mut selected: Vec<&QuestionRow> = rows.iter().filter(|row| category.matches(row.category())).collect();
    selected.shuffle(rng);

    debug!(
        "Assembled {} of {} rows for {}",
        selected.len(),
        rows.len(),
        category
    );

    selected
        .into_iter()
        .map(|row| Question::build(row, &mut *rng))
        .collect()
}
