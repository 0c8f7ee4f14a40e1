use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assembler::assemble;
use crate::category::{self, CategoryKey};
use crate::progress::{progress, Progress};
use crate::question::QuestionRow;
use crate::session::Session;

/// Owns the loaded rows and the single active [`Session`] built from them.
///
/// The session is always replaced wholesale, either by [`Quiz::reset`] or by
/// switching category.
#[derive(Debug)]
pub struct Quiz {
    rows: Vec<QuestionRow>,
    rng: StdRng,
    category: CategoryKey,
    session: Session,
}

impl Quiz {
    /// Starts on all categories with an entropy-seeded shuffle.
    pub fn new(rows: Vec<QuestionRow>) -> Self {
        Self::with_rng(rows, StdRng::from_entropy())
    }

    pub fn with_seed(rows: Vec<QuestionRow>, seed: u64) -> Self {
        Self::with_rng(rows, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rows: Vec<QuestionRow>, mut rng: StdRng) -> Self {
        let category = CategoryKey::All;
        let session = Session::new(assemble(&rows, &category, &mut rng));
        Self {
            rows,
            rng,
            category,
            session,
        }
    }

    pub fn rows(&self) -> &[QuestionRow] {
        &self.rows
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn category(&self) -> &CategoryKey {
        &self.category
    }

    /// Category labels present in the loaded rows.
    pub fn categories(&self) -> Vec<String> {
        category::categories(&self.rows)
    }

    pub fn progress(&self) -> Progress {
        progress(&self.session)
    }

    /// Switches to `key`, discarding the current session.
    ///
    /// Returns `false` without touching the session when `key` is already
    /// active.
    pub fn select_category(&mut self, key: CategoryKey) -> bool {
        if key == self.category {
            debug!("Category {} already active", key);
            return false;
        }
        info!("Switching category from {} to {}", self.category, key);
        self.category = key;
        self.reset();
        true
    }

    /// Re-shuffles the active category into a fresh session.
    pub fn reset(&mut self) {
        self.session = Session::new(assemble(&self.rows, &self.category, &mut self.rng));
    }
}
