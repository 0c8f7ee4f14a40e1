use serde::{Deserialize, Serialize};

use crate::session::Session;

/// How questions left unanswered weigh in the final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkipPolicy {
    /// Skipped questions stay in the denominator.
    #[default]
    CountAsWrong,
    /// Only checked questions are scored.
    ExcludeFromTotal,
}

/// Read-only view of a session's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub correct: usize,
    pub answered: usize,
    pub wrong: usize,
    pub skipped: usize,
    pub is_complete: bool,
}

impl Progress {
    /// Share of correct answers in percent, or `None` when there is nothing
    /// to divide by.
    pub fn percentage(&self, policy: SkipPolicy) -> Option<f32> {
        let denominator = match policy {
            SkipPolicy::CountAsWrong => self.total,
            SkipPolicy::ExcludeFromTotal => self.answered,
        };
        if denominator == 0 {
            return None;
        }
        Some(self.correct as f32 / denominator as f32 * 100.0)
    }
}

pub fn progress(session: &Session) -> Progress {
    let total = session.len();
    let answered = session.answered().iter().filter(|a| **a).count();
    let correct = session.score();

    Progress {
        total,
        correct,
        answered,
        wrong: answered.saturating_sub(correct),
        skipped: total - answered,
        is_complete: session.is_finished(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Question, QuestionRow};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(n: usize) -> Session {
        let row = QuestionRow::new(
            "q",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            Some(1),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        Session::new((0..n).map(|_| Question::build(&row, &mut rng)).collect())
    }

    #[test]
    fn answer_one_right_one_wrong_skip_one() {
        let mut session = session(3);
        session.select_answer(0, "a").unwrap();
        session.check_answer(0).unwrap();
        session.go_next();
        session.select_answer(1, "b").unwrap();
        session.check_answer(1).unwrap();
        session.go_next();
        session.go_next();

        let p = progress(&session);
        assert_eq!(p.correct, 1);
        assert_eq!(p.answered, 2);
        assert_eq!(p.wrong, 1);
        assert_eq!(p.skipped, 1);
        assert!(p.is_complete);

        let counted = p.percentage(SkipPolicy::CountAsWrong).unwrap();
        assert!((counted - 100.0 / 3.0).abs() < 1e-3);
        assert_eq!(p.percentage(SkipPolicy::ExcludeFromTotal), Some(50.0));
    }

    #[test]
    fn fresh_session_reports_zero() {
        let p = progress(&session(4));
        assert_eq!((p.correct, p.answered, p.wrong), (0, 0, 0));
        assert!(!p.is_complete);
        assert_eq!(p.percentage(SkipPolicy::ExcludeFromTotal), None);
        assert_eq!(p.percentage(SkipPolicy::CountAsWrong), Some(0.0));
    }

    #[test]
    fn empty_session_is_complete_without_percentage() {
        let p = progress(&Session::new(Vec::new()));
        assert!(p.is_complete);
        assert_eq!(p.total, 0);
        assert_eq!(p.percentage(SkipPolicy::CountAsWrong), None);
    }
}
