use std::fmt;

use log::{debug, info};

use crate::error::SessionError;
use crate::question::Question;

/// Outcome of the most recent answer check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { correct_option: Option<String> },
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "Correct!"),
            Feedback::Incorrect {
                correct_option: Some(correct),
            } => write!(f, "Incorrect. The correct answer is: {}", correct),
            Feedback::Incorrect {
                correct_option: None,
            } => write!(
                f,
                "Incorrect. The correct answer for this question could not be determined."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Correct,
    Incorrect,
    /// The question was checked before; nothing changed.
    AlreadyChecked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    InProgress { index: usize },
    Finished,
}

/// Mutable state of one quiz attempt over a fixed question list.
///
/// Selections are kept per question, so navigating back shows the answer
/// that was chosen there. A question can be checked once; its selection is
/// locked afterwards and `score` only ever counts checked questions whose
/// selection equals the correct option.
#[derive(Debug, Clone)]
pub struct Session {
    questions: Vec<Question>,
    current_index: usize,
    answered: Vec<bool>,
    selections: Vec<Option<String>>,
    score: usize,
    feedback: Option<Feedback>,
}

impl Session {
    pub fn new(questions: Vec<Question>) -> Self {
        let n = questions.len();
        info!("Starting session with {} questions", n);
        Self {
            questions,
            current_index: 0,
            answered: vec![false; n],
            selections: vec![None; n],
            score: 0,
            feedback: None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// `None` once the cursor is past the last question.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn state(&self) -> SessionState {
        if self.questions.is_empty() {
            SessionState::Empty
        } else if self.current_index < self.questions.len() {
            SessionState::InProgress {
                index: self.current_index,
            }
        } else {
            SessionState::Finished
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current_index == self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answered(&self) -> &[bool] {
        &self.answered
    }

    pub fn selections(&self) -> &[Option<String>] {
        &self.selections
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answered.get(index).copied().unwrap_or(false)
    }

    pub fn selection(&self, index: usize) -> Option<&str> {
        self.selections.get(index).and_then(|s| s.as_deref())
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    fn ensure_index(&self, index: usize) -> Result<(), SessionError> {
        if self.questions.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }
        if index >= self.questions.len() {
            return Err(SessionError::InvalidIndex {
                index,
                len: self.questions.len(),
            });
        }
        Ok(())
    }

    /// Records a tentative choice for question `index`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidIndex`/`EmptyQuestionSet` for a bad index,
    /// `UnknownOption` when `option` is not displayed for that question and
    /// `AnswerLocked` once the question has been checked.
    pub fn select_answer(&mut self, index: usize, option: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_index(index)?;
        let option = option.into();

        if self.answered[index] {
            return Err(SessionError::AnswerLocked { index });
        }
        if !self.questions[index].has_option(&option) {
            return Err(SessionError::UnknownOption { index, option });
        }

        debug!("Question {}: selected {:?}", index, option);
        self.selections[index] = Some(option);
        Ok(())
    }

    /// Evaluates the selection for question `index` and locks it.
    ///
    /// Checking an already checked question returns
    /// [`CheckOutcome::AlreadyChecked`] and changes nothing.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidIndex`/`EmptyQuestionSet` for a bad index.
    pub fn check_answer(&mut self, index: usize) -> Result<CheckOutcome, SessionError> {
        self.ensure_index(index)?;
        if self.answered[index] {
            debug!("Question {} already checked", index);
            return Ok(CheckOutcome::AlreadyChecked);
        }

        self.answered[index] = true;
        let question = &self.questions[index];
        let outcome = if question.is_correct(self.selections[index].as_deref()) {
            self.score += 1;
            self.feedback = Some(Feedback::Correct);
            CheckOutcome::Correct
        } else {
            self.feedback = Some(Feedback::Incorrect {
                correct_option: question.correct_option().map(str::to_owned),
            });
            CheckOutcome::Incorrect
        };

        debug!("Question {} checked: {:?}, score {}", index, outcome, self.score);
        Ok(outcome)
    }

    /// Moves the cursor forward by one, possibly into the finished state.
    /// Returns whether the cursor moved.
    pub fn go_next(&mut self) -> bool {
        if self.current_index >= self.questions.len() {
            return false;
        }
        self.current_index += 1;
        self.feedback = None;
        debug!("Moved to {}/{}", self.current_index, self.questions.len());
        true
    }

    /// Moves the cursor back by one. Returns whether the cursor moved.
    pub fn go_prev(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.feedback = None;
        debug!("Moved back to {}/{}", self.current_index, self.questions.len());
        true
    }

    /// Ends the walk without answering the remaining questions.
    pub fn finish(&mut self) {
        self.current_index = self.questions.len();
        self.feedback = None;
    }

    /// Evaluates one selection per question in a single pass and finishes
    /// the session. Returns the resulting score.
    ///
    /// Questions that were already checked keep their locked selection.
    ///
    /// # Errors
    ///
    /// Fails with `SelectionCountMismatch` unless exactly one entry per
    /// question is supplied, and with `UnknownOption` when an unchecked
    /// question is given an option it does not display. Nothing changes on
    /// failure.
    pub fn batch_submit(&mut self, selections: Vec<Option<String>>) -> Result<usize, SessionError> {
        if selections.len() != self.questions.len() {
            return Err(SessionError::SelectionCountMismatch {
                expected: self.questions.len(),
                actual: selections.len(),
            });
        }

        // Validate everything before touching any slot.
        for (index, selection) in selections.iter().enumerate() {
            if let Some(option) = selection {
                if !self.answered[index] && !self.questions[index].has_option(option) {
                    return Err(SessionError::UnknownOption {
                        index,
                        option: option.clone(),
                    });
                }
            }
        }

        for (index, selection) in selections.into_iter().enumerate() {
            if !self.answered[index] {
                self.selections[index] = selection;
                self.answered[index] = true;
            }
        }

        self.score = self
            .questions
            .iter()
            .zip(&self.selections)
            .filter(|(question, selection)| question.is_correct(selection.as_deref()))
            .count();
        self.current_index = self.questions.len();
        self.feedback = None;

        info!("Batch submitted: {}/{}", self.score, self.questions.len());
        Ok(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionRow;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(answer: Option<usize>) -> Question {
        let row = QuestionRow::new(
            "Which one?",
            vec!["w".into(), "x".into(), "y".into(), "z".into()],
            answer,
        )
        .unwrap();
        Question::build(&row, &mut StdRng::seed_from_u64(9))
    }

    fn session(n: usize) -> Session {
        Session::new((0..n).map(|_| question(Some(1))).collect())
    }

    fn wrong_option(question: &Question) -> String {
        question
            .options()
            .iter()
            .find(|o| Some(o.as_str()) != question.correct_option())
            .unwrap()
            .clone()
    }

    fn assert_invariants(session: &Session) {
        let answered = session.answered().iter().filter(|a| **a).count();
        assert!(session.score() <= answered);
        assert!(answered <= session.len());
        assert!(session.current_index() <= session.len());
    }

    #[test]
    fn new_session_starts_clean() {
        let session = session(3);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.answered(), &[false, false, false]);
        assert!(session.selections().iter().all(Option::is_none));
        assert!(session.feedback().is_none());
        assert_eq!(session.state(), SessionState::InProgress { index: 0 });
    }

    #[test]
    fn correct_check_scores_and_sets_feedback() {
        let mut session = session(2);
        let correct = session.questions()[0].correct_option().unwrap().to_string();

        session.select_answer(0, correct.clone()).unwrap();
        assert_eq!(session.score(), 0);
        assert_eq!(session.check_answer(0), Ok(CheckOutcome::Correct));
        assert_eq!(session.score(), 1);
        assert_eq!(session.feedback(), Some(&Feedback::Correct));
        assert_invariants(&session);
    }

    #[test]
    fn incorrect_feedback_names_the_correct_option() {
        let mut session = session(1);
        let question = session.questions()[0].clone();
        session.select_answer(0, wrong_option(&question)).unwrap();

        assert_eq!(session.check_answer(0), Ok(CheckOutcome::Incorrect));
        let feedback = session.feedback().unwrap();
        assert_eq!(
            feedback,
            &Feedback::Incorrect {
                correct_option: question.correct_option().map(str::to_owned)
            }
        );
        assert!(feedback.to_string().contains(question.correct_option().unwrap()));
    }

    #[test]
    fn checking_twice_is_a_no_op() {
        let mut session = session(1);
        let correct = session.questions()[0].correct_option().unwrap().to_string();
        session.select_answer(0, correct).unwrap();
        session.check_answer(0).unwrap();

        for _ in 0..3 {
            assert_eq!(session.check_answer(0), Ok(CheckOutcome::AlreadyChecked));
        }
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered(), &[true]);
    }

    #[test]
    fn selection_is_locked_after_check() {
        let mut session = session(1);
        let question = session.questions()[0].clone();
        session.select_answer(0, wrong_option(&question)).unwrap();
        session.check_answer(0).unwrap();

        let correct = question.correct_option().unwrap();
        assert_eq!(
            session.select_answer(0, correct),
            Err(SessionError::AnswerLocked { index: 0 })
        );
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn selection_can_be_overwritten_before_check() {
        let mut session = session(1);
        let question = session.questions()[0].clone();
        session.select_answer(0, wrong_option(&question)).unwrap();
        session.select_answer(0, question.correct_option().unwrap()).unwrap();
        assert_eq!(session.check_answer(0), Ok(CheckOutcome::Correct));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut session = session(1);
        assert_eq!(
            session.select_answer(0, "nope"),
            Err(SessionError::UnknownOption {
                index: 0,
                option: "nope".into()
            })
        );
        assert_eq!(session.selection(0), None);
    }

    #[test]
    fn unanswered_check_is_incorrect() {
        let mut session = session(1);
        assert_eq!(session.check_answer(0), Ok(CheckOutcome::Incorrect));
        assert_eq!(session.score(), 0);
        assert!(session.is_answered(0));
    }

    #[test]
    fn out_of_range_index_leaves_state_untouched() {
        let mut session = session(2);
        assert_eq!(
            session.select_answer(2, "w"),
            Err(SessionError::InvalidIndex { index: 2, len: 2 })
        );
        assert_eq!(
            session.check_answer(5),
            Err(SessionError::InvalidIndex { index: 5, len: 2 })
        );
        assert_eq!(session.answered(), &[false, false]);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn unresolved_question_is_always_wrong() {
        let mut session = Session::new(vec![question(Some(7))]);
        let first = session.questions()[0].options()[0].clone();
        session.select_answer(0, first).unwrap();
        assert_eq!(session.check_answer(0), Ok(CheckOutcome::Incorrect));
        assert_eq!(
            session.feedback(),
            Some(&Feedback::Incorrect {
                correct_option: None
            })
        );
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn navigation_is_bounded() {
        let mut session = session(2);
        assert!(!session.go_prev());
        assert_eq!(session.current_index(), 0);

        assert!(session.go_next());
        assert_eq!(session.current_index(), 1);
        assert!(session.go_next());
        assert_eq!(session.state(), SessionState::Finished);
        assert!(session.current_question().is_none());
        assert!(!session.go_next());
        assert_eq!(session.current_index(), 2);

        assert!(session.go_prev());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn navigation_clears_feedback_but_keeps_selection() {
        let mut session = session(2);
        let option = session.questions()[0].options()[1].clone();
        session.select_answer(0, option.clone()).unwrap();
        session.check_answer(0).unwrap();
        assert!(session.feedback().is_some());

        session.go_next();
        assert!(session.feedback().is_none());
        session.go_prev();
        assert_eq!(session.selection(0), Some(option.as_str()));
    }

    #[test]
    fn empty_session_short_circuits() {
        let mut session = Session::new(Vec::new());
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.is_finished());
        assert_eq!(session.select_answer(0, "a"), Err(SessionError::EmptyQuestionSet));
        assert_eq!(session.check_answer(0), Err(SessionError::EmptyQuestionSet));
        assert!(!session.go_next());
        assert!(!session.go_prev());
        assert_eq!(session.batch_submit(Vec::new()), Ok(0));
    }

    #[test]
    fn batch_submit_scores_everything_at_once() {
        let mut session = session(3);
        let mut selections: Vec<Option<String>> = session
            .questions()
            .iter()
            .map(|q| q.correct_option().map(str::to_owned))
            .collect();
        selections[2] = Some(wrong_option(&session.questions()[2]));

        assert_eq!(session.batch_submit(selections), Ok(2));
        assert_eq!(session.score(), 2);
        assert_eq!(session.answered(), &[true, true, true]);
        assert_eq!(session.state(), SessionState::Finished);
        assert!(session.feedback().is_none());
    }

    #[test]
    fn batch_submit_keeps_locked_answers() {
        let mut session = session(2);
        let wrong = wrong_option(&session.questions()[0]);
        session.select_answer(0, wrong).unwrap();
        session.check_answer(0).unwrap();

        let all_correct: Vec<Option<String>> = session
            .questions()
            .iter()
            .map(|q| q.correct_option().map(str::to_owned))
            .collect();
        assert_eq!(session.batch_submit(all_correct), Ok(1));
        assert_invariants(&session);
    }

    #[test]
    fn batch_submit_rejects_wrong_length() {
        let mut session = session(3);
        assert_eq!(
            session.batch_submit(vec![None]),
            Err(SessionError::SelectionCountMismatch {
                expected: 3,
                actual: 1
            })
        );
        assert_eq!(session.answered(), &[false, false, false]);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn batch_submit_rejects_options_that_are_not_displayed() {
        let mut session = session(2);
        let correct = session.questions()[1].correct_option().map(str::to_owned);

        assert_eq!(
            session.batch_submit(vec![Some("zzz".into()), correct]),
            Err(SessionError::UnknownOption {
                index: 0,
                option: "zzz".into()
            })
        );
        assert_eq!(session.answered(), &[false, false]);
        assert!(session.selections().iter().all(Option::is_none));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn going_back_clears_feedback() {
        let mut session = session(2);
        session.go_next();
        let option = session.questions()[1].options()[0].clone();
        session.select_answer(1, option).unwrap();
        session.check_answer(1).unwrap();
        assert!(session.feedback().is_some());

        assert!(session.go_prev());
        assert!(session.feedback().is_none());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn finish_skips_to_the_end() {
        let mut session = session(3);
        session.finish();
        assert!(session.is_finished());
        assert_eq!(session.answered(), &[false, false, false]);
    }
}
