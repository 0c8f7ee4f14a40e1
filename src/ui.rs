use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use egui::{Color32, RichText, Ui};
use quiz_session::config::{AnswerMode, UserConfig};
use quiz_session::{CategoryKey, Feedback, Progress, Question, Quiz, Session, SkipPolicy};

const ALL_LABEL: &str = "All categories";

pub struct QuizUI {
    pub show_settings: bool,
    pub allow_going_back: bool,
    pub timer: QuizTimer,
    category_label: String,
}

/// Elapsed quiz time, excluding pauses.
#[derive(Debug, Default)]
pub struct QuizTimer {
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl QuizTimer {
    pub fn start(&mut self, now: Instant) {
        *self = Self {
            started_at: Some(now),
            ..Self::default()
        };
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        match self.paused_at.take() {
            Some(paused_at) => self.paused_total += now.saturating_duration_since(paused_at),
            None => self.paused_at = Some(now),
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        // While paused the clock stays at the moment of pausing.
        let until = self.paused_at.unwrap_or(now);
        until
            .saturating_duration_since(started_at)
            .saturating_sub(self.paused_total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizAction {
    None,
    Begin,
    ChangeCategory(CategoryKey),
    Select(usize, String),
    Check(usize),
    PreviousQuestion,
    NextQuestion,
    Finish,
    SubmitAll,
    Review(usize),
    RestartQuiz,
    ReturnToFileSelection,
}

pub enum FilePick {
    File(PathBuf),
    Folder(PathBuf),
}

impl Default for QuizUI {
    fn default() -> Self {
        Self {
            show_settings: false,
            allow_going_back: true,
            timer: QuizTimer::default(),
            category_label: ALL_LABEL.to_string(),
        }
    }
}

impl QuizUI {
    pub fn reset_category(&mut self) {
        self.category_label = ALL_LABEL.to_string();
    }

    pub fn show_file_selection(
        &mut self,
        ui: &mut Ui,
        quiz_folder: &Path,
        file_history: &[(String, i64)],
    ) -> Option<FilePick> {
        let mut picked = None;

        ui.heading("Select Quiz File");
        ui.separator();

        if !file_history.is_empty() {
            ui.label("Recent Files:");
            for (file, _) in file_history {
                if ui.button(file).clicked() {
                    picked = Some(FilePick::File(PathBuf::from(file)));
                }
            }
            ui.separator();
        }

        ui.label(format!("Current Folder: {}", quiz_folder.display()));
        ui.horizontal(|ui| {
            if ui.button("Change Folder").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_directory(quiz_folder)
                    .pick_folder()
                {
                    picked = Some(FilePick::Folder(path));
                }
            }
            if ui.button("Open File...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .set_directory(quiz_folder)
                    .pick_file()
                {
                    picked = Some(FilePick::File(path));
                }
            }
        });

        if let Ok(entries) = fs::read_dir(quiz_folder) {
            ui.add_space(10.0);
            ui.label("Available Quiz Files:");
            ui.separator();

            let mut files: Vec<_> = entries
                .filter_map(Result::ok)
                .filter(|entry| {
                    entry
                        .path()
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map(|ext| ext.eq_ignore_ascii_case("csv"))
                        .unwrap_or(false)
                })
                .collect();
            files.sort_by_key(|entry| entry.file_name());

            for entry in files {
                let file_name = entry.file_name();
                if let Some(name) = file_name.to_str() {
                    if ui.button(name).clicked() {
                        picked = Some(FilePick::File(entry.path()));
                    }
                }
            }
        }

        picked
    }

    pub fn show_settings(&mut self, ui: &mut Ui, config: &mut UserConfig) {
        ui.heading("Settings");
        ui.separator();

        ui.label(format!("Quiz Folder: {}", config.quiz_folder.display()));
        if ui.button("Browse").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .set_directory(&config.quiz_folder)
                .pick_folder()
            {
                config.quiz_folder = path;
            }
        }

        ui.add_space(10.0);
        ui.label("Answer mode:");
        ui.radio_value(&mut config.answer_mode, AnswerMode::Stepwise, "One question at a time");
        ui.radio_value(&mut config.answer_mode, AnswerMode::Form, "All questions on one form");

        ui.add_space(10.0);
        ui.label("Unanswered questions:");
        ui.radio_value(&mut config.skip_policy, SkipPolicy::CountAsWrong, "Count as wrong");
        ui.radio_value(&mut config.skip_policy, SkipPolicy::ExcludeFromTotal, "Leave out of the score");

        ui.add_space(10.0);
        ui.checkbox(&mut self.allow_going_back, "Allow going back to previous questions");
    }

    pub fn show_quiz_summary(
        &mut self,
        ui: &mut Ui,
        quiz: &Quiz,
        source: Option<&Path>,
        skipped_rows: usize,
        answer_mode: &mut AnswerMode,
    ) -> QuizAction {
        let mut action = QuizAction::None;

        ui.heading("Quiz Summary");
        ui.separator();

        if let Some(name) = source.and_then(Path::file_name) {
            ui.label(format!("File: {}", name.to_string_lossy()));
        }

        ui.label(format!("Questions in this selection: {}", quiz.session().len()));
        if skipped_rows > 0 {
            ui.label(
                RichText::new(format!("{} malformed rows were skipped", skipped_rows))
                    .color(Color32::YELLOW),
            );
        }

        let categories = quiz.categories();
        if !categories.is_empty() {
            ui.add_space(10.0);
            egui::ComboBox::from_label("Category")
                .selected_text(self.category_label.clone())
                .show_ui(ui, |ui| {
                    if ui.selectable_label(self.category_label == ALL_LABEL, ALL_LABEL).clicked() {
                        self.category_label = ALL_LABEL.to_string();
                        action = QuizAction::ChangeCategory(CategoryKey::All);
                    }
                    for label in &categories {
                        if ui.selectable_label(self.category_label == *label, label.as_str()).clicked() {
                            self.category_label = label.clone();
                            action = QuizAction::ChangeCategory(CategoryKey::from_label(label));
                        }
                    }
                });
        }

        ui.add_space(10.0);
        ui.radio_value(answer_mode, AnswerMode::Stepwise, "One question at a time");
        ui.radio_value(answer_mode, AnswerMode::Form, "All questions on one form");
        ui.checkbox(&mut self.allow_going_back, "Allow going back to previous questions");

        ui.add_space(20.0);
        if ui.add_enabled(!quiz.session().is_empty(), egui::Button::new("Begin Quiz")).clicked() {
            action = QuizAction::Begin;
        }

        action
    }

    fn show_timer(&mut self, ui: &mut Ui) {
        if !self.timer.is_running() {
            return;
        }
        let now = Instant::now();
        let elapsed = self.timer.elapsed(now);
        let minutes = elapsed.as_secs() / 60;
        let seconds = elapsed.as_secs() % 60;
        ui.horizontal(|ui| {
            ui.label(format!("Time: {:02}:{:02}", minutes, seconds));
            if ui.button(if self.timer.is_paused() { "Resume" } else { "Pause" }).clicked() {
                self.timer.toggle_pause(now);
            }
        });
    }

    /// Stepwise mode: the current question with its own selection slot.
    pub fn show_question(&mut self, ui: &mut Ui, session: &Session) -> QuizAction {
        let index = session.current_index();
        let Some(question) = session.current_question() else {
            return QuizAction::Finish;
        };
        let total = session.len();
        let answered = session.is_answered(index);
        let selection = session.selection(index);
        let mut action = QuizAction::None;

        ui.heading(format!("Question {} of {}", index + 1, total));
        ui.separator();
        self.show_timer(ui);

        ui.add_space(10.0);
        ui.label(RichText::new(question.text()).size(18.0));

        // Radios stay visible but frozen once the answer has been checked
        for option in question.options() {
            let response = ui.add_enabled(
                !answered,
                egui::RadioButton::new(selection == Some(option.as_str()), option.as_str()),
            );
            if response.clicked() {
                action = QuizAction::Select(index, option.clone());
            }
        }

        if let Some(feedback) = session.feedback() {
            ui.add_space(10.0);
            show_feedback(ui, feedback);
        }

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            // Previous only when going back is allowed
            if index > 0 && self.allow_going_back && ui.button("Previous").clicked() {
                action = QuizAction::PreviousQuestion;
            }

            if ui
                .add_enabled(!answered && selection.is_some(), egui::Button::new("Check"))
                .clicked()
            {
                action = QuizAction::Check(index);
            }

            let next_label = if index + 1 == total { "Finish" } else { "Next" };
            if ui.button(next_label).clicked() {
                action = QuizAction::NextQuestion;
            }

            if ui.button("End Quiz").clicked() {
                action = QuizAction::Finish;
            }
        });

        action
    }

    /// Form mode: every question at once, evaluated by a single submit.
    pub fn show_form(&mut self, ui: &mut Ui, session: &Session) -> QuizAction {
        let mut action = QuizAction::None;

        ui.heading("Quiz");
        ui.separator();
        self.show_timer(ui);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, question) in session.questions().iter().enumerate() {
                ui.add_space(10.0);
                ui.label(RichText::new(format!("Question {} of {}", index + 1, session.len())).strong());
                ui.label(question.text());

                let selection = session.selection(index);
                for option in question.options() {
                    if ui.radio(selection == Some(option.as_str()), option.as_str()).clicked() {
                        action = QuizAction::Select(index, option.clone());
                    }
                }
                ui.separator();
            }

            ui.add_space(20.0);
            if ui.button("Submit Answers").clicked() {
                action = QuizAction::SubmitAll;
            }
        });

        action
    }

    pub fn show_results(
        &mut self,
        ui: &mut Ui,
        progress: &Progress,
        policy: SkipPolicy,
        session: &Session,
    ) -> QuizAction {
        let mut action = QuizAction::None;

        ui.heading("Quiz Results");
        ui.separator();

        match progress.percentage(policy) {
            Some(percentage) => ui.label(format!(
                "Score: {}/{} ({:.1}%)",
                progress.correct,
                match policy {
                    SkipPolicy::CountAsWrong => progress.total,
                    SkipPolicy::ExcludeFromTotal => progress.answered,
                },
                percentage
            )),
            None => ui.label("No questions were scored."),
        };
        ui.label(format!(
            "Correct: {}   Wrong: {}   Unanswered: {}",
            progress.correct, progress.wrong, progress.skipped
        ));

        // Wrong and unanswered questions, in quiz order
        let missed: Vec<(usize, &Question)> = session
            .questions()
            .iter()
            .enumerate()
            .filter(|(i, q)| !(session.is_answered(*i) && q.is_correct(session.selection(*i))))
            .collect();

        if !missed.is_empty() {
            ui.add_space(10.0);
            ui.label("Questions to review:");
            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                for (index, question) in missed {
                    let status = if session.is_answered(index) { "wrong" } else { "unanswered" };
                    if ui
                        .button(format!("Question {} ({}): {}", index + 1, status, question.text()))
                        .clicked()
                    {
                        action = QuizAction::Review(index);
                    }
                }
            });
        }

        ui.add_space(20.0);
        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Try Again (reshuffled)").clicked() {
                action = QuizAction::RestartQuiz;
            }
            if ui.button("Return to File Selection").clicked() {
                action = QuizAction::ReturnToFileSelection;
            }
        });

        action
    }

    /// Returns `true` when the user wants to go back to the results.
    pub fn show_review(&mut self, ui: &mut Ui, question: &Question, selection: Option<&str>) -> bool {
        ui.heading("Review Question");
        ui.separator();
        ui.label(RichText::new(question.text()).size(18.0));
        ui.add_space(10.0);
        ui.label(format!("Your answer: {}", selection.unwrap_or("(none)")));
        ui.label(format!(
            "Correct answer: {}",
            question.correct_option().unwrap_or("(could not be determined)")
        ));
        ui.add_space(10.0);
        ui.button("Back to Results").clicked()
    }
}

fn show_feedback(ui: &mut Ui, feedback: &Feedback) {
    let color = match feedback {
        Feedback::Correct => Color32::GREEN,
        Feedback::Incorrect { .. } => Color32::RED,
    };
    ui.label(RichText::new(feedback.to_string()).color(color));
}
