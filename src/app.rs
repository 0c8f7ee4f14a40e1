use std::path::{Path, PathBuf};

use eframe::egui::{self, RichText};
use log::{error, info, warn};
use quiz_session::config::{AnswerMode, UserConfig};
use quiz_session::{loader, LoadError, Quiz};

use crate::ui::{FilePick, QuizAction, QuizUI};

#[derive(Debug)]
enum AppState {
    FileSelection,
    QuizSummary,
    QuizInProgress,
    QuizResults,
    QuestionReview,
}

pub struct QuizApp {
    config: UserConfig,
    ui: QuizUI,
    quiz: Option<Quiz>,
    current_file: Option<PathBuf>,
    skipped_rows: usize,
    load_error: Option<String>,
    review_index: Option<usize>,
    state: AppState,
}

impl QuizApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: UserConfig) -> Self {
        Self {
            config,
            ui: QuizUI::default(),
            quiz: None,
            current_file: None,
            skipped_rows: 0,
            load_error: None,
            review_index: None,
            state: AppState::FileSelection,
        }
    }

    fn load_quiz(&mut self, path: &Path) -> Result<(), LoadError> {
        let report = loader::load_from_path(path, &self.config.columns)?;
        info!("Quiz loaded from {}", path.display());
        self.skipped_rows = report.skipped.len();
        self.quiz = Some(Quiz::new(report.rows));
        self.current_file = Some(path.to_path_buf());
        self.ui.reset_category();
        self.state = AppState::QuizSummary;
        Ok(())
    }

    fn open_file(&mut self, path: PathBuf) {
        // History entries and folder listings may be relative to the quiz folder
        let path = if path.is_absolute() {
            path
        } else {
            self.config.quiz_folder.join(path)
        };

        match self.load_quiz(&path) {
            Ok(()) => {
                self.load_error = None;
                if let Some(file_str) = path.to_str() {
                    self.config.update_file_history(file_str.to_string());
                    self.save_config();
                }
            }
            Err(e) => {
                error!("Failed to load quiz {}: {}", path.display(), e);
                self.load_error = Some(format!("Failed to load quiz: {}", e));
            }
        }
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            warn!("Could not save config: {}", e);
        }
    }

    fn restart_quiz(&mut self) {
        if let Some(quiz) = &mut self.quiz {
            quiz.reset();
            self.state = AppState::QuizSummary;
            self.ui.timer.stop();
        }
    }

    /// Applies a UI action to the active session. Rejected operations are
    /// logged and leave the session as it was.
    fn apply(&mut self, action: QuizAction) {
        let Some(quiz) = &mut self.quiz else {
            return;
        };

        match action {
            QuizAction::None => {}
            QuizAction::Begin => {
                self.ui.timer.start(std::time::Instant::now());
                self.state = AppState::QuizInProgress;
            }
            QuizAction::ChangeCategory(key) => {
                quiz.select_category(key);
            }
            QuizAction::Select(index, option) => {
                if let Err(e) = quiz.session_mut().select_answer(index, option) {
                    warn!("Selection ignored: {}", e);
                }
            }
            QuizAction::Check(index) => {
                if let Err(e) = quiz.session_mut().check_answer(index) {
                    warn!("Check ignored: {}", e);
                }
            }
            QuizAction::PreviousQuestion => {
                quiz.session_mut().go_prev();
            }
            QuizAction::NextQuestion => {
                let session = quiz.session_mut();
                session.go_next();
                if session.is_finished() {
                    self.state = AppState::QuizResults;
                }
            }
            QuizAction::Finish => {
                quiz.session_mut().finish();
                self.state = AppState::QuizResults;
            }
            QuizAction::SubmitAll => {
                // The form writes into the per-question slots, submit them all
                let session = quiz.session_mut();
                let selections = session.selections().to_vec();
                match session.batch_submit(selections) {
                    Ok(_) => self.state = AppState::QuizResults,
                    Err(e) => warn!("Submit ignored: {}", e),
                }
            }
            QuizAction::Review(index) => {
                self.review_index = Some(index);
                self.state = AppState::QuestionReview;
            }
            QuizAction::RestartQuiz => self.restart_quiz(),
            QuizAction::ReturnToFileSelection => {
                self.state = AppState::FileSelection;
                self.quiz = None;
                self.current_file = None;
            }
        }
    }
}

impl eframe::App for QuizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut action = QuizAction::None;

            match self.state {
                AppState::FileSelection => {
                    let pick = self.ui.show_file_selection(
                        ui,
                        &self.config.quiz_folder,
                        &self.config.file_history,
                    );
                    match pick {
                        Some(FilePick::File(path)) => self.open_file(path),
                        Some(FilePick::Folder(path)) => {
                            self.config.quiz_folder = path;
                            self.save_config();
                        }
                        None => {}
                    }

                    if let Some(message) = &self.load_error {
                        ui.label(RichText::new(message).color(egui::Color32::RED));
                    }

                    if ui.button("Settings").clicked() {
                        self.ui.show_settings = !self.ui.show_settings;
                    }

                    if self.ui.show_settings {
                        let mut show = true;
                        // Only write the file when a setting actually changed
                        let before = self.config.clone();
                        egui::Window::new("Settings")
                            .open(&mut show)
                            .show(ctx, |ui| {
                                self.ui.show_settings(ui, &mut self.config);
                            });
                        self.ui.show_settings = show;
                        if self.config != before {
                            self.save_config();
                        }
                    }
                }
                AppState::QuizSummary => {
                    if let Some(quiz) = &self.quiz {
                        let mut mode = self.config.answer_mode;
                        action = self.ui.show_quiz_summary(
                            ui,
                            quiz,
                            self.current_file.as_deref(),
                            self.skipped_rows,
                            &mut mode,
                        );
                        // Remember the mode for the next quiz
                        if mode != self.config.answer_mode {
                            self.config.answer_mode = mode;
                            self.save_config();
                        }
                    }
                }
                AppState::QuizInProgress => {
                    if let Some(quiz) = &self.quiz {
                        action = match self.config.answer_mode {
                            AnswerMode::Stepwise => self.ui.show_question(ui, quiz.session()),
                            AnswerMode::Form => self.ui.show_form(ui, quiz.session()),
                        };
                    }
                }
                AppState::QuizResults => {
                    if let Some(quiz) = &self.quiz {
                        let progress = quiz.progress();
                        action = self.ui.show_results(
                            ui,
                            &progress,
                            self.config.skip_policy,
                            quiz.session(),
                        );
                    }
                }
                AppState::QuestionReview => {
                    let session = self.quiz.as_ref().map(Quiz::session);
                    let back = match (session, self.review_index) {
                        (Some(session), Some(index)) => match session.questions().get(index) {
                            Some(question) => {
                                self.ui.show_review(ui, question, session.selection(index))
                            }
                            None => true,
                        },
                        _ => true,
                    };
                    if back {
                        self.review_index = None;
                        self.state = AppState::QuizResults;
                    }
                }
            }

            self.apply(action);
        });
    }
}
