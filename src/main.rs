mod app;
mod ui;

use std::fs::{self, File};

use app::QuizApp;
use eframe::egui;
use log::{debug, info, warn};
use quiz_session::config::UserConfig;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "quiz_app.log";

fn init_logging(config: &UserConfig) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        config.log_level(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));

    let dir = UserConfig::data_dir();
    match fs::create_dir_all(&dir).and_then(|_| File::create(dir.join(LOG_FILE))) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
        Err(e) => eprintln!("Cannot open log file in {}: {}", dir.display(), e),
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

fn main() -> Result<(), eframe::Error> {
    // The logger needs the configured level, so config problems are logged
    // once it is installed.
    let loaded = UserConfig::try_load();
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => UserConfig::default(),
    };
    init_logging(&config);
    match loaded {
        Ok(Some(_)) => debug!("Loaded config from {:?}", UserConfig::config_path()),
        Ok(None) => info!("No saved config, using defaults"),
        Err(e) => warn!("Config unreadable, using defaults: {}", e),
    }

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Quiz App",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(QuizApp::new(cc, config))
        }),
    )
}
