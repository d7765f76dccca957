// src/main.rs

use std::io;
use std::process::ExitCode;

use quiz_store::cli::Cli;
use quiz_store::config::Settings;
use quiz_store::handlers::admin::seed_admin_user;
use quiz_store::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let settings = Settings::from_env();

    let file_appender = tracing_appender::rolling::daily(&settings.log_dir, "quiz.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&settings.rust_log);
    // Console logs go to stderr so they do not interleave with prompts.
    let console_layer = fmt::layer().with_writer(io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    let state = match AppState::open(&settings) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to open quiz store at {}: {}", settings.data_dir.display(), e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Quiz store opened at {}", settings.data_dir.display());

    if let (Some(username), Some(password)) = (&settings.admin_username, &settings.admin_password) {
        match seed_admin_user(&state, username, password) {
            Ok(true) => tracing::info!("Admin user created successfully."),
            Ok(false) => {}
            Err(e) => tracing::error!("Failed to seed admin user: {}", e),
        }
    }

    let stdin = io::stdin();
    let mut cli = Cli::new(&state, stdin.lock(), io::stdout());
    if let Err(e) = cli.run() {
        tracing::error!("Terminal I/O failed: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
