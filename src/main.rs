use std::io;
use std::path::Path;
use std::process::ExitCode;

use chess_master::config::AppConfig;
use chess_master::engine::{Game, Snapshot};
use chess_master::session::Session;

fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_master=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::from_env();

    // --summary <file>: print a saved game as JSON and exit.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(pos) = args.iter().position(|a| a == "--summary") {
        let Some(path) = args.get(pos + 1) else {
            eprintln!("usage: chess_master [--summary <file>]");
            return ExitCode::FAILURE;
        };
        return match summary_json(Path::new(path), &config) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Could not summarise {path}: {e}");
                ExitCode::FAILURE
            }
        };
    }

    tracing::info!(
        "chess_master v{} starting (save file {}, check limit {:?})",
        env!("CARGO_PKG_VERSION"),
        config.save_path.display(),
        config.check_limit
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), config);
    match session.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("I/O error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load a snapshot and render its summary as pretty JSON.
fn summary_json(path: &Path, config: &AppConfig) -> Result<String, Box<dyn std::error::Error>> {
    let snapshot = Snapshot::load(path)?;
    let mut game = Game::with_check_limit(config.check_limit);
    game.load_snapshot(snapshot);
    Ok(serde_json::to_string_pretty(&game.summary())?)
}
