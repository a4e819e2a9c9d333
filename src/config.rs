use std::path::PathBuf;

/// Default file used when the save/load prompt is left empty.
pub const DEFAULT_SAVE_FILE: &str = "chess_save.txt";

/// Session configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Save file offered at the save and load prompts.
    pub save_path: PathBuf,
    /// Total checks that end the game (house rule). `None` plays standard chess.
    pub check_limit: Option<u32>,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("CHESS_SAVE_FILE").ok(),
            std::env::var("CHESS_CHECK_LIMIT").ok(),
        )
    }

    fn from_vars(save_file: Option<String>, check_limit: Option<String>) -> Self {
        AppConfig {
            save_path: save_file
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_FILE)),
            check_limit: check_limit
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|&n| n > 0),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            save_path: PathBuf::from(DEFAULT_SAVE_FILE),
            check_limit: None,
        }
    }
}
