use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the log file lives; the terminal itself is owned by the UI
    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("hanzi-cards"),
            )
        } else {
            ProjectDirs::from("", "", "hanzi-cards").map(|pd| pd.data_local_dir().join("logs"))
        }
    }
}
