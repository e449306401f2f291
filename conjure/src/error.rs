//! Application errors.  The circle engine itself never fails; everything
//! here comes from windows, files, or hardware.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(String),

    #[error("cannot open replay {}: {source}", path.display())]
    ReplayOpen { path: PathBuf, source: std::io::Error },

    #[error("replay {}, line {line}: {source}", path.display())]
    ReplayParse { path: PathBuf, line: usize, source: serde_json::Error },

    #[error("replay read failed: {0}")]
    ReplayRead(#[from] std::io::Error),

    #[error("cannot record to {}: {source}", path.display())]
    Record { path: PathBuf, source: std::io::Error },

    #[error("hand tracker error: {0}")]
    Tracker(String),
}
