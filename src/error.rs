use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for ffmovie
#[derive(Error, Debug)]
pub enum FfmovieError {
    #[error("the file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to start '{tool}': {source}")]
    ToolUnavailable {
        tool: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FfmovieError>;
