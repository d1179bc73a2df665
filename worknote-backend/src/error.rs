//! Error type shared by the write sinks

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Note file could not be written
    #[error("Notes error: {0}")]
    Notes(String),
}

pub type ToolResult<T> = Result<T, ToolError>;
