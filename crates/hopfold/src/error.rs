use std::path::PathBuf;
use thiserror::Error;

use hf_layout::LayoutError;
use hf_network::PersistError;
use hf_structure::InvalidInput;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid input: {0}")]
    Input(#[from] InvalidInput),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, CliError>;
