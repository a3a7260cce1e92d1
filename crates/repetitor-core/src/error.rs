use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Error, Debug)]
pub enum RepetitorError {
    #[error("Narration failed for {dest}: {reason}")]
    NarrationFailed { dest: PathBuf, reason: String },

    #[error("Rendering failed in {workdir}: {reason}")]
    RenderingFailed { workdir: PathBuf, reason: String },

    #[error("Render output not found, probed: {}", format_searched(.searched))]
    RenderOutputNotFound { searched: Vec<PathBuf> },

    #[error("Combining failed for {output_path}: {reason}")]
    CombineFailed { output_path: PathBuf, reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

impl RepetitorError {
    /// The pipeline stage this error belongs to, where one applies.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RepetitorError::NarrationFailed { .. } => Some(Stage::Record),
            RepetitorError::RenderingFailed { .. }
            | RepetitorError::RenderOutputNotFound { .. } => Some(Stage::Render),
            RepetitorError::CombineFailed { .. } => Some(Stage::Combine),
            _ => None,
        }
    }
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, RepetitorError>;
