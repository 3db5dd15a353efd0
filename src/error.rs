// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error for {path}: {message}")]
    Input { path: PathBuf, message: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{source}")]
    Phase {
        phase: &'static str,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    pub fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Tags an error with the pipeline phase it escaped from.
    pub fn in_phase(self, phase: &'static str) -> Self {
        match self {
            already @ Self::Phase { .. } => already,
            other => Self::Phase {
                phase,
                source: Box::new(other),
            },
        }
    }

    pub fn phase(&self) -> Option<&'static str> {
        match self {
            Self::Phase { phase, .. } => Some(phase),
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Phase { source, .. } => source.is_config(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
