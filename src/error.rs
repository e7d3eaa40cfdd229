//! Errors reported by the extractor.
//!
//! Callers need to tell these apart (a bad upload is not the same problem as a
//! missing `tesseract` binary), so we use a typed enum here instead of
//! [`anyhow::Error`]. The CLI converts these into `anyhow` errors at the edge.

use std::io;

use thiserror::Error;

use crate::prelude::*;

/// Why an extraction call failed.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input does not exist, or is not a parseable document of the
    /// declared type.
    #[error("invalid document {}: {reason}", .path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    /// An external rasterization or OCR tool could not be invoked, or is
    /// missing something it needs (like language data).
    #[error("{engine} is unavailable: {reason}")]
    EngineUnavailable { engine: String, reason: String },

    /// The OCR engine reported an error for a specific page. The whole call is
    /// aborted.
    #[error("OCR failed on page {page}: {reason}")]
    RecognitionFailure { page: usize, reason: String },

    /// We could not write input bytes to a temporary file.
    #[error("cannot {action} staged temporary file")]
    StagingFailure {
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ExtractError {
    /// Build an [`ExtractError::InvalidDocument`].
    pub fn invalid_document(path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            path: path.to_owned(),
            reason: reason.into(),
        }
    }

    /// Build an [`ExtractError::EngineUnavailable`] for a command we could not
    /// spawn.
    pub fn cannot_spawn(engine: &str, program: &Path, err: &io::Error) -> Self {
        Self::EngineUnavailable {
            engine: engine.to_owned(),
            reason: format!("cannot run {:?}: {}", program.display(), err),
        }
    }
}

/// Errors from a [`crate::engines::Recognizer`]. These don't know which page
/// they belong to; the extractor attaches that.
#[derive(Debug, Error)]
pub enum RecognizeError {
    /// The engine can't be run at all.
    #[error("{engine} is unavailable: {reason}")]
    Unavailable { engine: String, reason: String },

    /// The engine ran, but failed on this image.
    #[error("{0}")]
    Failed(String),
}

impl RecognizeError {
    /// Attach a 1-based page number, producing the error we report to callers.
    pub fn on_page(self, page: usize) -> ExtractError {
        match self {
            RecognizeError::Unavailable { engine, reason } => {
                ExtractError::EngineUnavailable { engine, reason }
            }
            RecognizeError::Failed(reason) => {
                ExtractError::RecognitionFailure { page, reason }
            }
        }
    }
}

impl From<ExtractError> for RecognizeError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::EngineUnavailable { engine, reason } => {
                RecognizeError::Unavailable { engine, reason }
            }
            other => RecognizeError::Failed(other.to_string()),
        }
    }
}
