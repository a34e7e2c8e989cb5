//! Error types for the textrec-core library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error code attached to every rejected recognition call.
pub const GENERIC_ERROR_CODE: &str = "something went wrong";

/// Message used when a call carries no usable image path.
pub const UNDECODABLE_PATH_MESSAGE: &str = "Could not decode a file path into a bitmap.";

/// Main error type for a recognition call.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The image path was empty or absent.
    #[error("{}", UNDECODABLE_PATH_MESSAGE)]
    UndecodablePath,

    /// The image could not be loaded or decoded.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The vision engine reported a failure.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl RecognitionError {
    /// Collapse into the single failure kind exposed to callers.
    pub fn into_failure(self) -> RecognitionFailure {
        match self {
            RecognitionError::Engine(e) => RecognitionFailure::new(e.message()),
            other => RecognitionFailure::new(other.to_string()),
        }
    }
}

/// Errors raised by the vision engine.
///
/// Displays the engine's message verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised while loading an image resource.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The file could not be read.
    #[error("failed to read image {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes could not be decoded as an image.
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The reference uses a scheme this loader cannot open.
    #[error("unsupported image reference: {0}")]
    Unsupported(String),
}

/// The only failure shape a caller ever observes.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct RecognitionFailure {
    pub code: String,
    pub message: String,
}

impl RecognitionFailure {
    /// Failure carrying the generic code and the given detail.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: GENERIC_ERROR_CODE.to_string(),
            message: message.into(),
        }
    }
}

impl From<RecognitionError> for RecognitionFailure {
    fn from(err: RecognitionError) -> Self {
        err.into_failure()
    }
}

/// Result type for the textrec library.
pub type Result<T> = std::result::Result<T, RecognitionError>;
