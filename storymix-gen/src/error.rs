//! Error types for storymix-gen
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Per-sentence collaborator failures are absorbed by the
//! narration assembler and never surface through this type; errors here
//! are fatal to a single job (never to the process).

use thiserror::Error;

/// Main error type for the storymix-gen service
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Audio decoding errors (background assets, synthesized payloads)
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Emotion classification errors
    #[error("Classification error: {0}")]
    Classify(String),

    /// Speech synthesis errors
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Mixing or audio-composition invariant violations
    #[error("Mix error: {0}")]
    Mix(String),

    /// Artifact export errors
    #[error("Audio export error: {0}")]
    Export(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using storymix-gen Error
pub type Result<T> = std::result::Result<T, Error>;
