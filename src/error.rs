//! Error types for edgebook

use std::io;
use thiserror::Error;

/// Main error type for edgebook
///
/// Every variant is fatal to the current run; nothing is retried
/// automatically. Segmentation and parameter errors surface before any
/// network or file activity begins.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("A sentence of {length} characters exceeds the {limit} character limit; raise the limit or shorten the source text")]
    SegmentTooLong { length: usize, limit: usize },

    #[error("Input does not contain any readable text")]
    NoContent,

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for edgebook operations
pub type Result<T> = std::result::Result<T, BookError>;
