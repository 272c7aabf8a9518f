//! edgebook - text file to audiobook converter
//!
//! Splits a plain-text document into sentence- and paragraph-respecting
//! segments, streams each segment through the Edge neural text-to-speech
//! service, and concatenates the returned audio into a single output file.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod segment;
pub mod synth;

pub use error::{BookError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "edgebook";
