//! Error types for Scrub operations.
//!
//! Document anomalies are not errors: they are reported as
//! [`Diagnostic`](scrub_parser::error::Diagnostic)s and scrubbing continues.
//! [`ScrubError`] covers what prevents a document, or a whole run, from being
//! processed at all.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for Scrub operations.
#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Not a text scene document: {}", .0.display())]
    NotADocument(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
