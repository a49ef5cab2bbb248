//! Error codes for the Scrub diagnostic system.
//!
//! Error codes are organized by the structure they concern:
//! - `E0xx` - Block headers
//! - `E1xx` - Component reference lists
//! - `E2xx` - Identifier uniqueness

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Header Errors (E0xx)
    // =========================================================================
    /// Malformed block header.
    ///
    /// A line starts a block but carries no `&<integer>` identifier. The block
    /// is excluded from the ownership index.
    E001,

    // =========================================================================
    // Reference List Errors (E1xx)
    // =========================================================================
    /// Reference entry without identifier.
    ///
    /// A `component` entry in an `m_Component` list has no integer to read.
    E100,

    /// Null reference entry.
    ///
    /// A `component` entry points at `{fileID: 0}`, which names no object.
    E101,

    // =========================================================================
    // Identity Errors (E2xx)
    // =========================================================================
    /// Duplicate entity identifier.
    ///
    /// Two entity blocks share a local identifier. The first one wins.
    E200,

    /// Duplicate block identifier.
    ///
    /// Two blocks of any kind share a local identifier.
    E201,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed block header",
            ErrorCode::E100 => "reference entry without identifier",
            ErrorCode::E101 => "null reference entry",
            ErrorCode::E200 => "duplicate entity identifier",
            ErrorCode::E201 => "duplicate block identifier",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
