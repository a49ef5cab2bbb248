//! Diagnostic system for the Scrub parser.
//!
//! Scene documents in the wild contain anomalies: hand-merged duplicates,
//! truncated headers, reference entries without an identifier. None of these
//! stop a document from being scrubbed. Instead each one is recorded as a
//! [`Diagnostic`] with:
//! - an [`ErrorCode`] for documentation and searchability
//! - a [`Severity`]
//! - labeled spans pointing into the document source
//! - optional help text
//!
//! # Example
//!
//! ```
//! # use scrub_parser::error::{Diagnostic, ErrorCode};
//! # use scrub_parser::Span;
//!
//! let span = Span::new(100..120);
//! let original_span = Span::new(50..70);
//!
//! let diag = Diagnostic::error("entity `&100` is defined multiple times")
//!     .with_code(ErrorCode::E200)
//!     .with_label(span, "duplicate definition")
//!     .with_secondary_label(original_span, "first defined here")
//!     .with_help("the first definition is used for scrubbing");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
