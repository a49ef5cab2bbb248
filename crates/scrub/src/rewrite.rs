//! The filtering rewriter: the second pass over a document.
//!
//! A line is dropped when it mentions a deleted identifier, or when it
//! belongs to a block whose header line mentions one. Block suppression is
//! re-evaluated only at header lines. Surviving lines are emitted verbatim,
//! terminators included.

use log::{debug, trace};

use scrub_core::document::Document;
use scrub_parser::header::is_block_start;

use crate::{config::MatchMode, deletion::DeletionSet};

/// Output of a rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    output: String,
    removed_lines: usize,
}

impl Rewrite {
    /// The rewritten document.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consumes the rewrite, returning the document text.
    pub fn into_output(self) -> String {
        self.output
    }

    /// Number of dropped lines.
    pub fn removed_lines(&self) -> usize {
        self.removed_lines
    }
}

/// Returns `true` if `line` mentions `id` under `mode`.
///
/// # Examples
///
/// ```
/// use scrub::{config::MatchMode, rewrite::mentions};
///
/// assert!(mentions("  - component: {fileID: 20}", "20", MatchMode::Reference));
/// assert!(!mentions("  serializedVersion: 20", "20", MatchMode::Reference));
/// assert!(mentions("  serializedVersion: 20", "20", MatchMode::Token));
/// assert!(!mentions("  - component: {fileID: 201}", "20", MatchMode::Token));
/// assert!(mentions("  - component: {fileID: 201}", "20", MatchMode::Substring));
/// ```
pub fn mentions(line: &str, id: &str, mode: MatchMode) -> bool {
    if mode == MatchMode::Substring {
        return line.contains(id);
    }

    line.match_indices(id).any(|(start, matched)| {
        let before = &line[..start];
        let after = line[start + matched.len()..].chars().next();
        let standalone = !before
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-')
            && !after.is_some_and(|c| c.is_ascii_alphanumeric());

        standalone && (mode == MatchMode::Token || is_reference_position(before))
    })
}

fn is_reference_position(before: &str) -> bool {
    before.ends_with('&') || before.trim_end_matches(' ').ends_with("fileID:")
}

/// Rewrites `document`, dropping every line attributable to `deletion`.
pub fn rewrite(document: &Document<'_>, deletion: &DeletionSet, mode: MatchMode) -> Rewrite {
    let ids: Vec<String> = deletion.iter().map(|id| id.to_string()).collect();
    let mut output = String::with_capacity(document.source().len());
    let mut removed_lines = 0;
    let mut block_suppressed = false;

    for line in document.lines() {
        let text = line.text();
        let line_suppressed = ids.iter().any(|id| mentions(text, id, mode));

        if is_block_start(text) {
            block_suppressed = line_suppressed;
        }

        if block_suppressed || line_suppressed {
            trace!(line = line.number(), text; "Line dropped");
            removed_lines += 1;
        } else {
            line.write_to(&mut output);
        }
    }

    debug!(removed_lines, deleted_ids = ids.len(); "Rewrite complete");

    Rewrite {
        output,
        removed_lines,
    }
}
