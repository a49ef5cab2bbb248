//! Splitting documents into header-delimited blocks.

use scrub_core::{
    document::{Document, Line},
    identifier::LocalId,
};

use crate::header::{BlockHeader, parse_header};

/// A header line and every line up to (excluding) the next header.
#[derive(Debug, Clone, Copy)]
pub struct Block<'d, 'a> {
    header: BlockHeader,
    lines: &'d [Line<'a>],
}

impl<'d, 'a> Block<'d, 'a> {
    /// The parsed header.
    pub fn header(&self) -> BlockHeader {
        self.header
    }

    /// Shorthand for `header().local_id()`.
    pub fn local_id(&self) -> Option<LocalId> {
        self.header.local_id()
    }

    /// The header line.
    pub fn header_line(&self) -> &'d Line<'a> {
        &self.lines[0]
    }

    /// Lines after the header.
    pub fn body(&self) -> &'d [Line<'a>] {
        &self.lines[1..]
    }

    /// Returns the value of the first body line carrying `key`.
    pub fn field(&self, key: &str) -> Option<&'a str> {
        self.body()
            .iter()
            .find_map(|line| crate::fields::field(line.text(), key))
    }
}

/// Splits `document` into blocks. Lines before the first header (the `%YAML`
/// and `%TAG` directives) belong to no block.
pub fn split_blocks<'d, 'a>(document: &'d Document<'a>) -> Vec<Block<'d, 'a>> {
    let lines = document.lines();
    let starts: Vec<(usize, BlockHeader)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| parse_header(line.text()).map(|header| (i, header)))
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &(start, header))| {
            let end = starts.get(n + 1).map_or(lines.len(), |&(next, _)| next);
            Block {
                header,
                lines: &lines[start..end],
            }
        })
        .collect()
}
