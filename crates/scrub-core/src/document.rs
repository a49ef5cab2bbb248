//! Line-oriented view of a serialized document.
//!
//! A [`Document`] splits its source into [`Line`]s without copying. Every line
//! keeps its own terminator, so concatenating `text + ending` for all lines
//! reproduces the source byte for byte. Rewriters rely on this to emit
//! surviving content verbatim.

use log::trace;

use crate::span::Span;

/// A single line of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    number: usize,
    offset: usize,
    text: &'a str,
    ending: &'a str,
}

impl<'a> Line<'a> {
    /// Zero-based line number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Byte offset of the first character of the line in the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Line content without its terminator.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Line terminator: `"\n"`, `"\r\n"`, or `""` for an unterminated last line.
    pub fn ending(&self) -> &'a str {
        self.ending
    }

    /// Span covering the line content, terminator excluded.
    pub fn span(&self) -> Span {
        Span::new(self.offset..self.offset + self.text.len())
    }

    /// Appends the line, terminator included, to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(self.text);
        out.push_str(self.ending);
    }
}

/// A borrowed, line-split view of a document source.
///
/// # Examples
///
/// ```
/// use scrub_core::document::Document;
///
/// let doc = Document::new("%YAML 1.1\r\n--- !u!1 &100\nGameObject:");
/// assert_eq!(doc.len(), 3);
/// assert_eq!(doc.lines()[0].ending(), "\r\n");
/// assert_eq!(doc.lines()[2].ending(), "");
/// assert_eq!(doc.to_source(), doc.source());
/// ```
#[derive(Debug, Clone)]
pub struct Document<'a> {
    source: &'a str,
    lines: Vec<Line<'a>>,
}

impl<'a> Document<'a> {
    /// Splits `source` into lines.
    pub fn new(source: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;

        for (number, raw) in source.split_inclusive('\n').enumerate() {
            let (text, ending) = if let Some(text) = raw.strip_suffix("\r\n") {
                (text, "\r\n")
            } else if let Some(text) = raw.strip_suffix('\n') {
                (text, "\n")
            } else {
                (raw, "")
            };

            lines.push(Line {
                number,
                offset,
                text,
                ending,
            });
            offset += raw.len();
        }

        trace!(lines_count = lines.len(); "Document split into lines");

        Self { source, lines }
    }

    /// The original source.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// All lines in order.
    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` for an empty source.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Reassembles the source from its lines.
    pub fn to_source(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for line in &self.lines {
            line.write_to(&mut out);
        }
        out
    }
}
