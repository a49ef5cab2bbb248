//! Block header recognition.
//!
//! Every object in a document starts with a header line of the form
//!
//! ```text
//! --- !u!<class> &<local-id>[ stripped]
//! ```
//!
//! The class number tells what kind of object follows (`1` is a GameObject,
//! the entity kind that owns components). Any line starting with the generic
//! marker opens a block, even when the rest of the header is unreadable.

use winnow::{
    ModalResult, Parser as _,
    ascii::{dec_int, dec_uint, space1},
    combinator::{opt, preceded},
    token::rest,
};

use scrub_core::identifier::LocalId;

/// Marker that starts every block header.
pub const BLOCK_MARKER: &str = "--- !u!";

/// Class number of entity (GameObject) blocks.
pub const ENTITY_CLASS_ID: u32 = 1;

/// A parsed block header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    class_id: Option<u32>,
    local_id: Option<LocalId>,
    stripped: bool,
}

impl BlockHeader {
    /// Class number, when readable.
    pub fn class_id(&self) -> Option<u32> {
        self.class_id
    }

    /// Local identifier, or `None` for a malformed header.
    pub fn local_id(&self) -> Option<LocalId> {
        self.local_id
    }

    /// Whether the header carries the `stripped` tag used for prefab instance stubs.
    pub fn is_stripped(&self) -> bool {
        self.stripped
    }

    /// Whether this header opens an entity block.
    pub fn is_entity(&self) -> bool {
        self.class_id == Some(ENTITY_CLASS_ID)
    }

    /// Whether the header lacks a readable local identifier.
    pub fn is_malformed(&self) -> bool {
        self.local_id.is_none()
    }
}

/// Returns `true` if `line` opens a block.
pub fn is_block_start(line: &str) -> bool {
    line.starts_with(BLOCK_MARKER)
}

/// Parses a header line.
///
/// Returns `None` when the line does not open a block. A line that opens a
/// block but whose identifier cannot be read yields a header with
/// [`BlockHeader::local_id`] set to `None`.
///
/// # Examples
///
/// ```
/// use scrub_core::identifier::LocalId;
/// use scrub_parser::header::parse_header;
///
/// let header = parse_header("--- !u!114 &11400000 stripped").unwrap();
/// assert_eq!(header.class_id(), Some(114));
/// assert_eq!(header.local_id(), Some(LocalId::new(11400000)));
/// assert!(header.is_stripped());
///
/// assert!(parse_header("GameObject:").is_none());
/// assert!(parse_header("--- !u!1 &").unwrap().is_malformed());
/// ```
pub fn parse_header(line: &str) -> Option<BlockHeader> {
    if !is_block_start(line) {
        return None;
    }

    let mut input = line;
    let header = block_header.parse_next(&mut input).unwrap_or(BlockHeader {
        class_id: None,
        local_id: None,
        stripped: false,
    });

    Some(header)
}

fn block_header(input: &mut &str) -> ModalResult<BlockHeader> {
    (
        preceded(BLOCK_MARKER, dec_uint::<_, u32, _>),
        opt(preceded((space1, '&'), dec_int::<_, i64, _>)),
        rest,
    )
        .map(|(class_id, local_id, tail): (u32, Option<i64>, &str)| {
            let stripped = local_id.is_some()
                && tail.split_whitespace().any(|token| token == "stripped");
            BlockHeader {
                class_id: Some(class_id),
                local_id: local_id.map(LocalId::new),
                stripped,
            }
        })
        .parse_next(input)
}
