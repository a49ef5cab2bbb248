//! Single-line field readers.
//!
//! Objects serialize their properties as indented `key: value` lines, and
//! object references as flow mappings like `{fileID: 400000}` or
//! `{fileID: 11500000, guid: 0123abcd, type: 3}`. Only these flat shapes are
//! read; nested structures are out of reach by design of the format subset.

use winnow::{
    ModalResult, Parser as _,
    ascii::{dec_int, space0},
    combinator::{delimited, separated, terminated},
    token::{take_till, take_while},
};

use scrub_core::identifier::LocalId;

/// Returns the value of `key` on a `key: value` line, ignoring indentation
/// and a leading sequence dash.
///
/// # Examples
///
/// ```
/// use scrub_parser::fields::field;
///
/// assert_eq!(field("  m_GameObject: {fileID: 100}", "m_GameObject"), Some("{fileID: 100}"));
/// assert_eq!(field("  - component: {fileID: 4}", "component"), Some("{fileID: 4}"));
/// assert_eq!(field("  m_Children: []", "m_Children"), Some("[]"));
/// assert_eq!(field("  m_Component:", "m_Component"), Some(""));
/// assert_eq!(field("  m_Father: {fileID: 0}", "m_Name"), None);
/// ```
pub fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    let trimmed = trimmed.strip_prefix("- ").unwrap_or(trimmed);
    trimmed
        .strip_prefix(key)?
        .strip_prefix(':')
        .map(str::trim)
}

/// Parses a flow mapping such as `{fileID: 11500000, guid: abc, type: 3}`
/// into its key/value pairs.
pub fn flow_mapping(value: &str) -> Option<Vec<(&str, &str)>> {
    let mut input = value.trim();
    let pairs = mapping.parse_next(&mut input).ok()?;
    input.trim().is_empty().then_some(pairs)
}

/// Reads the `fileID` of a reference value.
///
/// # Examples
///
/// ```
/// use scrub_core::identifier::LocalId;
/// use scrub_parser::fields::file_id;
///
/// assert_eq!(file_id("{fileID: 400000}"), Some(LocalId::new(400000)));
/// assert_eq!(file_id("{fileID: 0}"), Some(LocalId::NULL));
/// assert_eq!(file_id("Player"), None);
/// ```
pub fn file_id(value: &str) -> Option<LocalId> {
    mapping_value(value, "fileID")?.parse().ok()
}

/// Reads the `guid` of a reference value, if present.
pub fn guid(value: &str) -> Option<&str> {
    mapping_value(value, "guid").filter(|guid| !guid.is_empty())
}

/// Returns the first integer embedded in `line`, sign included.
///
/// # Examples
///
/// ```
/// use scrub_core::identifier::LocalId;
/// use scrub_parser::fields::first_integer;
///
/// assert_eq!(first_integer("  - component: {fileID: 201}"), Some(LocalId::new(201)));
/// assert_eq!(first_integer("  - 114: {fileID: -7}"), Some(LocalId::new(114)));
/// assert_eq!(first_integer("  - component: {fileID: -7}"), Some(LocalId::new(-7)));
/// assert_eq!(first_integer("  - component: {}"), None);
/// ```
pub fn first_integer(line: &str) -> Option<LocalId> {
    let bytes = line.as_bytes();
    let start = (0..bytes.len()).find(|&i| {
        bytes[i].is_ascii_digit()
            || (bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    })?;

    let mut input = &line[start..];
    integer.parse_next(&mut input).ok().map(LocalId::new)
}

fn mapping_value<'a>(value: &'a str, key: &str) -> Option<&'a str> {
    flow_mapping(value)?
        .into_iter()
        .find_map(|(k, v)| (k == key).then_some(v))
}

fn integer(input: &mut &str) -> ModalResult<i64> {
    dec_int.parse_next(input)
}

fn mapping<'a>(input: &mut &'a str) -> ModalResult<Vec<(&'a str, &'a str)>> {
    delimited(
        ('{', space0),
        separated(0.., entry, (',', space0)),
        (space0, '}'),
    )
    .parse_next(input)
}

fn entry<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    (
        terminated(
            take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
            (':', space0),
        ),
        take_till(0.., [',', '}']).map(str::trim),
    )
        .parse_next(input)
}
