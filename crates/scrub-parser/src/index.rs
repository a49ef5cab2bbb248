//! Ownership index: which components each entity declares.
//!
//! The first pass over a document records, for every entity block, the
//! identifiers listed in its `m_Component` section:
//!
//! ```text
//! --- !u!1 &100
//! GameObject:
//!   m_Component:
//!   - component: {fileID: 200}
//!   - component: {fileID: 201}
//!   m_Layer: 0
//! ```
//!
//! yields `100 -> [200, 201]`. Collection starts on the line after the
//! `m_Component` marker and continues while lines contain the `component`
//! token; each contributes the first integer it contains.

use std::collections::{HashMap, hash_map::Entry};

use indexmap::IndexMap;
use log::{debug, trace};

use scrub_core::{
    document::{Document, Line},
    identifier::LocalId,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    fields::first_integer,
    header::{is_block_start, parse_header},
};

/// Marker token introducing an entity's component list.
pub const COMPONENT_LIST_MARKER: &str = "m_Component";

/// Token carried by every entry of a component list.
pub const COMPONENT_TOKEN: &str = "component";

/// Mapping from entity identifier to the ordered identifiers of the
/// components it declares. Entities keep document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipIndex {
    entries: IndexMap<LocalId, Vec<LocalId>>,
}

impl OwnershipIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry. Returns `false` and leaves the index untouched if
    /// the entity is already present.
    pub fn insert(&mut self, entity: LocalId, components: Vec<LocalId>) -> bool {
        match self.entries.entry(entity) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(components);
                true
            }
        }
    }

    /// Components declared by `entity`.
    pub fn get(&self, entity: LocalId) -> Option<&[LocalId]> {
        self.entries.get(&entity).map(Vec::as_slice)
    }

    /// Removes every occurrence of `component` from the entry of `entity`.
    /// Returns `true` if anything was removed.
    pub fn remove_component(&mut self, entity: LocalId, component: LocalId) -> bool {
        let Some(components) = self.entries.get_mut(&entity) else {
            return false;
        };
        let before = components.len();
        components.retain(|&id| id != component);
        components.len() != before
    }

    /// Whether `entity` has an entry.
    pub fn contains(&self, entity: LocalId) -> bool {
        self.entries.contains_key(&entity)
    }

    /// Iterates entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalId, &[LocalId])> {
        self.entries.iter().map(|(&id, ids)| (id, ids.as_slice()))
    }

    /// Iterates every referenced identifier across all entries.
    pub fn referenced_ids(&self) -> impl Iterator<Item = LocalId> + '_ {
        self.entries.values().flatten().copied()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the ownership index of `document`.
///
/// Never fails: malformed headers, duplicate identifiers and unreadable
/// entries are reported in the returned diagnostics and skipped.
pub fn build_index(document: &Document<'_>) -> (OwnershipIndex, Vec<Diagnostic>) {
    let lines = document.lines();
    let mut index = OwnershipIndex::new();
    let mut collector = DiagnosticCollector::new();
    let mut first_seen: HashMap<LocalId, &Line<'_>> = HashMap::new();
    let mut entity_lines: HashMap<LocalId, &Line<'_>> = HashMap::new();

    let mut cursor = 0;
    while cursor < lines.len() {
        let line = &lines[cursor];
        cursor += 1;

        let Some(header) = parse_header(line.text()) else {
            continue;
        };

        let Some(id) = header.local_id() else {
            collector.emit(
                Diagnostic::warning("block header has no local identifier")
                    .with_code(ErrorCode::E001)
                    .with_label(line.span(), "expected `&<integer>`")
                    .with_help("the block is left out of the ownership index"),
            );
            continue;
        };

        match first_seen.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(line);
            }
            Entry::Occupied(first) if !header.is_entity() || !index.contains(id) => {
                collector.emit(
                    Diagnostic::warning(format!("block `&{id}` is defined multiple times"))
                        .with_code(ErrorCode::E201)
                        .with_label(line.span(), "duplicate identifier")
                        .with_secondary_label(first.get().span(), "first defined here"),
                );
            }
            Entry::Occupied(_) => {}
        }

        if !header.is_entity() {
            continue;
        }

        let components = collect_components(lines, &mut cursor, &mut collector);
        trace!(entity:% = id, components:?; "Entity components collected");

        if index.insert(id, components) {
            entity_lines.insert(id, line);
        } else {
            let mut diagnostic =
                Diagnostic::error(format!("entity `&{id}` is defined multiple times"))
                    .with_code(ErrorCode::E200)
                    .with_label(line.span(), "duplicate definition")
                    .with_help("the first definition is used for scrubbing");
            if let Some(first) = entity_lines.get(&id) {
                diagnostic = diagnostic.with_secondary_label(first.span(), "first defined here");
            }
            collector.emit(diagnostic);
        }
    }

    debug!(
        entities_count = index.len(),
        has_errors = collector.has_errors();
        "Ownership index built"
    );

    (index, collector.into_diagnostics())
}

/// Reads the component list of the entity whose header precedes `cursor`.
///
/// Stops scanning for the marker at the next block header, leaving the
/// cursor on it so the caller processes that block normally.
fn collect_components(
    lines: &[Line<'_>],
    cursor: &mut usize,
    collector: &mut DiagnosticCollector,
) -> Vec<LocalId> {
    let mut components = Vec::new();

    loop {
        let Some(line) = lines.get(*cursor) else {
            debug!("Component list marker not found before end of document");
            return components;
        };
        if is_block_start(line.text()) {
            debug!(line = line.number(); "Component list marker not found in entity block");
            return components;
        }
        *cursor += 1;
        if line.text().contains(COMPONENT_LIST_MARKER) {
            break;
        }
    }

    while let Some(line) = lines.get(*cursor) {
        let text = line.text();
        if !text.contains(COMPONENT_TOKEN) || is_block_start(text) {
            break;
        }
        *cursor += 1;

        match first_integer(text) {
            Some(id) if id.is_null() => collector.emit(
                Diagnostic::warning("component entry references `{fileID: 0}`")
                    .with_code(ErrorCode::E101)
                    .with_label(line.span(), "null reference"),
            ),
            Some(id) => components.push(id),
            None => collector.emit(
                Diagnostic::warning("component entry has no identifier")
                    .with_code(ErrorCode::E100)
                    .with_label(line.span(), "expected an integer"),
            ),
        }
    }

    components
}
