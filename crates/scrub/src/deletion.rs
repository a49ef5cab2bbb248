//! The set of identifiers excised from a document.

use std::collections::BTreeSet;

use scrub_core::identifier::LocalId;
use scrub_parser::OwnershipIndex;

/// Identifiers with no live backing, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionSet {
    ids: BTreeSet<LocalId>,
}

impl DeletionSet {
    /// Flattens a reconciled index: the union of every remaining identifier.
    pub fn from_reconciled(index: &OwnershipIndex) -> Self {
        index.referenced_ids().collect()
    }

    /// Whether `id` is slated for removal.
    pub fn contains(&self, id: LocalId) -> bool {
        self.ids.contains(&id)
    }

    /// Iterates identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = LocalId> + '_ {
        self.ids.iter().copied()
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is to be removed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<LocalId> for DeletionSet {
    fn from_iter<I: IntoIterator<Item = LocalId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
