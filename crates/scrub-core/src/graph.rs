//! The live object graph.
//!
//! Scrubbing cross-references a serialized document against the objects that
//! actually exist when the document is loaded. That knowledge comes from an
//! oracle implementing [`ObjectGraph`]: it exposes the node hierarchy, the
//! component slots attached to each node (a slot is `None` when its
//! implementation could not be resolved), and an identifier lookup that maps
//! any object back to its [`LocalId`] in the document.
//!
//! [`LiveGraph`] is an arena-backed implementation used for tests and for
//! graphs reconstructed from documents.

use std::fmt;

use crate::identifier::LocalId;

/// Oracle over a live object graph.
///
/// Nodes and components share one handle type, [`ObjectGraph::Object`], so the
/// same identifier lookup serves both.
pub trait ObjectGraph {
    /// Handle to a node or component in the graph.
    type Object: Copy + fmt::Debug;

    /// Top-level nodes in declaration order.
    fn roots(&self) -> Vec<Self::Object>;

    /// Direct children of `node` in declaration order.
    fn children(&self, node: Self::Object) -> Vec<Self::Object>;

    /// Component slots attached to `node`, in order. Missing components are
    /// reported as `None` rather than omitted.
    fn components(&self, node: Self::Object) -> Vec<Option<Self::Object>>;

    /// The identifier of `object` in the serialized document, if it has one.
    fn local_id(&self, object: Self::Object) -> Option<LocalId>;
}

/// Handle to an object stored in a [`LiveGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(usize);

#[derive(Debug, Default)]
struct LiveObject {
    local_id: Option<LocalId>,
    children: Vec<ObjectHandle>,
    slots: Vec<Option<ObjectHandle>>,
}

/// In-memory object graph.
///
/// # Examples
///
/// ```
/// use scrub_core::{graph::{LiveGraph, ObjectGraph}, identifier::LocalId};
///
/// let mut graph = LiveGraph::new();
/// let root = graph.add_root(LocalId::new(100));
/// graph.add_component(root, LocalId::new(200));
/// graph.add_missing_component(root);
///
/// let slots = graph.components(root);
/// assert_eq!(slots.len(), 2);
/// assert!(slots[1].is_none());
/// ```
#[derive(Debug, Default)]
pub struct LiveGraph {
    objects: Vec<LiveObject>,
    roots: Vec<ObjectHandle>,
}

impl LiveGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level node.
    pub fn add_root(&mut self, local_id: impl Into<Option<LocalId>>) -> ObjectHandle {
        let handle = self.push(local_id.into());
        self.roots.push(handle);
        handle
    }

    /// Adds a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this graph.
    pub fn add_child(
        &mut self,
        parent: ObjectHandle,
        local_id: impl Into<Option<LocalId>>,
    ) -> ObjectHandle {
        let handle = self.push(local_id.into());
        self.objects[parent.0].children.push(handle);
        handle
    }

    /// Attaches a live component to `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not belong to this graph.
    pub fn add_component(
        &mut self,
        node: ObjectHandle,
        local_id: impl Into<Option<LocalId>>,
    ) -> ObjectHandle {
        let handle = self.push(local_id.into());
        self.objects[node.0].slots.push(Some(handle));
        handle
    }

    /// Attaches an empty (missing) component slot to `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not belong to this graph.
    pub fn add_missing_component(&mut self, node: ObjectHandle) {
        self.objects[node.0].slots.push(None);
    }

    /// Total number of stored objects, components included.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn push(&mut self, local_id: Option<LocalId>) -> ObjectHandle {
        let handle = ObjectHandle(self.objects.len());
        self.objects.push(LiveObject {
            local_id,
            ..LiveObject::default()
        });
        handle
    }
}

impl ObjectGraph for LiveGraph {
    type Object = ObjectHandle;

    fn roots(&self) -> Vec<ObjectHandle> {
        self.roots.clone()
    }

    fn children(&self, node: ObjectHandle) -> Vec<ObjectHandle> {
        self.objects
            .get(node.0)
            .map(|object| object.children.clone())
            .unwrap_or_default()
    }

    fn components(&self, node: ObjectHandle) -> Vec<Option<ObjectHandle>> {
        self.objects
            .get(node.0)
            .map(|object| object.slots.clone())
            .unwrap_or_default()
    }

    fn local_id(&self, object: ObjectHandle) -> Option<LocalId> {
        self.objects.get(object.0).and_then(|object| object.local_id)
    }
}
