//! Reconciliation of the ownership index against the live object graph.
//!
//! After [`reconcile`], every entry of the [`OwnershipIndex`] holds only the
//! identifiers of components with no live counterpart.

use log::{debug, trace};

use scrub_core::graph::ObjectGraph;
use scrub_parser::OwnershipIndex;

/// Collects every node of `graph` in depth-first pre-order.
///
/// Roots are visited in order, each followed by its whole subtree, children
/// in declaration order. The walk uses an explicit stack, so arbitrarily deep
/// hierarchies are reached.
pub fn collect_nodes<G: ObjectGraph>(graph: &G) -> Vec<G::Object> {
    let mut nodes = Vec::new();
    let mut stack: Vec<G::Object> = graph.roots().into_iter().rev().collect();

    while let Some(node) = stack.pop() {
        nodes.push(node);
        stack.extend(graph.children(node).into_iter().rev());
    }

    nodes
}

/// Returns `true` if any of `nodes` has at least one empty component slot.
pub fn has_missing_components<G: ObjectGraph>(graph: &G, nodes: &[G::Object]) -> bool {
    nodes
        .iter()
        .any(|&node| graph.components(node).iter().any(Option::is_none))
}

/// Removes from `index` every component confirmed live by `graph`.
///
/// Nodes without an identifier, or without an entry, are skipped.
pub fn reconcile<G: ObjectGraph>(
    graph: &G,
    nodes: &[G::Object],
    mut index: OwnershipIndex,
) -> OwnershipIndex {
    for &node in nodes {
        let Some(node_id) = graph.local_id(node) else {
            trace!(node:?; "Node has no local identifier");
            continue;
        };
        if !index.contains(node_id) {
            continue;
        }

        for component in graph.components(node).into_iter().flatten() {
            match graph.local_id(component) {
                Some(component_id) => {
                    index.remove_component(node_id, component_id);
                }
                None => debug!(entity:% = node_id, component:?; "Live component has no local identifier"),
            }
        }
    }

    index
}
