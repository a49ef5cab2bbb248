//! Scrub - removes missing component references from serialized scene and
//! prefab documents.
//!
//! A document is scrubbed in two passes. The first reads the ownership index
//! (which components each entity claims) and reconciles it against the live
//! object graph, leaving only components that failed to resolve. The second
//! rewrites the document, dropping every block and line that refers to them.
//!
//! Documents without a single missing component are never touched.

pub mod batch;
pub mod config;
pub mod deletion;
pub mod project;
pub mod reconcile;
pub mod rewrite;

mod error;

pub use scrub_core::{document, graph, identifier};

pub use error::ScrubError;

use log::{debug, info, trace};

use scrub_core::{document::Document, graph::ObjectGraph};
use scrub_parser::{build_index, error::Diagnostic};

use config::AppConfig;
use deletion::DeletionSet;

/// Scrubs documents against their live object graphs.
///
/// # Examples
///
/// ```
/// use scrub::{Scrubber, graph::LiveGraph, identifier::LocalId};
///
/// let source = "\
/// --- !u!1 &100
/// GameObject:
///   m_Component:
///   - component: {fileID: 200}
///   - component: {fileID: 201}
/// --- !u!4 &200
/// Transform:
/// --- !u!114 &201
/// MonoBehaviour:
/// ";
///
/// let mut graph = LiveGraph::new();
/// let root = graph.add_root(LocalId::new(100));
/// graph.add_component(root, LocalId::new(200));
/// graph.add_missing_component(root);
///
/// let outcome = Scrubber::default().scrub(source, &graph);
/// assert_eq!(
///     outcome.output(),
///     Some("--- !u!1 &100\nGameObject:\n  m_Component:\n  - component: {fileID: 200}\n--- !u!4 &200\nTransform:\n")
/// );
/// ```
#[derive(Debug, Default)]
pub struct Scrubber {
    config: AppConfig,
}

impl Scrubber {
    /// Create a new scrubber with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Scrubs `source` against `graph`, its live counterpart.
    ///
    /// Anomalies found while indexing are returned in the outcome and never
    /// stop the document from being processed.
    pub fn scrub<G: ObjectGraph>(&self, source: &str, graph: &G) -> ScrubOutcome {
        let nodes = reconcile::collect_nodes(graph);
        if !reconcile::has_missing_components(graph, &nodes) {
            debug!(nodes_count = nodes.len(); "No missing components");
            return ScrubOutcome::default();
        }

        let document = Document::new(source);
        let (index, diagnostics) = build_index(&document);
        debug!(entities_count = index.len(), diagnostics_count = diagnostics.len(); "Document indexed");

        let index = reconcile::reconcile(graph, &nodes, index);
        let deletion = DeletionSet::from_reconciled(&index);
        trace!(deletion:?; "Deletion set");

        if deletion.is_empty() {
            debug!("Missing components have no recorded identifier");
            return ScrubOutcome {
                diagnostics,
                ..ScrubOutcome::default()
            };
        }

        let rewrite = rewrite::rewrite(&document, &deletion, self.config.rewrite().match_mode());
        let removed_lines = rewrite.removed_lines();
        let output = (removed_lines > 0).then(|| rewrite.into_output());

        info!(deleted_ids = deletion.len(), removed_lines; "Document scrubbed");

        ScrubOutcome {
            output,
            deletion,
            removed_lines,
            diagnostics,
        }
    }
}

/// Result of scrubbing one document.
#[derive(Debug, Default)]
pub struct ScrubOutcome {
    output: Option<String>,
    deletion: DeletionSet,
    removed_lines: usize,
    diagnostics: Vec<Diagnostic>,
}

impl ScrubOutcome {
    /// The rewritten document, or `None` if it is unchanged.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Consumes the outcome, returning the rewritten document if any.
    pub fn into_output(self) -> Option<String> {
        self.output
    }

    /// Whether the document changed.
    pub fn is_modified(&self) -> bool {
        self.output.is_some()
    }

    /// Identifiers excised from the document.
    pub fn deletion(&self) -> &DeletionSet {
        &self.deletion
    }

    /// Number of dropped lines.
    pub fn removed_lines(&self) -> usize {
        self.removed_lines
    }

    /// Anomalies found while indexing the document.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
