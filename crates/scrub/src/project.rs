//! Live graphs reconstructed from the documents themselves.
//!
//! Outside an editor there is no loaded object graph to ask which components
//! resolved. [`DocumentGraphLoader`] rebuilds one from the document:
//!
//! - every GameObject in the ownership index becomes a node; stripped
//!   GameObjects list no components and so carry no slots
//! - parent/child links and child order come from the Transform hierarchy
//!   (`m_GameObject`, `m_Father`, `m_Children`)
//! - every entry of a GameObject's `m_Component` list becomes a slot, which is
//!   empty when no block defines the component, or when the component is a
//!   MonoBehaviour whose `m_Script` guid is unknown to the [`ScriptRegistry`]
//!
//! Local identifiers are read straight from block headers, so node and
//! component identifiers always agree with the document.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use indexmap::IndexMap;
use log::{debug, info, trace, warn};
use walkdir::WalkDir;

use scrub_core::{
    document::Document,
    graph::{LiveGraph, ObjectHandle},
    identifier::LocalId,
};
use scrub_parser::{
    block::{Block, split_blocks},
    build_index,
    fields::{field, file_id, guid},
};

use crate::{batch::GraphLoader, config::ScanConfig, error::ScrubError};

/// Class number of MonoBehaviour blocks, the only components backed by scripts.
pub const MONO_BEHAVIOUR_CLASS_ID: u32 = 114;

/// Class numbers of hierarchy-carrying components (Transform, RectTransform).
pub const TRANSFORM_CLASS_IDS: [u32; 2] = [4, 224];

/// Guids of engine-provided resources, resolvable in every project.
const BUILTIN_GUIDS: [&str; 2] = [
    "0000000000000000e000000000000000",
    "0000000000000000f000000000000000",
];

const DOCUMENT_DIRECTIVE: &str = "%YAML";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Set of script guids that resolve in a project.
///
/// Built-in guids are always present.
#[derive(Debug, Clone)]
pub struct ScriptRegistry {
    guids: HashSet<String>,
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRegistry {
    /// Creates a registry holding only the built-in guids.
    pub fn new() -> Self {
        Self {
            guids: HashSet::new(),
        }
        .with_guids(BUILTIN_GUIDS)
    }

    /// Builds the registry of a project: every `guid:` declared by a `.meta`
    /// file under the configured script roots, plus the configured extra guids.
    /// Missing roots are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::Walk`] if a root cannot be traversed.
    pub fn scan(project_root: &Path, config: &ScanConfig) -> Result<Self, ScrubError> {
        let mut registry = Self::new().with_guids(config.known_guids().iter().cloned());

        for root in config.script_roots() {
            let dir = project_root.join(root);
            if !dir.is_dir() {
                debug!(path = dir.display().to_string(); "Script root not found");
                continue;
            }

            for entry in WalkDir::new(&dir).follow_links(false) {
                let entry = entry?;
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|ext| ext.to_str()) != Some("meta")
                {
                    continue;
                }

                match fs::read_to_string(path) {
                    Ok(content) => {
                        if let Some(guid) = meta_guid(&content) {
                            registry.guids.insert(guid.to_string());
                        }
                    }
                    Err(err) => {
                        warn!(path = path.display().to_string(), err:%; "Unreadable meta file");
                    }
                }
            }
        }

        info!(guids_count = registry.len(); "Script registry built");
        Ok(registry)
    }

    /// Adds guids to the registry.
    pub fn with_guids<I, S>(mut self, guids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guids.extend(guids.into_iter().map(Into::into));
        self
    }

    /// Whether `guid` resolves.
    pub fn contains(&self, guid: &str) -> bool {
        self.guids.contains(guid)
    }

    /// Number of known guids.
    pub fn len(&self) -> usize {
        self.guids.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.guids.is_empty()
    }
}

fn meta_guid(content: &str) -> Option<&str> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("guid:"))
        .map(str::trim)
        .filter(|guid| !guid.is_empty())
}

/// Loads live graphs by reading documents against a [`ScriptRegistry`].
#[derive(Debug, Clone, Default)]
pub struct DocumentGraphLoader {
    registry: ScriptRegistry,
}

impl DocumentGraphLoader {
    /// Creates a loader resolving scripts against `registry`.
    pub fn new(registry: ScriptRegistry) -> Self {
        Self { registry }
    }

    /// The registry used to resolve scripts.
    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    /// Builds the live graph of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::NotADocument`] if `source` is not a text
    /// document or defines no GameObject. A leading byte order mark is
    /// accepted.
    pub fn graph_of(&self, path: &Path, source: &str) -> Result<LiveGraph, ScrubError> {
        if !source
            .trim_start_matches(BYTE_ORDER_MARK)
            .starts_with(DOCUMENT_DIRECTIVE)
        {
            return Err(ScrubError::NotADocument(path.to_path_buf()));
        }

        let document = Document::new(source);
        let blocks = split_blocks(&document);
        let (index, _) = build_index(&document);
        if index.is_empty() {
            return Err(ScrubError::NotADocument(path.to_path_buf()));
        }

        let components = component_blocks(&blocks);
        let hierarchy = Hierarchy::new(&index, &components);

        let mut graph = LiveGraph::new();
        let mut placed: HashSet<LocalId> = HashSet::new();

        for &root in &hierarchy.roots {
            self.place_subtree(&mut graph, None, root, &index, &components, &hierarchy, &mut placed);
        }

        // Entities caught in a parent cycle are attached at top level so none
        // of them reads as absent from the live graph.
        for (entity, _) in index.iter() {
            if !placed.contains(&entity) {
                warn!(entity:%; "Entity unreachable from any root");
                self.place_subtree(&mut graph, None, entity, &index, &components, &hierarchy, &mut placed);
            }
        }

        debug!(
            path = path.display().to_string(),
            nodes_count = placed.len(),
            objects_count = graph.object_count();
            "Live graph reconstructed"
        );

        Ok(graph)
    }

    #[allow(clippy::too_many_arguments)]
    fn place_subtree(
        &self,
        graph: &mut LiveGraph,
        parent: Option<ObjectHandle>,
        entity: LocalId,
        index: &scrub_parser::OwnershipIndex,
        components: &HashMap<LocalId, ComponentBlock<'_>>,
        hierarchy: &Hierarchy,
        placed: &mut HashSet<LocalId>,
    ) {
        let mut stack = vec![(parent, entity)];

        while let Some((parent, entity)) = stack.pop() {
            if !placed.insert(entity) {
                continue;
            }

            let node = match parent {
                Some(parent) => graph.add_child(parent, entity),
                None => graph.add_root(entity),
            };

            for &component in index.get(entity).unwrap_or_default() {
                match components.get(&component) {
                    Some(block) if self.resolves(block) => {
                        graph.add_component(node, component);
                    }
                    Some(_) => {
                        trace!(entity:%, component:%; "Script does not resolve");
                        graph.add_missing_component(node);
                    }
                    None => {
                        trace!(entity:%, component:%; "Component block not found");
                        graph.add_missing_component(node);
                    }
                }
            }

            if let Some(children) = hierarchy.children.get(&entity) {
                stack.extend(children.iter().rev().map(|&child| (Some(node), child)));
            }
        }
    }

    fn resolves(&self, block: &ComponentBlock<'_>) -> bool {
        if block.stripped || block.class_id != Some(MONO_BEHAVIOUR_CLASS_ID) {
            return true;
        }
        block
            .script
            .and_then(guid)
            .is_some_and(|guid| self.registry.contains(guid))
    }
}

impl GraphLoader for DocumentGraphLoader {
    type Graph = LiveGraph;

    fn load(&self, path: &Path, source: &str) -> Result<LiveGraph, ScrubError> {
        self.graph_of(path, source)
    }
}

/// The parts of a component block needed to build the graph.
#[derive(Debug)]
struct ComponentBlock<'a> {
    class_id: Option<u32>,
    stripped: bool,
    game_object: Option<LocalId>,
    father: Option<LocalId>,
    children: Vec<LocalId>,
    script: Option<&'a str>,
}

fn component_blocks<'a>(blocks: &[Block<'_, 'a>]) -> HashMap<LocalId, ComponentBlock<'a>> {
    let mut components = HashMap::new();

    for block in blocks {
        let header = block.header();
        let Some(id) = header.local_id() else {
            continue;
        };
        if header.is_entity() {
            continue;
        }

        components.entry(id).or_insert_with(|| ComponentBlock {
            class_id: header.class_id(),
            stripped: header.is_stripped(),
            game_object: block.field("m_GameObject").and_then(file_id),
            father: block.field("m_Father").and_then(file_id),
            children: children_of(block),
            script: block.field("m_Script"),
        });
    }

    components
}

/// Reads the `m_Children` sequence of a transform block.
fn children_of(block: &Block<'_, '_>) -> Vec<LocalId> {
    let body = block.body();
    let Some(start) = body
        .iter()
        .position(|line| field(line.text(), "m_Children").is_some())
    else {
        return Vec::new();
    };

    body[start + 1..]
        .iter()
        .map(|line| line.text().trim_start())
        .take_while(|text| text.starts_with("- "))
        .filter_map(|text| file_id(&text[2..]))
        .filter(|id| !id.is_null())
        .collect()
}

/// Entity-level hierarchy derived from transforms.
#[derive(Debug, Default)]
struct Hierarchy {
    roots: Vec<LocalId>,
    children: HashMap<LocalId, Vec<LocalId>>,
}

impl Hierarchy {
    fn new(
        index: &scrub_parser::OwnershipIndex,
        components: &HashMap<LocalId, ComponentBlock<'_>>,
    ) -> Self {
        // Transform id -> owning entity, for entities in the index.
        let mut transforms: IndexMap<LocalId, LocalId> = IndexMap::new();
        for (entity, ids) in index.iter() {
            let transform = ids.iter().copied().find(|id| {
                components.get(id).is_some_and(|block| {
                    block
                        .class_id
                        .is_some_and(|class| TRANSFORM_CLASS_IDS.contains(&class))
                })
            });
            if let Some(transform) = transform {
                transforms.insert(transform, entity);
            }
        }

        let mut hierarchy = Hierarchy::default();
        let mut has_parent: HashSet<LocalId> = HashSet::new();

        for (&transform, &entity) in &transforms {
            let Some(block) = components.get(&transform) else {
                continue;
            };
            if block.game_object.is_some_and(|owner| owner != entity) {
                debug!(entity:%, transform:%; "Transform owned by another entity");
            }

            let children: Vec<LocalId> = block
                .children
                .iter()
                .filter_map(|child| transforms.get(child).copied())
                .collect();
            has_parent.extend(children.iter().copied());
            hierarchy.children.insert(entity, children);
        }

        // Children listed only through `m_Father` still hang under their parent.
        for (&transform, &entity) in &transforms {
            if has_parent.contains(&entity) {
                continue;
            }
            let parent = components
                .get(&transform)
                .and_then(|block| block.father)
                .filter(|father| !father.is_null())
                .and_then(|father| transforms.get(&father).copied());
            if let Some(parent) = parent {
                hierarchy.children.entry(parent).or_default().push(entity);
                has_parent.insert(entity);
            }
        }

        hierarchy.roots = index
            .iter()
            .map(|(entity, _)| entity)
            .filter(|entity| !has_parent.contains(entity))
            .collect();

        hierarchy
    }
}
