//! Integration tests for the Scrubber API
//!
//! These tests scrub whole documents against live graphs, both hand-built and
//! reconstructed from the documents themselves.

use std::path::Path;

use proptest::prelude::*;

use scrub::{
    Scrubber,
    config::{AppConfig, MatchMode, RewriteConfig, ScanConfig},
    graph::LiveGraph,
    identifier::LocalId,
    project::{DocumentGraphLoader, ScriptRegistry},
    rewrite::mentions,
};

const KNOWN_GUID: &str = "5e1c7bb2a7f04d6c9a8b6f3e2d1c0b9a";
const UNKNOWN_GUID: &str = "ffffffffffffffffffffffffffffffff";

fn loader() -> DocumentGraphLoader {
    DocumentGraphLoader::new(ScriptRegistry::new().with_guids([KNOWN_GUID]))
}

fn scrub_with_loader(scrubber: &Scrubber, source: &str) -> Option<String> {
    let graph = loader()
        .graph_of(Path::new("test.prefab"), source)
        .expect("Document should load");
    scrubber.scrub(source, &graph).into_output()
}

fn ids(values: &[i64]) -> Vec<LocalId> {
    values.iter().copied().map(LocalId::new).collect()
}

#[test]
fn test_single_missing_component_is_removed() {
    let source = "\
%YAML 1.1
--- !u!1 &100
GameObject:
  m_Component:
  - component: {fileID: 200}
  - component: {fileID: 201}
  m_Name: Player
--- !u!4 &200
Transform:
  m_GameObject: {fileID: 100}
--- !u!114 &201
MonoBehaviour:
  m_GameObject: {fileID: 100}
  m_Script: {fileID: 11500000, guid: ffffffffffffffffffffffffffffffff, type: 3}
";

    let mut graph = LiveGraph::new();
    let root = graph.add_root(LocalId::new(100));
    graph.add_component(root, LocalId::new(200));
    graph.add_missing_component(root);

    let outcome = Scrubber::default().scrub(source, &graph);

    assert_eq!(outcome.deletion().iter().collect::<Vec<_>>(), ids(&[201]));
    assert_eq!(outcome.removed_lines(), 5);
    assert_eq!(
        outcome.output(),
        Some(
            "\
%YAML 1.1
--- !u!1 &100
GameObject:
  m_Component:
  - component: {fileID: 200}
  m_Name: Player
--- !u!4 &200
Transform:
  m_GameObject: {fileID: 100}
"
        )
    );
}

#[test]
fn test_nested_entities_are_fixed_independently() {
    let source = "\
%YAML 1.1
--- !u!1 &100
GameObject:
  m_Component:
  - component: {fileID: 400}
  - component: {fileID: 201}
  m_Name: Root
--- !u!4 &400
Transform:
  m_GameObject: {fileID: 100}
  m_Children:
  - {fileID: 450}
  m_Father: {fileID: 0}
--- !u!114 &201
MonoBehaviour:
  m_GameObject: {fileID: 100}
  m_Script: {fileID: 11500000, guid: 5e1c7bb2a7f04d6c9a8b6f3e2d1c0b9a, type: 3}
--- !u!1 &150
GameObject:
  m_Component:
  - component: {fileID: 450}
  - component: {fileID: 250}
  m_Name: Child
--- !u!4 &450
Transform:
  m_GameObject: {fileID: 150}
  m_Children: []
  m_Father: {fileID: 400}
--- !u!114 &250
MonoBehaviour:
  m_GameObject: {fileID: 150}
  m_Script: {fileID: 11500000, guid: ffffffffffffffffffffffffffffffff, type: 3}
";

    let graph = loader().graph_of(Path::new("nested.prefab"), source).unwrap();
    let outcome = Scrubber::default().scrub(source, &graph);

    assert_eq!(outcome.deletion().iter().collect::<Vec<_>>(), ids(&[250]));
    let output = outcome.output().expect("Document should change");
    assert!(output.contains("--- !u!114 &201\n"));
    assert!(output.contains("  - component: {fileID: 201}\n"));
    assert!(!output.contains("250"));
    assert!(output.contains("  m_Father: {fileID: 400}\n"));
}

#[test]
fn test_document_without_missing_components_is_untouched() {
    let source = "%YAML 1.1\r\n--- !u!1 &1\r\nGameObject:\r\n  m_Component:\r\n  - component: {fileID: 2}\r\n--- !u!4 &2\r\nTransform:\r\n  m_GameObject: {fileID: 1}";

    let outcome = Scrubber::default().scrub(
        source,
        &loader().graph_of(Path::new("clean.prefab"), source).unwrap(),
    );

    assert!(!outcome.is_modified());
    assert!(outcome.deletion().is_empty());
    assert!(outcome.diagnostics().is_empty());
}

#[test]
fn test_builtin_scripts_survive_with_default_loader() {
    let source = "\
%YAML 1.1
--- !u!1 &1
GameObject:
  m_Component:
  - component: {fileID: 3}
--- !u!114 &3
MonoBehaviour:
  m_GameObject: {fileID: 1}
  m_Script: {fileID: 11500000, guid: 0000000000000000e000000000000000, type: 0}
";

    let graph = DocumentGraphLoader::default()
        .graph_of(Path::new("ui.prefab"), source)
        .unwrap();
    let outcome = Scrubber::default().scrub(source, &graph);

    assert!(!outcome.is_modified());
    assert!(outcome.deletion().is_empty());
}

#[test]
fn test_token_containment_by_match_mode() {
    let source = "\
--- !u!1 &1
GameObject:
  m_Component:
  - component: {fileID: 20}
  - component: {fileID: 201}
--- !u!114 &20
MonoBehaviour:
  m_GameObject: {fileID: 1}
--- !u!114 &201
MonoBehaviour:
  m_GameObject: {fileID: 1}
";

    let mut graph = LiveGraph::new();
    let root = graph.add_root(LocalId::new(1));
    graph.add_missing_component(root);
    graph.add_component(root, LocalId::new(201));

    let expected = "\
--- !u!1 &1
GameObject:
  m_Component:
  - component: {fileID: 201}
--- !u!114 &201
MonoBehaviour:
  m_GameObject: {fileID: 1}
";

    for mode in [MatchMode::Reference, MatchMode::Token] {
        let scrubber = Scrubber::new(AppConfig::new(
            ScanConfig::default(),
            RewriteConfig::new(mode),
        ));
        assert_eq!(scrubber.scrub(source, &graph).output(), Some(expected), "{mode:?}");
    }

    let substring = Scrubber::new(AppConfig::new(
        ScanConfig::default(),
        RewriteConfig::new(MatchMode::Substring),
    ));
    assert_eq!(
        substring.scrub(source, &graph).output(),
        Some("--- !u!1 &1\nGameObject:\n  m_Component:\n")
    );
}

#[test]
fn test_duplicate_entity_is_reported_and_first_kept() {
    let source = "\
%YAML 1.1
--- !u!1 &1
GameObject:
  m_Component:
  - component: {fileID: 2}
  - component: {fileID: 3}
--- !u!1 &1
GameObject:
  m_Component:
  - component: {fileID: 9}
--- !u!4 &2
Transform:
";

    let mut graph = LiveGraph::new();
    let root = graph.add_root(LocalId::new(1));
    graph.add_component(root, LocalId::new(2));
    graph.add_missing_component(root);

    let outcome = Scrubber::default().scrub(source, &graph);

    assert_eq!(outcome.diagnostics().len(), 1);
    assert_eq!(outcome.deletion().iter().collect::<Vec<_>>(), ids(&[3]));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Live,
    UnknownScript,
    Dangling,
}

fn slot() -> impl Strategy<Value = Slot> {
    prop_oneof![Just(Slot::Live), Just(Slot::UnknownScript), Just(Slot::Dangling)]
}

/// Renders a document from per-entity slot kinds, together with the document
/// expected after scrubbing and the identifiers of live and missing slots.
fn render(entities: &[Vec<Slot>]) -> (String, String, Vec<i64>, Vec<i64>) {
    let mut source = String::from("%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n");
    let mut expected = source.clone();
    let mut live = Vec::new();
    let mut missing = Vec::new();

    let component_id = |entity: i64, index: usize| entity + index as i64 + 1;

    for (i, slots) in entities.iter().enumerate() {
        let entity = 1000 * (i as i64 + 1);
        let mut head = format!("--- !u!1 &{entity}\nGameObject:\n  m_Component:\n");
        let mut fixed_head = head.clone();
        for (j, &slot) in slots.iter().enumerate() {
            let line = format!("  - component: {{fileID: {}}}\n", component_id(entity, j));
            head.push_str(&line);
            if slot == Slot::Live {
                fixed_head.push_str(&line);
            }
        }
        let name = format!("  m_Name: Entity{i}\n");
        head.push_str(&name);
        fixed_head.push_str(&name);
        source.push_str(&head);
        expected.push_str(&fixed_head);

        for (j, &slot) in slots.iter().enumerate() {
            let id = component_id(entity, j);
            let guid = match slot {
                Slot::Live => KNOWN_GUID,
                Slot::UnknownScript => UNKNOWN_GUID,
                Slot::Dangling => {
                    missing.push(id);
                    continue;
                }
            };
            let block = format!(
                "--- !u!114 &{id}\nMonoBehaviour:\n  m_GameObject: {{fileID: {entity}}}\n  m_Script: {{fileID: 11500000, guid: {guid}, type: 3}}\n"
            );
            source.push_str(&block);
            if slot == Slot::Live {
                expected.push_str(&block);
                live.push(id);
            } else {
                missing.push(id);
            }
        }
    }

    (source, expected, live, missing)
}

proptest! {
    #[test]
    fn prop_scrub_removes_exactly_the_missing(
        entities in prop::collection::vec(prop::collection::vec(slot(), 0..6), 1..6),
    ) {
        let (source, expected, live, missing) = render(&entities);
        let scrubber = Scrubber::default();
        let graph = loader().graph_of(Path::new("gen.prefab"), &source).unwrap();
        let outcome = scrubber.scrub(&source, &graph);

        let mut missing_ids = ids(&missing);
        missing_ids.sort();
        prop_assert_eq!(outcome.deletion().iter().collect::<Vec<_>>(), missing_ids);
        for id in ids(&live) {
            prop_assert!(!outcome.deletion().contains(id));
        }

        let output = outcome.output().unwrap_or(&source);
        prop_assert_eq!(output, expected.as_str());
        let mode = scrubber.config().rewrite().match_mode();
        for id in &missing {
            let id = id.to_string();
            prop_assert!(!output.lines().any(|line| mentions(line, &id, mode)));
        }

        if missing.is_empty() {
            prop_assert!(!outcome.is_modified());
        }
    }

    #[test]
    fn prop_scrub_is_idempotent(
        entities in prop::collection::vec(prop::collection::vec(slot(), 0..6), 1..6),
    ) {
        let (source, _, _, _) = render(&entities);
        let scrubber = Scrubber::default();

        let once = scrub_with_loader(&scrubber, &source).unwrap_or_else(|| source.clone());
        prop_assert_eq!(scrub_with_loader(&scrubber, &once), None);
    }
}
