use std::{fs, path::Path};

use tempfile::tempdir;

use scrub_cli::{Args, run};

const PLAYER_GUID: &str = "9a3b2c1d0e0f4a5b8c7d6e5f4a3b2c1d";

const BROKEN: &str = "%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!1 &100
GameObject:
  m_ObjectHideFlags: 0
  serializedVersion: 6
  m_Component:
  - component: {fileID: 400}
  - component: {fileID: 200}
  - component: {fileID: 201}
  m_Layer: 0
  m_Name: Player
--- !u!4 &400
Transform:
  m_GameObject: {fileID: 100}
  m_Children:
  - {fileID: 450}
  m_Father: {fileID: 0}
--- !u!114 &200
MonoBehaviour:
  m_GameObject: {fileID: 100}
  m_Enabled: 1
  m_Script: {fileID: 11500000, guid: 9a3b2c1d0e0f4a5b8c7d6e5f4a3b2c1d, type: 3}
--- !u!114 &201
MonoBehaviour:
  m_GameObject: {fileID: 100}
  m_Enabled: 1
  m_Script: {fileID: 11500000, guid: 0badc0de0badc0de0badc0de0badc0de, type: 3}
--- !u!1 &150
GameObject:
  m_Component:
  - component: {fileID: 450}
  - component: {fileID: 250}
  m_Name: Weapon
--- !u!4 &450
Transform:
  m_GameObject: {fileID: 150}
  m_Children: []
  m_Father: {fileID: 400}
";

const FIXED: &str = "%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!1 &100
GameObject:
  m_ObjectHideFlags: 0
  serializedVersion: 6
  m_Component:
  - component: {fileID: 400}
  - component: {fileID: 200}
  m_Layer: 0
  m_Name: Player
--- !u!4 &400
Transform:
  m_GameObject: {fileID: 100}
  m_Children:
  - {fileID: 450}
  m_Father: {fileID: 0}
--- !u!114 &200
MonoBehaviour:
  m_GameObject: {fileID: 100}
  m_Enabled: 1
  m_Script: {fileID: 11500000, guid: 9a3b2c1d0e0f4a5b8c7d6e5f4a3b2c1d, type: 3}
--- !u!1 &150
GameObject:
  m_Component:
  - component: {fileID: 450}
  m_Name: Weapon
--- !u!4 &450
Transform:
  m_GameObject: {fileID: 150}
  m_Children: []
  m_Father: {fileID: 400}
";

fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project() -> tempfile::TempDir {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();

    write(
        root,
        "Assets/Scripts/Player.cs.meta",
        format!("fileFormatVersion: 2\nguid: {PLAYER_GUID}\nMonoImporter:\n"),
    );
    write(root, "Assets/Prefabs/Broken.prefab", BROKEN);
    write(root, "Assets/Prefabs/Clean.prefab", FIXED);
    write(root, "Assets/Prefabs/Binary.prefab", [0x00, 0xff, 0x13, 0x37]);
    write(root, "Library/Stale.prefab", BROKEN);

    dir
}

fn args(root: &Path, dry_run: bool) -> Args {
    Args {
        project: root.to_string_lossy().to_string(),
        config: None,
        dry_run,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_scrubs_project() {
    let dir = project();
    let root = dir.path();

    let summary = run(&args(root, false)).expect("Run should succeed");

    assert_eq!(summary.processed(), 3);
    assert_eq!(summary.modified(), [root.join("Assets/Prefabs/Broken.prefab")]);
    assert_eq!(summary.unchanged(), 1);
    assert_eq!(summary.skipped(), [root.join("Assets/Prefabs/Binary.prefab")]);
    assert!(summary.failed().is_empty());

    assert_eq!(
        fs::read_to_string(root.join("Assets/Prefabs/Broken.prefab")).unwrap(),
        FIXED
    );
    assert_eq!(
        fs::read_to_string(root.join("Library/Stale.prefab")).unwrap(),
        BROKEN
    );

    // A second run finds nothing left to fix.
    let summary = run(&args(root, false)).expect("Second run should succeed");
    assert!(summary.modified().is_empty());
    assert_eq!(summary.unchanged(), 2);
}

#[test]
fn e2e_smoke_test_dry_run() {
    let dir = project();
    let root = dir.path();

    let summary = run(&args(root, true)).expect("Run should succeed");

    assert_eq!(summary.modified().len(), 1);
    assert_eq!(
        fs::read_to_string(root.join("Assets/Prefabs/Broken.prefab")).unwrap(),
        BROKEN
    );
}

#[test]
fn e2e_smoke_test_project_config() {
    let dir = project();
    let root = dir.path();
    write(root, "scrub/config.toml", "[scan]\nextensions = [\"unity\"]\n");
    write(root, "Assets/Scenes/Main.unity", BROKEN);

    let summary = run(&args(root, false)).expect("Run should succeed");

    assert_eq!(summary.processed(), 1);
    assert_eq!(summary.modified(), [root.join("Assets/Scenes/Main.unity")]);
    assert_eq!(
        fs::read_to_string(root.join("Assets/Prefabs/Broken.prefab")).unwrap(),
        BROKEN
    );
}

#[test]
fn e2e_smoke_test_missing_project_fails() {
    let dir = tempdir().expect("Failed to create temp directory");
    let result = run(&args(&dir.path().join("missing"), false));
    assert!(result.is_err());
}
