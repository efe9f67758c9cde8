// tests/fixture_tree.rs

//! Integration tests for fixture tree synthesis and the walker's ordering
//! contract over it.
//!
//! The fixture tree is the canonical symlink-stress input for the
//! packaging pipeline: a `var` directory symlink aliasing `private/var`
//! and a file symlink inside the aliased tree pointing back out of it.

use asar_verify::fixture::{DEFAULT_FILE_CONTENT, FixtureBuilder};
use asar_verify::walk::{TreeEntry, normalized_tree, walk};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn default_tree_has_exactly_the_documented_shape() {
    let tmp = TempDir::new().unwrap();
    let mut builder = FixtureBuilder::new(tmp.path());
    let tree = builder.build(Some("shape"), &BTreeMap::new()).unwrap();

    let file = tree.test_path.join("private/var/file.txt");
    assert_eq!(fs::read_to_string(&file).unwrap(), DEFAULT_FILE_CONTENT);

    let app_link = tree.test_path.join("private/var/app/file.txt");
    assert!(app_link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&app_link).unwrap(), PathBuf::from("../file.txt"));

    let var_link = tree.test_path.join("var");
    assert!(var_link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&var_link).unwrap(), PathBuf::from("private/var"));

    // Reading through both symlinks resolves to the same default file.
    assert_eq!(
        fs::read_to_string(&app_link).unwrap(),
        DEFAULT_FILE_CONTENT
    );
    assert_eq!(
        fs::read_to_string(var_link.join("file.txt")).unwrap(),
        DEFAULT_FILE_CONTENT
    );
}

#[test]
fn default_tree_walks_in_the_pinned_order() {
    let tmp = TempDir::new().unwrap();
    let mut builder = FixtureBuilder::new(tmp.path());
    let tree = builder.build(Some("order"), &BTreeMap::new()).unwrap();

    let root = &tree.test_path;
    let listed = walk(root).unwrap();
    // Descendants of app first (the symlink), then app itself, then
    // file.txt under the private/var level, then the ancestors, then the
    // top-level var symlink.
    assert_eq!(
        listed,
        vec![
            root.join("private/var/app/file.txt"),
            root.join("private/var/app"),
            root.join("private/var/file.txt"),
            root.join("private/var"),
            root.join("private"),
            root.join("var"),
        ]
    );
}

#[test]
fn materialized_tree_carries_text_content_through_symlinks() {
    let tmp = TempDir::new().unwrap();
    let mut builder = FixtureBuilder::new(tmp.path());
    let tree = builder.build(Some("content"), &BTreeMap::new()).unwrap();

    let entries = normalized_tree(&tree.test_path).unwrap();
    assert_eq!(
        entries,
        vec![
            TreeEntry::File {
                name: "private/var/app/file.txt".into(),
                content: DEFAULT_FILE_CONTENT.into(),
            },
            TreeEntry::Path("private/var/app".into()),
            TreeEntry::File {
                name: "private/var/file.txt".into(),
                content: DEFAULT_FILE_CONTENT.into(),
            },
            TreeEntry::Path("private/var".into()),
            TreeEntry::Path("private".into()),
            TreeEntry::Path("var".into()),
        ]
    );
}

#[test]
fn extra_files_land_in_the_aliased_tree() {
    let tmp = TempDir::new().unwrap();
    let mut builder = FixtureBuilder::new(tmp.path());
    let extra = BTreeMap::from([
        ("settings.json".to_string(), "{\"a\":1}".to_string()),
        ("notes.txt".to_string(), "extra".to_string()),
    ]);
    let tree = builder.build(Some("extras"), &extra).unwrap();

    assert_eq!(
        fs::read_to_string(tree.test_path.join("private/var/settings.json")).unwrap(),
        "{\"a\":1}"
    );
    assert_eq!(
        fs::read_to_string(tree.var_path.join("notes.txt")).unwrap(),
        "extra"
    );
}

#[test]
fn skeleton_files_are_copied_into_the_root() {
    let tmp = TempDir::new().unwrap();
    let skeleton = tmp.path().join("skeleton");
    fs::create_dir_all(&skeleton).unwrap();
    fs::write(skeleton.join("index.js"), "require('./')").unwrap();
    fs::write(skeleton.join("package.json"), "{\"name\":\"app\"}").unwrap();

    let mut builder = FixtureBuilder::new(tmp.path().join("apps")).with_skeleton(&skeleton);
    let tree = builder.build(Some("with-skel"), &BTreeMap::new()).unwrap();

    assert!(tree.test_path.join("index.js").exists());
    assert!(tree.test_path.join("package.json").exists());
    // The symlink topology is layered on top of the skeleton.
    assert!(tree.test_path.join("private/var/file.txt").exists());
}

#[test]
fn walking_twice_yields_identical_output() {
    let tmp = TempDir::new().unwrap();
    let mut builder = FixtureBuilder::new(tmp.path());
    let extra = BTreeMap::from([("more.txt".to_string(), "m".to_string())]);
    let tree = builder.build(Some("stable"), &extra).unwrap();

    assert_eq!(
        walk(&tree.test_path).unwrap(),
        walk(&tree.test_path).unwrap()
    );
}
