//! Project pipeline tests over a throwaway on-disk tree: manifest walking,
//! resource classification, cross-file macro resolution, and error
//! aggregation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use gmlc_core::ast::Node;
use gmlc_core::error::Error;
use gmlc_core::project::{Project, ProjectKind};
use gmlc_core::token::TokenKind;

static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

/// A unique scratch directory per test invocation.
fn scratch_dir(label: &str) -> PathBuf {
    let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "gmlc-test-{}-{}-{}",
        std::process::id(),
        seq,
        label
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Lay out a small project: one script with a macro, one object with two
/// events (one of which uses the script's macro), one sprite passthrough.
fn write_demo_project(root: &Path) {
    write(
        root,
        "demo.yyp",
        r#"{
            "resources": [
                {"id": {"name": "player", "path": "objects/player/player.yy"}},
                {"id": {"name": "util", "path": "scripts/util/util.yy"}},
                {"id": {"name": "bg", "path": "sprites/bg/bg.yy"}}
            ]
        }"#,
    );
    write(
        root,
        "scripts/util/util.yy",
        r#"{"resourceType": "GMScript", "name": "util"}"#,
    );
    write(
        root,
        "scripts/util/util.gml",
        "#macro MAX_HEALTH 100\nfunction heal(target) { target.hp = MAX_HEALTH; }\n",
    );
    write(
        root,
        "objects/player/player.yy",
        r#"{
            "resourceType": "GMObject",
            "name": "player",
            "eventList": [
                {"eventType": 0, "eventNum": 0},
                {"eventType": 3, "eventNum": 0}
            ]
        }"#,
    );
    write(root, "objects/player/Create_0.gml", "hp = MAX_HEALTH;\n");
    write(
        root,
        "objects/player/Step_0.gml",
        "if (hp <= 0) { instance_destroy(); }\n",
    );
    write(
        root,
        "sprites/bg/bg.yy",
        r#"{"resourceType": "GMSprite", "name": "bg"}"#,
    );
}

#[test]
fn project_parses_with_cross_file_macros() {
    let root = scratch_dir("demo");
    write_demo_project(&root);

    let mut project = Project::load(&root.join("demo.yyp")).unwrap();
    assert_eq!(project.kind, ProjectKind::Manifest);
    assert_eq!(project.resources.len(), 3);

    project.parse();
    let errors = project.all_errors();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    // One script + two event sources.
    let units = project.parsed_units();
    assert_eq!(units.len(), 3);

    // The macro defined in util.gml reached the object's Create event.
    assert!(project.macros.contains_key("MAX_HEALTH"));
    let (_, create_ast) = units
        .iter()
        .find(|(path, _)| path.ends_with("Create_0.gml"))
        .expect("Create_0.gml should have parsed");
    let Node::Script(script) = create_ast else {
        panic!("expected Script");
    };
    let Node::Assign(assign) = &script.children[0] else {
        panic!("expected Assign");
    };
    let Node::LitNumber(num) = assign.right.as_ref() else {
        panic!("macro use should have expanded to its body");
    };
    assert_eq!(num.token.value, "100");
    assert_eq!(num.token.kind, TokenKind::Number);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn missing_source_does_not_stop_siblings() {
    let root = scratch_dir("missing");
    write_demo_project(&root);
    // Break the script resource: descriptor present, source gone.
    fs::remove_file(root.join("scripts/util/util.gml")).unwrap();

    let mut project = Project::load(&root.join("demo.yyp")).unwrap();
    // The broken resource is recorded at load time and skipped.
    assert_eq!(project.resources.len(), 2);
    assert_eq!(project.errors.len(), 1);
    assert!(matches!(project.errors[0].1, Error::Read { .. }));
    assert_eq!(project.errors[0].0, "scripts/util/util.yy");

    project.parse();
    // The object's events still parse; the macro no longer resolves, so
    // Create_0's `MAX_HEALTH` stays an identifier, which still parses.
    assert_eq!(project.parsed_units().len(), 2);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn unknown_resource_type_is_an_error() {
    let root = scratch_dir("unknown");
    write(
        root.as_path(),
        "demo.yyp",
        r#"{"resources": [{"id": {"name": "x", "path": "weird/x.yy"}}]}"#,
    );
    write(
        root.as_path(),
        "weird/x.yy",
        r#"{"resourceType": "GMTimeline", "name": "x"}"#,
    );

    let project = Project::load(&root.join("demo.yyp")).unwrap();
    assert!(project.resources.is_empty());
    assert_eq!(project.errors.len(), 1);
    assert!(matches!(
        project.errors[0].1,
        Error::UnknownResourceType { .. }
    ));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn missing_event_source_is_recorded_on_the_object() {
    let root = scratch_dir("event");
    write_demo_project(&root);
    fs::remove_file(root.join("objects/player/Step_0.gml")).unwrap();

    let mut project = Project::load(&root.join("demo.yyp")).unwrap();
    project.parse();

    // Create_0 and util.gml still parse; the missing Step_0 shows up as a
    // read error attributed to the object.
    assert_eq!(project.parsed_units().len(), 2);
    let errors = project.all_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].0.ends_with("player.yy"), "path was {}", errors[0].0);
    assert!(matches!(errors[0].1, Error::Read { .. }));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn scanner_errors_carry_the_unit_path() {
    let root = scratch_dir("scan-error");
    write_demo_project(&root);
    write(
        root.as_path(),
        "scripts/util/util.gml",
        "text = \"never closed;\n",
    );

    let mut project = Project::load(&root.join("demo.yyp")).unwrap();
    project.parse();

    let errors = project.all_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].0.ends_with("util.gml"), "path was {}", errors[0].0);
    assert!(matches!(errors[0].1, Error::UnterminatedString { .. }));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn macro_collisions_resolve_in_sorted_resource_order() {
    let root = scratch_dir("collision");
    write(
        root.as_path(),
        "demo.yyp",
        r#"{
            "resources": [
                {"id": {"name": "zz", "path": "scripts/zz/zz.yy"}},
                {"id": {"name": "aa", "path": "scripts/aa/aa.yy"}},
                {"id": {"name": "use", "path": "scripts/use/use.yy"}}
            ]
        }"#,
    );
    write(root.as_path(), "scripts/aa/aa.yy", r#"{"resourceType": "GMScript"}"#);
    write(root.as_path(), "scripts/aa/aa.gml", "#macro SIZE 1\n");
    write(root.as_path(), "scripts/zz/zz.yy", r#"{"resourceType": "GMScript"}"#);
    write(root.as_path(), "scripts/zz/zz.gml", "#macro SIZE 2\n");
    write(root.as_path(), "scripts/use/use.yy", r#"{"resourceType": "GMScript"}"#);
    write(root.as_path(), "scripts/use/use.gml", "limit = SIZE;\n");

    let mut project = Project::load(&root.join("demo.yyp")).unwrap();
    project.parse();
    assert_eq!(project.error_count(), 0);

    // Resources are visited in sorted descriptor-path order regardless of
    // manifest order, so `zz`'s definition wins the collision.
    assert_eq!(project.macros["SIZE"].body[0].value, "2");

    let units = project.parsed_units();
    let (_, use_ast) = units
        .iter()
        .find(|(path, _)| path.ends_with("use.gml"))
        .unwrap();
    let Node::Script(script) = use_ast else { panic!() };
    let Node::Assign(assign) = &script.children[0] else {
        panic!("expected Assign");
    };
    let Node::LitNumber(num) = assign.right.as_ref() else {
        panic!("expected expanded number");
    };
    assert_eq!(num.token.value, "2");

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn single_file_project() {
    let root = scratch_dir("single");
    write(root.as_path(), "script.gml", "var total = 0;\ntotal += 1;\n");

    let mut project = Project::single_file(&root.join("script.gml"));
    assert_eq!(project.kind, ProjectKind::SingleFile);
    project.parse();
    assert_eq!(project.error_count(), 0);
    assert_eq!(project.parsed_units().len(), 1);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn single_file_project_with_missing_file() {
    let root = scratch_dir("single-missing");
    let mut project = Project::single_file(&root.join("nope.gml"));
    project.parse();
    assert_eq!(project.parsed_units().len(), 0);
    assert_eq!(project.error_count(), 1);

    let _ = fs::remove_dir_all(&root);
}
