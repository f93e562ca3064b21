//! Integration tests for sourcedeps
//!
//! These tests drive the frontend and the persisted format together.

use sourcedeps_core::{DeclAspect, DependencyKey, GraphDiff, NodeKind, read_graph};
use sourcedeps_frontend::{
    CompilationUnit, DepGraphConfig, GraphConstructor, ModuleContextNamer,
    emit_reference_dependencies,
};
use tempfile::TempDir;

const PROVIDER_UNIT: &str = r#"{
    "path": "Shapes.swift",
    "interface_hash": "shapes-v1",
    "declarations": [
        {
            "name": "Circle",
            "access": "public",
            "kind": "type_declaration",
            "type_kind": "class",
            "body_fingerprint": "circle-v1",
            "members": [
                { "name": "area", "access": "public", "kind": "value_binding", "value_kind": "func" },
                { "name": "cache", "access": "private", "kind": "value_binding", "value_kind": "var" }
            ]
        },
        { "name": "unitCircle", "access": "internal", "kind": "value_binding", "value_kind": "var" }
    ],
    "references": {
        "top_level": { "Double": true }
    },
    "external_dependencies": ["/sdk/Swift.swiftmodule"]
}"#;

const USER_UNIT: &str = r#"{
    "path": "Main.swift",
    "interface_hash": "main-v1",
    "references": {
        "top_level": { "Circle": false, "unitCircle": false },
        "members": [
            { "holder": "C4geom6Circle", "member": "area", "cascades": false },
            { "holder": "C4geom6Circle", "cascades": true }
        ]
    }
}"#;

fn namer() -> ModuleContextNamer {
    ModuleContextNamer::new("geom")
}

/// The user's depended-upon keys are exactly what the provider provides.
#[test]
fn test_uses_line_up_with_providers() {
    let provider = CompilationUnit::from_json(PROVIDER_UNIT).unwrap();
    let user = CompilationUnit::from_json(USER_UNIT).unwrap();

    let provided = GraphConstructor::for_unit(&provider, &namer(), false)
        .construct()
        .unwrap();
    let used = GraphConstructor::for_unit(&user, &namer(), false)
        .construct()
        .unwrap();

    for key in [
        DependencyKey::depended_upon(NodeKind::TopLevel, "", "Circle"),
        DependencyKey::depended_upon(NodeKind::TopLevel, "", "unitCircle"),
        DependencyKey::depended_upon(NodeKind::Nominal, "C4geom6Circle", ""),
        DependencyKey::depended_upon_member("C4geom6Circle", ""),
    ] {
        let in_provider = provided.find_existing_node(&key).unwrap();
        assert!(provided.node(in_provider).unwrap().is_provides, "{key} not provided");
        let in_user = used.find_existing_node(&key).unwrap();
        assert!(!used.node(in_user).unwrap().is_provides);
    }

    // Members of classes are not provided unless added by an extension
    let area = DependencyKey::depended_upon_member("C4geom6Circle", "area");
    assert!(provided.find_existing_node(&area).is_none());
    assert!(used.find_existing_node(&area).is_some());

    // The wildcard use cascades, so the nominal use does too
    let main_interface = DependencyKey::for_whole_source_file(DeclAspect::Interface, "Main.swift");
    assert!(used.has_arc(
        &DependencyKey::depended_upon(NodeKind::Nominal, "C4geom6Circle", ""),
        &main_interface
    ));
}

#[test]
fn test_emit_and_diff_across_revisions() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("Shapes.deps");
    let config = DepGraphConfig {
        module_name: "geom".to_string(),
        ..DepGraphConfig::default()
    };

    let v1 = CompilationUnit::from_json(PROVIDER_UNIT).unwrap();
    let first = emit_reference_dependencies(&v1, &namer(), &out, &config).unwrap();

    let mut v2 = v1.clone();
    v2.interface_hash = "shapes-v2".to_string();
    v2.declarations.pop();
    let second = emit_reference_dependencies(&v2, &namer(), &out, &config).unwrap();

    let diff = GraphDiff::between(&first.graph, &second.graph);
    let removed = DependencyKey::depended_upon(NodeKind::TopLevel, "", "unitCircle");
    assert!(diff.removed_nodes.contains(&removed));
    assert!(diff
        .modified_nodes
        .contains(&DependencyKey::for_whole_source_file(DeclAspect::Interface, "Shapes.swift")));
    assert!(diff.added_nodes.is_empty());

    // The previous revision stays readable next to the new one
    let backup = read_graph(&sourcedeps_core::backup_path(&out)).unwrap();
    assert!(GraphDiff::between(&first.graph, &backup).is_empty());
    let current = read_graph(&out).unwrap();
    assert!(GraphDiff::between(&second.graph, &current).is_empty());
}

#[test]
fn test_batch_of_units_into_one_directory() {
    let dir = TempDir::new().unwrap();
    let config = DepGraphConfig {
        emit_dot_file: true,
        ..DepGraphConfig::default()
    };

    for (name, text) in [("Shapes", PROVIDER_UNIT), ("Main", USER_UNIT)] {
        let unit = CompilationUnit::from_json(text).unwrap();
        let out = dir.path().join(format!("{name}.deps"));
        let outcome = emit_reference_dependencies(&unit, &namer(), &out, &config).unwrap();
        let dot = std::fs::read_to_string(outcome.dot_path.unwrap()).unwrap();
        assert!(dot.starts_with("digraph"));
    }

    let mut emitted: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    emitted.sort();
    assert_eq!(
        emitted,
        ["Main.deps", "Main.deps.dot", "Shapes.deps", "Shapes.deps.dot"]
    );
}

#[test]
fn test_fingerprinted_builds_keep_private_members() {
    let unit = CompilationUnit::from_json(PROVIDER_UNIT).unwrap();
    let config = DepGraphConfig {
        enable_type_fingerprints: true,
        ..DepGraphConfig::default()
    };
    let graph = GraphConstructor::for_unit(&unit, &namer(), config.include_private_decls())
        .construct()
        .unwrap();
    let circle = graph
        .find_existing_node(&DependencyKey::depended_upon(NodeKind::TopLevel, "", "Circle"))
        .unwrap();
    assert_eq!(graph.node(circle).unwrap().fingerprint.as_deref(), Some("circle-v1"));
}
