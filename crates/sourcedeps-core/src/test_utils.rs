//! Test utilities for building small dependency graphs

use crate::graph::DependencyGraph;
use crate::model::*;

pub fn top_level(name: &str) -> DependencyKey {
    DependencyKey::new(NodeKind::TopLevel, DeclAspect::Interface, "", name)
}

pub fn nominal(context: &str) -> DependencyKey {
    DependencyKey::new(NodeKind::Nominal, DeclAspect::Interface, context, "")
}

/// A graph holding only the whole-unit pair for `unit`.
pub fn unit_graph(unit: &str, fingerprint: Option<&str>) -> (DependencyGraph, NodePair) {
    let mut graph = DependencyGraph::new();
    let pair = graph
        .find_existing_node_pair_or_create_and_add_if_new(
            &DependencyKey::for_whole_source_file(DeclAspect::Interface, unit),
            fingerprint,
        )
        .unwrap();
    (graph, pair)
}

/// A unit providing `Foo` (top-level and nominal) and using `bar` both
/// ways, plus a cascading use of an external file.
pub fn sample_graph() -> DependencyGraph {
    let (mut graph, unit) = unit_graph("A.swift", Some("hash0"));

    for (key, fp) in [(top_level("Foo"), Some("fpFoo")), (nominal("4main3FooV"), Some("fpFoo"))] {
        let pair = graph
            .find_existing_node_pair_or_create_and_add_if_new(&key, fp)
            .unwrap();
        graph.add_arc(unit.interface, pair.interface).unwrap();
    }

    let bar = graph
        .find_existing_node_or_create_if_new(&top_level("bar"), None, false)
        .unwrap();
    graph.add_arc(bar, unit.implementation).unwrap();
    graph.add_arc(bar, unit.implementation).unwrap();

    let external = graph
        .find_existing_node_or_create_if_new(
            &DependencyKey::depended_upon(NodeKind::ExternalDepend, "", "/usr/lib/Other.swiftmodule"),
            None,
            false,
        )
        .unwrap();
    graph.add_arc(external, unit.interface).unwrap();

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_graph_verifies() {
        let graph = sample_graph();
        assert!(graph.verify().is_ok());
        // unit pair + 2 provider pairs + 2 lone uses
        assert_eq!(graph.node_count(), 8);
    }
}
