//! Writes a unit's dependency graph to disk

use std::path::{Path, PathBuf};

use anyhow::Context;
use sourcedeps_core::{
    DependencyGraph, GraphDiff, emit_dot_file, read_graph, rename_aside, to_yaml_string,
    write_graph,
};

use crate::config::DepGraphConfig;
use crate::constructor::GraphConstructor;
use crate::decl::CompilationUnit;
use crate::namer::ContextNamer;

/// Output path meaning "write to stdout".
pub const STDOUT_PATH: &str = "-";

#[derive(Debug)]
pub struct EmitOutcome {
    pub graph: DependencyGraph,
    pub graph_path: PathBuf,
    pub dot_path: Option<PathBuf>,
}

/// Build the graph for `unit` and persist it at `output_path`. Whatever was
/// there before is moved aside first.
pub fn emit_reference_dependencies<N: ContextNamer + ?Sized>(
    unit: &CompilationUnit,
    namer: &N,
    output_path: &Path,
    config: &DepGraphConfig,
) -> anyhow::Result<EmitOutcome> {
    let graph = GraphConstructor::for_unit(unit, namer, config.include_private_decls())
        .construct()
        .with_context(|| format!("building dependency graph for {}", unit.path))?;

    if output_path.as_os_str() == STDOUT_PATH {
        print!("{}", to_yaml_string(&graph, unit.had_compilation_error)?);
        return Ok(EmitOutcome {
            graph,
            graph_path: output_path.to_path_buf(),
            dot_path: None,
        });
    }

    rename_aside(output_path);
    write_graph(&graph, output_path, unit.had_compilation_error)?;
    verify_reads_what_is_written(&graph, output_path)?;

    let dot_path = if config.emit_dot_file {
        Some(emit_dot_file(&graph, output_path)?)
    } else {
        None
    };

    tracing::info!(
        "Wrote {} ({} nodes, {} arcs)",
        output_path.display(),
        graph.node_count(),
        graph.arc_count()
    );
    Ok(EmitOutcome {
        graph,
        graph_path: output_path.to_path_buf(),
        dot_path,
    })
}

/// Read `path` back and compare it with `graph`.
pub fn verify_reads_what_is_written(graph: &DependencyGraph, path: &Path) -> anyhow::Result<()> {
    let reread = read_graph(path)?;
    let diff = GraphDiff::between(graph, &reread);
    if !diff.is_empty() {
        anyhow::bail!(
            "{} does not read back as written: {} nodes added, {} removed, {} modified, {} arcs added, {} removed",
            path.display(),
            diff.added_nodes.len(),
            diff.removed_nodes.len(),
            diff.modified_nodes.len(),
            diff.added_arcs.len(),
            diff.removed_arcs.len()
        );
    }
    Ok(())
}
