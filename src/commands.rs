//! CLI command implementations

use anyhow::Context;
use rayon::prelude::*;
use sourcedeps_core::{GraphDiff, read_graph, to_dot};
use sourcedeps_frontend::{
    CompilationUnit, DepGraphConfig, ModuleContextNamer, emit_reference_dependencies,
};
use std::path::{Path, PathBuf};

/// Extension of emitted graph files.
pub const GRAPH_EXTENSION: &str = "deps";

/// Command-line values that win over the config file.
#[derive(Debug, Default)]
pub struct EmitOverrides {
    pub include_private: bool,
    pub dot: bool,
    pub module: Option<String>,
}

impl EmitOverrides {
    fn apply(self, mut config: DepGraphConfig) -> DepGraphConfig {
        config.include_intrafile_deps |= self.include_private;
        config.emit_dot_file |= self.dot;
        if let Some(module) = self.module {
            config.module_name = module;
        }
        config
    }
}

/// Where the graph of `unit_file` goes.
pub fn graph_path_for(unit_file: &Path, out_dir: Option<&Path>) -> PathBuf {
    let file_name = unit_file
        .file_stem()
        .map(|stem| Path::new(stem).with_extension(GRAPH_EXTENSION))
        .unwrap_or_else(|| PathBuf::from(format!("unit.{GRAPH_EXTENSION}")));
    match out_dir.or_else(|| unit_file.parent()) {
        Some(dir) => dir.join(file_name),
        None => file_name,
    }
}

pub fn emit(
    units: &[PathBuf],
    out_dir: Option<&Path>,
    config_path: &Path,
    overrides: EmitOverrides,
) -> anyhow::Result<()> {
    let config = overrides.apply(DepGraphConfig::load_or_default(config_path)?);
    let namer = ModuleContextNamer::new(config.module_name.clone());
    tracing::info!("Emitting {} units for module {}", units.len(), namer.module());

    // Units are independent; each owns its graph
    let failures: Vec<(PathBuf, anyhow::Error)> = units
        .par_iter()
        .filter_map(|unit_file| {
            emit_one(unit_file, out_dir, &namer, &config)
                .err()
                .map(|err| (unit_file.clone(), err))
        })
        .collect();

    for (unit_file, err) in &failures {
        tracing::error!("{}: {:#}", unit_file.display(), err);
    }
    if !failures.is_empty() {
        anyhow::bail!("{} of {} units failed", failures.len(), units.len());
    }
    Ok(())
}

fn emit_one(
    unit_file: &Path,
    out_dir: Option<&Path>,
    namer: &ModuleContextNamer,
    config: &DepGraphConfig,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(unit_file)
        .with_context(|| format!("reading {}", unit_file.display()))?;
    let unit = CompilationUnit::from_json(&text)
        .with_context(|| format!("parsing {}", unit_file.display()))?;
    let output = graph_path_for(unit_file, out_dir);
    emit_reference_dependencies(&unit, namer, &output, config)?;
    Ok(())
}

pub fn verify(path: &Path) -> anyhow::Result<()> {
    let graph = read_graph(path)?;
    graph.verify()?;
    println!(
        "{}: {} nodes, {} arcs",
        path.display(),
        graph.node_count(),
        graph.arc_count()
    );
    Ok(())
}

pub fn dot(path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let graph = read_graph(path)?;
    let rendered = to_dot(&graph);
    match output {
        Some(output) => {
            std::fs::write(output, rendered)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!("Wrote {}", output.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

pub fn diff(old: &Path, new: &Path, json: bool) -> anyhow::Result<()> {
    let diff = GraphDiff::between(&read_graph(old)?, &read_graph(new)?);
    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
        return Ok(());
    }
    if diff.is_empty() {
        println!("no changes");
        return Ok(());
    }
    for key in &diff.added_nodes {
        println!("+ {key}");
    }
    for key in &diff.removed_nodes {
        println!("- {key}");
    }
    for key in &diff.modified_nodes {
        println!("~ {key}");
    }
    for (def_key, use_key) in &diff.added_arcs {
        println!("+ {def_key} -> {use_key}");
    }
    for (def_key, use_key) in &diff.removed_arcs {
        println!("- {def_key} -> {use_key}");
    }
    Ok(())
}
