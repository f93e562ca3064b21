//! sourcedeps CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "sourcedeps")]
#[command(about = "Fine-grained dependency graphs for incremental builds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and write the dependency graph of each compilation unit
    Emit {
        /// Compilation units as JSON files
        #[arg(required = true)]
        units: Vec<PathBuf>,

        /// Directory for the graphs (defaults to next to each unit)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Config file
        #[arg(short, long, default_value = sourcedeps_frontend::CONFIG_FILE)]
        config: PathBuf,

        /// Keep declarations that other files cannot see
        #[arg(long)]
        include_private: bool,

        /// Also write a Graphviz file per graph
        #[arg(long)]
        dot: bool,

        /// Module name used for type contexts
        #[arg(short, long)]
        module: Option<String>,
    },
    /// Check that a persisted graph loads and is well formed
    Verify {
        graph: PathBuf,
    },
    /// Render a persisted graph as Graphviz
    Dot {
        graph: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show what changed between two persisted graphs
    Diff {
        old: PathBuf,
        new: PathBuf,

        /// Print the diff as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "sourcedeps={log_level},sourcedeps_core={log_level},sourcedeps_frontend={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Emit {
            units,
            out_dir,
            config,
            include_private,
            dot,
            module,
        } => {
            let overrides = commands::EmitOverrides {
                include_private,
                dot,
                module,
            };
            commands::emit(&units, out_dir.as_deref(), &config, overrides)
        }
        Commands::Verify { graph } => commands::verify(&graph),
        Commands::Dot { graph, output } => commands::dot(&graph, output.as_deref()),
        Commands::Diff { old, new, json } => commands::diff(&old, &new, json),
        Commands::Version => {
            println!("sourcedeps v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
