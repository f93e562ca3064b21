//! Settings for graph construction, read from `sourcedeps.toml`

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "sourcedeps.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepGraphConfig {
    /// Keep declarations that cannot be seen from other files.
    pub include_intrafile_deps: bool,
    /// Body fingerprints are in use; forces private declarations in.
    pub enable_type_fingerprints: bool,
    /// Also write a Graphviz rendering next to each graph.
    pub emit_dot_file: bool,
    /// Module name used when mangling type contexts.
    pub module_name: String,
}

impl Default for DepGraphConfig {
    fn default() -> Self {
        DepGraphConfig {
            include_intrafile_deps: false,
            enable_type_fingerprints: false,
            emit_dot_file: false,
            module_name: "main".to_string(),
        }
    }
}

impl DepGraphConfig {
    /// Body fingerprints are taken before privacy is known, so fingerprinted
    /// builds must keep private declarations.
    pub fn include_private_decls(&self) -> bool {
        self.include_intrafile_deps || self.enable_type_fingerprints
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid sourcedeps config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, else defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
