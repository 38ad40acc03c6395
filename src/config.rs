//! Project configuration.
//!
//! All commands receive an explicit [`Config`] built at startup; there is no
//! ambient global state. Defaults cover the common case, and a `texcell.toml`
//! at the project root may override individual fields:
//!
//! ```toml
//! image = "my-latex"
//! runtime = "podman"
//! suppress = ["Failed to convert input string to UTF16"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Name of the optional per-project override file.
pub const CONFIG_FILE: &str = "texcell.toml";

/// Resolved configuration passed into every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root; sandbox boundary for every path argument.
    pub root: PathBuf,
    /// Container image tag used for compilation.
    pub image: String,
    /// Container runtime binary (`docker`, `podman`, ...).
    pub runtime: String,
    /// Document source extension, without the dot.
    pub source_ext: String,
    /// Extensions of generated files that `clean` may delete.
    pub artifact_exts: Vec<String>,
    /// Substring filters for benign compiler warnings; matching output
    /// lines are hidden, never the exit status.
    pub suppress_patterns: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct FileConfig {
    image: Option<String>,
    runtime: Option<String>,
    source_ext: Option<String>,
    artifact_exts: Option<Vec<String>>,
    suppress: Option<Vec<String>>,
}

impl Config {
    /// Built-in defaults for the given project root.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            image: "texcell-latex".to_string(),
            runtime: "docker".to_string(),
            source_ext: "tex".to_string(),
            artifact_exts: ["aux", "log", "pdf", "xdv", "fdb_latexmk", "fls", "out"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            // xdvipdfmx emits this for CJK glyphs it renders fine anyway.
            suppress_patterns: vec!["Failed to convert input string to UTF16".to_string()],
        }
    }

    /// Build a config for `root`, applying `texcell.toml` overrides if the
    /// file exists. The root is canonicalized so sandbox checks compare
    /// resolved paths.
    pub fn load(root: PathBuf) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Project root not accessible: {}", root.display()))?;
        let mut config = Self::new(root);

        let path = config.root.join(CONFIG_FILE);
        if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let overrides: FileConfig = toml::from_str(&raw)
                .with_context(|| format!("Failed to parse {} - check for syntax errors", CONFIG_FILE))?;
            if let Some(image) = overrides.image {
                config.image = image;
            }
            if let Some(runtime) = overrides.runtime {
                config.runtime = runtime;
            }
            if let Some(ext) = overrides.source_ext {
                config.source_ext = ext.trim_start_matches('.').to_string();
            }
            if let Some(exts) = overrides.artifact_exts {
                config.artifact_exts = exts;
            }
            if let Some(suppress) = overrides.suppress {
                config.suppress_patterns = suppress;
            }
        }

        Ok(config)
    }
}
