//! Configuration system for wisp with multi-source loading.
//!
//! Priority: CLI > Environment (`WISP_*`) > `wisp.config.json` > Defaults

mod defaults;
mod loading;
mod tests;
mod validation;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use wisp_bundler::BuildOptions;

use crate::cli::SourcemapSetting;
pub use defaults::*;
pub use loading::CONFIG_FILE;

/// wisp configuration - loaded from wisp.config.json, `WISP_*` variables and CLI args.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WispConfig {
    /// Source directory, relative to the project root
    #[serde(default = "default_src")]
    pub src: PathBuf,

    /// Output directory, relative to the project root
    #[serde(default = "default_dist")]
    pub dist: PathBuf,

    #[serde(default)]
    pub minify: bool,

    /// Compilation targets (es2022, node18, ...)
    #[serde(default = "default_target")]
    pub target: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsconfig: Option<PathBuf>,

    /// `process.env` replacements
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Extra export conditions for import resolution
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub export_conditions: Vec<String>,

    #[serde(default)]
    pub sourcemap: SourcemapSetting,

    /// Remove the dist directory before the first build
    #[serde(default)]
    pub clean_dist: bool,

    /// Emit TypeScript declarations
    #[serde(default = "default_dts")]
    pub dts: bool,

    #[serde(default)]
    pub watch: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl WispConfig {
    /// Build settings for the orchestrator, rooted at `root`.
    pub fn build_options(&self, root: &Path) -> BuildOptions {
        let mut options = BuildOptions::new(root);
        options.source_dir = self.src.clone();
        options.dist_dir = self.dist.clone();
        options.targets = self.target.clone();
        options.minify = self.minify;
        options.sourcemap = self.sourcemap.into();
        options.env = self
            .env
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        options.conditions = self.export_conditions.clone();
        options.tsconfig = self.tsconfig.clone();
        options.dts = self.dts;
        options.clean_dist = self.clean_dist;
        options
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
