use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
    value::Uncased,
};
use serde::Serialize;

use crate::cli::{BuildArgs, SourcemapSetting};
use crate::config::WispConfig;
use crate::config::defaults::*;
use crate::error::{ConfigError, Result};

/// Config file looked up in the project root when `--config` is not given.
pub const CONFIG_FILE: &str = "wisp.config.json";

const ENV_PREFIX: &str = "WISP_";

/// Keys `WISP_*` variables may set, in their camelCase config spelling.
const CONFIG_KEYS: &[&str] = &[
    "src",
    "dist",
    "minify",
    "target",
    "tsconfig",
    "env",
    "exportConditions",
    "sourcemap",
    "cleanDist",
    "dts",
    "watch",
    "debounceMs",
    "cwd",
];

impl WispConfig {
    /// Load configuration for the project at `root`.
    /// Priority: CLI args > environment variables > config file > defaults
    pub fn load(args: &BuildArgs, root: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        if let Some(path) = config_file(args.config.as_deref(), root)? {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        // WISP_MINIFY, WISP_DEBOUNCE_MS, ...
        figment = figment.merge(env_provider());

        // Flags only override what was actually passed
        figment = figment.merge(Serialized::defaults(ArgOverrides::from(args)));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: "Check wisp.config.json syntax, field types and WISP_* variables".to_string(),
            }
            .into()
        })
    }

    /// Get default configuration values.
    pub(crate) fn default_config() -> Self {
        Self {
            src: default_src(),
            dist: default_dist(),
            minify: false,
            target: default_target(),
            tsconfig: None,
            env: BTreeMap::new(),
            export_conditions: Vec::new(),
            sourcemap: SourcemapSetting::None,
            clean_dist: false,
            dts: default_dts(),
            watch: false,
            debounce_ms: default_debounce_ms(),
            cwd: None,
        }
    }
}

/// An explicit `--config` must exist; the default file is optional.
fn config_file(explicit: Option<&Path>, root: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            let path = root.join(path);
            if !path.is_file() {
                return Err(ConfigError::NotFound(path).into());
            }
            Ok(Some(path))
        }
        None => {
            let path = root.join(CONFIG_FILE);
            Ok(path.is_file().then_some(path))
        }
    }
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).filter_map(|key| config_key(key.as_str()).map(Uncased::from))
}

/// Map a lowercased variable suffix (`debounce_ms`) to its config key (`debounceMs`).
pub(crate) fn config_key(suffix: &str) -> Option<String> {
    let mut key = String::with_capacity(suffix.len());
    let mut upper = false;
    for c in suffix.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            key.extend(c.to_uppercase());
            upper = false;
        } else {
            key.extend(c.to_lowercase());
        }
    }
    CONFIG_KEYS.contains(&key.as_str()).then_some(key)
}

/// Values set on the command line. Unset flags serialize to nothing.
///
/// `--cwd` is not among them: it already chose the root the config was loaded from.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArgOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    src: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dist: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tsconfig: Option<PathBuf>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_conditions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sourcemap: Option<SourcemapSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clean_dist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    watch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debounce_ms: Option<u64>,
}

impl From<&BuildArgs> for ArgOverrides {
    fn from(args: &BuildArgs) -> Self {
        Self {
            src: args.src.clone(),
            dist: args.dist.clone(),
            minify: args.minify.then_some(true),
            target: (!args.targets.is_empty()).then(|| args.targets.clone()),
            tsconfig: args.tsconfig.clone(),
            env: args.env.iter().cloned().collect(),
            export_conditions: (!args.export_conditions.is_empty())
                .then(|| args.export_conditions.clone()),
            sourcemap: args.sourcemap,
            clean_dist: args.clean_dist.then_some(true),
            dts: args.no_dts.then_some(false),
            watch: args.watch.then_some(true),
            debounce_ms: args.debounce_ms,
        }
    }
}
