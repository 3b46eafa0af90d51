use std::path::{Component, Path};

use path_clean::PathClean;

use crate::cli::is_env_key;
use crate::config::WispConfig;
use crate::error::{ConfigError, Result};

impl WispConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.target.iter().all(|target| target.trim().is_empty()) {
            return Err(ConfigError::MissingField {
                field: "target".to_string(),
                hint: "Provide at least one target, e.g. --target es2022".to_string(),
            }
            .into());
        }

        if is_within(&self.dist, &self.src) {
            return Err(ConfigError::InvalidValue {
                field: "dist".to_string(),
                value: self.dist.display().to_string(),
                hint: "The output directory must not be the source directory or inside it"
                    .to_string(),
            }
            .into());
        }

        if self.debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "debounceMs".to_string(),
                value: "0".to_string(),
                hint: "Use a positive number of milliseconds".to_string(),
            }
            .into());
        }

        if let Some(key) = self.env.keys().find(|key| !is_env_key(key)) {
            return Err(ConfigError::InvalidValue {
                field: "env".to_string(),
                value: key.clone(),
                hint: "Environment keys must be identifiers like NODE_ENV".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Whether `dist` is `src` or lies under it. Writes there would re-trigger the watcher.
fn is_within(dist: &Path, src: &Path) -> bool {
    let (dist, src) = (dist.clean(), src.clean());
    if src == Path::new(".") {
        return dist.is_relative()
            && !matches!(dist.components().next(), Some(Component::ParentDir));
    }
    dist.starts_with(&src)
}
