//! Typed view of the `package.json` fields the build cares about.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::exports::ExportTree;

pub const MANIFEST_FILE: &str = "package.json";

/// Module system declared by the manifest's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PackageType {
    #[serde(rename = "module")]
    Module,
    #[default]
    #[serde(rename = "commonjs")]
    CommonJs,
}

/// The `bin` field: either one path or a command name → path mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BinField {
    Single(String),
    Commands(IndexMap<String, String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "type", default)]
    pub package_type: PackageType,
    pub main: Option<String>,
    pub module: Option<String>,
    #[serde(alias = "typings")]
    pub types: Option<String>,
    pub bin: Option<BinField>,
    pub exports: Option<ExportTree>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub peer_dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
}

impl Manifest {
    /// Reads `package.json` from `dir`.
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound(dir.to_path_buf()));
            }
            Err(err) => return Err(Error::Io(err)),
        };

        let manifest: Manifest =
            serde_json::from_str(&contents).map_err(|source| Error::ManifestParse {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            name = %manifest.name,
            package_type = ?manifest.package_type,
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Runtime and peer dependency names, sorted and deduplicated.
    ///
    /// Dev dependencies are bundled into the output, everything here is left external.
    pub fn externals(&self) -> Vec<String> {
        self.dependencies
            .keys()
            .chain(self.peer_dependencies.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromStr for Manifest {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}
