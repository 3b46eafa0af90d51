//! Flattening of the manifest's public surface into export entries.
//!
//! The `exports` field is a recursive structure: a path string, a map of conditions to
//! sub-trees, or a list of fallbacks. [`resolve_exports`] walks it depth-first and emits one
//! [`ExportEntry`] per concrete output path, in declaration order, after the `main`,
//! `module`, `types` and `bin` entries.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::manifest::{BinField, Manifest, PackageType};

/// One node of the `exports` declaration tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExportTree {
    Path(String),
    Conditions(IndexMap<String, ExportTree>),
    Fallbacks(Vec<ExportTree>),
    /// Any other JSON value. Rejected during resolution so the error can name its location.
    Unsupported(serde_json::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Module,
    CommonJs,
    /// Declaration output, produced by the declaration emitter rather than the bundler.
    Types,
}

impl From<PackageType> for EntryType {
    fn from(value: PackageType) -> Self {
        match value {
            PackageType::Module => EntryType::Module,
            PackageType::CommonJs => EntryType::CommonJs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    /// Output path exactly as declared in the manifest, e.g. `./dist/index.js`.
    pub output_path: String,
    pub entry_type: EntryType,
    /// Platform tag, set for entries declared under a `node` condition.
    pub platform: Option<String>,
    pub executable: bool,
    /// Where in the manifest the entry was declared, e.g. `exports.node.import`.
    pub provenance: String,
}

/// Picks an entry type from the file extension, falling back to the package type.
pub fn infer_entry_type(path: &str, package_type: PackageType) -> EntryType {
    if path.ends_with(".d.ts") || path.ends_with(".d.mts") || path.ends_with(".d.cts") {
        EntryType::Types
    } else if path.ends_with(".mjs") {
        EntryType::Module
    } else if path.ends_with(".cjs") {
        EntryType::CommonJs
    } else {
        package_type.into()
    }
}

const RESERVED_CONDITIONS: [&str; 5] = ["require", "import", "types", "node", "default"];

/// Resolves every declared output of `manifest` into a flat list.
///
/// Duplicates are kept; two conditions pointing at the same file yield two entries.
pub fn resolve_exports(manifest: &Manifest) -> Result<Vec<ExportEntry>> {
    let mut resolver = ExportResolver {
        package_type: manifest.package_type,
        entries: Vec::new(),
    };

    if let Some(main) = non_empty(&manifest.main) {
        let entry_type = resolver.infer(main);
        resolver.push(main, entry_type, None, false, "main".into());
    }
    if let Some(module) = non_empty(&manifest.module) {
        resolver.push(module, EntryType::Module, None, false, "module".into());
    }
    if let Some(types) = non_empty(&manifest.types) {
        resolver.push(types, EntryType::Types, None, false, "types".into());
    }

    match &manifest.bin {
        Some(BinField::Single(path)) if !path.is_empty() => {
            let entry_type = resolver.infer(path);
            resolver.push(path, entry_type, None, true, "bin".into());
        }
        Some(BinField::Commands(commands)) => {
            for (name, path) in commands {
                let entry_type = resolver.infer(path);
                resolver.push(path, entry_type, None, true, format!("bin.{name}"));
            }
        }
        _ => {}
    }

    if let Some(exports) = &manifest.exports {
        resolver.walk(exports, "exports")?;
    }

    tracing::debug!(count = resolver.entries.len(), "resolved export entries");
    Ok(resolver.entries)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

struct ExportResolver {
    package_type: PackageType,
    entries: Vec<ExportEntry>,
}

impl ExportResolver {
    fn infer(&self, path: &str) -> EntryType {
        infer_entry_type(path, self.package_type)
    }

    fn push(
        &mut self,
        path: &str,
        entry_type: EntryType,
        platform: Option<&str>,
        executable: bool,
        provenance: String,
    ) {
        self.entries.push(ExportEntry {
            output_path: path.to_string(),
            entry_type,
            platform: platform.map(str::to_string),
            executable,
            provenance,
        });
    }

    fn walk(&mut self, tree: &ExportTree, provenance: &str) -> Result<()> {
        match tree {
            ExportTree::Path(path) => {
                if is_relative_export(path) {
                    let entry_type = self.infer(path);
                    self.push(path, entry_type, None, false, provenance.to_string());
                }
                Ok(())
            }
            ExportTree::Conditions(conditions) => {
                for (key, value) in conditions {
                    let child = format!("{provenance}.{key}");
                    match value {
                        ExportTree::Path(path) if RESERVED_CONDITIONS.contains(&key.as_str()) => {
                            self.condition(key, path, child);
                        }
                        other => self.walk(other, &child)?,
                    }
                }
                Ok(())
            }
            ExportTree::Fallbacks(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.walk(item, &format!("{provenance}[{index}]"))?;
                }
                Ok(())
            }
            ExportTree::Unsupported(_) => Err(Error::UnsupportedExportNode {
                provenance: provenance.to_string(),
            }),
        }
    }

    /// A reserved condition whose value is a plain path.
    fn condition(&mut self, key: &str, path: &str, provenance: String) {
        if !is_relative_export(path) {
            return;
        }
        match key {
            "require" => self.push(path, EntryType::CommonJs, None, false, provenance),
            "import" => self.push(path, EntryType::Module, None, false, provenance),
            "types" => self.push(path, EntryType::Types, None, false, provenance),
            "node" => {
                let entry_type = self.infer(path);
                self.push(path, entry_type, Some("node"), false, provenance);
            }
            _ => {
                let entry_type = self.infer(path);
                self.push(path, entry_type, None, false, provenance);
            }
        }
    }
}

fn is_relative_export(path: &str) -> bool {
    path.starts_with("./")
}
