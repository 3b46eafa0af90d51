//! Package manifest model and the two resolvers built on top of it.
//!
//! [`resolve_exports`] flattens the `main`/`module`/`types`/`bin`/`exports` surface of a
//! `package.json` into a list of [`ExportEntry`] values, and [`resolve_source_path`] maps
//! each entry's declared output file back to the source file that produces it.

pub mod error;
pub mod exports;
pub mod manifest;
pub mod source;

pub use error::{Error, Result};
pub use exports::{EntryType, ExportEntry, ExportTree, infer_entry_type, resolve_exports};
pub use manifest::{BinField, MANIFEST_FILE, Manifest, PackageType};
pub use source::{EXTENSION_TABLE, SourcePathResult, resolve_source_path};
