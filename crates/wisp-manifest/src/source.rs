//! Reverse resolution of an export's output path to the source file that produces it.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

use crate::error::{Error, Result};
use crate::exports::ExportEntry;

/// Output suffix → source suffixes to try, in priority order.
///
/// Matching walks this table in order and stops at the first suffix the output path ends
/// with, so `.d.ts` has to stay ahead of anything it could shadow.
pub const EXTENSION_TABLE: &[(&str, &[&str])] = &[
    (".d.ts", &[".d.ts", ".d.mts", ".d.cts", ".ts", ".mts", ".cts"]),
    (".d.mts", &[".d.mts", ".d.ts", ".d.cts", ".ts", ".mts", ".cts"]),
    (".d.cts", &[".d.cts", ".d.ts", ".d.mts", ".ts", ".mts", ".cts"]),
    (".mjs", &[".mjs", ".js", ".cjs", ".mts", ".cts", ".ts"]),
    (".cjs", &[".cjs", ".js", ".mjs", ".mts", ".cts", ".ts"]),
    (".js", &[".js", ".ts", ".tsx", ".mts", ".cts"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePathResult {
    pub source_path: PathBuf,
    pub source_extension: &'static str,
    pub dist_extension: &'static str,
}

/// Finds the source file for `entry`.
///
/// The dist-root prefix of the output path is swapped for `source_root`; output paths outside
/// the dist root are taken relative to `source_root` as they are. `exists` decides which
/// candidate files are present, callers building from disk pass `|p| p.is_file()`.
pub fn resolve_source_path(
    entry: &ExportEntry,
    source_root: &Path,
    dist_root: &Path,
    exists: impl Fn(&Path) -> bool,
) -> Result<SourcePathResult> {
    let output = entry.output_path.as_str();
    let not_found = || Error::SourceNotFound {
        output_path: entry.output_path.clone(),
    };

    let &(dist_extension, candidates) = EXTENSION_TABLE
        .iter()
        .find(|(suffix, _)| output.ends_with(suffix))
        .ok_or_else(not_found)?;

    let stem = &output[..output.len() - dist_extension.len()];
    let base = source_root.join(relative_to_dist(Path::new(stem), dist_root));

    for &candidate in candidates {
        let mut path = OsString::from(base.as_os_str());
        path.push(candidate);
        let path = PathBuf::from(path);

        if exists(&path) {
            tracing::trace!(
                output = output,
                source = %path.display(),
                "resolved source file"
            );
            return Ok(SourcePathResult {
                source_path: path,
                source_extension: candidate,
                dist_extension,
            });
        }
    }

    Err(not_found())
}

/// `stem` with the dist-root prefix removed, or cleaned but otherwise unchanged when it lies
/// outside the dist root.
fn relative_to_dist(stem: &Path, dist_root: &Path) -> PathBuf {
    let stem = stem.clean();
    let dist = dist_root.clean();

    if dist == Path::new(".") {
        return strip_root(&stem);
    }
    match stem.strip_prefix(&dist) {
        Ok(rest) => rest.to_path_buf(),
        Err(_) => strip_root(&stem),
    }
}

/// Drops a leading `/` so the result can be joined beneath the source root.
fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::exports::EntryType;

    fn entry(path: &str) -> ExportEntry {
        ExportEntry {
            output_path: path.to_string(),
            entry_type: EntryType::Module,
            platform: None,
            executable: false,
            provenance: "exports".into(),
        }
    }

    fn files(paths: &[&str]) -> HashSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn prefers_declaration_source_for_declaration_output() {
        let present = files(&["./src/index.ts", "./src/index.d.ts"]);
        let result = resolve_source_path(
            &entry("./dist/index.d.ts"),
            Path::new("./src"),
            Path::new("./dist"),
            |p| present.contains(p),
        )
        .unwrap();

        assert_eq!(result.source_path, PathBuf::from("./src/index.d.ts"));
        assert_eq!(result.source_extension, ".d.ts");
        assert_eq!(result.dist_extension, ".d.ts");
    }

    #[test]
    fn falls_back_through_candidates() {
        let present = files(&["./src/index.ts"]);
        let result = resolve_source_path(
            &entry("./dist/index.d.ts"),
            Path::new("./src"),
            Path::new("./dist"),
            |p| present.contains(p),
        )
        .unwrap();
        assert_eq!(result.source_path, PathBuf::from("./src/index.ts"));
        assert_eq!(result.source_extension, ".ts");
    }

    #[test]
    fn keeps_nested_directories() {
        let present = files(&["./src/utils/helpers.ts"]);
        let result = resolve_source_path(
            &entry("./dist/utils/helpers.js"),
            Path::new("./src"),
            Path::new("./dist"),
            |p| present.contains(p),
        )
        .unwrap();
        assert_eq!(result.source_path, PathBuf::from("./src/utils/helpers.ts"));
        assert_eq!(result.dist_extension, ".js");
    }

    #[test]
    fn mjs_prefers_js_over_ts() {
        let present = files(&["./src/index.js", "./src/index.ts"]);
        let result = resolve_source_path(
            &entry("./dist/index.mjs"),
            Path::new("./src"),
            Path::new("./dist"),
            |p| present.contains(p),
        )
        .unwrap();
        assert_eq!(result.source_extension, ".js");
    }

    #[test]
    fn dist_root_spelling_does_not_matter() {
        let present = files(&["src/index.tsx"]);
        let result = resolve_source_path(
            &entry("./dist/index.js"),
            Path::new("src"),
            Path::new("dist/"),
            |p| present.contains(p),
        )
        .unwrap();
        assert_eq!(result.source_path, PathBuf::from("src/index.tsx"));
    }

    #[test]
    fn path_outside_dist_is_joined_under_source() {
        let present = files(&["./src/lib/index.ts"]);
        let result = resolve_source_path(
            &entry("./lib/index.js"),
            Path::new("./src"),
            Path::new("./dist"),
            |p| present.contains(p),
        )
        .unwrap();
        assert_eq!(result.source_path, PathBuf::from("./src/lib/index.ts"));
    }

    #[test]
    fn unknown_extension_is_not_found() {
        let err = resolve_source_path(
            &entry("./dist/styles.css"),
            Path::new("./src"),
            Path::new("./dist"),
            |_| true,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"could not find matching source file for export path "./dist/styles.css""#
        );
    }

    #[test]
    fn missing_source_is_not_found() {
        let err = resolve_source_path(
            &entry("./dist/index.js"),
            Path::new("./src"),
            Path::new("./dist"),
            |_| false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { ref output_path } if output_path == "./dist/index.js"));
    }

    #[test]
    fn table_order_is_fixed() {
        let suffixes: Vec<_> = EXTENSION_TABLE.iter().map(|(s, _)| *s).collect();
        assert_eq!(suffixes, [".d.ts", ".d.mts", ".d.cts", ".mjs", ".cjs", ".js"]);
    }
}
