//! One build pass over every export entry of a package.
//!
//! [`Orchestrator::bundle`] resolves the manifest's export entries, maps each one back to
//! its source file and drives the [`Engine`] once per code entry. Engine contexts are kept
//! between passes, so the first call is a cold build and every later call is a rebuild of
//! the retained contexts.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use path_clean::PathClean;
use rustc_hash::FxHashMap;
use wisp_manifest::{EntryType, ExportEntry, Manifest, resolve_exports, resolve_source_path};

use crate::dts::{DeclarationEmitter, DeclarationRequest, TscEmitter};
use crate::engine::{Engine, EngineContext, EngineRequest, Format, SourceMapMode};
use crate::error::{Error, Result};
use crate::executable::patch_executable;

/// Settings shared by every entry of a build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Project root; `source_dir`, `dist_dir` and `tsconfig` are relative to it.
    pub cwd: PathBuf,
    pub source_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub targets: Vec<String>,
    pub minify: bool,
    pub sourcemap: SourceMapMode,
    /// `process.env` replacements, in declaration order.
    pub env: Vec<(String, String)>,
    pub conditions: Vec<String>,
    pub tsconfig: Option<PathBuf>,
    pub dts: bool,
    pub clean_dist: bool,
}

impl BuildOptions {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            source_dir: PathBuf::from("./src"),
            dist_dir: PathBuf::from("./dist"),
            targets: vec!["es2022".to_string()],
            minify: false,
            sourcemap: SourceMapMode::None,
            env: Vec::new(),
            conditions: Vec::new(),
            tsconfig: None,
            dts: true,
            clean_dist: false,
        }
    }

    fn source_root(&self) -> PathBuf {
        self.cwd.join(&self.source_dir).clean()
    }

    fn dist_root(&self) -> PathBuf {
        self.cwd.join(&self.dist_dir).clean()
    }

    /// Dist root as manifest output paths spell it, relative to `cwd`.
    fn relative_dist_root(&self) -> PathBuf {
        let dist = self.dist_root();
        match dist.strip_prefix(self.cwd.clean()) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => dist,
        }
    }
}

/// An entry built during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltEntry {
    pub output_path: String,
    pub provenance: String,
    pub source: PathBuf,
    pub files: Vec<PathBuf>,
    /// `true` when the engine context was opened in this pass.
    pub cold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub package: String,
    pub built: Vec<BuiltEntry>,
    /// Declaration entries; emitted together by the declaration emitter, not by the engine.
    pub declarations: Vec<String>,
    pub declarations_emitted: bool,
    pub duration: Duration,
}

type ContextKey = (String, String);

pub struct Orchestrator {
    manifest: Manifest,
    options: BuildOptions,
    engine: Arc<dyn Engine>,
    declarations: Option<Arc<dyn DeclarationEmitter>>,
    contexts: FxHashMap<ContextKey, Box<dyn EngineContext>>,
    passes: u64,
}

impl Orchestrator {
    /// Declarations go through [`TscEmitter`] when `options.dts` is set.
    pub fn new(manifest: Manifest, options: BuildOptions, engine: Arc<dyn Engine>) -> Self {
        let declarations: Option<Arc<dyn DeclarationEmitter>> = if options.dts {
            Some(Arc::new(TscEmitter))
        } else {
            None
        };
        Self {
            manifest,
            options,
            engine,
            declarations,
            contexts: FxHashMap::default(),
            passes: 0,
        }
    }

    /// Replaces the declaration emitter. Ignored when declarations are disabled.
    pub fn with_declaration_emitter(mut self, emitter: Arc<dyn DeclarationEmitter>) -> Self {
        if self.options.dts {
            self.declarations = Some(emitter);
        }
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Builds every entry. The first failure aborts the pass.
    pub async fn bundle(&mut self) -> Result<BundleReport> {
        let started = Instant::now();
        tracing::info!("Bundling package: {}", self.manifest.name);

        if self.options.clean_dist && self.passes == 0 {
            clean_dist(&self.options.cwd, &self.options.dist_dir).await?;
        }

        let entries = resolve_exports(&self.manifest)?;
        let resolved = self.resolve_sources(&entries)?;

        let mut built = Vec::new();
        let mut declarations = Vec::new();
        for (entry, source) in resolved {
            if entry.entry_type == EntryType::Types {
                tracing::debug!(
                    output = %entry.output_path,
                    provenance = %entry.provenance,
                    "skipping declaration entry"
                );
                declarations.push(entry.output_path.clone());
                continue;
            }
            built.push(self.build_entry(entry, source).await?);
        }

        let mut declarations_emitted = false;
        if !declarations.is_empty() {
            if let Some(emitter) = &self.declarations {
                emitter.emit(&self.declaration_request()).await?;
                declarations_emitted = true;
            }
        }

        self.passes += 1;
        let duration = started.elapsed();
        tracing::info!(
            entries = built.len(),
            declarations = declarations.len(),
            duration_ms = duration.as_millis() as u64,
            "bundle complete"
        );

        Ok(BundleReport {
            package: self.manifest.name.clone(),
            built,
            declarations,
            declarations_emitted,
            duration,
        })
    }

    fn resolve_sources<'a>(
        &self,
        entries: &'a [ExportEntry],
    ) -> Result<Vec<(&'a ExportEntry, PathBuf)>> {
        let source_root = self.options.source_root();
        let dist_root = self.options.relative_dist_root();

        entries
            .iter()
            .map(|entry| {
                let found = resolve_source_path(entry, &source_root, &dist_root, |p| p.is_file())
                    .map_err(|source| Error::Source {
                        output_path: entry.output_path.clone(),
                        provenance: entry.provenance.clone(),
                        source,
                    })?;
                Ok((entry, found.source_path))
            })
            .collect()
    }

    async fn build_entry(&mut self, entry: &ExportEntry, source: PathBuf) -> Result<BuiltEntry> {
        let outfile = self.output_location(&entry.output_path);
        let key = (entry.provenance.clone(), entry.output_path.clone());
        let engine_error = |diagnostics: Vec<String>| Error::EngineBuildFailed {
            output_path: entry.output_path.clone(),
            provenance: entry.provenance.clone(),
            diagnostics,
        };

        let cold = !self.contexts.contains_key(&key);
        if cold {
            let request = self.engine_request(entry, source.clone(), outfile.clone());
            let context = self
                .engine
                .open(request)
                .await
                .map_err(|f| engine_error(f.diagnostics))?;
            self.contexts.insert(key.clone(), context);
        }

        let Some(context) = self.contexts.get_mut(&key) else {
            return Err(engine_error(vec!["engine context missing".to_string()]));
        };
        let output = context
            .rebuild()
            .await
            .map_err(|f| engine_error(f.diagnostics))?;

        if entry.executable {
            patch_executable(&outfile).await?;
        }

        tracing::debug!(
            output = %entry.output_path,
            provenance = %entry.provenance,
            source = %source.display(),
            cold,
            "built entry"
        );

        Ok(BuiltEntry {
            output_path: entry.output_path.clone(),
            provenance: entry.provenance.clone(),
            source,
            files: output.files,
            cold,
        })
    }

    fn engine_request(
        &self,
        entry: &ExportEntry,
        source: PathBuf,
        outfile: PathBuf,
    ) -> EngineRequest {
        EngineRequest {
            entry: source,
            outfile,
            format: match entry.entry_type {
                EntryType::Module => Format::Esm,
                _ => Format::Cjs,
            },
            targets: self.options.targets.clone(),
            externals: self.manifest.externals(),
            defines: env_defines(&self.options.env),
            sourcemap: self.options.sourcemap,
            minify: self.options.minify,
            conditions: self.options.conditions.clone(),
            platform: entry.platform.clone(),
            cwd: self.options.cwd.clone(),
        }
    }

    /// Absolute output file for `output_path`. Paths outside the dist root are placed
    /// beneath it.
    fn output_location(&self, output_path: &str) -> PathBuf {
        let dist_root = self.options.dist_root();
        let candidate = self.options.cwd.join(output_path).clean();
        if candidate.starts_with(&dist_root) {
            candidate
        } else {
            dist_root.join(strip_to_relative(Path::new(output_path)))
        }
    }

    fn declaration_request(&self) -> DeclarationRequest {
        DeclarationRequest {
            cwd: self.options.cwd.clone(),
            source_dir: self.options.source_dir.clone(),
            dist_dir: self.options.dist_dir.clone(),
            tsconfig: self.options.tsconfig.clone(),
        }
    }
}

/// `process.env.KEY` → JSON string literal of the value.
pub fn env_defines(env: &[(String, String)]) -> Vec<(String, String)> {
    env.iter()
        .map(|(key, value)| {
            (
                format!("process.env.{key}"),
                serde_json::Value::String(value.clone()).to_string(),
            )
        })
        .collect()
}

fn strip_to_relative(path: &Path) -> PathBuf {
    path.clean()
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

/// Empties `dist` unless it is the project root or lies outside it.
pub async fn clean_dist(cwd: &Path, dist: &Path) -> Result<()> {
    let root = cwd.clean();
    let target = cwd.join(dist).clean();

    if target == root {
        return Err(Error::UnsafeClean {
            path: target,
            reason: "it is the project root".to_string(),
        });
    }
    if !target.starts_with(&root) {
        return Err(Error::UnsafeClean {
            path: target,
            reason: "it is outside the project root".to_string(),
        });
    }

    if tokio::fs::try_exists(&target).await.unwrap_or(false) {
        tokio::fs::remove_dir_all(&target)
            .await
            .map_err(|e| Error::io(format!("failed to remove {}", target.display()), e))?;
    }
    tokio::fs::create_dir_all(&target)
        .await
        .map_err(|e| Error::io(format!("failed to create {}", target.display()), e))?;

    tracing::info!(dist = %target.display(), "cleaned dist directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_values_become_json_literals() {
        let defines = env_defines(&[
            ("NODE_ENV".into(), "production".into()),
            ("QUOTE".into(), "a\"b".into()),
        ]);
        assert_eq!(
            defines,
            vec![
                ("process.env.NODE_ENV".to_string(), "\"production\"".to_string()),
                ("process.env.QUOTE".to_string(), "\"a\\\"b\"".to_string()),
            ]
        );
    }

    #[test]
    fn output_paths_are_placed_under_dist() {
        let orchestrator = Orchestrator::new(
            Manifest::default(),
            BuildOptions::new("/pkg"),
            Arc::new(crate::engine::RolldownEngine::new()),
        );
        assert_eq!(
            orchestrator.output_location("./dist/index.js"),
            PathBuf::from("/pkg/dist/index.js")
        );
        assert_eq!(
            orchestrator.output_location("./dist/nested/a.cjs"),
            PathBuf::from("/pkg/dist/nested/a.cjs")
        );
        assert_eq!(
            orchestrator.output_location("./lib/index.js"),
            PathBuf::from("/pkg/dist/lib/index.js")
        );
        assert_eq!(
            orchestrator.output_location("../escape.js"),
            PathBuf::from("/pkg/dist/escape.js")
        );
    }

    #[tokio::test]
    async fn clean_refuses_project_root_and_outside() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            clean_dist(dir.path(), Path::new(".")).await,
            Err(Error::UnsafeClean { .. })
        ));
        assert!(matches!(
            clean_dist(dir.path(), Path::new("../elsewhere")).await,
            Err(Error::UnsafeClean { .. })
        ));
    }

    #[tokio::test]
    async fn clean_empties_dist() {
        let dir = tempfile::TempDir::new().unwrap();
        let dist = dir.path().join("dist");
        std::fs::create_dir_all(dist.join("old")).unwrap();
        std::fs::write(dist.join("old/stale.js"), "x").unwrap();

        clean_dist(dir.path(), Path::new("./dist")).await.unwrap();

        assert!(dist.is_dir());
        assert!(!dist.join("old").exists());
    }
}
