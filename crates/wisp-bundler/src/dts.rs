//! Type declaration output.
//!
//! Declaration entries are never bundled. Once per pass, after code bundling, the
//! orchestrator hands the whole source tree to a [`DeclarationEmitter`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use walkdir::WalkDir;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRequest {
    pub cwd: PathBuf,
    pub source_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub tsconfig: Option<PathBuf>,
}

#[async_trait]
pub trait DeclarationEmitter: Send + Sync {
    async fn emit(&self, request: &DeclarationRequest) -> Result<()>;
}

/// Runs `npx tsc --declaration --emitDeclarationOnly`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TscEmitter;

/// What `tsc` compiles: a project file, or an explicit list of sources.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TscInput {
    Project(PathBuf),
    Files(Vec<PathBuf>),
}

const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

impl TscEmitter {
    /// An explicit tsconfig wins, then `<cwd>/tsconfig.json`, then every TypeScript
    /// file under the source directory. `tsc` treats positional arguments as files,
    /// so the source directory itself is never passed.
    fn input(request: &DeclarationRequest) -> Result<TscInput> {
        if let Some(tsconfig) = &request.tsconfig {
            return Ok(TscInput::Project(tsconfig.clone()));
        }
        let default_project = request.cwd.join("tsconfig.json");
        if default_project.is_file() {
            return Ok(TscInput::Project(default_project));
        }

        let source_root = request.cwd.join(&request.source_dir);
        let files = typescript_sources(&source_root)?;
        if files.is_empty() {
            return Err(Error::DeclarationEmitFailed(format!(
                "no TypeScript sources under {}",
                source_root.display()
            )));
        }
        Ok(TscInput::Files(files))
    }

    fn args(request: &DeclarationRequest, input: TscInput) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "tsc".into(),
            "--declaration".into(),
            "--emitDeclarationOnly".into(),
            "--outDir".into(),
            request.dist_dir.clone().into_os_string(),
        ];
        match input {
            TscInput::Project(tsconfig) => {
                args.push("--project".into());
                args.push(tsconfig.into_os_string());
            }
            TscInput::Files(files) => {
                args.push("--rootDir".into());
                args.push(request.source_dir.clone().into_os_string());
                args.extend(files.into_iter().map(PathBuf::into_os_string));
            }
        }
        args
    }
}

/// TypeScript sources under `root`, sorted, skipping declarations, hidden
/// directories and `node_modules`.
fn typescript_sources(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            e.depth() == 0 || !(name.starts_with('.') || name == "node_modules")
        });
    for entry in walker {
        let entry = entry.map_err(|e| {
            Error::DeclarationEmitFailed(format!("failed to scan {}: {e}", root.display()))
        })?;
        if entry.file_type().is_file() && is_typescript_source(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_typescript_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let is_declaration = [".d.ts", ".d.mts", ".d.cts"]
        .iter()
        .any(|suffix| name.ends_with(suffix));
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| TS_EXTENSIONS.contains(&e));
    has_extension && !is_declaration
}

#[async_trait]
impl DeclarationEmitter for TscEmitter {
    async fn emit(&self, request: &DeclarationRequest) -> Result<()> {
        let args = Self::args(request, Self::input(request)?);
        let command = args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(command = %format!("npx {command}"), "emitting declarations");

        let output = Command::new("npx")
            .args(&args)
            .current_dir(&request.cwd)
            .output()
            .await
            .map_err(|e| Error::DeclarationEmitFailed(format!("failed to spawn npx: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(output = %stdout.trim(), "tsc stdout");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = [stdout.trim(), stderr.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(Error::DeclarationEmitFailed(format!(
                "tsc exited with {}{}",
                output.status,
                if detail.is_empty() {
                    String::new()
                } else {
                    format!(":\n{detail}")
                }
            )));
        }
        Ok(())
    }
}
