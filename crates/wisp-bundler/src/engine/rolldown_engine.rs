use std::path::Path;

use async_trait::async_trait;
use rolldown::{
    Bundler, BundlerBuilder, BundlerOptions, BundlerTransformOptions, Either,
    ExperimentalOptions, InputItem, OutputFormat, Platform, RawMinifyOptions, ResolveOptions,
    SourceMapType,
};
use rolldown_common::Output;
use rustc_hash::FxHashSet;

use super::{
    Engine, EngineContext, EngineFailure, EngineOutput, EngineRequest, Format, SourceMapMode,
};
use crate::plugins::plugins_for;

/// [`Engine`] backed by rolldown.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolldownEngine;

impl RolldownEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Engine for RolldownEngine {
    async fn open(&self, request: EngineRequest) -> Result<Box<dyn EngineContext>, EngineFailure> {
        let options = bundler_options(&request);
        let bundler = BundlerBuilder::default()
            .with_options(options)
            .with_plugins(plugins_for(&request))
            .build()
            .map_err(|e| failure_from_debug(&e))?;

        tracing::debug!(
            entry = %request.entry.display(),
            outfile = %request.outfile.display(),
            format = ?request.format,
            "opened rolldown context"
        );

        Ok(Box::new(RolldownContext { bundler, request }))
    }
}

struct RolldownContext {
    bundler: Bundler,
    request: EngineRequest,
}

#[async_trait]
impl EngineContext for RolldownContext {
    async fn rebuild(&mut self) -> Result<EngineOutput, EngineFailure> {
        let bundle = self
            .bundler
            .generate()
            .await
            .map_err(|e| failure_from_debug(&e))?;

        let out_dir = self
            .request
            .outfile
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.request.cwd.clone());

        let mut files = Vec::new();
        for output in &bundle.assets {
            let (target, bytes) = match output {
                Output::Chunk(chunk) if chunk.is_entry => {
                    (self.request.outfile.clone(), chunk.code.as_bytes())
                }
                Output::Chunk(chunk) => {
                    (out_dir.join(chunk.filename.as_str()), chunk.code.as_bytes())
                }
                Output::Asset(asset) => {
                    (out_dir.join(asset.filename.as_str()), asset.source.as_bytes())
                }
            };
            write_output(&target, bytes).await?;
            files.push(target);
        }

        Ok(EngineOutput { files })
    }
}

async fn write_output(path: &Path, bytes: &[u8]) -> Result<(), EngineFailure> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            EngineFailure::new(format!("failed to create {}: {e}", parent.display()))
        })?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| EngineFailure::new(format!("failed to write {}: {e}", path.display())))
}

fn bundler_options(request: &EngineRequest) -> BundlerOptions {
    BundlerOptions {
        input: Some(vec![InputItem {
            name: None,
            import: request.entry.to_string_lossy().into_owned(),
        }]),
        cwd: Some(request.cwd.clone()),
        file: Some(request.outfile.to_string_lossy().into_owned()),
        format: Some(match request.format {
            Format::Esm => OutputFormat::Esm,
            Format::Cjs => OutputFormat::Cjs,
        }),
        platform: Some(match request.platform.as_deref() {
            Some("node") => Platform::Node,
            _ => Platform::Neutral,
        }),
        sourcemap: match request.sourcemap {
            SourceMapMode::None => None,
            SourceMapMode::Inline => Some(SourceMapType::Inline),
            SourceMapMode::Linked => Some(SourceMapType::File),
        },
        minify: request.minify.then(|| RawMinifyOptions::from(true)),
        define: (!request.defines.is_empty())
            .then(|| request.defines.iter().cloned().collect()),
        resolve: Some(ResolveOptions {
            condition_names: Some(condition_names(request)),
            ..Default::default()
        }),
        transform: (!request.targets.is_empty()).then(|| BundlerTransformOptions {
            target: Some(Either::Right(request.targets.clone())),
            ..Default::default()
        }),
        // Rebuilds on the same context reuse the module graph from the last pass.
        experimental: Some(ExperimentalOptions {
            incremental_build: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// User conditions first, then the ones implied by platform and format.
fn condition_names(request: &EngineRequest) -> Vec<String> {
    let mut names = request.conditions.clone();
    if request.platform.as_deref() == Some("node") {
        names.push("node".to_string());
    }
    names.push(
        match request.format {
            Format::Esm => "import",
            Format::Cjs => "require",
        }
        .to_string(),
    );
    names.push("default".to_string());
    let mut seen = FxHashSet::default();
    names.retain(|name| seen.insert(name.clone()));
    names
}

fn failure_from_debug(error: &dyn std::fmt::Debug) -> EngineFailure {
    EngineFailure::new(format!("{error:?}"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn request(format: Format, platform: Option<&str>) -> EngineRequest {
        EngineRequest {
            entry: PathBuf::from("/pkg/src/index.ts"),
            outfile: PathBuf::from("/pkg/dist/index.js"),
            format,
            targets: vec!["es2022".into()],
            externals: vec![],
            defines: vec![],
            sourcemap: SourceMapMode::None,
            minify: false,
            conditions: vec!["worker".into()],
            platform: platform.map(str::to_string),
            cwd: PathBuf::from("/pkg"),
        }
    }

    #[test]
    fn conditions_follow_format_and_platform() {
        assert_eq!(
            condition_names(&request(Format::Esm, Some("node"))),
            vec!["worker", "node", "import", "default"]
        );
        assert_eq!(
            condition_names(&request(Format::Cjs, None)),
            vec!["worker", "require", "default"]
        );
    }

    #[test]
    fn options_carry_request_settings() {
        let mut req = request(Format::Cjs, Some("node"));
        req.minify = true;
        req.sourcemap = SourceMapMode::Linked;

        let options = bundler_options(&req);
        assert!(matches!(options.format, Some(OutputFormat::Cjs)));
        assert!(matches!(options.platform, Some(Platform::Node)));
        assert!(matches!(options.sourcemap, Some(SourceMapType::File)));
        assert!(options.minify.is_some());
        assert!(options.define.is_none());
        assert_eq!(options.file.as_deref(), Some("/pkg/dist/index.js"));
    }

    #[test]
    fn targets_reach_the_transformer() {
        let mut req = request(Format::Esm, None);
        req.targets = vec!["es2015".into(), "node18".into()];

        let options = bundler_options(&req);
        let target = options.transform.and_then(|t| t.target);
        match target {
            Some(Either::Right(targets)) => assert_eq!(targets, vec!["es2015", "node18"]),
            other => panic!("expected target list, got {other:?}"),
        }

        req.targets.clear();
        assert!(bundler_options(&req).transform.is_none());
    }

    #[test]
    fn contexts_build_incrementally() {
        let options = bundler_options(&request(Format::Esm, None));
        let experimental = options.experimental.expect("experimental options");
        assert!(experimental.is_incremental_build_enabled());
    }
}
