//! The default command: one build pass over every output in package.json.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wisp_bundler::{Orchestrator, RolldownEngine};
use wisp_manifest::Manifest;

use crate::cli::BuildArgs;
use crate::commands::{utils, watch};
use crate::config::WispConfig;
use crate::error::Result;
use crate::ui;

/// Execute the build command.
///
/// 1. Resolve the project root and load configuration (CLI > Env > File > Defaults)
/// 2. Read package.json
/// 3. Run one build pass and print what was written
/// 4. With `--watch`, hand the warm orchestrator to the watcher
///
/// A failed first pass is fatal, also in watch mode.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let root = utils::project_root(args.cwd.as_deref())?;
    let config = WispConfig::load(&args, &root)?;
    config.validate()?;

    let root = package_root(args.cwd.as_deref(), config.cwd.as_deref(), root);

    let manifest = Manifest::read(&root)?;
    let mut orchestrator = Orchestrator::new(
        manifest,
        config.build_options(&root),
        Arc::new(RolldownEngine::new()),
    );

    build_once(&mut orchestrator, &root).await?;

    if config.watch {
        let source_root = utils::resolve_path(&config.src, &root);
        watch::execute(orchestrator, &source_root, config.debounce()).await?;
    }

    Ok(())
}

async fn build_once(orchestrator: &mut Orchestrator, root: &Path) -> Result<()> {
    let name = orchestrator.manifest().name.clone();
    ui::info(&format!("Building {}", display_name(&name, root)));

    let report = orchestrator.bundle().await?;
    ui::print_bundle_report(&report, root);

    if report.built.is_empty() && report.declarations.is_empty() {
        ui::warning("package.json declares no outputs (main, module, types, bin or exports)");
    }
    ui::success(&format!(
        "Built {} in {}",
        count(report.built.len() + report.declarations.len(), "output"),
        ui::format_duration(report.duration)
    ));
    Ok(())
}

/// A `cwd` from the config file or `WISP_CWD` moves the root, unless `--cwd` was given.
fn package_root(flag: Option<&Path>, configured: Option<&Path>, root: PathBuf) -> PathBuf {
    match (flag, configured) {
        (None, Some(cwd)) => utils::resolve_path(cwd, &root),
        _ => root,
    }
}

fn display_name(name: &str, root: &Path) -> String {
    if name.is_empty() {
        root.display().to_string()
    } else {
        name.to_string()
    }
}

pub(crate) fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        assert_eq!(count(1, "output"), "1 output");
        assert_eq!(count(0, "output"), "0 outputs");
        assert_eq!(count(3, "entry point"), "3 entry points");
    }

    #[test]
    fn test_package_root_resolves_cwd_once() {
        let root = PathBuf::from("/work/pkg");
        assert_eq!(
            package_root(Some(Path::new("pkg")), Some(Path::new("pkg")), root.clone()),
            root
        );
        assert_eq!(
            package_root(None, Some(Path::new("../other")), root.clone()),
            PathBuf::from("/work/other")
        );
        assert_eq!(package_root(None, None, root.clone()), root);
    }

    #[test]
    fn test_display_name_falls_back_to_root() {
        assert_eq!(display_name("", Path::new("/pkg")), "/pkg");
        assert_eq!(display_name("left-pad", Path::new("/pkg")), "left-pad");
    }
}
