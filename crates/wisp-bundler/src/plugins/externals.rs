//! Keeps dependencies and Node built-ins out of the bundle.

use std::borrow::Cow;

use rolldown_common::ResolvedExternal;
use rolldown_plugin::{
    HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};

const NODE_BUILTINS: &[&str] = &[
    "assert",
    "buffer",
    "child_process",
    "cluster",
    "crypto",
    "dgram",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "https",
    "net",
    "os",
    "path",
    "punycode",
    "querystring",
    "readline",
    "stream",
    "string_decoder",
    "tls",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "zlib",
];

/// `fs` and `fs/promises` are built-ins; `fsevents` is not.
pub fn is_node_builtin(specifier: &str) -> bool {
    NODE_BUILTINS.iter().any(|name| matches_package(specifier, name))
}

/// Whether `node:` specifiers should be rewritten to bare names for `targets`.
///
/// Node understands the `node:` scheme from 12.20 on the 12 line and from 14.0, so the prefix
/// is kept as soon as any target is at least one of those.
pub fn should_strip_node_protocol(targets: &[String]) -> bool {
    !targets.iter().any(|target| {
        let Some(version) = target.strip_prefix("node") else {
            return false;
        };
        let mut parts = version.split('.').map(|p| p.parse::<u32>().unwrap_or(0));
        let major = parts.next().unwrap_or(0);
        let minor = parts.next().unwrap_or(0);
        (major == 12 && minor >= 20) || major >= 14
    })
}

fn matches_package(specifier: &str, package: &str) -> bool {
    specifier
        .strip_prefix(package)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[derive(Debug, Clone)]
pub struct ExternalsPlugin {
    dependencies: Vec<String>,
    strip_node_protocol: bool,
}

impl ExternalsPlugin {
    pub fn new(dependencies: Vec<String>, targets: &[String]) -> Self {
        Self {
            dependencies,
            strip_node_protocol: should_strip_node_protocol(targets),
        }
    }

    /// The id to emit for `specifier` when it stays external.
    fn external_id(&self, specifier: &str) -> Option<String> {
        if let Some(bare) = specifier.strip_prefix("node:") {
            return Some(if self.strip_node_protocol {
                bare.to_string()
            } else {
                specifier.to_string()
            });
        }

        let dependency = self
            .dependencies
            .iter()
            .any(|dep| matches_package(specifier, dep));

        (dependency || is_node_builtin(specifier)).then(|| specifier.to_string())
    }
}

impl Plugin for ExternalsPlugin {
    fn name(&self) -> Cow<'static, str> {
        "wisp-externals".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let external = self.external_id(&args.specifier.to_string());

        async move {
            Ok(external.map(|id| HookResolveIdOutput {
                id: id.into(),
                external: Some(ResolvedExternal::Bool(true)),
                ..Default::default()
            }))
        }
    }
}
