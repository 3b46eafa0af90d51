//! Virtual module giving sources a `require` that works in either output format.
//!
//! `import require from "wisp:create-require"` becomes `createRequire(import.meta.url)` in
//! ESM output and the ambient `require` in CommonJS output.

use std::borrow::Cow;

use rolldown_common::{ModuleType, ResolvedExternal};
use rolldown_plugin::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};

use crate::engine::Format;

pub const CREATE_REQUIRE_ID: &str = "wisp:create-require";

const ESM_SHIM: &str = "import { createRequire } from 'module';\n\
export default /* @__PURE__ */ createRequire(import.meta.url);\n";

const CJS_SHIM: &str = "export default require;\n";

#[derive(Debug, Clone)]
pub struct CreateRequirePlugin {
    format: Format,
}

impl CreateRequirePlugin {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    fn shim(&self) -> &'static str {
        match self.format {
            Format::Esm => ESM_SHIM,
            Format::Cjs => CJS_SHIM,
        }
    }
}

impl Plugin for CreateRequirePlugin {
    fn name(&self) -> Cow<'static, str> {
        "wisp-create-require".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Load
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let claimed = args.specifier.to_string() == CREATE_REQUIRE_ID;

        async move {
            if !claimed {
                return Ok(None);
            }
            Ok(Some(HookResolveIdOutput {
                id: CREATE_REQUIRE_ID.to_string().into(),
                external: Some(ResolvedExternal::Bool(false)),
                ..Default::default()
            }))
        }
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let code = (args.id.to_string() == CREATE_REQUIRE_ID).then(|| self.shim());

        async move {
            Ok(code.map(|code| HookLoadOutput {
                code: code.to_string().into(),
                module_type: Some(ModuleType::Js),
                ..Default::default()
            }))
        }
    }
}
