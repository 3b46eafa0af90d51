//! Rolldown plugins installed on every entry build.
//!
//! Order matters: the virtual `wisp:create-require` module must be claimed before the
//! externals plugin sees its specifier.

mod create_require;
mod externals;

use std::sync::Arc;

use rolldown_plugin::__inner::SharedPluginable;

use crate::engine::EngineRequest;

pub use create_require::{CREATE_REQUIRE_ID, CreateRequirePlugin};
pub use externals::{ExternalsPlugin, is_node_builtin, should_strip_node_protocol};

/// Plugins for one entry, in hook order.
pub(crate) fn plugins_for(request: &EngineRequest) -> Vec<SharedPluginable> {
    vec![
        Arc::new(CreateRequirePlugin::new(request.format)),
        Arc::new(ExternalsPlugin::new(
            request.externals.clone(),
            &request.targets,
        )),
    ]
}
