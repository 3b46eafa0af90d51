//! Command implementations for the wisp CLI.
//!
//! - [`build`] - one build pass, then watch mode when requested
//! - [`watch`] - rebuild on source changes until Ctrl-C
//! - [`version`] - print the version

pub mod build;
pub(crate) mod utils;
pub mod version;
pub mod watch;

pub use build::execute as build_execute;
pub use version::execute as version_execute;
