//! wsync-setup - setup and build orchestrator for wsync
//!
//! Prepares the runtime environment of the wsync tool-chain (daemon, client,
//! monitor and their shared libraries), builds the components in dependency
//! order and writes the runtime descriptor the daemon reads at startup.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Only available when compiling tests. Provides a recording toolchain
/// runner and filesystem fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    config::SetupConfig, descriptor::RuntimeDescriptor, errors::SetupError, BuildMode,
    ResolveOptions,
};
pub use ops::{run_setup, HostEnvironment, SetupSummary};
