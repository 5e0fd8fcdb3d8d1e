//! Test fixtures for common test scenarios.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::core::component::COMPONENT_LOCATIONS;
use crate::core::config::{resolve, ResolveOptions, SetupConfig};
use crate::util::{ColorChoice, Shell, Verbosity};

/// Minimal manifest for a component at `location`.
pub fn component_manifest(location: &str) -> String {
    let name = location.rsplit('/').next().unwrap_or(location);
    format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n")
}

/// Create every component directory with a manifest under `root`.
pub fn write_component_tree(root: &Path) {
    for location in COMPONENT_LOCATIONS {
        let dir = root.join(location);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Cargo.toml"), component_manifest(location)).unwrap();
    }
}

/// Resolve a configuration inside `tmp`.
///
/// The invocation directory is `tmp`, the home directory is `tmp/home`, and
/// unless overridden the socket directory is `tmp/run` instead of `/tmp`.
pub fn setup_config(tmp: &TempDir, mut options: ResolveOptions) -> SetupConfig {
    if options.daemon_socket_dir.is_none() {
        options.daemon_socket_dir = Some(tmp.path().join("run"));
    }
    resolve(
        options,
        Some(OsString::from(tmp.path().join("home"))),
        tmp.path().to_path_buf(),
    )
    .unwrap()
}

/// A shell without colors.
pub fn quiet_shell() -> Shell {
    Shell::new(Verbosity::Normal, ColorChoice::Never)
}
