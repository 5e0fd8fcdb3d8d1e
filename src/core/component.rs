//! The fixed set of wsync components.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Manifest file every component directory must contain.
pub const MANIFEST_FILE_NAME: &str = "Cargo.toml";

/// Component locations relative to the invocation directory.
///
/// Shared libraries come before the executables linking them. The order is
/// part of the contract and must never be changed at runtime.
pub const COMPONENT_LOCATIONS: [&str; 6] = [
    "lib/daemon-client",
    "lib/daemon-interface",
    "lib/wsync-config",
    "src/client",
    "src/monitor",
    "src/daemon",
];

/// Name of the monitor executable the daemon spawns.
pub const MONITOR_COMPONENT: &str = "monitor";

/// One independently buildable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    name: String,
    location: PathBuf,
}

#[derive(Deserialize)]
struct ManifestStub {
    package: Option<PackageStub>,
}

#[derive(Deserialize)]
struct PackageStub {
    name: String,
}

impl Component {
    /// Create a component rooted at `location`, named after its last path segment.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let name = location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| location.display().to_string());
        Component { name, location }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Path of the build manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.location.join(MANIFEST_FILE_NAME)
    }

    /// The `[package] name` declared in the manifest, if it can be read.
    ///
    /// Only used for display; an unreadable manifest is reported by the
    /// builder, not here.
    pub fn package_name(&self) -> Option<String> {
        let contents = fs::read_to_string(self.manifest_path()).ok()?;
        match toml::from_str::<ManifestStub>(&contents) {
            Ok(stub) => stub.package.map(|p| p.name),
            Err(e) => {
                tracing::debug!(
                    manifest = %self.manifest_path().display(),
                    "manifest is not valid TOML: {}",
                    e
                );
                None
            }
        }
    }

    /// Name to show in status output.
    pub fn display_name(&self) -> String {
        self.package_name().unwrap_or_else(|| self.name.clone())
    }
}

/// The components to build, in build order, rooted at `root`.
pub fn components(root: &Path) -> Vec<Component> {
    COMPONENT_LOCATIONS
        .iter()
        .map(|location| Component::new(root.join(location)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_components_keep_fixed_order() {
        let names: Vec<_> = components(Path::new("/work"))
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        assert_eq!(
            names,
            [
                "daemon-client",
                "daemon-interface",
                "wsync-config",
                "client",
                "monitor",
                "daemon"
            ]
        );
    }

    #[test]
    fn test_libraries_precede_executables() {
        let all = components(Path::new("/work"));
        let last_lib = all
            .iter()
            .rposition(|c| c.location().starts_with("/work/lib"))
            .unwrap();
        let first_exe = all
            .iter()
            .position(|c| c.location().starts_with("/work/src"))
            .unwrap();
        assert!(last_lib < first_exe);
    }

    #[test]
    fn test_manifest_path() {
        let component = Component::new("/work/src/monitor");
        assert_eq!(
            component.manifest_path(),
            PathBuf::from("/work/src/monitor/Cargo.toml")
        );
    }

    #[test]
    fn test_display_name_prefers_package_name() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("daemon");
        fs::create_dir_all(&dir).unwrap();
        let component = Component::new(&dir);

        assert_eq!(component.display_name(), "daemon");

        fs::write(
            dir.join("Cargo.toml"),
            "[package]\nname = \"wsync-daemon\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        assert_eq!(component.display_name(), "wsync-daemon");

        fs::write(dir.join("Cargo.toml"), "not = [valid").unwrap();
        assert_eq!(component.package_name(), None);
        assert_eq!(component.display_name(), "daemon");
    }
}
