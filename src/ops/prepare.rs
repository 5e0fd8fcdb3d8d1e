//! Runtime environment preparation.

use std::path::PathBuf;

use crate::core::config::RuntimePaths;
use crate::core::errors::SetupError;
use crate::core::registry::{initialize_registry, RegistryInit};
use crate::util::fs::ensure_dir;
use crate::util::{Shell, Status};

/// What preparing the environment changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEnvironment {
    /// Directories that did not exist before, in creation order
    pub created_dirs: Vec<PathBuf>,

    pub registry: RegistryInit,
}

/// Create the runtime directories and initialize the workspace registry.
///
/// Safe to run repeatedly: existing directories are kept and an existing
/// registry is never modified. Directories created before a failure are not
/// rolled back.
pub fn prepare_environment(
    paths: &RuntimePaths,
    shell: &Shell,
) -> Result<PreparedEnvironment, SetupError> {
    let mut created_dirs = Vec::new();

    for dir in paths.directories() {
        let created = ensure_dir(dir).map_err(|e| SetupError::environment(dir, e))?;
        if created {
            shell.status(Status::Created, dir.display());
            created_dirs.push(dir.to_path_buf());
        }
    }

    let registry_path = &paths.workspace_config_file;
    let registry = initialize_registry(registry_path)
        .map_err(|e| SetupError::environment(registry_path, e))?;

    match registry {
        RegistryInit::Created => {
            shell.status(Status::Created, registry_path.display());
            tracing::info!(path = %registry_path.display(), "initialized empty workspace registry");
        }
        RegistryInit::AlreadyPresent => {
            shell.note(format!(
                "keeping existing workspace registry {}",
                registry_path.display()
            ));
        }
    }

    Ok(PreparedEnvironment {
        created_dirs,
        registry,
    })
}
