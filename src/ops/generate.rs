//! Runtime descriptor generation.

use std::env::consts::EXE_SUFFIX;
use std::fs;
use std::path::PathBuf;

use crate::core::component::MONITOR_COMPONENT;
use crate::core::config::SetupConfig;
use crate::core::descriptor::RuntimeDescriptor;
use crate::core::errors::SetupError;
use crate::util::fs::{validate_dir, validate_file};
use crate::util::{Shell, Status};

/// Absolute path of the built monitor executable; it must be a regular file.
pub fn locate_monitor(config: &SetupConfig) -> Result<PathBuf, SetupError> {
    let monitor = config
        .executables_dir()
        .join(format!("{MONITOR_COMPONENT}{EXE_SUFFIX}"));
    validate_file(&monitor)?;
    Ok(monitor)
}

/// Absolute path of the directory holding the built executables.
pub fn locate_executables_dir(config: &SetupConfig) -> Result<PathBuf, SetupError> {
    let dir = config.executables_dir();
    validate_dir(&dir)?;
    Ok(dir)
}

/// Assemble the descriptor from the resolved configuration and build output.
pub fn runtime_descriptor(config: &SetupConfig) -> Result<RuntimeDescriptor, SetupError> {
    let monitor_executable = locate_monitor(config)?;
    locate_executables_dir(config)?;

    Ok(RuntimeDescriptor {
        workspace_config_file: config.paths.workspace_config_file.clone(),
        monitor_executable,
        daemon_command_socket: config.paths.daemon_socket_path(),
        log_directory: config.paths.log_dir.clone(),
    })
}

/// Write the descriptor to its fixed location, replacing any previous one.
pub fn generate_descriptor(
    config: &SetupConfig,
    shell: &Shell,
) -> Result<RuntimeDescriptor, SetupError> {
    let descriptor = runtime_descriptor(config)?;
    let path = &config.paths.descriptor_file;

    shell.status(Status::Writing, path.display());
    fs::write(path, descriptor.render()).map_err(|source| SetupError::DescriptorWrite {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), "runtime descriptor written");
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ResolveOptions;
    use crate::core::descriptor::DescriptorKey;
    use crate::core::errors::PreconditionProblem;
    use crate::test_support::{quiet_shell, setup_config};
    use tempfile::TempDir;

    fn place_monitor(config: &SetupConfig) {
        let dir = config.executables_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("monitor{EXE_SUFFIX}")), "").unwrap();
    }

    #[test]
    fn test_descriptor_values() {
        let tmp = TempDir::new().unwrap();
        let config = setup_config(&tmp, ResolveOptions::default());
        fs::create_dir_all(&config.paths.config_root).unwrap();
        place_monitor(&config);

        let descriptor = generate_descriptor(&config, &quiet_shell()).unwrap();

        assert_eq!(
            descriptor.get(DescriptorKey::WorkspaceConfigFilePath),
            tmp.path().join("home/.wsync/wsync-ws-config.json")
        );
        assert_eq!(
            descriptor.get(DescriptorKey::MonitorExecutablePath),
            tmp.path().join(format!("build/release/monitor{EXE_SUFFIX}"))
        );
        assert_eq!(
            descriptor.get(DescriptorKey::DaemonCommandSocketPath),
            tmp.path().join("run/wsync-daemon-cmd.socket")
        );
        assert_eq!(
            descriptor.get(DescriptorKey::LogDirectory),
            tmp.path().join("home/.wsync/log")
        );

        let written = fs::read_to_string(&config.paths.descriptor_file).unwrap();
        assert_eq!(written.lines().count(), 4);
        assert_eq!(RuntimeDescriptor::parse(&written).unwrap(), descriptor);
    }

    #[test]
    fn test_descriptor_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        let config = setup_config(&tmp, ResolveOptions::default());
        fs::create_dir_all(&config.paths.config_root).unwrap();
        fs::write(&config.paths.descriptor_file, "LogDirectory=/old\nstale=1\n").unwrap();
        place_monitor(&config);

        generate_descriptor(&config, &quiet_shell()).unwrap();

        let written = fs::read_to_string(&config.paths.descriptor_file).unwrap();
        assert!(!written.contains("/old"));
        assert!(RuntimeDescriptor::parse(&written).is_ok());
    }

    #[test]
    fn test_missing_monitor_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = setup_config(&tmp, ResolveOptions::default());
        fs::create_dir_all(&config.paths.config_root).unwrap();

        let err = generate_descriptor(&config, &quiet_shell()).unwrap_err();

        assert!(matches!(
            err,
            SetupError::Precondition {
                problem: PreconditionProblem::NotFound,
                ..
            }
        ));
        assert!(!config.paths.descriptor_file.exists());
    }

    #[test]
    fn test_monitor_must_be_a_file() {
        let tmp = TempDir::new().unwrap();
        let config = setup_config(&tmp, ResolveOptions::default());
        fs::create_dir_all(
            config
                .executables_dir()
                .join(format!("monitor{EXE_SUFFIX}")),
        )
        .unwrap();

        let err = locate_monitor(&config).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Precondition {
                problem: PreconditionProblem::NotAFile,
                ..
            }
        ));
    }
}
