//! The runtime descriptor handed to the daemon.
//!
//! The descriptor is a flat `Key=Value` file, one entry per line, in a fixed
//! key order. It is derived state: every setup run rewrites it completely.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Keys of the runtime descriptor, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKey {
    WorkspaceConfigFilePath,
    MonitorExecutablePath,
    DaemonCommandSocketPath,
    LogDirectory,
}

impl DescriptorKey {
    pub const ALL: [DescriptorKey; 4] = [
        DescriptorKey::WorkspaceConfigFilePath,
        DescriptorKey::MonitorExecutablePath,
        DescriptorKey::DaemonCommandSocketPath,
        DescriptorKey::LogDirectory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKey::WorkspaceConfigFilePath => "WorkspaceConfigFilePath",
            DescriptorKey::MonitorExecutablePath => "MonitorExecutablePath",
            DescriptorKey::DaemonCommandSocketPath => "DaemonCommandSocketPath",
            DescriptorKey::LogDirectory => "LogDirectory",
        }
    }
}

impl fmt::Display for DescriptorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptorKey {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DescriptorKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DescriptorError::UnknownKey(s.to_string()))
    }
}

/// Error reading a descriptor back.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("descriptor entry `{0}` does not conform to the format `KEY=VALUE`")]
    MalformedLine(String),

    #[error("descriptor entry `{0}` has an empty key")]
    EmptyKey(String),

    #[error("descriptor entry `{0}` has no value")]
    EmptyValue(String),

    #[error("invalid descriptor key `{0}`")]
    UnknownKey(String),

    #[error("descriptor is missing `{0}`")]
    MissingKey(DescriptorKey),

    #[error("failed to read descriptor `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Paths the daemon needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDescriptor {
    pub workspace_config_file: PathBuf,
    pub monitor_executable: PathBuf,
    pub daemon_command_socket: PathBuf,
    pub log_directory: PathBuf,
}

impl RuntimeDescriptor {
    /// Value stored under `key`.
    pub fn get(&self, key: DescriptorKey) -> &Path {
        match key {
            DescriptorKey::WorkspaceConfigFilePath => &self.workspace_config_file,
            DescriptorKey::MonitorExecutablePath => &self.monitor_executable,
            DescriptorKey::DaemonCommandSocketPath => &self.daemon_command_socket,
            DescriptorKey::LogDirectory => &self.log_directory,
        }
    }

    /// All entries in output order.
    pub fn entries(&self) -> impl Iterator<Item = (DescriptorKey, &Path)> {
        DescriptorKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Serialize to the on-disk format.
    pub fn render(&self) -> String {
        self.entries()
            .map(|(key, value)| format!("{}={}\n", key, value.display()))
            .collect()
    }

    /// Parse the on-disk format.
    ///
    /// Values may contain `=`; only the first one separates key and value.
    /// A repeated key keeps its last value.
    pub fn parse(text: &str) -> Result<Self, DescriptorError> {
        let mut values: [Option<PathBuf>; 4] = Default::default();

        for line in text.lines() {
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| DescriptorError::MalformedLine(line.to_string()))?;
            if key.is_empty() {
                return Err(DescriptorError::EmptyKey(line.to_string()));
            }
            if value.is_empty() {
                return Err(DescriptorError::EmptyValue(line.to_string()));
            }

            let key: DescriptorKey = key.parse()?;
            let slot = DescriptorKey::ALL
                .iter()
                .position(|k| *k == key)
                .and_then(|i| values.get_mut(i));
            if let Some(slot) = slot {
                *slot = Some(PathBuf::from(value));
            }
        }

        let [workspace_config_file, monitor_executable, daemon_command_socket, log_directory] =
            values;
        let take = |value: Option<PathBuf>, key| value.ok_or(DescriptorError::MissingKey(key));

        Ok(RuntimeDescriptor {
            workspace_config_file: take(
                workspace_config_file,
                DescriptorKey::WorkspaceConfigFilePath,
            )?,
            monitor_executable: take(monitor_executable, DescriptorKey::MonitorExecutablePath)?,
            daemon_command_socket: take(
                daemon_command_socket,
                DescriptorKey::DaemonCommandSocketPath,
            )?,
            log_directory: take(log_directory, DescriptorKey::LogDirectory)?,
        })
    }

    /// Read and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let text = fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}
