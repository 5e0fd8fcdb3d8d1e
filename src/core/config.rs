//! Build and runtime configuration.
//!
//! A [`SetupConfig`] is resolved exactly once from three inputs: the
//! built-in defaults below, the options given on the command line, and the
//! host's `HOME` directory. It is immutable afterwards and every pipeline
//! stage receives it by reference.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::core::errors::SetupError;
use crate::util::fs::absolute_path;

/// Directory under `HOME` holding all wsync runtime state.
pub const CONFIG_ROOT_DIR_NAME: &str = ".wsync";

/// Directory under the config root receiving log files.
pub const LOG_DIR_NAME: &str = "log";

/// Default directory for the daemon command socket.
pub const DEFAULT_SOCKET_DIR: &str = "/tmp";

/// File name of the daemon command socket.
pub const DAEMON_SOCKET_NAME: &str = "wsync-daemon-cmd.socket";

/// File name of the workspace registry.
pub const WORKSPACE_CONFIG_FILE_NAME: &str = "wsync-ws-config.json";

/// File name of the runtime descriptor, always under the config root.
pub const DESCRIPTOR_FILE_NAME: &str = "wsync.config";

/// Default shared build output directory, relative to the invocation directory.
pub const DEFAULT_TARGET_DIR: &str = "./build";

/// Build profile passed to the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BuildMode {
    Debug,
    #[default]
    Release,
}

impl BuildMode {
    /// Name of the profile, which is also the output subdirectory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, BuildMode::Release)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the components are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub mode: BuildMode,

    /// Ask the toolchain for quiet output
    pub quiet: bool,

    /// Purge the target directory before building
    pub cleanup: bool,

    /// Shared build output directory, as given (relative to the invocation directory)
    pub target_dir: PathBuf,

    /// Treat a missing required tool as fatal
    pub strict_requirements: bool,

    /// Continue with the remaining components after a failed build
    pub keep_going: bool,

    /// Pass the toolchain quiet flag when cleanup is requested instead of
    /// when quiet is requested
    pub quiet_follows_clean: bool,
}

impl BuildConfiguration {
    /// Whether the toolchain invocation gets its quiet flag.
    pub fn toolchain_quiet(&self) -> bool {
        if self.quiet_follows_clean {
            self.cleanup
        } else {
            self.quiet
        }
    }
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        BuildConfiguration {
            mode: BuildMode::default(),
            quiet: false,
            cleanup: false,
            target_dir: PathBuf::from(DEFAULT_TARGET_DIR),
            strict_requirements: false,
            keep_going: false,
            quiet_follows_clean: false,
        }
    }
}

/// Where the wsync components find each other at runtime.
///
/// All paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub config_root: PathBuf,
    pub workspace_config_dir: PathBuf,
    pub workspace_config_file: PathBuf,
    pub log_dir: PathBuf,
    pub daemon_socket_dir: PathBuf,
    pub daemon_socket_name: String,
    pub descriptor_file: PathBuf,
}

impl RuntimePaths {
    /// Default paths derived from the home directory.
    pub fn from_home(home: &Path) -> Self {
        let config_root = home.join(CONFIG_ROOT_DIR_NAME);
        RuntimePaths {
            workspace_config_dir: config_root.clone(),
            workspace_config_file: config_root.join(WORKSPACE_CONFIG_FILE_NAME),
            log_dir: config_root.join(LOG_DIR_NAME),
            daemon_socket_dir: PathBuf::from(DEFAULT_SOCKET_DIR),
            daemon_socket_name: DAEMON_SOCKET_NAME.to_string(),
            descriptor_file: config_root.join(DESCRIPTOR_FILE_NAME),
            config_root,
        }
    }

    /// Move the workspace registry into `dir`.
    pub fn with_workspace_config_dir(mut self, dir: PathBuf) -> Self {
        self.workspace_config_file = dir.join(WORKSPACE_CONFIG_FILE_NAME);
        self.workspace_config_dir = dir;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    pub fn with_daemon_socket_dir(mut self, dir: PathBuf) -> Self {
        self.daemon_socket_dir = dir;
        self
    }

    /// Full path of the daemon command socket.
    pub fn daemon_socket_path(&self) -> PathBuf {
        self.daemon_socket_dir.join(&self.daemon_socket_name)
    }

    /// Directories that must exist before any component is built, in creation order.
    pub fn directories(&self) -> [&Path; 4] {
        [
            &self.config_root,
            &self.log_dir,
            &self.daemon_socket_dir,
            &self.workspace_config_dir,
        ]
    }
}

/// Raw settings collected from the command line.
///
/// `None` path overrides fall back to the home-derived defaults.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub mode: BuildMode,
    pub quiet: bool,
    pub cleanup: bool,
    pub target_dir: Option<PathBuf>,
    pub workspace_config_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub daemon_socket_dir: Option<PathBuf>,
    pub strict_requirements: bool,
    pub keep_going: bool,
    pub quiet_follows_clean: bool,
}

/// The fully resolved configuration of one setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    pub build: BuildConfiguration,
    pub paths: RuntimePaths,

    /// Invocation directory; component locations and the target directory
    /// are relative to it
    pub cwd: PathBuf,
}

impl SetupConfig {
    /// Absolute shared build output directory.
    pub fn target_path(&self) -> PathBuf {
        absolute_path(&self.cwd, &self.build.target_dir)
    }

    /// Absolute directory the toolchain places executables in (`<target>/<mode>`).
    pub fn executables_dir(&self) -> PathBuf {
        self.target_path().join(self.build.mode.as_str())
    }
}

/// The descriptor holds one path per line; a line break would split an entry.
fn reject_line_breaks(path: &Path) -> Result<(), SetupError> {
    let has_break = path
        .as_os_str()
        .as_encoded_bytes()
        .iter()
        .any(|&b| b == b'\n' || b == b'\r');
    if has_break {
        return Err(SetupError::LineBreakInPath {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Resolve the configuration of a setup run.
///
/// Fails if `home` is unset or empty since every default path derives from
/// it, and if any path written to the runtime descriptor contains a line
/// break.
pub fn resolve(
    options: ResolveOptions,
    home: Option<OsString>,
    cwd: PathBuf,
) -> Result<SetupConfig, SetupError> {
    let home = home
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(SetupError::MissingHome)?;
    let home = absolute_path(&cwd, &home);

    let mut paths = RuntimePaths::from_home(&home);
    if let Some(dir) = options.workspace_config_dir {
        paths = paths.with_workspace_config_dir(absolute_path(&cwd, &dir));
    }
    if let Some(dir) = options.log_dir {
        paths = paths.with_log_dir(absolute_path(&cwd, &dir));
    }
    if let Some(dir) = options.daemon_socket_dir {
        paths = paths.with_daemon_socket_dir(absolute_path(&cwd, &dir));
    }

    let build = BuildConfiguration {
        mode: options.mode,
        quiet: options.quiet,
        cleanup: options.cleanup,
        target_dir: options
            .target_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR)),
        strict_requirements: options.strict_requirements,
        keep_going: options.keep_going,
        quiet_follows_clean: options.quiet_follows_clean,
    };

    tracing::debug!(
        mode = %build.mode,
        target_dir = %build.target_dir.display(),
        config_root = %paths.config_root.display(),
        "resolved setup configuration"
    );

    let config = SetupConfig { build, paths, cwd };
    reject_line_breaks(&config.paths.workspace_config_file)?;
    reject_line_breaks(&config.paths.log_dir)?;
    reject_line_breaks(&config.paths.daemon_socket_path())?;
    reject_line_breaks(&config.executables_dir())?;

    Ok(config)
}
