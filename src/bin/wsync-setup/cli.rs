//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use wsync_setup::core::config::DEFAULT_TARGET_DIR;
use wsync_setup::{BuildMode, ResolveOptions};

/// Prepare the wsync runtime environment and build all wsync components
#[derive(Parser)]
#[command(name = "wsync-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable quiet build
    #[arg(short = 'q', long, env = "WSYNC_SETUP_BUILD_QUIET")]
    pub build_quiet: bool,

    /// Clean up old build artefacts before building
    #[arg(short = 'c', long, env = "WSYNC_SETUP_BUILD_CLEAN")]
    pub build_clean: bool,

    /// Build mode
    #[arg(
        short = 'm',
        long,
        value_name = "MODE",
        value_enum,
        default_value_t = BuildMode::Release,
        env = "WSYNC_SETUP_BUILD_MODE"
    )]
    pub build_mode: BuildMode,

    /// Directory in which the files holding information about the configured workspaces are stored
    #[arg(long, value_name = "DIR")]
    pub workspace_configuration_directory: Option<PathBuf>,

    /// Directory in which the wsync log files are stored
    #[arg(long, value_name = "DIR")]
    pub log_directory: Option<PathBuf>,

    /// Directory in which the daemon command socket is created
    #[arg(long, value_name = "DIR")]
    pub daemon_cmd_socket_directory: Option<PathBuf>,

    /// Shared build output directory, relative to the current directory
    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_TARGET_DIR,
        env = "WSYNC_SETUP_TARGET_DIR"
    )]
    pub target_dir: PathBuf,

    /// Abort if a required tool cannot be found
    #[arg(long, env = "WSYNC_SETUP_STRICT_REQUIREMENTS")]
    pub strict_requirements: bool,

    /// Keep building the remaining components after a failed build
    #[arg(long)]
    pub keep_going: bool,

    /// Pass --quiet to the toolchain when cleaning instead of when --build-quiet is set
    #[arg(long)]
    pub quiet_follows_clean: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Convert the parsed flags into resolver input.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            mode: self.build_mode,
            quiet: self.build_quiet,
            cleanup: self.build_clean,
            target_dir: Some(self.target_dir.clone()),
            workspace_config_dir: self.workspace_configuration_directory.clone(),
            log_dir: self.log_directory.clone(),
            daemon_socket_dir: self.daemon_cmd_socket_directory.clone(),
            strict_requirements: self.strict_requirements,
            keep_going: self.keep_going,
            quiet_follows_clean: self.quiet_follows_clean,
        }
    }
}
