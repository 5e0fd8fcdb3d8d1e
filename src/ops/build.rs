//! Ordered component builds.
//!
//! Every component is built by one blocking toolchain invocation, strictly in
//! list order, into the shared target directory. Nothing is parallelized and
//! there is no timeout: a hung build hangs the run.

use std::fs;
use std::io;
use std::path::{is_separator, Path, PathBuf};
use std::process::ExitStatus;

use crate::core::component::Component;
use crate::core::config::SetupConfig;
use crate::core::errors::{PreconditionProblem, SetupError};
use crate::util::fs::{normalize_lexically, remove_path_if_exists, validate_file};
use crate::util::{ProcessBuilder, Shell, Status};

/// Program invoked to build each component.
pub const TOOLCHAIN_PROGRAM: &str = "cargo";

/// Executes external commands on behalf of the builder.
pub trait CommandRunner {
    /// Run `process` to completion and report how it exited.
    fn run(&mut self, process: &ProcessBuilder) -> io::Result<ExitStatus>;
}

/// Runs commands on the host with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, process: &ProcessBuilder) -> io::Result<ExitStatus> {
        process.status()
    }
}

/// A component whose build exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFailure {
    pub component: String,
    pub command: String,
    pub code: Option<i32>,
}

/// Outcome of the build stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Whether the target directory was purged first
    pub cleaned: bool,

    /// Components built successfully, in build order
    pub built: Vec<String>,

    /// Failed components; only populated with `keep_going`
    pub failed: Vec<ComponentFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The toolchain invocation building `component`.
pub fn build_command(component: &Component, config: &SetupConfig) -> ProcessBuilder {
    let mut cmd = ProcessBuilder::new(TOOLCHAIN_PROGRAM)
        .arg("build")
        .arg("--manifest-path")
        .arg(component.manifest_path())
        .arg("--target-dir")
        .arg(config.target_path())
        .cwd(&config.cwd);

    if config.build.mode.is_release() {
        cmd = cmd.arg("--release");
    }

    if config.build.toolchain_quiet() {
        cmd = cmd.arg("--quiet");
    }

    cmd
}

/// Whether the last component of `path` as written is `.` or `..`.
fn ends_in_dot_component(path: &Path) -> bool {
    let raw = path.as_os_str().as_encoded_bytes();
    let last = raw
        .split(|b| is_separator(char::from(*b)))
        .rev()
        .find(|part| !part.is_empty());
    matches!(last, Some(b".") | Some(b".."))
}

/// Resolve the target directory and refuse to clean it if removing it
/// would take a filesystem root or the invocation directory with it.
pub fn cleanup_target(config: &SetupConfig) -> Result<PathBuf, SetupError> {
    let target = config.target_path();
    let refuse = |problem| SetupError::UnsafeCleanup {
        path: target.clone(),
        problem,
    };

    if ends_in_dot_component(&config.build.target_dir) {
        return Err(refuse(PreconditionProblem::EndsInDotComponent));
    }

    let normalized = normalize_lexically(&target);
    if normalized.parent().is_none() {
        return Err(refuse(PreconditionProblem::FilesystemRoot));
    }
    if normalize_lexically(&config.cwd).starts_with(&normalized) {
        return Err(refuse(PreconditionProblem::ContainsInvocationDir));
    }

    // A real directory reached through symlinked ancestors.
    let is_dir = fs::symlink_metadata(&target)
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if is_dir {
        if let (Ok(real_target), Ok(real_cwd)) =
            (fs::canonicalize(&target), fs::canonicalize(&config.cwd))
        {
            if real_target.parent().is_none() {
                return Err(refuse(PreconditionProblem::FilesystemRoot));
            }
            if real_cwd.starts_with(&real_target) {
                return Err(refuse(PreconditionProblem::ContainsInvocationDir));
            }
        }
    }

    Ok(target)
}

/// Remove the whole build output directory, like `rm -rf`.
///
/// Runs to completion before anything is built. A missing target is not an
/// error and a regular file in its place is removed. Roots, `.`/`..` and
/// ancestors of the invocation directory are refused before anything is
/// touched.
pub fn clean_target_dir(config: &SetupConfig, shell: &Shell) -> Result<bool, SetupError> {
    let target = cleanup_target(config)?;
    shell.command(format!("rm -rf {}", target.display()));

    let removed = remove_path_if_exists(&target).map_err(|source| SetupError::Cleanup {
        path: target.clone(),
        source,
    })?;

    if removed {
        shell.status(Status::Removed, target.display());
    } else {
        tracing::debug!(dir = %target.display(), "nothing to clean");
    }
    Ok(removed)
}

/// Build `components` in order.
///
/// A missing manifest is fatal before anything is spawned for that
/// component. A failed build aborts the sequence unless `keep_going` is set,
/// in which case the failure is recorded and the next component is built.
pub fn build_components<R: CommandRunner>(
    components: &[Component],
    config: &SetupConfig,
    runner: &mut R,
    shell: &Shell,
) -> Result<BuildReport, SetupError> {
    let mut report = BuildReport::default();

    if config.build.cleanup {
        report.cleaned = clean_target_dir(config, shell)?;
    }

    for component in components {
        validate_file(&component.manifest_path())?;

        let cmd = build_command(component, config);
        let command = cmd.display_command();

        shell.status(
            Status::Compiling,
            format!(
                "{} ({}) [{}]",
                component.display_name(),
                component.location().display(),
                config.build.mode
            ),
        );
        shell.command(&command);

        let status = runner.run(&cmd).map_err(|source| SetupError::Spawn {
            command: command.clone(),
            source,
        })?;

        if status.success() {
            tracing::debug!(component = component.name(), "component built");
            report.built.push(component.name().to_string());
            continue;
        }

        tracing::warn!(
            component = component.name(),
            code = ?status.code(),
            "component build failed"
        );

        if !config.build.keep_going {
            return Err(SetupError::ExternalProcess {
                component: component.name().to_string(),
                command,
                code: status.code(),
            });
        }

        shell.warn(format!(
            "build of `{}` failed, continuing with the remaining components",
            component.name()
        ));
        report.failed.push(ComponentFailure {
            component: component.name().to_string(),
            command,
            code: status.code(),
        });
    }

    Ok(report)
}
