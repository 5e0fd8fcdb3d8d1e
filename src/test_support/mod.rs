//! Test utilities and mocks for unit tests.
//!
//! Provides a [`RecordingRunner`] standing in for the toolchain, plus
//! fixtures for component trees and resolved configurations.
//!
//! # Example
//!
//! ```rust,ignore
//! use wsync_setup::test_support::{RecordingRunner, write_component_tree};
//!
//! #[test]
//! fn test_example() {
//!     let tmp = TempDir::new().unwrap();
//!     write_component_tree(tmp.path());
//!
//!     let mut runner = RecordingRunner::new().fail_on("monitor", 101);
//!     // Use the runner in build_components...
//! }
//! ```

pub mod fixtures;

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::ops::build::CommandRunner;
use crate::util::ProcessBuilder;

pub use fixtures::*;

/// Fake toolchain that records every invocation.
///
/// A successful invocation mimics cargo's output layout by creating
/// `<target-dir>/<debug|release>/<component>` as an empty file.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: Vec<ProcessBuilder>,
    failures: Vec<(String, i32)>,
    observed: Option<PathBuf>,
    observations: Vec<bool>,
    spawn_error: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the build of `component` exit with `code`.
    pub fn fail_on(mut self, component: &str, code: i32) -> Self {
        self.failures.push((component.to_string(), code));
        self
    }

    /// Record, at each invocation, whether `path` exists.
    pub fn observe(mut self, path: PathBuf) -> Self {
        self.observed = Some(path);
        self
    }

    /// Fail every invocation as if the program could not be started.
    pub fn spawn_error(mut self) -> Self {
        self.spawn_error = true;
        self
    }

    /// Invocations in the order they ran.
    pub fn invocations(&self) -> &[ProcessBuilder] {
        &self.invocations
    }

    /// Results of [`observe`](Self::observe), one per invocation.
    pub fn observations(&self) -> &[bool] {
        &self.observations
    }

    fn component_of(process: &ProcessBuilder) -> Option<String> {
        let manifest = arg_after(process, "--manifest-path")?;
        Path::new(manifest)
            .parent()?
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    fn produce_artifact(process: &ProcessBuilder, component: &str) -> io::Result<()> {
        let Some(target) = arg_after(process, "--target-dir") else {
            return Ok(());
        };
        let mode = if process.has_arg("--release") {
            "release"
        } else {
            "debug"
        };
        let dir = Path::new(target).join(mode);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(component), "")
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, process: &ProcessBuilder) -> io::Result<ExitStatus> {
        if self.spawn_error {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such program"));
        }

        self.invocations.push(process.clone());
        if let Some(ref path) = self.observed {
            self.observations.push(path.exists());
        }

        let component = Self::component_of(process).unwrap_or_default();
        let failure = self
            .failures
            .iter()
            .find(|(name, _)| *name == component)
            .map(|(_, code)| *code);

        match failure {
            Some(code) => Ok(exit_status(code)),
            None => {
                Self::produce_artifact(process, &component)?;
                Ok(exit_status(0))
            }
        }
    }
}

/// The argument following `flag`, if any.
pub fn arg_after<'a>(process: &'a ProcessBuilder, flag: &str) -> Option<&'a OsStr> {
    let args = process.get_args();
    let idx = args.iter().position(|a| a.as_os_str() == OsStr::new(flag))?;
    args.get(idx + 1).map(OsString::as_os_str)
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}
