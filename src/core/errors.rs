//! Setup error types.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// What was wrong with a path that had to exist before a stage could run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionProblem {
    /// Nothing exists at the path.
    NotFound,
    /// Something exists but it is not a regular file.
    NotAFile,
    /// Something exists but it is not a directory.
    NotADirectory,
    /// The path is a filesystem root.
    FilesystemRoot,
    /// The path is the invocation directory or one of its ancestors.
    ContainsInvocationDir,
    /// The path ends in a `.` or `..` component.
    EndsInDotComponent,
}

impl fmt::Display for PreconditionProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreconditionProblem::NotFound => write!(f, "does not exist"),
            PreconditionProblem::NotAFile => write!(f, "is not a file"),
            PreconditionProblem::NotADirectory => write!(f, "is not a directory"),
            PreconditionProblem::FilesystemRoot => write!(f, "is a filesystem root"),
            PreconditionProblem::ContainsInvocationDir => {
                write!(f, "contains the invocation directory")
            }
            PreconditionProblem::EndsInDotComponent => write!(f, "ends in `.` or `..`"),
        }
    }
}

/// Classification of an I/O failure while preparing the runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentErrorKind {
    PermissionDenied,
    NotFound,
    Io,
}

impl From<io::ErrorKind> for EnvironmentErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::PermissionDenied => EnvironmentErrorKind::PermissionDenied,
            io::ErrorKind::NotFound => EnvironmentErrorKind::NotFound,
            _ => EnvironmentErrorKind::Io,
        }
    }
}

impl fmt::Display for EnvironmentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentErrorKind::PermissionDenied => write!(f, "permission denied"),
            EnvironmentErrorKind::NotFound => write!(f, "not found"),
            EnvironmentErrorKind::Io => write!(f, "i/o error"),
        }
    }
}

/// A failure that terminates the setup pipeline.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("HOME is not set; the default wsync paths cannot be derived")]
    MissingHome,

    #[error("path `{}` contains a line break and cannot be written to the runtime descriptor", .path.display())]
    LineBreakInPath { path: PathBuf },

    #[error("required tool `{tool}` cannot be found")]
    MissingTool { tool: String },

    #[error("`{}` {problem}", .path.display())]
    Precondition {
        path: PathBuf,
        problem: PreconditionProblem,
    },

    #[error("failed to prepare wsync environment at `{}` ({kind})", .path.display())]
    Environment {
        path: PathBuf,
        kind: EnvironmentErrorKind,
        #[source]
        source: io::Error,
    },

    #[error("refusing to remove build output directory `{}`: it {problem}", .path.display())]
    UnsafeCleanup {
        path: PathBuf,
        problem: PreconditionProblem,
    },

    #[error("failed to remove build output directory `{}`", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error(
        "build of `{component}` failed with {}: `{command}`",
        .code.map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"))
    )]
    ExternalProcess {
        component: String,
        command: String,
        code: Option<i32>,
    },

    #[error("{} component build(s) failed: {}", .failed.len(), .failed.join(", "))]
    BuildsFailed { failed: Vec<String> },

    #[error("failed to write runtime descriptor `{}`", .path.display())]
    DescriptorWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SetupError {
    /// Wrap an I/O failure from the environment preparation stage.
    pub fn environment(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SetupError::Environment {
            path: path.into(),
            kind: source.kind().into(),
            source,
        }
    }

    /// Check whether this error was raised for a missing, mistyped or protected path.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SetupError::Precondition { .. } | SetupError::UnsafeCleanup { .. }
        )
    }
}
