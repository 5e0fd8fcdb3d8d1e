//! Centralized shell output.
//!
//! All human-facing output of the setup run goes through [`Shell`]:
//! - Status lines on stderr, formatted as `{status:>12} {message}`
//! - Invocation traces on stdout, formatted as `>> {command}`
//!
//! Diagnostics for developers go through `tracing` instead.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Default: status messages
    #[default]
    Normal,
    /// --verbose: status messages plus notes
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Created,
    Finished,
    Removed,
    Writing,

    // In-progress statuses (cyan)
    Checking,
    Compiling,

    // Info statuses (blue)
    Info,

    // Warning statuses (yellow)
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Writing => "Writing",
            Status::Checking => "Checking",
            Status::Compiling => "Compiling",
            Status::Info => "Info",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Created | Status::Finished | Status::Removed | Status::Writing => "\x1b[1;32m",
            Status::Checking | Status::Compiling => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Width of the right-aligned status column.
    const STATUS_WIDTH: usize = 12;

    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
        }
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message.
    pub fn status(&self, status: Status, msg: impl Display) {
        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an info message. Only shown in verbose mode.
    pub fn note(&self, msg: impl Display) {
        if self.is_verbose() {
            self.status(Status::Info, msg);
        }
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    /// Trace an external invocation before it runs.
    pub fn command(&self, command: impl Display) {
        println!(">> {}", command);
        let _ = io::stdout().flush();
    }

    /// Print a plain line on stdout.
    pub fn println(&self, msg: impl Display) {
        println!("{}", msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        let width = Self::STATUS_WIDTH;

        if self.use_color {
            format!("{}{:>width$}\x1b[0m", status.color_code(), text, width = width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::default(), ColorChoice::default())
    }
}
