//! Shared utilities

pub mod fs;
pub mod process;
pub mod shell;

pub use process::ProcessBuilder;
pub use shell::{ColorChoice, Shell, Status, Verbosity};
