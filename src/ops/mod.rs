//! High-level operations.
//!
//! One module per pipeline stage, plus the pipeline that chains them.

pub mod build;
pub mod generate;
pub mod pipeline;
pub mod prepare;
pub mod requirements;

pub use build::{build_components, BuildReport, CommandRunner, SystemRunner};
pub use generate::generate_descriptor;
pub use pipeline::{run_setup, HostEnvironment, SetupSummary, Stage};
pub use prepare::{prepare_environment, PreparedEnvironment};
pub use requirements::{check_requirements, RequirementReport};
