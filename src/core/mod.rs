//! Core data model of a setup run.

pub mod component;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod registry;

pub use component::{components, Component};
pub use config::{BuildConfiguration, BuildMode, ResolveOptions, RuntimePaths, SetupConfig};
pub use descriptor::{DescriptorError, DescriptorKey, RuntimeDescriptor};
pub use errors::{EnvironmentErrorKind, PreconditionProblem, SetupError};
pub use registry::RegistryInit;
