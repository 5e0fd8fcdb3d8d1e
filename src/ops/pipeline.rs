//! The end-to-end setup pipeline.
//!
//! Stages run strictly in sequence:
//!
//! ```text
//! Start → RequirementsChecked → ConfigResolved → EnvironmentPrepared
//!       → ComponentsBuilt → DescriptorWritten → Done
//! ```
//!
//! Any error ends the run from whatever stage it was in. There are no
//! retries and no backward transitions.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use crate::core::component::components;
use crate::core::config::{resolve, ResolveOptions};
use crate::core::descriptor::RuntimeDescriptor;
use crate::core::errors::SetupError;
use crate::ops::build::{build_components, BuildReport, CommandRunner};
use crate::ops::generate::{generate_descriptor, locate_executables_dir};
use crate::ops::prepare::{prepare_environment, PreparedEnvironment};
use crate::ops::requirements::{check_requirements, RequirementReport};
use crate::util::{Shell, Status};

/// Pipeline position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    RequirementsChecked,
    ConfigResolved,
    EnvironmentPrepared,
    ComponentsBuilt,
    DescriptorWritten,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::RequirementsChecked => "requirements-checked",
            Stage::ConfigResolved => "config-resolved",
            Stage::EnvironmentPrepared => "environment-prepared",
            Stage::ComponentsBuilt => "components-built",
            Stage::DescriptorWritten => "descriptor-written",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Values read from the host environment.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    /// Value of `HOME`
    pub home: Option<OsString>,

    /// Invocation directory
    pub cwd: PathBuf,
}

impl HostEnvironment {
    /// Read `HOME` and the current directory of this process.
    pub fn from_process() -> std::io::Result<Self> {
        Ok(HostEnvironment {
            home: std::env::var_os("HOME"),
            cwd: std::env::current_dir()?,
        })
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct SetupSummary {
    pub requirements: RequirementReport,
    pub environment: PreparedEnvironment,
    pub build: BuildReport,
    pub descriptor: RuntimeDescriptor,
    pub descriptor_path: PathBuf,
    pub executables_dir: PathBuf,
}

struct Progress {
    stage: Stage,
}

impl Progress {
    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = %self.stage, to = %next, "pipeline transition");
        self.stage = next;
    }
}

/// Run the whole setup: check, resolve, prepare, build, describe.
pub fn run_setup<R: CommandRunner>(
    options: ResolveOptions,
    host: HostEnvironment,
    runner: &mut R,
    shell: &Shell,
) -> Result<SetupSummary, SetupError> {
    let mut progress = Progress {
        stage: Stage::Start,
    };

    shell.status(Status::Checking, "required tools");
    let requirements = check_requirements(shell);
    progress.advance(Stage::RequirementsChecked);

    let config = resolve(options, host.home, host.cwd)?;
    requirements.enforce(config.build.strict_requirements)?;
    progress.advance(Stage::ConfigResolved);

    let environment = prepare_environment(&config.paths, shell)?;
    progress.advance(Stage::EnvironmentPrepared);

    let build = build_components(&components(&config.cwd), &config, runner, shell)?;
    if !build.is_success() {
        return Err(SetupError::BuildsFailed {
            failed: build.failed.iter().map(|f| f.component.clone()).collect(),
        });
    }
    progress.advance(Stage::ComponentsBuilt);

    let descriptor = generate_descriptor(&config, shell)?;
    progress.advance(Stage::DescriptorWritten);

    let executables_dir = locate_executables_dir(&config)?;
    shell.status(
        Status::Finished,
        format!(
            "{} component(s) in {} mode",
            build.built.len(),
            config.build.mode
        ),
    );
    progress.advance(Stage::Done);

    Ok(SetupSummary {
        requirements,
        environment,
        build,
        descriptor,
        descriptor_path: config.paths.descriptor_file.clone(),
        executables_dir,
    })
}
