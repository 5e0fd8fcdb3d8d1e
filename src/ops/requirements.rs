//! Host requirement checks.
//!
//! Verifies that the external tools the wsync tool-chain needs are on the
//! executable search path. A missing tool is advisory by default: it is
//! reported and the run continues, since the build stage fails on its own if
//! the toolchain really is absent. Strict mode turns it into a fatal error.

use std::path::PathBuf;

use crate::core::errors::SetupError;
use crate::util::process::find_executable;
use crate::util::Shell;

/// Tools that must be discoverable on `PATH`.
pub const REQUIRED_TOOLS: [&str; 2] = ["cargo", "rsync"];

/// Result of looking up a single tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheck {
    pub tool: String,

    /// Resolved location, `None` if the tool cannot be found
    pub path: Option<PathBuf>,
}

impl ToolCheck {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Summary of all tool lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementReport {
    pub checks: Vec<ToolCheck>,
}

impl RequirementReport {
    /// Check if every tool was found.
    pub fn all_found(&self) -> bool {
        self.checks.iter().all(ToolCheck::found)
    }

    /// Names of the tools that could not be found.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|c| !c.found())
            .map(|c| c.tool.as_str())
    }

    /// Fail on the first missing tool when `strict`, otherwise accept the report.
    pub fn enforce(&self, strict: bool) -> Result<(), SetupError> {
        if !strict {
            return Ok(());
        }
        match self.missing().next() {
            Some(tool) => Err(SetupError::MissingTool {
                tool: tool.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Look up each of `tools` on `PATH`.
pub fn check_tools(tools: &[&str]) -> RequirementReport {
    let checks = tools
        .iter()
        .map(|tool| {
            let path = find_executable(tool);
            tracing::debug!(tool, found = ?path, "checked required tool");
            ToolCheck {
                tool: tool.to_string(),
                path,
            }
        })
        .collect();

    RequirementReport { checks }
}

/// Check [`REQUIRED_TOOLS`] and print a diagnostic per missing tool.
pub fn check_requirements(shell: &Shell) -> RequirementReport {
    let report = check_tools(&REQUIRED_TOOLS);

    for check in &report.checks {
        match &check.path {
            Some(path) => shell.note(format!("found `{}` at {}", check.tool, path.display())),
            None => shell.error(format!("'{}' cannot be found!", check.tool)),
        }
    }
    if report.all_found() {
        tracing::debug!("all required tools found");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "wsync-setup-definitely-not-installed";

    #[cfg(unix)]
    #[test]
    fn test_finds_present_tool() {
        let report = check_tools(&["sh"]);
        assert!(report.all_found());
        assert!(report.checks[0].path.is_some());
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let report = check_tools(&[MISSING]);
        assert!(!report.all_found());
        assert_eq!(report.missing().collect::<Vec<_>>(), [MISSING]);
    }

    #[test]
    fn test_missing_tool_is_advisory_by_default() {
        let report = check_tools(&[MISSING]);
        assert!(report.enforce(false).is_ok());
    }

    #[test]
    fn test_strict_mode_makes_missing_tool_fatal() {
        let report = check_tools(&[MISSING]);
        match report.enforce(true) {
            Err(SetupError::MissingTool { tool }) => assert_eq!(tool, MISSING),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_report_passes_strict_mode() {
        assert!(RequirementReport::default().enforce(true).is_ok());
    }
}
