//! The persisted workspace registry.
//!
//! The registry is durable user state owned by the daemon and client. Setup
//! only ever creates it, as an empty JSON array, and never touches an
//! existing file, whatever it contains.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

/// Outcome of [`initialize_registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryInit {
    /// The file did not exist and was created empty.
    Created,
    /// The file already existed and was left untouched.
    AlreadyPresent,
}

/// Serialized form of a registry holding no workspaces.
pub fn empty_registry() -> String {
    let empty: Vec<Value> = Vec::new();
    let mut out = Value::Array(empty).to_string();
    out.push('\n');
    out
}

/// Create the registry at `path` unless something is already there.
///
/// The file is opened with `create_new`, so an existing registry is never
/// truncated even if it appears between the check and the write.
pub fn initialize_registry(path: &Path) -> io::Result<RegistryInit> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(RegistryInit::AlreadyPresent)
        }
        Err(e) => return Err(e),
    };
    file.write_all(empty_registry().as_bytes())?;
    Ok(RegistryInit::Created)
}
