use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A java installation known to the embedding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaRuntime {
    #[serde(default)]
    pub name: String,
    /// Path to the `java` executable.
    pub path: PathBuf,
    pub major_version: u32,
}

impl JavaRuntime {
    /// Whether this runtime satisfies a spec's `javaVersion.majorVersion`.
    pub fn satisfies(&self, required_major: u32) -> bool {
        self.major_version >= required_major
    }
}
