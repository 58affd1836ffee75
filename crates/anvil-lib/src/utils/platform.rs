use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system names as they appear in manifest rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsType {
    Osx,
    Linux,
    Windows,
}

impl OsType {
    /// Detect the current OS. Unix flavours without their own rule vocabulary
    /// are reported as linux.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Normalize a host or rule OS name.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "osx" | "macos" | "darwin" => OsType::Osx,
            "windows" => OsType::Windows,
            _ => OsType::Linux,
        }
    }

    /// Get the OS name as a string (for rule matching)
    pub fn as_str(&self) -> &'static str {
        match self {
            OsType::Osx => "osx",
            OsType::Linux => "linux",
            OsType::Windows => "windows",
        }
    }

    /// Get the classpath separator for this OS
    pub fn classpath_separator(&self) -> &'static str {
        match self {
            OsType::Windows => ";",
            _ => ":",
        }
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize an architecture name to the `x86_64 | x86 | arm64` rule vocabulary.
/// Anything else passes through lowercased so it simply never matches.
pub fn normalize_arch(arch: &str) -> String {
    match arch.to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" | "x64" => "x86_64".to_string(),
        "x86" | "i386" | "i686" | "386" => "x86".to_string(),
        "aarch64" | "arm64" => "arm64".to_string(),
        other => other.to_string(),
    }
}

pub fn current_arch() -> String {
    normalize_arch(std::env::consts::ARCH)
}

/// Host OS version string used for `os.version` rule patterns.
pub fn current_os_version() -> String {
    sysinfo::System::os_version().unwrap_or_else(|| "unknown".to_string())
}
