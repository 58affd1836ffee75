use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// What kind of thing a [`LauncherError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKind {
    Version,
    Loader,
    Spec,
    Profile,
    JavaRuntime,
    Account,
}

impl fmt::Display for MissingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissingKind::Version => "version",
            MissingKind::Loader => "loader",
            MissingKind::Spec => "installed version spec",
            MissingKind::Profile => "profile",
            MissingKind::JavaRuntime => "java runtime",
            MissingKind::Account => "account",
        };
        f.write_str(label)
    }
}

/// Coarse classification used by callers that only care about the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Integrity,
    UnsupportedSchema,
    Network,
    Decode,
    Io,
    Spawn,
    ProcessExit,
    Batch,
}

/// One failed member of a pooled download batch.
#[derive(Debug)]
pub struct ArtifactFailure {
    pub artifact: String,
    pub error: LauncherError,
}

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("unknown {what}: {id}")]
    NotFound { what: MissingKind, id: String },

    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("unsupported spec schema version {version} (supported {min}..={max})")]
    UnsupportedSchema { version: u32, min: u32, max: u32 },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("{operation} did not finish within {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed maven coordinate: {name}")]
    MalformedCoordinate { name: String },

    #[error("unsafe {what} in version metadata: {value:?}")]
    UnsafePath { what: &'static str, value: String },

    #[error("version {id} inherits from itself through {chain}")]
    InheritanceCycle { id: String, chain: String },

    #[error("invalid uuid: {value}")]
    InvalidUuid { value: String },

    #[error("invalid profile name: {name}")]
    InvalidProfileName { name: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start {executable:?}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("game process exited with {}", describe_exit(.code))]
    ProcessExit { code: Option<i32> },

    #[error("{name}: {source}")]
    Artifact {
        name: String,
        #[source]
        source: Box<LauncherError>,
    },

    #[error("{} of {total} downloads failed, first: {}", .failures.len(), first_failure(.failures))]
    Batch {
        failures: Vec<ArtifactFailure>,
        total: usize,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

fn first_failure(failures: &[ArtifactFailure]) -> String {
    failures
        .first()
        .map(|f| format!("{}: {}", f.artifact, f.error))
        .unwrap_or_default()
}

pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    pub fn not_found(what: MissingKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            id: id.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }

    /// Attach the identity of the artifact being processed.
    pub fn for_artifact(self, name: impl Into<String>) -> Self {
        Self::Artifact {
            name: name.into(),
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::UnsupportedSchema { .. } => ErrorKind::UnsupportedSchema,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Timeout { .. } => {
                ErrorKind::Network
            }
            Self::Decode { .. }
            | Self::MalformedCoordinate { .. }
            | Self::UnsafePath { .. }
            | Self::InheritanceCycle { .. }
            | Self::InvalidUuid { .. }
            | Self::InvalidProfileName { .. } => ErrorKind::Decode,
            Self::Io { .. } => ErrorKind::Io,
            Self::Spawn { .. } => ErrorKind::Spawn,
            Self::ProcessExit { .. } => ErrorKind::ProcessExit,
            Self::Artifact { source, .. } => source.kind(),
            Self::Batch { .. } => ErrorKind::Batch,
        }
    }
}

impl From<serde_json::Error> for LauncherError {
    fn from(source: serde_json::Error) -> Self {
        Self::decode("JSON document", source)
    }
}
