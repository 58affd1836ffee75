use crate::error::{LauncherError, LauncherResult};
use std::path::{Path, PathBuf};

pub const MANIFEST_CACHE_FILENAME: &str = "versions_v2.json";

/// Paths inside the launcher data directory. Every artifact location is a
/// pure function of a version id, an asset hash or a library path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_cache_path(&self) -> PathBuf {
        self.root.join(MANIFEST_CACHE_FILENAME)
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn version_dir(&self, id: &str) -> PathBuf {
        self.versions_dir().join(id)
    }

    pub fn version_spec_path(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{}.json", id))
    }

    pub fn version_jar_path(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{}.jar", id))
    }

    pub fn natives_dir(&self, id: &str) -> PathBuf {
        self.version_dir(id).join("natives")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    /// `path` is the slash separated repository path of a library jar.
    pub fn library_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.libraries_dir(), |acc, segment| acc.join(segment))
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn asset_index_path(&self, index_id: &str) -> PathBuf {
        self.assets_dir()
            .join("indexes")
            .join(format!("{}.json", index_id))
    }

    pub fn asset_object_path(&self, hash: &str) -> PathBuf {
        self.assets_dir()
            .join("objects")
            .join(asset_prefix(hash))
            .join(hash)
    }

    pub fn log_config_path(&self, file_id: &str) -> PathBuf {
        self.assets_dir().join("log_configs").join(file_id)
    }
}

/// First two characters of an asset hash (the object shard directory).
pub fn asset_prefix(hash: &str) -> &str {
    hash.get(..2).unwrap_or(hash)
}

fn unsafe_path(what: &'static str, value: &str) -> LauncherError {
    LauncherError::UnsafePath {
        what,
        value: value.to_string(),
    }
}

/// Accept a slash separated path only if it stays below the directory it is
/// joined onto.
pub fn check_relative_path(what: &'static str, path: &str) -> LauncherResult<()> {
    let escapes = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.contains(':')
        || path.contains('\0')
        || path.split('/').any(|segment| segment == ".." || segment == ".");
    if escapes {
        return Err(unsafe_path(what, path));
    }
    Ok(())
}

/// A single path component such as a version id or log config file id.
pub fn check_file_name(what: &'static str, name: &str) -> LauncherResult<()> {
    check_relative_path(what, name)?;
    if name.contains('/') {
        return Err(unsafe_path(what, name));
    }
    Ok(())
}

/// Asset objects are addressed by their hex SHA-1.
pub fn check_asset_hash(hash: &str) -> LauncherResult<()> {
    if hash.len() != 40 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(unsafe_path("asset hash", hash));
    }
    Ok(())
}
