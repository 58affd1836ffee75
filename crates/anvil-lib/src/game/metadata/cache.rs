use super::types::VersionManifestCache;
use crate::error::{LauncherError, LauncherResult};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs;

/// Read and decode the manifest cache file.
pub async fn load_cached_manifest(path: &Path) -> LauncherResult<VersionManifestCache> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| LauncherError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| LauncherError::decode(path.display().to_string(), e))
}

/// Write the manifest cache, replacing any previous file in one rename.
pub fn save_manifest(path: &Path, manifest: &VersionManifestCache) -> LauncherResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| LauncherError::io(dir, e))?;

    let json = serde_json::to_vec_pretty(manifest)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| LauncherError::io(dir, e))?;
    let tmp_path = tmp.path().to_path_buf();
    tmp.write_all(&json)
        .map_err(|e| LauncherError::io(&tmp_path, e))?;
    tmp.persist(path)
        .map_err(|e| LauncherError::io(path, e.error))?;

    log::debug!("Saved version manifest cache to {:?}", path);
    Ok(())
}
