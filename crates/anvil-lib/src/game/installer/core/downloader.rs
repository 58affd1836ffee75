use crate::error::{LauncherError, LauncherResult};
use futures::StreamExt;
use reqwest::Client;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::{self, create_dir_all, File};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    AlreadyPresent,
}

/// Download `url` to `path` unless something already exists there.
///
/// Existing files are trusted as-is; their content is not re-hashed.
pub async fn ensure_downloaded(
    client: &Client,
    url: &str,
    path: &Path,
    expected_sha1: Option<&str>,
) -> LauncherResult<DownloadOutcome> {
    if path.exists() {
        log::debug!("Already present, skipping: {:?}", path);
        return Ok(DownloadOutcome::AlreadyPresent);
    }
    download_to_path(client, url, path, expected_sha1).await?;
    Ok(DownloadOutcome::Downloaded)
}

/// Read a file, downloading it first when missing.
pub async fn read_or_download(
    client: &Client,
    url: &str,
    path: &Path,
    expected_sha1: Option<&str>,
) -> LauncherResult<Vec<u8>> {
    ensure_downloaded(client, url, path, expected_sha1).await?;
    fs::read(path).await.map_err(|e| LauncherError::io(path, e))
}

/// Download a file to a path, verifying its SHA-1 while streaming.
///
/// The body is written to `<name>.part` next to the destination and only
/// renamed into place once the hash matched, so a failed download never
/// leaves anything at `path`. No retries.
pub async fn download_to_path(
    client: &Client,
    url: &str,
    path: &Path,
    expected_sha1: Option<&str>,
) -> LauncherResult<()> {
    log::debug!("Downloading: {} -> {:?}", url, path);

    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .await
            .map_err(|e| LauncherError::io(parent, e))?;
    }

    let tmp_path = part_path(path);
    let result = download_with_validation(client, url, path, &tmp_path, expected_sha1).await;
    if result.is_err() {
        // Best effort; the temp file may not exist yet.
        let _ = fs::remove_file(&tmp_path).await;
    }
    result
}

fn part_path(path: &Path) -> PathBuf {
    let tmp_name = format!(
        "{}.part",
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("download")
    );
    path.with_file_name(tmp_name)
}

async fn download_with_validation(
    client: &Client,
    url: &str,
    path: &Path,
    tmp_path: &Path,
    expected_sha1: Option<&str>,
) -> LauncherResult<()> {
    let start = Instant::now();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LauncherError::network(url, e))?;

    if !response.status().is_success() {
        return Err(LauncherError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let mut file = File::create(tmp_path)
        .await
        .map_err(|e| LauncherError::io(tmp_path, e))?;
    let mut hasher = Sha1::new();
    let mut downloaded: u64 = 0;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| LauncherError::network(url, e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| LauncherError::io(tmp_path, e))?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| LauncherError::io(tmp_path, e))?;
    drop(file);

    if let Some(expected) = expected_sha1.filter(|s| !s.is_empty()) {
        let actual = format!("{:x}", hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected) {
            log::error!(
                "SHA-1 mismatch for {}: expected {}, got {}",
                url,
                expected,
                actual
            );
            return Err(LauncherError::Integrity {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    fs::rename(tmp_path, path)
        .await
        .map_err(|e| LauncherError::io(path, e))?;

    log::debug!(
        "Downloaded {} bytes in {:?}: {:?}",
        downloaded,
        start.elapsed(),
        path
    );
    Ok(())
}
