use crate::error::{LauncherError, LauncherResult};
use crate::game::layout::check_relative_path;
use crate::models::version::{Library, LibrarySource};

/// A library reduced to what the installer and the classpath builder need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLibrary {
    pub name: String,
    /// Slash separated path below `libraries/`.
    pub path: String,
    pub url: String,
    pub sha1: Option<String>,
}

/// Map a maven coordinate to its repository path.
///
/// `group:artifact:version[:classifier][@ext]` becomes
/// `group/with/slashes/artifact/version/artifact-version[-classifier].ext`.
pub fn maven_to_path(coords: &str) -> LauncherResult<String> {
    let malformed = || LauncherError::MalformedCoordinate {
        name: coords.to_string(),
    };

    let parts: Vec<&str> = coords.split(':').collect();
    if parts.len() < 3 || parts.iter().take(3).any(|p| p.is_empty()) {
        return Err(malformed());
    }

    let group = parts[0].replace('.', "/");
    let artifact = parts[1];
    let mut version = parts[2];
    let mut classifier = None;
    let mut extension = "jar";

    if parts.len() == 3 {
        // group:artifact:version@extension
        if let Some((v, ext)) = version.split_once('@') {
            version = v;
            extension = ext;
        }
    } else {
        // group:artifact:version:classifier[@extension]
        if let Some((clf, ext)) = parts[3].split_once('@') {
            classifier = Some(clf);
            extension = ext;
        } else {
            classifier = Some(parts[3]);
        }
    }

    let filename = match classifier {
        Some(clf) => format!("{}-{}-{}.{}", artifact, version, clf, extension),
        None => format!("{}-{}.{}", artifact, version, extension),
    };

    Ok(format!("{}/{}/{}/{}", group, artifact, version, filename))
}

/// `repo` joined with `path` using exactly one slash.
pub fn repository_url(repo: &str, path: &str) -> String {
    format!("{}/{}", repo.trim_end_matches('/'), path)
}

/// Resolve where a library lives. `Ok(None)` means it has no downloadable
/// jar and is skipped. Paths that would leave `libraries/` are rejected.
pub fn resolve_library(library: &Library) -> LauncherResult<Option<ResolvedLibrary>> {
    match library.source() {
        LibrarySource::Direct(artifact) => {
            check_relative_path("library path", &artifact.path)?;
            Ok(Some(ResolvedLibrary {
                name: library.name.clone(),
                path: artifact.path.clone(),
                url: artifact.download.url.clone(),
                sha1: artifact.download.expected_sha1().map(str::to_string),
            }))
        }
        LibrarySource::Repository(repo) => {
            let path = maven_to_path(&library.name)?;
            check_relative_path("library path", &path)?;
            Ok(Some(ResolvedLibrary {
                name: library.name.clone(),
                url: repository_url(repo, &path),
                path,
                sha1: None,
            }))
        }
        LibrarySource::Unavailable => {
            log::debug!("Library {} has no artifact, skipping", library.name);
            Ok(None)
        }
    }
}
