use crate::error::{LauncherError, LauncherResult, MissingKind};
use crate::game::layout::DataLayout;
use crate::models::version::{Arguments, VersionSpec};
use tokio::fs;

/// An installed version with its inheritance chain folded in.
#[derive(Debug, Clone)]
pub struct ResolvedVersion {
    /// Merged spec (child values win, lists are child-then-base).
    pub spec: VersionSpec,
    /// Version whose client jar goes last on the classpath: the root of the
    /// chain, never a version that inherits.
    pub jar_id: String,
    /// Leaf first.
    pub chain: Vec<String>,
}

/// Parse an installed `versions/{id}/{id}.json`.
pub async fn load_spec(layout: &DataLayout, id: &str) -> LauncherResult<VersionSpec> {
    let path = layout.version_spec_path(id);
    let bytes = match fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LauncherError::not_found(MissingKind::Spec, id));
        }
        Err(e) => return Err(LauncherError::io(&path, e)),
    };
    VersionSpec::from_json(&bytes, &path.display().to_string())
}

/// Load `id` and every version it inherits from, merging them into one spec.
pub async fn resolve_version_chain(layout: &DataLayout, id: &str) -> LauncherResult<ResolvedVersion> {
    let mut specs = Vec::new();
    let mut chain: Vec<String> = Vec::new();
    let mut next = Some(id.to_string());

    while let Some(current) = next.take() {
        if chain.contains(&current) {
            return Err(LauncherError::InheritanceCycle {
                id: current,
                chain: chain.join(" -> "),
            });
        }
        let spec = load_spec(layout, &current).await?;
        log::debug!("Loaded spec {} (inherits: {:?})", current, spec.inherits_from);
        next = spec.inherits_from.clone();
        chain.push(current);
        specs.push(spec);
    }

    let jar_id = chain.last().cloned().unwrap_or_else(|| id.to_string());

    // Fold from the root towards the leaf so each child overrides its base.
    let mut iter = specs.into_iter().rev();
    let mut merged = iter.next().unwrap_or_default();
    for child in iter {
        merged = merge_specs(child, merged);
    }

    Ok(ResolvedVersion {
        spec: merged,
        jar_id,
        chain,
    })
}

/// Merge a child spec over its base. Present child fields win; libraries and
/// both argument lists are concatenated child first.
pub fn merge_specs(child: VersionSpec, base: VersionSpec) -> VersionSpec {
    let mut libraries = child.libraries;
    libraries.extend(base.libraries);

    let arguments = match (child.arguments, base.arguments) {
        (None, None) => None,
        (child_args, base_args) => {
            let child_args = child_args.unwrap_or_default();
            let base_args = base_args.unwrap_or_default();
            Some(Arguments {
                game: child_args.game.into_iter().chain(base_args.game).collect(),
                jvm: child_args.jvm.into_iter().chain(base_args.jvm).collect(),
            })
        }
    };

    VersionSpec {
        id: if child.id.is_empty() { base.id } else { child.id },
        inherits_from: child.inherits_from.or(base.inherits_from),
        minimum_launcher_version: child
            .minimum_launcher_version
            .or(base.minimum_launcher_version),
        downloads: child.downloads.or(base.downloads),
        libraries,
        asset_index: child.asset_index.or(base.asset_index),
        assets: child.assets.or(base.assets),
        logging: child.logging.or(base.logging),
        java_version: child.java_version.or(base.java_version),
        main_class: child.main_class.or(base.main_class),
        version_type: child.version_type.or(base.version_type),
        arguments,
    }
}
