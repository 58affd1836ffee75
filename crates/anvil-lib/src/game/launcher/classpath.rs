use crate::error::LauncherResult;
use crate::game::installer::core::library::resolve_library;
use crate::game::launcher::version_parser::ResolvedVersion;
use crate::game::layout::DataLayout;
use crate::game::rules::RuleEvaluator;
use std::path::PathBuf;

/// Classpath entries in launch order: allowed libraries as declared, then the
/// client jar of the root version.
pub fn classpath_entries(
    layout: &DataLayout,
    version: &ResolvedVersion,
    rules: &RuleEvaluator,
) -> LauncherResult<Vec<PathBuf>> {
    let mut entries = Vec::with_capacity(version.spec.libraries.len() + 1);

    for library in &version.spec.libraries {
        if !rules.allows(&library.rules) {
            log::debug!("Library {} excluded by rules", library.name);
            continue;
        }
        if let Some(resolved) = resolve_library(library)? {
            entries.push(layout.library_path(&resolved.path));
        }
    }

    entries.push(layout.version_jar_path(&version.jar_id));
    Ok(entries)
}

/// Build the `-cp` value using the separator of the rule environment's OS.
pub fn build_classpath(
    layout: &DataLayout,
    version: &ResolvedVersion,
    rules: &RuleEvaluator,
) -> LauncherResult<String> {
    let separator = rules.environment().os.classpath_separator();
    let entries = classpath_entries(layout, version, rules)?;
    Ok(entries
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(separator))
}
