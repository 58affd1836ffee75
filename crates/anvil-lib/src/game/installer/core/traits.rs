use crate::error::LauncherResult;
use crate::game::metadata::types::VersionDescriptor;
use futures::future::BoxFuture;

/// Resolves the `inheritsFrom` name of a spec to something installable.
/// Implemented by the version resolver; tests can substitute a fixed table.
pub trait VersionSource: Send + Sync {
    fn find_base<'a>(&'a self, name: &'a str) -> BoxFuture<'a, LauncherResult<VersionDescriptor>>;
}
