use std::path::{Path, PathBuf};

/// Resolve which open workspace root a path belongs to.
///
/// With nested roots the most specific (deepest) match wins. Paths outside
/// every root resolve to `None` and are ignored by the callers.
pub fn resolve_workspace_root<'a>(path: &Path, roots: &'a [PathBuf]) -> Option<&'a Path> {
    roots
        .iter()
        .filter(|root| path.starts_with(root))
        .max_by_key(|root| root.components().count())
        .map(PathBuf::as_path)
}
