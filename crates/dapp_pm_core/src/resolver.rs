use log::trace;
use path_clean::clean;
use std::path::{Path, PathBuf};

/// Resolves `request` against the directory of `from_file`.
///
/// Purely lexical: both inputs are tree-root-relative and so is the result,
/// which lines up with the keys produced by [`normalize`]. A leading `/` in the
/// request is joined like any other segment and never escapes the tree.
pub fn resolve(from_file: &Path, request: &str) -> PathBuf {
    let base = from_file.parent().unwrap_or_else(|| Path::new(""));
    let candidate = normalize(&base.join(request.trim_start_matches('/')));
    trace!("Resolved '{}' from {} to {}", request, from_file.display(), candidate.display());
    candidate
}

/// Lexically cleans a tree-relative path so it can be compared by equality.
pub fn normalize(path: &Path) -> PathBuf {
    clean(path)
}
