//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// # Example
/// ```ignore
/// use resopt::utils::path::normalize_path;
/// let abs = normalize_path(Path::new("./src/main/webapp/css/a.css"));
/// ```
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Join a groups-document entry onto the project root.
///
/// Entries are written as `/css/a.css` but mean "under the root", so leading
/// separators are dropped before joining.
pub fn root_relative(root: &Path, entry: &str) -> PathBuf {
    root.join(entry.trim().trim_start_matches(['/', '\\']))
}
