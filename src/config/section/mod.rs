//! Configuration section definitions.
//!
//! Each module corresponds to a section in `resopt.toml`:
//!
//! | Module     | TOML Section          | Purpose                            |
//! |------------|-----------------------|------------------------------------|
//! | `build`    | `[build]`             | Failure policy, CLI overrides      |
//! | `styles`   | `[styles]`            | Style groups, output, resources    |
//! | `scripts`  | `[scripts]`           | Script groups, output, library     |
//! | `minifier` | `[*.minifier]`        | External or built-in minifier      |

pub mod build;
pub mod minifier;
mod scripts;
mod styles;

pub use build::BuildSectionConfig;
pub use minifier::MinifierConfig;
pub use scripts::ScriptsConfig;
pub use styles::StylesConfig;

use crate::utils::path::normalize_path;
use std::path::{Path, PathBuf};

/// Expand `~` and resolve a configured path against the project root.
fn normalize_dir(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full_path = if path.is_relative() {
        root.join(&path)
    } else {
        path
    };
    normalize_path(&full_path)
}

/// Blank groups paths mean "not configured".
fn normalize_groups(groups: Option<PathBuf>, root: &Path) -> Option<PathBuf> {
    groups
        .filter(|p| !p.to_string_lossy().trim().is_empty())
        .map(|p| normalize_dir(&p, root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_groups_blank_is_none() {
        let root = Path::new("/project");
        assert!(normalize_groups(None, root).is_none());
        assert!(normalize_groups(Some(PathBuf::from("")), root).is_none());
        assert!(normalize_groups(Some(PathBuf::from("   ")), root).is_none());
    }

    #[test]
    fn test_normalize_dir_relative_joins_root() {
        let root = Path::new("/nonexistent-root");
        let dir = normalize_dir(Path::new("target/styles"), root);
        assert_eq!(dir, PathBuf::from("/nonexistent-root/target/styles"));
    }

    #[test]
    fn test_normalize_dir_absolute_kept() {
        let dir = normalize_dir(Path::new("/abs/out"), Path::new("/project"));
        assert_eq!(dir, PathBuf::from("/abs/out"));
    }
}
