//! Image reference resolution.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

/// Maps a `url(...)` reference to the image file it points at.
pub trait ImageResolver {
    /// `None` means "leave the reference alone".
    fn resolve(&self, base: &Path, reference: &str) -> Option<PathBuf>;
}

/// Segment-by-segment walk that skips anything it cannot follow.
///
/// Starting at `base`:
/// - `..` moves to the parent (staying put at the filesystem root)
/// - any other segment moves into the child with exactly that name, or is
///   ignored when no such child exists
/// - the walk stops at the first file reached
///
/// So `../c/img.png` from `/a/b` finds `/a/c/img.png`, and
/// `../missing/img.png` also finds `/a/img.png` if that exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct TolerantResolver;

impl ImageResolver for TolerantResolver {
    fn resolve(&self, base: &Path, reference: &str) -> Option<PathBuf> {
        let mut cursor = base.to_path_buf();

        for segment in reference.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    if let Some(parent) = cursor.parent() {
                        cursor = parent.to_path_buf();
                    }
                }
                name => {
                    if let Some(child) = find_child(&cursor, name) {
                        cursor = child;
                    }
                }
            }

            if cursor.is_file() {
                return Some(cursor);
            }
        }

        None
    }
}

/// Exact, case-sensitive lookup among the immediate children of `dir`.
fn find_child(dir: &Path, name: &str) -> Option<PathBuf> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .find(|entry| entry.file_name() == OsStr::new(name))
        .map(|entry| entry.path())
}
