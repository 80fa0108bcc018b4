//! Bundled resources referenced by `<external-css>`.

use std::{fs, path::PathBuf};

/// Supplies the text of a bundled resource.
pub trait ExternalSource {
    /// `None` when the resource does not exist or cannot be read.
    fn fetch(&self, reference: &str) -> Option<String>;
}

/// Resources stored under a directory; `/reset.css` maps to `<root>/reset.css`.
#[derive(Debug, Clone)]
pub struct ResourceDir {
    root: PathBuf,
}

impl ResourceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ExternalSource for ResourceDir {
    fn fetch(&self, reference: &str) -> Option<String> {
        let relative = reference.trim().trim_start_matches(['/', '\\']);
        if relative.is_empty() {
            return None;
        }
        fs::read_to_string(self.root.join(relative)).ok()
    }
}
