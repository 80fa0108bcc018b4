//! `[scripts]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [scripts]
//! groups = "src/main/webapp/WEB-INF/js-config.xml"
//! output = "target/scripts"
//! library = "vendor/closure-library/closure/goog"
//!
//! [scripts.minifier]
//! command = ["java", "-jar", "closure-compiler.jar"]
//! level = "SIMPLE_OPTIMIZATIONS"
//! ```

use super::minifier::{MinifierConfig, MinifierFields};
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Groups document; unset or blank skips script optimization.
    pub groups: Option<PathBuf>,
    /// Directory receiving one merged file per group.
    pub output: PathBuf,
    /// Root of the support library whose files are prepended to every group.
    pub library: Option<PathBuf>,
    pub minifier: MinifierConfig,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            groups: None,
            output: "target/scripts".into(),
            library: None,
            minifier: MinifierConfig::default(),
        }
    }
}

impl ScriptsConfig {
    pub const LIBRARY: FieldPath = FieldPath::new("scripts.library");
    pub const MINIFIER: MinifierFields = MinifierFields {
        command: FieldPath::new("scripts.minifier.command"),
        level: FieldPath::new("scripts.minifier.level"),
    };

    /// Normalize paths relative to the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.groups = super::normalize_groups(self.groups.take(), root);
        self.output = super::normalize_dir(&self.output, root);
        self.library = self
            .library
            .take()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| super::normalize_dir(&p, root));
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(library) = &self.library
            && !library.is_dir()
        {
            diag.error_with_hint(
                Self::LIBRARY,
                format!("{} is not a directory: {}", Self::LIBRARY, library.display()),
                "point it at the directory containing base.js, or remove it",
            );
        }

        self.minifier.validate(Self::MINIFIER, true, diag);
    }
}
