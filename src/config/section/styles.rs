//! `[styles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! groups = "src/main/webapp/WEB-INF/css-config.xml"
//! output = "target/styles"
//! resources = "resources"
//!
//! [styles.minifier]
//! command = ["java", "-jar", "closure-stylesheets.jar"]
//! ```

use super::minifier::{MinifierConfig, MinifierFields};
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Groups document; unset or blank skips style optimization.
    pub groups: Option<PathBuf>,
    /// Directory receiving one merged file per group.
    pub output: PathBuf,
    /// Lookup root for `<external-css>` references.
    pub resources: PathBuf,
    pub minifier: MinifierConfig,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            groups: None,
            output: "target/styles".into(),
            resources: "resources".into(),
            minifier: MinifierConfig::default(),
        }
    }
}

impl StylesConfig {
    pub const MINIFIER: MinifierFields = MinifierFields {
        command: FieldPath::new("styles.minifier.command"),
        level: FieldPath::new("styles.minifier.level"),
    };

    /// Normalize paths relative to the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.groups = super::normalize_groups(self.groups.take(), root);
        self.output = super::normalize_dir(&self.output, root);
        self.resources = super::normalize_dir(&self.resources, root);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        // Style minifiers take no level selector
        self.minifier.validate(Self::MINIFIER, false, diag);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(config.styles.groups.is_none());
        assert_eq!(config.styles.output, PathBuf::from("target/styles"));
        assert_eq!(config.styles.resources, PathBuf::from("resources"));
        assert!(!config.styles.minifier.is_external());
    }

    #[test]
    fn test_styles_section() {
        let config = test_parse_config(
            r#"
[styles]
groups = "web/css-config.xml"
output = "dist/css"

[styles.minifier]
command = ["closure-stylesheets"]
quiet = false
"#,
        );
        assert_eq!(config.styles.groups, Some(PathBuf::from("web/css-config.xml")));
        assert_eq!(config.styles.output, PathBuf::from("dist/css"));
        assert_eq!(config.styles.minifier.command, vec!["closure-stylesheets"]);
        assert!(!config.styles.minifier.quiet);
    }

    #[test]
    fn test_blank_output_is_project_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = test_parse_config("[styles]\noutput = \"\"");
        config.finalize(dir.path());

        assert_eq!(config.styles.output, config.get_root());
        assert!(config.validate().is_ok());
    }
}
