//! `[styles.minifier]` / `[scripts.minifier]` configuration.
//!
//! # Example
//!
//! ```toml
//! [scripts.minifier]
//! command = ["java", "-jar", "closure-compiler.jar"]
//! level = "ADVANCED_OPTIMIZATIONS"
//! quiet = true
//! ```
//!
//! An empty `command` selects the built-in backend (lightningcss / oxc).

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Default optimization level handed to the script minifier.
pub const DEFAULT_LEVEL: &str = "ADVANCED_OPTIMIZATIONS";

/// Field paths of one minifier table, prefixed by its section.
#[derive(Debug, Clone, Copy)]
pub struct MinifierFields {
    pub command: FieldPath,
    pub level: FieldPath,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifierConfig {
    /// External minifier program and its fixed leading arguments.
    pub command: Vec<String>,
    /// Optimization level selector (scripts only).
    pub level: String,
    /// Suppress the minifier's diagnostic output (default: true).
    pub quiet: bool,
}

impl Default for MinifierConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            level: DEFAULT_LEVEL.into(),
            quiet: true,
        }
    }
}

impl MinifierConfig {
    /// Whether an external tool is configured.
    pub fn is_external(&self) -> bool {
        !self.command.is_empty()
    }

    /// Validate minifier configuration.
    ///
    /// # Checks
    /// - `command[0]` must be an installed executable (or package runner)
    /// - `level` must not be blank when `check_level` is set
    pub fn validate(&self, fields: MinifierFields, check_level: bool, diag: &mut ConfigDiagnostics) {
        if check_level && self.level.trim().is_empty() {
            diag.error(fields.level, format!("{} must not be empty", fields.level));
        }

        let Some(cmd) = self.command.first() else {
            return;
        };

        if cmd.trim().is_empty() {
            diag.error(fields.command, format!("{} starts with an empty program", fields.command));
            return;
        }

        let is_package_runner = ["npx", "bunx", "pnpx", "yarn", "dlx"].contains(&cmd.as_str());

        if which::which(cmd).is_err() {
            if is_package_runner {
                // Package runners can download packages at runtime, just hint
                if let Some(package) = self.command.get(1) {
                    diag.hint(
                        fields.command,
                        format!("`{package}` via `{cmd}`, ensure package is installed"),
                    );
                }
            } else {
                diag.error_with_hint(
                    fields.command,
                    format!("`{cmd}` not found"),
                    format!("install the command or clear {} to use the built-in minifier", fields.command),
                );
            }
        }
    }
}
