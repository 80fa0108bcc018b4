//! `[build]` section configuration.
//!
//! Run-wide settings shared by both asset types.
//!
//! # Example
//!
//! ```toml
//! [build]
//! on_error = "abort"    # abort | continue
//! ```

use crate::pipeline::FailurePolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// What to do with the remaining groups after one group fails.
    pub on_error: FailurePolicy,

    /// Overrides every group's `minify` attribute (`--minify` flag only).
    #[serde(skip)]
    pub minify: Option<bool>,
}
