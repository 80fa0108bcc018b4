//! Asset groups: what goes into each merged output file, in which order.
//!
//! ```text
//! groups document ──parse──▶ GroupsDocument ──GroupAssembler──▶ Vec<Group>
//!                                 ▲
//!            DependencyManifest ──┤ (scripts only)
//!            ExternalSource ──────┘ (styles only)
//! ```

mod assemble;
mod document;
mod external;
mod manifest;

pub use assemble::GroupAssembler;
pub use document::{GroupSpec, GroupsDocument};
pub use external::{ExternalSource, ResourceDir};
pub use manifest::DependencyManifest;

use crate::error::PipelineError;
use serde::Serialize;
use std::{borrow::Cow, fs, path::PathBuf};

/// The two asset types, processed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Styles,
    Scripts,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Styles, AssetKind::Scripts];

    /// Log module name and config section name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Styles => "styles",
            Self::Scripts => "scripts",
        }
    }
}

/// One merged output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Output file name, relative to the asset type's output directory.
    pub name: String,
    pub minify: bool,
    pub items: Vec<ContentItem>,
}

/// A unit of group content, in final order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    /// Content already in memory (bundled resources, inlined style-sheets).
    ExternalText {
        label: String,
        #[serde(skip)]
        text: String,
    },
    /// A file on disk, verified to exist at assembly time.
    FileRef { path: PathBuf },
}

impl ContentItem {
    /// Short description for logs.
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Self::ExternalText { label, .. } => Cow::Borrowed(label),
            Self::FileRef { path } => path.to_string_lossy(),
        }
    }

    /// The item's bytes.
    pub fn read(&self) -> Result<Cow<'_, [u8]>, PipelineError> {
        match self {
            Self::ExternalText { text, .. } => Ok(Cow::Borrowed(text.as_bytes())),
            Self::FileRef { path } => fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| PipelineError::io(path, e)),
        }
    }
}
