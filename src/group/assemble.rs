//! Turns a parsed groups document into ordered group contents.
//!
//! | Kind    | Item order                                          |
//! |---------|-----------------------------------------------------|
//! | styles  | external resources, then local files                |
//! | scripts | dependency manifest, then common, then group files  |
//!
//! Missing files and resources are dropped from their own sub-list with a
//! warning. Assembly itself never fails.

use super::{AssetKind, ContentItem, DependencyManifest, ExternalSource, Group, GroupSpec, GroupsDocument};
use crate::log;
use std::path::PathBuf;

pub struct GroupAssembler<'a> {
    manifest: &'a DependencyManifest,
    external: &'a dyn ExternalSource,
}

impl<'a> GroupAssembler<'a> {
    pub fn new(manifest: &'a DependencyManifest, external: &'a dyn ExternalSource) -> Self {
        Self { manifest, external }
    }

    /// Assemble every group of `doc`, in document order.
    pub fn assemble(&self, kind: AssetKind, doc: &GroupsDocument) -> Vec<Group> {
        match kind {
            AssetKind::Styles => {
                if !doc.common.is_empty() {
                    log!("warning"; "common files are ignored for style groups");
                }
                doc.groups.iter().map(|spec| self.style_group(spec)).collect()
            }
            AssetKind::Scripts => {
                let manifest = existing(kind, "library", self.manifest.entries());
                let common = existing(kind, "common", &doc.common);
                doc.groups
                    .iter()
                    .map(|spec| self.script_group(spec, &manifest, &common))
                    .collect()
            }
        }
    }

    /// `[external resources] + [local files]`.
    pub fn style_group(&self, spec: &GroupSpec) -> Group {
        let externals = spec.external.iter().filter_map(|reference| {
            match self.external.fetch(reference) {
                Some(text) => Some(ContentItem::ExternalText {
                    label: reference.clone(),
                    text,
                }),
                None => {
                    log!("warning"; "external css does not exist, skipped: {}", reference);
                    None
                }
            }
        });

        let files = existing(AssetKind::Styles, &spec.name, &spec.files)
            .into_iter()
            .map(|path| ContentItem::FileRef { path });

        Group {
            name: spec.name.clone(),
            minify: spec.minify,
            items: externals.chain(files).collect(),
        }
    }

    /// `[manifest] + [common] + [group files]`; `manifest` and `common` are
    /// already filtered.
    pub fn script_group(&self, spec: &GroupSpec, manifest: &[PathBuf], common: &[PathBuf]) -> Group {
        if !spec.external.is_empty() {
            log!("warning"; "external resources are ignored for script group `{}`", spec.name);
        }

        let own = existing(AssetKind::Scripts, &spec.name, &spec.files);
        let items = manifest
            .iter()
            .chain(common)
            .cloned()
            .chain(own)
            .map(|path| ContentItem::FileRef { path })
            .collect();

        Group {
            name: spec.name.clone(),
            minify: spec.minify,
            items,
        }
    }
}

/// Keep the paths that exist, warning about the rest.
fn existing(kind: AssetKind, owner: &str, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| {
            let exists = path.exists();
            if !exists {
                log!("warning"; "[{}] {} file does not exist, skipped: {}", owner, kind.label(), path.display());
            }
            exists
        })
        .cloned()
        .collect()
}
