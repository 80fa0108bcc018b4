//! Per-asset-type optimization run.
//!
//! ```text
//! groups document ─▶ plan ─▶ [Group] ─▶ for each group, in order:
//!                                         inline images (styles)
//!                                         invoke minifier
//!                                         write <output>/<name>
//! ```
//!
//! A failing group either stops the run ([`FailurePolicy::Abort`]) or is
//! recorded while the remaining groups proceed ([`FailurePolicy::Continue`]).

mod write;

pub use write::write_output;

use crate::{
    config::{ConfigError, MinifierConfig, ProjectConfig},
    debug,
    error::PipelineError,
    group::{AssetKind, ContentItem, DependencyManifest, Group, GroupAssembler, GroupsDocument, ResourceDir},
    inline::ImageInliner,
    log,
    logger::ProgressLine,
    minify::MinifierInvoker,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

/// What happens to the remaining groups after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Abort,
    Continue,
}

/// A group written successfully.
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub name: String,
    pub output: PathBuf,
    pub bytes: usize,
}

/// Outcome of one asset type's run.
#[derive(Debug)]
pub struct RunReport {
    pub kind: AssetKind,
    pub written: Vec<GroupReport>,
    /// Groups that failed under [`FailurePolicy::Continue`].
    pub failures: Vec<(String, PipelineError)>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

pub struct Pipeline {
    kind: AssetKind,
    inliner: ImageInliner,
    invoker: MinifierInvoker,
    output_dir: PathBuf,
    policy: FailurePolicy,
    minify_override: Option<bool>,
}

impl Pipeline {
    pub fn new(invoker: MinifierInvoker, output_dir: impl Into<PathBuf>, policy: FailurePolicy) -> Self {
        Self {
            kind: invoker.kind(),
            inliner: ImageInliner::new(),
            invoker,
            output_dir: output_dir.into(),
            policy,
            minify_override: None,
        }
    }

    /// Force every group's `minify` flag (`--minify`).
    pub fn with_minify_override(mut self, minify: Option<bool>) -> Self {
        self.minify_override = minify;
        self
    }

    /// Process `groups` in order.
    ///
    /// Under [`FailurePolicy::Abort`] the first failure is returned and no
    /// later group is touched.
    pub fn run(&self, groups: &[Group]) -> Result<RunReport, PipelineError> {
        let label = self.kind.label();
        warn_duplicates(label, groups);

        let mut report = RunReport {
            kind: self.kind,
            written: Vec::with_capacity(groups.len()),
            failures: Vec::new(),
        };

        let progress = ProgressLine::new(&[(label, groups.len())]);

        for group in groups {
            match self.process(group) {
                Ok(written) => report.written.push(written),
                Err(err) => match self.policy {
                    FailurePolicy::Abort => {
                        drop(progress);
                        log!("error"; "[{}] group `{}` failed, remaining groups skipped", label, group.name);
                        return Err(err);
                    }
                    FailurePolicy::Continue => {
                        log!("error"; "[{}] group `{}` failed: {}", label, group.name, ErrorChain(&err));
                        report.failures.push((group.name.clone(), err));
                    }
                },
            }
            progress.inc(label);
        }

        progress.finish();
        Ok(report)
    }

    /// Assemble → inline → invoke → write for a single group.
    pub fn process(&self, group: &Group) -> Result<GroupReport, PipelineError> {
        let items = self.prepare(&group.items)?;
        let minify = self.minify_override.unwrap_or(group.minify);

        let bytes = self.invoker.invoke(&group.name, &items, minify)?;
        let output = write_output(&self.output_dir, &group.name, &bytes)?;

        log!(self.kind.label(); "{} ({} items) -> {}", group.name, items.len(), output.display());
        debug!(self.kind.label(); "{}: {} bytes, minify={}", group.name, bytes.len(), minify);

        Ok(GroupReport {
            name: group.name.clone(),
            output,
            bytes: bytes.len(),
        })
    }

    /// Style-sheet files get their images inlined; everything else passes
    /// through.
    fn prepare<'g>(&self, items: &'g [ContentItem]) -> Result<Cow<'g, [ContentItem]>, PipelineError> {
        if self.kind != AssetKind::Styles {
            return Ok(Cow::Borrowed(items));
        }

        items
            .iter()
            .map(|item| match item {
                ContentItem::FileRef { path } => Ok(ContentItem::ExternalText {
                    label: path.to_string_lossy().into_owned(),
                    text: self.inliner.inline_file(path)?,
                }),
                ContentItem::ExternalText { .. } => Ok(item.clone()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Cow::Owned)
    }
}

/// Later groups overwrite earlier ones with the same name.
fn warn_duplicates(label: &str, groups: &[Group]) {
    let mut seen = FxHashSet::default();
    for group in groups {
        if !seen.insert(group.name.as_str()) {
            log!("warning"; "[{}] duplicate group `{}`, the last one wins", label, group.name);
        }
    }
}

/// Displays an error followed by its causes, `a: b: c`.
struct ErrorChain<'a>(&'a PipelineError);

impl std::fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = std::error::Error::source(self.0);
        while let Some(cause) = source {
            write!(f, ": {cause}")?;
            source = cause.source();
        }
        Ok(())
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Where one asset type's settings live in `resopt.toml`.
struct Settings<'c> {
    groups: Option<&'c Path>,
    output: &'c Path,
    minifier: &'c MinifierConfig,
}

fn settings(config: &ProjectConfig, kind: AssetKind) -> Settings<'_> {
    match kind {
        AssetKind::Styles => Settings {
            groups: config.styles.groups.as_deref(),
            output: &config.styles.output,
            minifier: &config.styles.minifier,
        },
        AssetKind::Scripts => Settings {
            groups: config.scripts.groups.as_deref(),
            output: &config.scripts.output,
            minifier: &config.scripts.minifier,
        },
    }
}

/// Parse and assemble the groups of one asset type.
///
/// `Ok(None)` when no groups document is configured.
pub fn plan(config: &ProjectConfig, kind: AssetKind) -> Result<Option<Vec<Group>>, PipelineError> {
    let label = kind.label();
    let Some(path) = settings(config, kind).groups else {
        log!(label; "groups document is not set, skipping");
        return Ok(None);
    };

    if !path.exists() {
        return Err(ConfigError::MissingGroups {
            kind: label,
            path: path.to_path_buf(),
        }
        .into());
    }

    let doc = GroupsDocument::load(path, kind, config.get_root())?;
    debug!(label; "{} groups in {}", doc.groups.len(), config.root_relative(path).display());

    let manifest = match (kind, &config.scripts.library) {
        (AssetKind::Scripts, Some(library)) => DependencyManifest::closure(library),
        _ => DependencyManifest::empty(),
    };
    let external = ResourceDir::new(&config.styles.resources);

    Ok(Some(GroupAssembler::new(&manifest, &external).assemble(kind, &doc)))
}

/// Run one asset type end to end.
///
/// `Ok(None)` when the asset type is not configured.
pub fn optimize(config: &ProjectConfig, kind: AssetKind) -> Result<Option<RunReport>, PipelineError> {
    let Some(groups) = plan(config, kind)? else {
        return Ok(None);
    };

    let settings = settings(config, kind);
    log!(kind.label(); "optimizing {} groups", groups.len());

    let invoker = MinifierInvoker::new(kind, settings.minifier, config.get_root());
    Pipeline::new(invoker, settings.output, config.build.on_error)
        .with_minify_override(config.build.minify)
        .run(&groups)
        .map(Some)
}
