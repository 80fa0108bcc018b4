//! Turning a group's ordered items into output bytes.
//!
//! With `minify` off the items are concatenated as-is. With it on they go to
//! either an external minifier subprocess or the built-in backend:
//!
//! ```text
//! items ──materialize──▶ TempDir/{000-input.css, …} + FileRefs
//!       ──Cmd──▶ <command…> <protocol args> ──▶ TempDir/output.css ──▶ bytes
//! ```
//!
//! The temporary directory belongs to one call and is removed when it ends,
//! whether the minifier succeeded or not.

mod builtin;
mod protocol;

use builtin::minify_by_kind;
pub use protocol::Protocol;

use crate::{
    config::MinifierConfig,
    error::PipelineError,
    group::{AssetKind, ContentItem},
    utils::exec::{Cmd, EMPTY_FILTER, ExecError, FilterRule, SILENT_FILTER},
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// A configured external minifier.
#[derive(Debug, Clone)]
pub struct ExternalMinifier {
    pub command: Vec<String>,
    pub level: String,
    pub protocol: Protocol,
    pub quiet: bool,
    pub cwd: Option<PathBuf>,
}

impl ExternalMinifier {
    fn filter(&self) -> &'static FilterRule {
        if self.quiet { &SILENT_FILTER } else { &EMPTY_FILTER }
    }
}

#[derive(Debug, Clone)]
pub enum Backend {
    /// lightningcss / oxc, in-process.
    Builtin,
    External(ExternalMinifier),
}

pub struct MinifierInvoker {
    kind: AssetKind,
    backend: Backend,
}

impl MinifierInvoker {
    /// Pick the backend from the `[*.minifier]` table.
    pub fn new(kind: AssetKind, config: &MinifierConfig, root: &Path) -> Self {
        let backend = if config.is_external() {
            Backend::External(ExternalMinifier {
                command: config.command.clone(),
                level: config.level.clone(),
                protocol: Protocol::for_kind(kind),
                quiet: config.quiet,
                cwd: Some(root.to_path_buf()),
            })
        } else {
            Backend::Builtin
        };
        Self::with_backend(kind, backend)
    }

    pub fn with_backend(kind: AssetKind, backend: Backend) -> Self {
        Self { kind, backend }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Produce the output bytes of group `group` from `items`.
    pub fn invoke(&self, group: &str, items: &[ContentItem], minify: bool) -> Result<Vec<u8>, PipelineError> {
        if !minify {
            return concat(items);
        }

        match &self.backend {
            Backend::Builtin => self.invoke_builtin(group, items),
            Backend::External(external) => self.invoke_external(group, items, external),
        }
    }

    fn invoke_builtin(&self, group: &str, items: &[ContentItem]) -> Result<Vec<u8>, PipelineError> {
        let merged = concat(items)?;
        let source = String::from_utf8(merged).map_err(|e| PipelineError::Unexpected {
            context: format!("group `{group}` is not valid UTF-8"),
            source: Box::new(e),
        })?;

        minify_by_kind(self.kind, &source)
            .map(String::into_bytes)
            .map_err(|detail| PipelineError::Minifier {
                group: group.to_owned(),
                status: None,
                detail,
            })
    }

    fn invoke_external(
        &self,
        group: &str,
        items: &[ContentItem],
        external: &ExternalMinifier,
    ) -> Result<Vec<u8>, PipelineError> {
        let workdir = tempfile::Builder::new()
            .prefix("resopt-")
            .tempdir()
            .map_err(|e| PipelineError::io(std::env::temp_dir(), e))?;

        let inputs = materialize(&workdir, self.extension(), items)?;
        let output = workdir.path().join(format!("output.{}", self.extension()));
        let args = external.protocol.arguments(&inputs, &external.level, &output);

        let mut cmd = Cmd::from_slice(external.command.as_slice())
            .args(args)
            .filter(external.filter());
        if let Some(cwd) = &external.cwd {
            cmd = cmd.cwd(cwd);
        }

        cmd.run().map_err(|err| minifier_failure(group, err))?;

        match fs::read(&output) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PipelineError::Minifier {
                group: group.to_owned(),
                status: Some(0),
                detail: "minifier exited successfully but wrote no output file".into(),
            }),
            Err(e) => Err(PipelineError::io(output, e)),
        }
    }

    fn extension(&self) -> &'static str {
        match self.kind {
            AssetKind::Styles => "css",
            AssetKind::Scripts => "js",
        }
    }
}

/// Join every item's bytes in order, no separators.
fn concat(items: &[ContentItem]) -> Result<Vec<u8>, PipelineError> {
    let mut out = Vec::new();
    for item in items {
        out.extend_from_slice(&item.read()?);
    }
    Ok(out)
}

/// Give every item a readable path; in-memory text goes into `dir`.
fn materialize(dir: &TempDir, ext: &str, items: &[ContentItem]) -> Result<Vec<PathBuf>, PipelineError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            ContentItem::FileRef { path } => Ok(path.clone()),
            ContentItem::ExternalText { text, .. } => {
                let path = dir.path().join(format!("{index:03}-input.{ext}"));
                fs::write(&path, text).map_err(|e| PipelineError::io(&path, e))?;
                Ok(path)
            }
        })
        .collect()
}

fn minifier_failure(group: &str, err: ExecError) -> PipelineError {
    match err {
        ExecError::Status { code, message } => PipelineError::Minifier {
            group: group.to_owned(),
            status: code,
            detail: message,
        },
        ExecError::Spawn { program, source } => PipelineError::Minifier {
            group: group.to_owned(),
            status: None,
            detail: format!("failed to execute `{program}`: {source}"),
        },
    }
}
