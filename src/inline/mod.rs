//! Image inlining for style-sheets.
//!
//! Rewrites every quoted `url("...")` / `url('...')` whose target resolves to
//! an image file into an embedded `url("data:image/...;base64,...")`.
//! Everything else, including the bytes between matches, is copied through
//! unchanged, so inlining already-inlined text is a no-op.
//!
//! ```text
//! body{background:url("x.png")}
//!   → body{background:url("data:image/png;base64,iVBORw0KGgo...")}
//! ```

mod codec;
mod resolve;

pub use codec::reencode;
pub use resolve::{ImageResolver, TolerantResolver};

use crate::{debug, error::PipelineError};
use regex::Regex;
use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// Quoted `url(...)`, with optional whitespace inside the parentheses.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\([ \t\r\n]*(?:"([^"]*)"|'([^']*)')[ \t\r\n]*\)"#).unwrap()
});

const DATA_IMAGE_PREFIX: &str = "data:image";

/// One `url(...)` occurrence found during a single inlining pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference<'a> {
    /// Byte range of the whole `url(...)` match.
    pub span: Range<usize>,
    /// Text between the quotes.
    pub raw_url: &'a str,
    /// Target file, if the reference should be inlined.
    pub resolved: Option<PathBuf>,
}

pub struct ImageInliner<R = TolerantResolver> {
    resolver: R,
}

impl ImageInliner {
    pub fn new() -> Self {
        Self::with_resolver(TolerantResolver)
    }
}

impl Default for ImageInliner {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ImageResolver> ImageInliner<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Find every `url(...)` in `source`, left to right.
    ///
    /// Data URIs and unresolvable references come back with `resolved: None`.
    pub fn references<'a>(&self, source: &'a str, source_dir: &Path) -> Vec<ImageReference<'a>> {
        URL_RE
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let raw_url = caps.get(1).or_else(|| caps.get(2))?.as_str();
                let resolved = if raw_url.starts_with(DATA_IMAGE_PREFIX) {
                    None
                } else {
                    self.resolver.resolve(source_dir, raw_url)
                };
                Some(ImageReference {
                    span: whole.range(),
                    raw_url,
                    resolved,
                })
            })
            .collect()
    }

    /// Replace resolvable image references in `source` with data URIs.
    ///
    /// Relative references are looked up from `source_dir`.
    pub fn inline(&self, source: &str, source_dir: &Path) -> Result<String, PipelineError> {
        let mut out = String::with_capacity(source.len());
        let mut last = 0;

        for reference in self.references(source, source_dir) {
            let Some(path) = reference.resolved else {
                continue;
            };

            let image = reencode(&path)?;
            debug!("inline"; "{} -> {} ({} bytes)", reference.raw_url, path.display(), image.payload.len());

            out.push_str(&source[last..reference.span.start]);
            out.push_str("url(\"");
            out.push_str(&image.data_uri());
            out.push_str("\")");
            last = reference.span.end;
        }

        out.push_str(&source[last..]);
        Ok(out)
    }

    /// Inline a style-sheet file, resolving references from its directory.
    pub fn inline_file(&self, path: &Path) -> Result<String, PipelineError> {
        let source = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        self.inline(&source, source_dir(path))
    }
}

/// Directory a style-sheet's references are relative to.
fn source_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn png_fixture(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        RgbaImage::from_pixel(1, 1, Rgba([0, 128, 255, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_text_without_urls_is_identity() {
        let dir = TempDir::new().unwrap();
        let inliner = ImageInliner::new();

        for text in [
            "",
            "body{color:red}",
            "a:hover { text-decoration: underline; }\n/* url without parens */",
            "héllo ✓ unicode stays byte-exact",
        ] {
            assert_eq!(inliner.inline(text, dir.path()).unwrap(), text);
        }
    }

    #[test]
    fn test_data_uri_untouched() {
        let dir = TempDir::new().unwrap();
        let css = r#"i{background:url("data:image/gif;base64,R0lGODlhAQABAAAAACw=")}"#;
        assert_eq!(ImageInliner::new().inline(css, dir.path()).unwrap(), css);
    }

    #[test]
    fn test_unresolved_reference_kept() {
        let dir = TempDir::new().unwrap();
        let css = "a{background:url('missing.png')} b{background:url(\"../nope/x.png\")}";
        assert_eq!(ImageInliner::new().inline(css, dir.path()).unwrap(), css);
    }

    #[test]
    fn test_unquoted_url_not_matched() {
        let dir = TempDir::new().unwrap();
        png_fixture(&dir.path().join("x.png"));
        let css = "a{background:url(x.png)}";
        assert_eq!(ImageInliner::new().inline(css, dir.path()).unwrap(), css);
    }

    #[test]
    fn test_resolved_reference_inlined() {
        let dir = TempDir::new().unwrap();
        png_fixture(&dir.path().join("img/x.png"));

        let css = "a{background:url( 'img/x.png' ) no-repeat}";
        let out = ImageInliner::new().inline(css, dir.path()).unwrap();

        let expected = reencode(&dir.path().join("img/x.png")).unwrap();
        assert_eq!(
            out,
            format!("a{{background:url(\"{}\") no-repeat}}", expected.data_uri())
        );
    }

    #[test]
    fn test_gaps_copied_verbatim() {
        let dir = TempDir::new().unwrap();
        png_fixture(&dir.path().join("x.png"));

        let css = "a{b:url(\"x.png\")}\n\tc{d:url(\"gone.png\")} e{f:url(\"x.png\")}/*end*/";
        let out = ImageInliner::new().inline(css, dir.path()).unwrap();

        let uri = reencode(&dir.path().join("x.png")).unwrap().data_uri();
        assert_eq!(
            out,
            format!("a{{b:url(\"{uri}\")}}\n\tc{{d:url(\"gone.png\")}} e{{f:url(\"{uri}\")}}/*end*/")
        );
    }

    #[test]
    fn test_inline_is_idempotent() {
        let dir = TempDir::new().unwrap();
        png_fixture(&dir.path().join("x.png"));
        let inliner = ImageInliner::new();

        let once = inliner
            .inline("a{background:url(\"x.png\")} b{background:url('y.png')}", dir.path())
            .unwrap();
        let twice = inliner.inline(&once, dir.path()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_payload_is_standard_base64_of_reencoded_png() {
        let dir = TempDir::new().unwrap();
        png_fixture(&dir.path().join("x.png"));

        let out = ImageInliner::new()
            .inline("url(\"x.png\")", dir.path())
            .unwrap();
        let payload = out
            .strip_prefix("url(\"data:image/png;base64,")
            .and_then(|s| s.strip_suffix("\")"))
            .unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_corrupt_image_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.png"), b"nope").unwrap();

        let err = ImageInliner::new()
            .inline("url(\"bad.png\")", dir.path())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Codec { .. }));
    }

    #[test]
    fn test_custom_resolver() {
        struct Never;
        impl ImageResolver for Never {
            fn resolve(&self, _: &Path, _: &str) -> Option<PathBuf> {
                None
            }
        }

        let dir = TempDir::new().unwrap();
        png_fixture(&dir.path().join("x.png"));
        let css = "url(\"x.png\")";
        assert_eq!(ImageInliner::with_resolver(Never).inline(css, dir.path()).unwrap(), css);
    }

    #[test]
    fn test_inline_file_uses_own_directory() {
        let dir = TempDir::new().unwrap();
        png_fixture(&dir.path().join("img/x.png"));
        let css_path = dir.path().join("css/a.css");
        fs::create_dir_all(css_path.parent().unwrap()).unwrap();
        fs::write(&css_path, "a{background:url(\"../img/x.png\")}").unwrap();

        let out = ImageInliner::new().inline_file(&css_path).unwrap();
        assert!(out.starts_with("a{background:url(\"data:image/png;base64,"));
    }

    #[test]
    fn test_references_report_spans() {
        let dir = TempDir::new().unwrap();
        let css = "x url(\"data:image/png;base64,AA\") y url('z.png')";
        let refs = ImageInliner::new().references(css, dir.path());

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].raw_url, "data:image/png;base64,AA");
        assert_eq!(&css[refs[1].span.clone()], "url('z.png')");
        assert!(refs.iter().all(|r| r.resolved.is_none()));
    }

    #[test]
    fn test_source_dir_of_bare_file_name() {
        assert_eq!(source_dir(Path::new("a.css")), Path::new("."));
        assert_eq!(source_dir(Path::new("css/a.css")), Path::new("css"));
        assert_eq!(source_dir(Path::new("/a.css")), Path::new("/"));
    }
}
