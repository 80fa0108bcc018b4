//! Output file writing.

use crate::error::PipelineError;
use std::{
    fs,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Write `bytes` to `<dir>/<name>`, replacing any previous file in one step.
///
/// The content goes to a temporary file in the same directory first, so a
/// failed write never leaves a truncated artifact behind.
pub fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, PipelineError> {
    let target = output_path(dir, name)?;
    let parent = target.parent().unwrap_or(dir);
    fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| PipelineError::io(parent, e))?;
    file.write_all(bytes)
        .map_err(|e| PipelineError::io(file.path(), e))?;
    file.persist(&target)
        .map_err(|e| PipelineError::io(&target, e.error))?;

    Ok(target)
}

/// `<dir>/<name>`, with `name` always kept inside `dir`.
///
/// A leading separator is dropped, matching how groups documents refer to
/// root-relative files. Any `..` component is rejected.
fn output_path(dir: &Path, name: &str) -> Result<PathBuf, PipelineError> {
    let relative = Path::new(name.trim_start_matches(['/', '\\']));

    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || relative.as_os_str().is_empty() {
        return Err(PipelineError::io(
            dir,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output name `{name}` does not stay inside the output directory"),
            ),
        ));
    }

    Ok(dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("target/styles");

        let path = write_output(&out, "out.css", b"a{}").unwrap();
        assert_eq!(path, out.join("out.css"));
        assert_eq!(fs::read(&path).unwrap(), b"a{}");
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        write_output(dir.path(), "out.css", b"old content that is longer").unwrap();
        write_output(dir.path(), "out.css", b"new").unwrap();

        assert_eq!(fs::read(dir.path().join("out.css")).unwrap(), b"new");
        // Only the target remains, no stray temp files
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_nested_name() {
        let dir = TempDir::new().unwrap();
        let path = write_output(dir.path(), "admin/app.js", b"x").unwrap();
        assert_eq!(path, dir.path().join("admin/app.js"));
        assert!(path.is_file());
    }

    #[test]
    fn test_leading_separator_stays_inside() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");

        let path = write_output(&out, "/x.css", b"a{}").unwrap();
        assert_eq!(path, out.join("x.css"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_name_stays_inside() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");

        let absolute = dir.path().join("elsewhere/y.css");
        let path = write_output(&out, absolute.to_str().unwrap(), b"b{}").unwrap();
        assert!(path.starts_with(&out));
        assert!(!absolute.exists());
    }

    #[test]
    fn test_parent_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");

        let err = write_output(&out, "../x.css", b"a{}").unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
        let err = write_output(&out, "css/../../x.css", b"a{}").unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
        assert!(!dir.path().join("x.css").exists());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(write_output(dir.path(), "/", b"a{}").is_err());
    }
}
