//! `resopt build`: optimize every selected asset type.
//!
//! Styles and scripts run independently: a failure in one is reported and the
//! other still runs. Configuration errors stop everything at once.

use crate::{
    cli::BuildArgs,
    config::ProjectConfig,
    group::AssetKind,
    log,
    pipeline::{self, RunReport},
    utils::plural::plural_count,
};
use anyhow::{Result, bail};

pub fn build(config: &ProjectConfig, args: &BuildArgs) -> Result<()> {
    let mut failed: Vec<AssetKind> = Vec::new();

    for kind in args.kinds() {
        match pipeline::optimize(config, kind) {
            Ok(None) => {}
            Ok(Some(report)) => {
                summarize(config, &report);
                if !report.is_success() {
                    failed.push(kind);
                }
            }
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                log!("error"; "{} optimization failed: {:#}", kind.label(), anyhow::Error::from(err));
                failed.push(kind);
            }
        }
    }

    if !failed.is_empty() {
        let labels: Vec<_> = failed.iter().map(|kind| kind.label()).collect();
        bail!("optimization failed for {}", labels.join(" and "));
    }
    Ok(())
}

fn summarize(config: &ProjectConfig, report: &RunReport) {
    let label = report.kind.label();
    let total: usize = report.written.iter().map(|group| group.bytes).sum();

    for group in &report.written {
        crate::debug!(label; "{} -> {}", group.name, config.root_relative(&group.output).display());
    }

    if report.is_success() {
        log!(label; "{} written, {} bytes", plural_count(report.written.len(), "group"), total);
    } else {
        let names: Vec<_> = report.failures.iter().map(|(name, _)| name.as_str()).collect();
        log!(
            label;
            "{} written, {} failed: {}",
            plural_count(report.written.len(), "group"),
            report.failures.len(),
            names.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    fn args(only: Option<AssetKind>) -> BuildArgs {
        BuildArgs {
            only,
            minify: None,
            keep_going: false,
            verbose: false,
        }
    }

    #[test]
    fn test_nothing_configured_succeeds() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("");
        config.finalize(dir.path());
        build(&config, &args(None)).unwrap();
    }

    #[test]
    fn test_config_error_is_returned() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("[styles]\ngroups = \"missing.xml\"");
        config.finalize(dir.path());

        let err = build(&config, &args(None)).unwrap_err();
        assert!(err.to_string().contains("missing.xml"));
    }

    #[cfg(unix)]
    #[test]
    fn test_style_failure_does_not_stop_scripts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "a{}").unwrap();
        fs::write(dir.path().join("a.js"), "var a;").unwrap();
        fs::write(
            dir.path().join("css.xml"),
            r#"<groups><group name="out.css"><css>/a.css</css></group></groups>"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("js.xml"),
            r#"<groups><group name="app.js" minify="false"><js>/a.js</js></group></groups>"#,
        )
        .unwrap();

        let mut config = test_parse_config(
            r#"
[styles]
groups = "css.xml"

[styles.minifier]
command = ["false"]

[scripts]
groups = "js.xml"
"#,
        );
        config.finalize(dir.path());

        let err = build(&config, &args(None)).unwrap_err();
        assert!(err.to_string().contains("styles"));
        assert!(!err.to_string().contains("scripts"));
        assert_eq!(
            fs::read_to_string(config.scripts.output.join("app.js")).unwrap(),
            "var a;"
        );
        assert!(!config.styles.output.join("out.css").exists());
    }
}
