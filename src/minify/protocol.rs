//! Command-line conventions of the external minifiers.
//!
//! ```text
//! styles:  <command…> a.css b.css -o out.css
//! scripts: <command…> --js a.js --js b.js --manage_closure_dependencies \
//!          --compilation_level ADVANCED_OPTIMIZATIONS --js_output_file out.js
//! ```

use crate::group::AssetKind;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    /// Flag placed before every input, if any.
    pub input_flag: Option<&'static str>,
    /// Fixed flags after the inputs.
    pub flags: &'static [&'static str],
    /// Flag introducing the optimization level; `None` drops the level.
    pub level_flag: Option<&'static str>,
    pub output_flag: &'static str,
}

impl Protocol {
    pub const STYLES: Self = Self {
        input_flag: None,
        flags: &[],
        level_flag: None,
        output_flag: "-o",
    };

    pub const SCRIPTS: Self = Self {
        input_flag: Some("--js"),
        flags: &["--manage_closure_dependencies"],
        level_flag: Some("--compilation_level"),
        output_flag: "--js_output_file",
    };

    pub const fn for_kind(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Styles => Self::STYLES,
            AssetKind::Scripts => Self::SCRIPTS,
        }
    }

    /// Arguments appended after the configured command.
    pub fn arguments(&self, inputs: &[PathBuf], level: &str, output: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(inputs.len() * 2 + self.flags.len() + 4);

        for input in inputs {
            if let Some(flag) = self.input_flag {
                args.push(flag.into());
            }
            args.push(input.as_os_str().to_owned());
        }

        args.extend(self.flags.iter().map(OsString::from));

        if let Some(flag) = self.level_flag {
            args.push(flag.into());
            args.push(level.into());
        }

        args.push(self.output_flag.into());
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_styles_arguments() {
        let inputs = vec![PathBuf::from("/t/0.css"), PathBuf::from("/t/1.css")];
        let args = Protocol::STYLES.arguments(&inputs, "IGNORED", Path::new("/t/out.css"));
        assert_eq!(strings(args), vec!["/t/0.css", "/t/1.css", "-o", "/t/out.css"]);
    }

    #[test]
    fn test_scripts_arguments() {
        let inputs = vec![PathBuf::from("base.js"), PathBuf::from("app.js")];
        let args = Protocol::SCRIPTS.arguments(&inputs, "ADVANCED_OPTIMIZATIONS", Path::new("out.js"));
        assert_eq!(
            strings(args),
            vec![
                "--js",
                "base.js",
                "--js",
                "app.js",
                "--manage_closure_dependencies",
                "--compilation_level",
                "ADVANCED_OPTIMIZATIONS",
                "--js_output_file",
                "out.js",
            ]
        );
    }

    #[test]
    fn test_for_kind() {
        assert_eq!(Protocol::for_kind(AssetKind::Styles), Protocol::STYLES);
        assert_eq!(Protocol::for_kind(AssetKind::Scripts), Protocol::SCRIPTS);
    }
}
