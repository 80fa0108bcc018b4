//! Groups document parsing.
//!
//! Two formats, picked by file extension:
//!
//! ```xml
//! <groups>
//!   <common><js>/js/common.js</js></common>
//!   <group name="out.css" minify="false">
//!     <external-css>/bootstrap/reset.css</external-css>
//!     <css>/css/a.css</css>
//!   </group>
//! </groups>
//! ```
//!
//! ```toml
//! common = ["/js/common.js"]
//!
//! [[group]]
//! name = "out.css"
//! minify = false
//! external = ["/bootstrap/reset.css"]
//! files = ["/css/a.css"]
//! ```
//!
//! Local entries are joined onto the project root; existence is checked later
//! by the assembler.

use super::AssetKind;
use crate::{config::ConfigError, utils::path::root_relative};
use quick_xml::{Reader, events::BytesStart, events::Event};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// One `<group>` as written, before existence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub minify: bool,
    /// Bundled resource references (styles only).
    pub external: Vec<String>,
    pub files: Vec<PathBuf>,
}

/// A parsed groups document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupsDocument {
    /// Files shared by every script group.
    pub common: Vec<PathBuf>,
    pub groups: Vec<GroupSpec>,
}

impl GroupsDocument {
    /// Read and parse `path`, resolving local entries against `root`.
    pub fn load(path: &Path, kind: AssetKind, root: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content, root),
            _ => Self::from_xml(&content, kind, root),
        };

        parsed.map_err(|message| ConfigError::Groups {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(content: &str, root: &Path) -> Result<Self, String> {
        let raw: RawDocument = toml::from_str(content).map_err(|e| e.to_string())?;

        let groups = raw
            .groups
            .into_iter()
            .map(|group| {
                let name = required_name(Some(group.name))?;
                Ok(GroupSpec {
                    name,
                    minify: group.minify.unwrap_or(true),
                    external: group.external.into_iter().map(|e| e.trim().to_owned()).collect(),
                    files: group.files.iter().map(|f| root_relative(root, f)).collect(),
                })
            })
            .collect::<Result<_, String>>()?;

        Ok(Self {
            common: raw.common.iter().map(|f| root_relative(root, f)).collect(),
            groups,
        })
    }

    pub fn from_xml(content: &str, kind: AssetKind, root: &Path) -> Result<Self, String> {
        let tags = Tags::for_kind(kind);
        let mut reader = Reader::from_str(content);

        let mut doc = Self::default();
        let mut seen_groups = false;
        let mut groups_depth = 0usize;
        let mut in_common = false;
        let mut current: Option<GroupSpec> = None;
        let mut capture: Option<(Slot, String)> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("error at position {}: {e}", reader.error_position()))?;

            match event {
                Event::Start(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if name == b"groups" {
                        seen_groups = true;
                        groups_depth += 1;
                        continue;
                    }
                    if groups_depth == 0 {
                        continue;
                    }
                    match name {
                        b"group" => current = Some(start_group(&e)?),
                        b"common" => in_common = true,
                        _ => {
                            if let Some(slot) = tags.slot(name, current.is_some(), in_common) {
                                capture = Some((slot, String::new()));
                            }
                        }
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    if name.as_ref() == b"groups" {
                        seen_groups = true;
                    } else if groups_depth > 0 && name.as_ref() == b"group" {
                        doc.groups.push(start_group(&e)?);
                    }
                }
                Event::Text(t) => {
                    if let Some((_, buf)) = capture.as_mut() {
                        buf.push_str(&t.decode().map_err(|e| e.to_string())?);
                    }
                }
                Event::CData(t) => {
                    if let Some((_, buf)) = capture.as_mut() {
                        buf.push_str(&t.decode().map_err(|e| e.to_string())?);
                    }
                }
                Event::GeneralRef(r) => {
                    if let Some((_, buf)) = capture.as_mut() {
                        if let Some(ch) = r.resolve_char_ref().map_err(|e| e.to_string())? {
                            buf.push(ch);
                        } else {
                            let entity = r.decode().map_err(|e| e.to_string())?;
                            let resolved = quick_xml::escape::resolve_predefined_entity(&entity)
                                .ok_or_else(|| format!("unknown entity `&{entity};`"))?;
                            buf.push_str(resolved);
                        }
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"groups" => groups_depth = groups_depth.saturating_sub(1),
                    b"group" => {
                        if let Some(group) = current.take() {
                            doc.groups.push(group);
                        }
                    }
                    b"common" => in_common = false,
                    name => {
                        let closes_capture = capture
                            .as_ref()
                            .is_some_and(|(slot, _)| tags.tag(*slot) == name);
                        if closes_capture && let Some((slot, text)) = capture.take() {
                            doc.store(slot, text.trim(), current.as_mut(), root);
                        }
                    }
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_groups {
            return Err("missing <groups> root element".into());
        }
        Ok(doc)
    }

    fn store(&mut self, slot: Slot, text: &str, group: Option<&mut GroupSpec>, root: &Path) {
        if text.is_empty() {
            return;
        }
        match (slot, group) {
            (Slot::Common, _) => self.common.push(root_relative(root, text)),
            (Slot::External, Some(group)) => group.external.push(text.to_owned()),
            (Slot::File, Some(group)) => group.files.push(root_relative(root, text)),
            (_, None) => {}
        }
    }
}

// ============================================================================
// XML helpers
// ============================================================================

/// Where captured element text ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    External,
    File,
    Common,
}

/// Element names read for one asset type.
struct Tags {
    external: Option<&'static [u8]>,
    file: &'static [u8],
    has_common: bool,
}

impl Tags {
    fn for_kind(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Styles => Self {
                external: Some(b"external-css"),
                file: b"css",
                has_common: false,
            },
            AssetKind::Scripts => Self {
                external: None,
                file: b"js",
                has_common: true,
            },
        }
    }

    fn slot(&self, name: &[u8], in_group: bool, in_common: bool) -> Option<Slot> {
        if in_group {
            if self.external == Some(name) {
                return Some(Slot::External);
            }
            if self.file == name {
                return Some(Slot::File);
            }
        } else if in_common && self.has_common && self.file == name {
            return Some(Slot::Common);
        }
        None
    }

    fn tag(&self, slot: Slot) -> &'static [u8] {
        match slot {
            Slot::External => self.external.unwrap_or(b"external-css"),
            Slot::File | Slot::Common => self.file,
        }
    }
}

fn start_group(e: &BytesStart<'_>) -> Result<GroupSpec, String> {
    let name = attribute(e, "name")?;
    let minify = attribute(e, "minify")?;

    Ok(GroupSpec {
        name: required_name(name)?,
        minify: parse_minify(minify.as_deref()),
        external: Vec::new(),
        files: Vec::new(),
    })
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, String> {
    let Some(attr) = e.try_get_attribute(key).map_err(|e| e.to_string())? else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(|e| e.to_string())?;
    Ok(Some(value.into_owned()))
}

/// Absent or empty means `true`; otherwise only a case-insensitive `true`
/// enables minification.
fn parse_minify(value: Option<&str>) -> bool {
    match value {
        None | Some("") => true,
        Some(v) => v.eq_ignore_ascii_case("true"),
    }
}

fn required_name(name: Option<String>) -> Result<String, String> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name.trim().to_owned()),
        _ => Err("every group needs a non-empty `name`".into()),
    }
}

// ============================================================================
// TOML layout
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    common: Vec<String>,
    #[serde(default, rename = "group")]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    name: String,
    minify: Option<bool>,
    #[serde(default)]
    external: Vec<String>,
    #[serde(default)]
    files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ROOT: &str = "/project";

    fn root() -> &'static Path {
        Path::new(ROOT)
    }

    #[test]
    fn test_style_xml() {
        let xml = r#"<?xml version="1.0"?>
<groups>
    <group name="out.css" minify="false">
        <external-css>/bootstrap/reset.css</external-css>
        <css>/css/a.css</css>
        <css>
            css/b.css
        </css>
    </group>
    <group name="second.css">
        <css>/css/c.css</css>
    </group>
</groups>"#;

        let doc = GroupsDocument::from_xml(xml, AssetKind::Styles, root()).unwrap();
        assert_eq!(doc.groups.len(), 2);

        let first = &doc.groups[0];
        assert_eq!(first.name, "out.css");
        assert!(!first.minify);
        assert_eq!(first.external, vec!["/bootstrap/reset.css"]);
        assert_eq!(
            first.files,
            vec![PathBuf::from("/project/css/a.css"), PathBuf::from("/project/css/b.css")]
        );

        assert!(doc.groups[1].minify);
        assert!(doc.common.is_empty());
    }

    #[test]
    fn test_script_xml_with_common() {
        let xml = r#"<groups>
    <common>
        <js>/js/common.js</js>
        <js>/js/util.js</js>
    </common>
    <group name="app.js">
        <js>/js/app.js</js>
    </group>
</groups>"#;

        let doc = GroupsDocument::from_xml(xml, AssetKind::Scripts, root()).unwrap();
        assert_eq!(
            doc.common,
            vec![PathBuf::from("/project/js/common.js"), PathBuf::from("/project/js/util.js")]
        );
        assert_eq!(doc.groups[0].files, vec![PathBuf::from("/project/js/app.js")]);
        assert!(doc.groups[0].external.is_empty());
    }

    #[test]
    fn test_style_tags_ignored_for_scripts() {
        let xml = r#"<groups><group name="app.js"><css>/a.css</css><js>/a.js</js></group></groups>"#;
        let doc = GroupsDocument::from_xml(xml, AssetKind::Scripts, root()).unwrap();
        assert_eq!(doc.groups[0].files, vec![PathBuf::from("/project/a.js")]);
    }

    #[test]
    fn test_minify_attribute_semantics() {
        assert!(parse_minify(None));
        assert!(parse_minify(Some("")));
        assert!(parse_minify(Some("true")));
        assert!(parse_minify(Some("TRUE")));
        assert!(!parse_minify(Some("false")));
        assert!(!parse_minify(Some("yes")));
    }

    #[test]
    fn test_entities_in_text_and_attributes() {
        let xml = r#"<groups><group name="a&amp;b.css"><css>/css/x&amp;y.css</css><css>/css/&#x7A;.css</css></group></groups>"#;
        let doc = GroupsDocument::from_xml(xml, AssetKind::Styles, root()).unwrap();
        assert_eq!(doc.groups[0].name, "a&b.css");
        assert_eq!(
            doc.groups[0].files,
            vec![PathBuf::from("/project/css/x&y.css"), PathBuf::from("/project/css/z.css")]
        );
    }

    #[test]
    fn test_empty_group_element() {
        let xml = r#"<groups><group name="empty.css" minify="false"/></groups>"#;
        let doc = GroupsDocument::from_xml(xml, AssetKind::Styles, root()).unwrap();
        assert_eq!(doc.groups.len(), 1);
        assert!(doc.groups[0].files.is_empty());
    }

    #[test]
    fn test_missing_groups_root() {
        let err = GroupsDocument::from_xml("<config/>", AssetKind::Styles, root()).unwrap_err();
        assert!(err.contains("<groups>"));
    }

    #[test]
    fn test_missing_group_name() {
        let xml = r#"<groups><group><css>/a.css</css></group></groups>"#;
        assert!(GroupsDocument::from_xml(xml, AssetKind::Styles, root()).is_err());
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<groups><group name="a.css"></css></groups>"#;
        assert!(GroupsDocument::from_xml(xml, AssetKind::Styles, root()).is_err());
    }

    #[test]
    fn test_toml_document() {
        let toml = r#"
common = ["/js/common.js"]

[[group]]
name = "out.css"
minify = false
external = ["/bootstrap/reset.css"]
files = ["/css/a.css"]

[[group]]
name = "plain.css"
"#;
        let doc = GroupsDocument::from_toml(toml, root()).unwrap();
        assert_eq!(doc.common, vec![PathBuf::from("/project/js/common.js")]);
        assert_eq!(doc.groups.len(), 2);
        assert!(!doc.groups[0].minify);
        assert_eq!(doc.groups[0].files, vec![PathBuf::from("/project/css/a.css")]);
        assert!(doc.groups[1].minify);
    }

    #[test]
    fn test_toml_unknown_field_rejected() {
        let toml = "[[group]]\nname = \"a.css\"\nminfy = false\n";
        assert!(GroupsDocument::from_toml(toml, root()).is_err());
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = TempDir::new().unwrap();
        let xml = dir.path().join("css-config.xml");
        let toml = dir.path().join("css-config.toml");
        fs::write(&xml, r#"<groups><group name="x.css"/></groups>"#).unwrap();
        fs::write(&toml, "[[group]]\nname = \"y.css\"\n").unwrap();

        let from_xml = GroupsDocument::load(&xml, AssetKind::Styles, dir.path()).unwrap();
        let from_toml = GroupsDocument::load(&toml, AssetKind::Styles, dir.path()).unwrap();
        assert_eq!(from_xml.groups[0].name, "x.css");
        assert_eq!(from_toml.groups[0].name, "y.css");
    }

    #[test]
    fn test_load_error_names_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xml");
        fs::write(&path, "<groups><group>").unwrap();

        let err = GroupsDocument::load(&path, AssetKind::Styles, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Groups { .. }));
        assert!(err.to_string().contains("broken.xml"));
    }
}
