//! `resopt list`: print the assembled groups without building them.
//!
//! ```json
//! {
//!   "styles": [
//!     { "name": "out.css", "minify": false, "items": [
//!       { "kind": "external_text", "label": "/bootstrap/reset.css" },
//!       { "kind": "file_ref", "path": "/project/css/a.css" }
//!     ]}
//!   ]
//! }
//! ```

use crate::{cli::ListArgs, config::ProjectConfig, log, pipeline::plan};
use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::{fs, io::Write};

pub fn list(config: &ProjectConfig, args: &ListArgs) -> Result<()> {
    let json = collect(config, args)?;

    let formatted = if args.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };

    // Output to file or stdout
    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        writeln!(file, "{}", formatted)?;
        log!("list"; "wrote output to {}", output_path.display());
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

/// One key per configured asset type, in processing order.
fn collect(config: &ProjectConfig, args: &ListArgs) -> Result<JsonValue> {
    let mut out = Map::new();
    for kind in args.kinds() {
        if let Some(groups) = plan(config, kind)? {
            out.insert(kind.label().to_owned(), serde_json::to_value(&groups)?);
        }
    }
    Ok(JsonValue::Object(out))
}
