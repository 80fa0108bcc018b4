//! Support-library files prepended to every script group.

use std::path::{Path, PathBuf};

/// Closure Library sources, relative to its `goog` directory, in load order.
pub const CLOSURE_MANIFEST: &[&str] = &[
    "base.js",
    "dom/dom.js",
    "array/array.js",
    "dom/tagname.js",
    "dom/classes.js",
    "math/coordinate.js",
    "math/size.js",
    "object/object.js",
    "string/string.js",
    "useragent/useragent.js",
    "asserts/asserts.js",
    "debug/error.js",
    "net/xhrio.js",
    "debug/logger.js",
    "debug/entrypointregistry.js",
    "debug/errorhandlerweakdep.js",
    "events/eventtarget.js",
    "json/json.js",
    "net/errorcode.js",
    "net/eventtype.js",
    "net/httpstatus.js",
    "net/xmlhttp.js",
    "net/xhrmonitor.js",
    "structs/structs.js",
    "structs/map.js",
    "uri/utils.js",
    "uri/uri.js",
    "debug/logbuffer.js",
    "debug/logrecord.js",
    "disposable/disposable.js",
    "events/events.js",
    "timer/timer.js",
    "net/wrapperxmlhttpfactory.js",
    "iter/iter.js",
    "disposable/idisposable.js",
    "events/browserevent.js",
    "events/event.js",
    "events/eventwrapper.js",
    "events/pools.js",
    "net/xmlhttpfactory.js",
    "debug/debug.js",
    "structs/set.js",
    "dom/browserfeature.js",
    "reflect/reflect.js",
    "events/listener.js",
    "structs/simplepool.js",
    "useragent/jscript.js",
    "events/browserfeature.js",
    "events/eventtype.js",
    "fx/fx.js",
    "fx/dom.js",
    "fx/animation.js",
    "fx/easing.js",
    "color/color.js",
    "style/style.js",
    "color/names.js",
    "math/math.js",
    "math/box.js",
    "math/rect.js",
    "net/cookies.js",
];

/// Ordered files placed ahead of common and group files in script groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManifest {
    entries: Vec<PathBuf>,
}

impl DependencyManifest {
    pub fn empty() -> Self {
        Self::default()
    }

    /// [`CLOSURE_MANIFEST`] under `library`.
    pub fn closure(library: &Path) -> Self {
        Self::from_entries(library, CLOSURE_MANIFEST)
    }

    pub fn from_entries(library: &Path, entries: &[&str]) -> Self {
        Self {
            entries: entries.iter().map(|entry| library.join(entry)).collect(),
        }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }
}
