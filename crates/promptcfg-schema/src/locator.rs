//! Location of a segment inside the synthetic wrapper document.
//!
//! Fragment validation embeds the segment into a minimal full document and
//! then keeps only the errors that fall at or beneath the segment's
//! position. Both sides use [`SEGMENT_LOCATOR`], and prefix matching is done
//! on whole pointer tokens so `/blocks/0/segments/0` never matches
//! `/blocks/0/segments/01`.

use serde_json::{json, Map, Value};

use crate::settings::DEFAULT_SCHEMA_URL;

/// JSON Pointer of the embedded segment.
pub const SEGMENT_LOCATOR: &str = "/blocks/0/segments/0";

/// Config version used for the wrapper document.
pub const WRAPPER_VERSION: u64 = 3;

/// Build the wrapper document holding `segment` at [`SEGMENT_LOCATOR`].
pub fn embed_segment(segment: Map<String, Value>) -> Value {
    json!({
        "$schema": DEFAULT_SCHEMA_URL,
        "version": WRAPPER_VERSION,
        "blocks": [
            {
                "type": "prompt",
                "alignment": "left",
                "segments": [Value::Object(segment)]
            }
        ]
    })
}

/// Strip `prefix` from `path` on a token boundary.
///
/// Returns `Some("")` when `path == prefix`, `Some("/rest")` when `path` is
/// beneath it, and `None` otherwise.
pub fn relative_to<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
