//! Decoding input text into a document tree, and dumping the tree for debugging

use crate::error::MeltError;
use crate::melt::render::format_general;
use crate::melt::types::DEPTH_CEILING;
use serde_json::Value;
use std::io::Read;

/// Decode a JSON document using the SIMD parser.
///
/// Nesting is checked on the raw bytes first, so an over-deep document is
/// rejected before anything recursive runs. `max_depth` is the melt depth
/// limit (capped at [`DEPTH_CEILING`]); two extra bracket levels are allowed
/// for a top-level array and the container the walk starts at.
///
/// The buffer is used as scratch space and is modified in place.
pub fn parse_document(bytes: &mut [u8], max_depth: usize) -> Result<Value, MeltError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(MeltError::EmptyDocument);
    }

    let limit = max_depth.min(DEPTH_CEILING);
    if nesting_depth(bytes) > limit + 2 {
        return Err(MeltError::DepthLimitExceeded { limit });
    }

    simd_json::serde::from_slice::<Value>(bytes).map_err(|e| MeltError::Parse(e.to_string()))
}

pub fn parse_str(text: &str, max_depth: usize) -> Result<Value, MeltError> {
    let mut bytes = text.as_bytes().to_vec();
    parse_document(&mut bytes, max_depth)
}

/// Read the whole input, then decode it
pub fn read_document<R: Read>(mut reader: R, max_depth: usize) -> Result<Value, MeltError> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;
    parse_document(&mut content, max_depth)
}

/// Deepest bracket nesting outside string literals. Malformed input is
/// left for the parser to report.
fn nesting_depth(bytes: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &b in bytes {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Indented, line-per-node dump of a document tree
pub fn render_tree(value: &Value) -> String {
    let mut out = String::new();
    render_node(value, 0, &mut out);
    out
}

fn render_node(value: &Value, indent: usize, out: &mut String) {
    let padding = "  ".repeat(indent);

    match value {
        Value::Object(map) => {
            out.push_str("OBJECT {\n");
            for (key, child) in map {
                out.push_str(&format!("{}  \"{}\": ", padding, key));
                render_node(child, indent + 1, out);
            }
            out.push_str(&format!("{}}}\n", padding));
        }
        Value::Array(items) => {
            out.push_str("ARRAY [\n");
            for (i, child) in items.iter().enumerate() {
                out.push_str(&format!("{}  [{}]: ", padding, i));
                render_node(child, indent + 1, out);
            }
            out.push_str(&format!("{}]\n", padding));
        }
        Value::String(s) => out.push_str(&format!("STRING \"{}\"\n", s)),
        Value::Number(n) => {
            let text = n.as_f64().map(format_general).unwrap_or_else(|| n.to_string());
            out.push_str(&format!("NUMBER {}\n", text));
        }
        Value::Bool(b) => out.push_str(&format!("BOOL {}\n", b)),
        Value::Null => out.push_str("NULL\n"),
    }
}
