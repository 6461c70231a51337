//! Named, delimited regions inside a text body
//!
//! A region starts at a line containing the start marker, optionally followed
//! by a JSON payload (`{"name": "deps", ...}`), and ends at the next line
//! containing the end marker:
//!
//! ```text
//! # @stencil-region {"name": "deps"}
//! serde = "1"
//! # @end-stencil-region
//! ```
//!
//! Regions are recomputed on every call. Their offsets are only valid for the
//! exact string they were parsed from.

use serde_json::{Map, Value};

use crate::options::GenerationOptions;

/// Byte span of a marker line, newline included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpan {
    /// Offset of the first byte of the line
    pub start: usize,
    /// Offset just past the line terminator
    pub end: usize,
}

/// A region parsed from a text body
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Region name (empty when the marker carries none)
    pub name: String,
    /// Inline configuration from the start marker, `name` excluded
    pub config: Map<String, Value>,
    /// Text strictly between the marker lines
    pub content: String,
    /// Span of the start marker line
    pub start_tag: TagSpan,
    /// Span of the end marker line
    pub end_tag: TagSpan,
    /// Offset of the first content byte
    pub content_start: usize,
    /// Offset just past the last content byte
    pub content_end: usize,
    /// Start marker line as written, without its terminator
    pub start_line: String,
    /// End marker line as written, without its terminator
    pub end_line: String,
}

impl Region {
    /// Rebuild this region's markers around `content`
    pub fn to_block(&self, content: &str) -> String {
        let mut block = String::with_capacity(self.start_line.len() + content.len() + self.end_line.len() + 2);
        block.push_str(&self.start_line);
        block.push('\n');
        block.push_str(content);
        if !content.is_empty() && !content.ends_with('\n') {
            block.push('\n');
        }
        block.push_str(&self.end_line);
        block
    }
}

struct OpenTag {
    span: TagSpan,
    line: String,
    payload: Map<String, Value>,
}

/// Parse all regions of `text`, in order of appearance
///
/// Markers are matched left to right without nesting: an end marker closes
/// the most recently opened start marker. A start marker that is never
/// closed, or whose payload is not a JSON object, yields no region and stays
/// plain text.
pub fn parse(text: &str, options: &GenerationOptions) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut open: Option<OpenTag> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let bare = line.trim_end_matches(['\n', '\r']);

        if bare.contains(options.end_region_marker.as_str()) {
            if let Some(tag) = open.take() {
                let content_start = tag.span.end;
                let content_end = line_start;
                let mut payload = tag.payload;
                let name = match payload.remove("name") {
                    Some(Value::String(name)) => name,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                regions.push(Region {
                    name,
                    config: payload,
                    content: text[content_start..content_end].to_string(),
                    start_tag: tag.span,
                    end_tag: TagSpan {
                        start: line_start,
                        end: offset,
                    },
                    content_start,
                    content_end,
                    start_line: tag.line,
                    end_line: bare.to_string(),
                });
            }
        } else if let Some(payload) = start_marker_payload(bare, &options.start_region_marker) {
            // Re-opening abandons the previous start marker
            open = Some(OpenTag {
                span: TagSpan {
                    start: line_start,
                    end: offset,
                },
                line: bare.to_string(),
                payload,
            });
        }
    }

    regions
}

/// Payload of a start marker line, or `None` if the line is not a valid start marker
fn start_marker_payload(line: &str, marker: &str) -> Option<Map<String, Value>> {
    let position = line.find(marker)?;
    let rest = line[position + marker.len()..].trim_start();
    if !rest.starts_with('{') {
        return Some(Map::new());
    }

    let close = rest.rfind('}')?;
    match serde_json::from_str::<Value>(&rest[..=close]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Find the first region named `name`
pub fn find<'a>(regions: &'a [Region], name: &str) -> Option<&'a Region> {
    regions.iter().find(|r| r.name == name)
}

/// Replace the content of `region` in `text`, keeping its markers
///
/// `region` must have been parsed from `text`.
pub fn replace_region(text: &str, region: &Region, new_content: &str) -> String {
    let mut result = String::with_capacity(text.len() + new_content.len());
    result.push_str(&text[..region.content_start]);
    result.push_str(new_content);
    if !new_content.is_empty() && !new_content.ends_with('\n') {
        result.push('\n');
    }
    result.push_str(&text[region.content_end..]);
    result
}

/// Remove `region`, markers included, from `text`
///
/// `region` must have been parsed from `text`.
pub fn remove_region(text: &str, region: &Region) -> String {
    let mut result = String::with_capacity(text.len());
    result.push_str(&text[..region.start_tag.start]);
    result.push_str(&text[region.end_tag.end..]);
    result
}
