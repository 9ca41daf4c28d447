/*!
 * Bundle stream framing shared by the writer and the splitter
 *
 * A stream is one marker line followed by framed records:
 *
 * ```text
 * // --------- codecat v1
 * // --------- FILE START: "util/a.go" (size: 13 bytes, modtime: 2024-01-02T03:04:05Z) ----------
 * package util
 * // --------- FILE END: "util/a.go" ----------
 * ```
 *
 * Content is not escaped. A file containing lines shaped like these markers
 * will not split back correctly.
 */

use std::time::SystemTime;

use chrono::{DateTime, Local, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;

/// First line of every non-empty bundle stream
pub const FORMAT_MARKER: &str = "// --------- codecat v1";

/// Markers of older streams that share the record format
const LEGACY_MARKERS: &[&str] = &["// --------- gocat v1"];

const START_PREFIX: &str = "// --------- FILE START: ";
const END_PREFIX: &str = "// --------- FILE END: ";
const LINE_SUFFIX: &str = " ----------";

static START_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^// --------- FILE START: "([^"]*)"(?: \(size: (\d+) bytes, modtime: ([^)]*)\))?"#)
        .expect("start line pattern is valid")
});

static END_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^// --------- FILE END: "([^"]*)""#).expect("end line pattern is valid")
});

/// Parsed start line of a framed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Display path as written by the joiner
    pub path: String,
    /// Declared content size, if present
    pub size: Option<u64>,
    /// Declared modification time, kept verbatim
    pub modtime: Option<String>,
}

/// Classification of one stream line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameLine {
    Start(RecordHeader),
    End(String),
    /// Looks like a start line but the quoted path is missing
    MalformedStart,
    Other,
}

/// RFC 3339 timestamp in local time with second precision
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn start_line(display_path: &str, size: u64, modified: SystemTime) -> String {
    format!(
        "{}\"{}\" (size: {} bytes, modtime: {}){}",
        START_PREFIX,
        display_path,
        size,
        format_timestamp(modified),
        LINE_SUFFIX
    )
}

pub fn end_line(display_path: &str) -> String {
    format!("{}\"{}\"{}", END_PREFIX, display_path, LINE_SUFFIX)
}

/// Classify a line with its terminator already stripped
pub fn classify(line: &str) -> FrameLine {
    if line.starts_with(START_PREFIX) {
        return match START_LINE.captures(line) {
            Some(caps) => FrameLine::Start(RecordHeader {
                path: caps[1].to_string(),
                size: caps.get(2).and_then(|m| m.as_str().parse().ok()),
                modtime: caps.get(3).map(|m| m.as_str().to_string()),
            }),
            None => FrameLine::MalformedStart,
        };
    }
    if line.starts_with(END_PREFIX) {
        if let Some(caps) = END_LINE.captures(line) {
            return FrameLine::End(caps[1].to_string());
        }
    }
    FrameLine::Other
}

/// Whether a first line carries the format marker
pub fn is_format_marker(line: &str) -> bool {
    std::iter::once(FORMAT_MARKER)
        .chain(LEGACY_MARKERS.iter().copied())
        .any(|marker| line.starts_with(marker))
}
