/*!
 * Bundle stream splitter: recreates files beneath an output root
 */

use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, ResultExt};
use crate::frame::{classify, is_format_marker, FrameLine, RecordHeader};
use crate::utils::{canonicalize, normalize_path};

/// Outcome counters for one split run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    /// Display paths of files written, in stream order
    pub written: Vec<String>,
    /// Bytes written across all files
    pub bytes: u64,
    /// Records refused because their path leaves the output root
    pub rejected: usize,
    /// Records dropped after a mismatched end line or a write failure
    pub discarded: usize,
    /// Records still open at end of input
    pub unterminated: usize,
}

/// A record whose start line has been seen
struct OpenRecord {
    display: String,
    dest: PathBuf,
    out: BufWriter<File>,
    declared_size: Option<u64>,
    written: u64,
    last_byte: Option<u8>,
}

impl OpenRecord {
    fn append(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.out.write_all(line)?;
        self.written += line.len() as u64;
        if let Some(&last) = line.last() {
            self.last_byte = Some(last);
        }
        Ok(())
    }

    /// Flush and close, dropping the separator newline the joiner inserts
    /// after content that lacks a trailing newline
    fn close(self) -> std::io::Result<u64> {
        let file = self.out.into_inner().map_err(|e| e.into_error())?;
        match self.declared_size {
            Some(size) if self.written == size + 1 && self.last_byte == Some(b'\n') => {
                file.set_len(size)?;
                Ok(size)
            }
            Some(size) if self.written != size => {
                warn!(
                    path = %self.display,
                    declared = size,
                    written = self.written,
                    "size differs from record header"
                );
                Ok(self.written)
            }
            _ => Ok(self.written),
        }
    }
}

enum State {
    Idle,
    InFile(OpenRecord),
}

/// Splits bundle streams into files under one output root
pub struct Splitter {
    output_root: PathBuf,
}

impl Splitter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Recreate every record of `input`
    ///
    /// Fails before touching the filesystem when the format marker is
    /// missing. Bad records are logged and skipped.
    pub fn split<R: BufRead>(&self, mut input: R) -> Result<SplitSummary> {
        let mut line = Vec::new();
        if input.read_until(b'\n', &mut line)? == 0 {
            crate::bail!(InvalidStream, "input is empty, missing format marker");
        }
        let first = String::from_utf8_lossy(strip_terminator(&line)).to_string();
        crate::ensure!(
            is_format_marker(&first),
            InvalidStream,
            "invalid format marker: {}",
            first
        );

        fs::create_dir_all(&self.output_root)
            .with_context(|| format!("creating {}", self.output_root.display()))?;
        let root = canonicalize(&self.output_root)?;

        let mut summary = SplitSummary::default();
        let mut state = State::Idle;

        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            let frame = std::str::from_utf8(strip_terminator(&line))
                .map(classify)
                .unwrap_or(FrameLine::Other);

            state = match (state, frame) {
                (State::Idle, FrameLine::Start(header)) => {
                    match open_record(&root, header, &mut summary) {
                        Some(record) => State::InFile(record),
                        None => State::Idle,
                    }
                }
                (State::Idle, FrameLine::MalformedStart) => {
                    warn!(line = %String::from_utf8_lossy(strip_terminator(&line)), "invalid start line");
                    State::Idle
                }
                (State::Idle, _) => State::Idle,
                (State::InFile(record), FrameLine::End(path)) if path == record.display => {
                    finish_record(record, &mut summary);
                    State::Idle
                }
                (State::InFile(record), FrameLine::End(path)) => {
                    warn!(
                        expected = %record.display,
                        found = %path,
                        "end line does not match open record; discarding"
                    );
                    discard_record(record, &mut summary);
                    State::Idle
                }
                (State::InFile(mut record), _) => match record.append(&line) {
                    Ok(()) => State::InFile(record),
                    Err(e) => {
                        warn!(path = %record.dest.display(), error = %e, "write failed; discarding");
                        discard_record(record, &mut summary);
                        State::Idle
                    }
                },
            };
        }

        if let State::InFile(record) = state {
            warn!(path = %record.display, "record not terminated before end of input");
            summary.unterminated += 1;
            finish_record(record, &mut summary);
        }

        info!(
            files = summary.written.len(),
            rejected = summary.rejected,
            discarded = summary.discarded,
            "split complete"
        );
        Ok(summary)
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Destination of `display` under `root`, or `None` if it would escape
pub fn resolve_destination(root: &Path, display: &str) -> Option<PathBuf> {
    let rel = Path::new(display);
    if display.is_empty() || rel.is_absolute() || rel.has_root() {
        return None;
    }
    let joined = normalize_path(&root.join(rel));
    if joined.starts_with(root) && joined != root {
        Some(joined)
    } else {
        None
    }
}

/// Nearest existing ancestor of `path`, symlinks resolved
fn existing_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|p| p.exists())
        .and_then(|p| canonicalize(p).ok())
}

fn open_record(root: &Path, header: RecordHeader, summary: &mut SplitSummary) -> Option<OpenRecord> {
    let Some(dest) = resolve_destination(root, &header.path) else {
        warn!(path = %header.path, "path escapes output root; skipping record");
        summary.rejected += 1;
        return None;
    };
    let parent = dest.parent().unwrap_or(root);

    // Symlinked directories must not lead outside the root
    if !existing_ancestor(parent).is_some_and(|p| p.starts_with(root)) {
        warn!(path = %header.path, "parent directory leaves output root; skipping record");
        summary.rejected += 1;
        return None;
    }
    if let Err(e) = fs::create_dir_all(parent) {
        warn!(path = %parent.display(), error = %e, "cannot create directories");
        summary.discarded += 1;
        return None;
    }
    if !canonicalize(parent).is_ok_and(|p| p.starts_with(root)) {
        warn!(path = %header.path, "parent directory leaves output root; skipping record");
        summary.rejected += 1;
        return None;
    }
    if fs::symlink_metadata(&dest).is_ok_and(|m| m.file_type().is_symlink()) {
        warn!(path = %header.path, "destination is a symlink; skipping record");
        summary.rejected += 1;
        return None;
    }

    match File::create(&dest) {
        Ok(file) => {
            debug!(path = %header.path, "writing");
            Some(OpenRecord {
                display: header.path,
                dest,
                out: BufWriter::new(file),
                declared_size: header.size,
                written: 0,
                last_byte: None,
            })
        }
        Err(e) => {
            warn!(path = %dest.display(), error = %e, "cannot create file");
            summary.discarded += 1;
            None
        }
    }
}

fn finish_record(record: OpenRecord, summary: &mut SplitSummary) {
    let display = record.display.clone();
    let dest = record.dest.clone();
    match record.close() {
        Ok(bytes) => {
            summary.bytes += bytes;
            summary.written.push(display);
        }
        Err(e) => {
            warn!(path = %dest.display(), error = %e, "cannot finish file");
            summary.discarded += 1;
        }
    }
}

fn discard_record(record: OpenRecord, summary: &mut SplitSummary) {
    let dest = record.dest.clone();
    drop(record);
    if let Err(e) = fs::remove_file(&dest) {
        warn!(path = %dest.display(), error = %e, "cannot remove partial file");
    }
    summary.discarded += 1;
}
