/*!
 * Bundle stream writer
 */

use std::io::{self, Write};
use std::time::SystemTime;

use crate::frame::{end_line, start_line, FORMAT_MARKER};
use crate::types::SourceFile;

/// Serializes framed records into an output sink
///
/// The format marker is written lazily before the first record, so a run
/// that emits nothing produces no output at all.
pub struct StreamWriter<W: Write> {
    out: W,
    marker_written: bool,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            marker_written: false,
        }
    }

    /// Write one framed record
    ///
    /// Content is copied verbatim. If it does not end with a newline, one is
    /// inserted before the end line; the declared size stays the content size.
    pub fn write_record(
        &mut self,
        display_path: &str,
        size: u64,
        modified: SystemTime,
        content: &[u8],
    ) -> io::Result<()> {
        if !self.marker_written {
            writeln!(self.out, "{}", FORMAT_MARKER)?;
            self.marker_written = true;
        }

        writeln!(self.out, "{}", start_line(display_path, size, modified))?;
        self.out.write_all(content)?;
        if !content.is_empty() && !content.ends_with(b"\n") {
            self.out.write_all(b"\n")?;
        }
        writeln!(self.out, "{}", end_line(display_path))
    }

    /// Write a record for a loaded source file
    pub fn write_file(&mut self, file: &SourceFile) -> io::Result<()> {
        self.write_record(
            &file.display_path,
            file.metadata.size,
            file.metadata.modified,
            &file.content,
        )
    }

    /// Flush and hand back the sink
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
