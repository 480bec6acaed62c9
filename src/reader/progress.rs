//! Bookkeeping for where a reader is within its stream.

use crate::error::Location;
use crate::format::Format;

/// Tracks line numbers, byte offsets, and record indices as a stream is read.
#[derive(Clone, Debug)]
pub(crate) struct Progress {
    /// The format of the stream.
    format: Format,

    /// The 1-based number of the most recently consumed line.
    line_no: usize,

    /// The byte offset of the most recently consumed line.
    line_offset: u64,

    /// The byte offset of the next unread line.
    offset: u64,

    /// The 1-based index of the most recently started record.
    record_no: usize,
}

impl Progress {
    /// Creates a new [`Progress`] at the start of a stream.
    pub(crate) fn new(format: Format) -> Self {
        Self::resume(format, 0, 0)
    }

    /// Creates a new [`Progress`] that continues counting lines and bytes
    /// from another stream's position (used when one format is embedded
    /// within another).
    pub(crate) fn resume(format: Format, line_no: usize, offset: u64) -> Self {
        Self {
            format,
            line_no,
            line_offset: offset,
            offset,
            record_no: 0,
        }
    }

    /// Records that a line spanning `len` bytes (including its line ending)
    /// was consumed.
    pub(crate) fn consume_line(&mut self, len: usize) {
        self.line_no += 1;
        self.line_offset = self.offset;
        self.offset += len as u64;
    }

    /// Records that a new record starts at the most recently consumed line
    /// and returns its location.
    pub(crate) fn next_record(&mut self) -> Location {
        self.record_no += 1;
        self.location()
    }

    /// The location of the current record at the most recently consumed line.
    pub(crate) fn location(&self) -> Location {
        Location::new(self.format, self.record_no, self.line_no, self.line_offset)
    }

    /// The 1-based number of the most recently consumed line.
    pub(crate) fn line_no(&self) -> usize {
        self.line_no
    }

    /// The byte offset of the next unread line.
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let mut progress = Progress::new(Format::Fasta);

        progress.consume_line(6);
        let location = progress.next_record();
        assert_eq!(location.record_no(), 1);
        assert_eq!(location.line_no(), 1);
        assert_eq!(location.offset(), 0);

        progress.consume_line(5);
        progress.consume_line(6);
        let location = progress.next_record();
        assert_eq!(location.record_no(), 2);
        assert_eq!(location.line_no(), 3);
        assert_eq!(location.offset(), 11);
        assert_eq!(progress.offset(), 17);
    }
}
