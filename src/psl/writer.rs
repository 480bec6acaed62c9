//! A PSL writer.

use std::io;
use std::io::Write;

use crate::psl::Record;

/// The `psLayout` header, as written by `blat` without `-noHead`.
pub const HEADER: &str = "psLayout version 3\n\
\n\
match\tmis- \trep. \tN's\tQ gap\tQ gap\tT gap\tT gap\tstrand\tQ        \tQ   \tQ    \tQ  \tT        \tT   \tT    \tT  \tblock\tblockSizes \tqStarts\t tStarts\n\
\x20    \tmatch\tmatch\t   \tcount\tbases\tcount\tbases\t      \tname     \tsize\tstart\tend\tname     \tsize\tstart\tend\tcount\n\
---------------------------------------------------------------------------------------------------------------------------------------------------------------\n";

/// A PSL writer.
#[derive(Debug)]
pub struct Writer<W>
where
    W: Write,
{
    /// The inner writer.
    inner: W,

    /// Whether the header still needs to be written.
    header_pending: bool,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Creates a PSL writer that writes records only.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            header_pending: false,
        }
    }

    /// Creates a PSL writer that writes the `psLayout` header before the
    /// first record.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::psl;
    ///
    /// let line = "10\t0\t0\t0\t0\t0\t0\t0\t+\tq\t10\t0\t10\tt\t20\t5\t15\t1\t10,\t0,\t5,";
    /// let record = line.parse::<psl::Record>()?;
    ///
    /// let mut writer = psl::Writer::with_header(Vec::new());
    /// writer.write_record(&record)?;
    ///
    /// let output = String::from_utf8(writer.into_inner())?;
    /// assert!(output.starts_with("psLayout version 3\n"));
    ///
    /// // The header is skipped when the output is read back.
    /// let mut reader = psl::Reader::new(output.as_bytes());
    /// assert_eq!(reader.records().next().transpose()?, Some(record));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_header(inner: W) -> Self {
        Self {
            inner,
            header_pending: true,
        }
    }

    /// Writes a record.
    pub fn write_record(&mut self, record: &Record) -> io::Result<()> {
        if self.header_pending {
            self.inner.write_all(HEADER.as_bytes())?;
            self.header_pending = false;
        }

        writeln!(self.inner, "{record}")
    }

    /// Consumes self and returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_only() -> Result<(), Box<dyn std::error::Error>> {
        let line = "10\t0\t0\t0\t0\t0\t0\t0\t+\tq\t10\t0\t10\tt\t20\t5\t15\t1\t10,\t0,\t5,";

        let mut writer = Writer::new(Vec::new());
        writer.write_record(&line.parse()?)?;
        writer.write_record(&line.parse()?)?;

        assert_eq!(
            String::from_utf8(writer.into_inner())?,
            format!("{line}\n{line}\n")
        );

        Ok(())
    }
}
