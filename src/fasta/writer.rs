//! A FASTA writer.

use std::io;
use std::io::Write;

use crate::fasta::Record;
use crate::fasta::record::HEADER_PREFIX;
use crate::options::DEFAULT_WRAP_WIDTH;

/// A FASTA writer.
///
/// Sequences are written as raw bytes, wrapped at a fixed line width.
#[derive(Debug)]
pub struct Writer<W>
where
    W: Write,
{
    /// The inner writer.
    inner: W,

    /// The maximum number of sequence characters per line (`0` disables
    /// wrapping).
    wrap_width: usize,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Creates a FASTA writer that wraps sequences at the default width.
    pub fn new(inner: W) -> Self {
        Self::with_wrap_width(inner, DEFAULT_WRAP_WIDTH)
    }

    /// Creates a FASTA writer that wraps sequences at `wrap_width`
    /// characters per line (`0` writes each sequence on a single line).
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::fasta;
    ///
    /// let record = fasta::Record::try_new("seq0", "", b"ACGTACGTAC".to_vec())?;
    ///
    /// let mut writer = fasta::Writer::with_wrap_width(Vec::new(), 4);
    /// writer.write_record(&record)?;
    ///
    /// assert_eq!(
    ///     String::from_utf8(writer.into_inner())?,
    ///     ">seq0\nACGT\nACGT\nAC\n"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_wrap_width(inner: W, wrap_width: usize) -> Self {
        Self { inner, wrap_width }
    }

    /// Writes a record.
    pub fn write_record(&mut self, record: &Record) -> io::Result<()> {
        writeln!(self.inner, "{HEADER_PREFIX}{}", record.header())?;

        for line in record.lines(self.wrap_width) {
            self.inner.write_all(line)?;
            self.inner.write_all(b"\n")?;
        }

        Ok(())
    }

    /// Consumes self and returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fasta::Reader;

    #[test]
    fn test_round_trip_with_raw_bytes() -> Result<(), Box<dyn std::error::Error>> {
        let records = vec![
            Record::try_new("seq0", "first", b"AC\xffGT".repeat(30))?,
            Record::try_new("seq1", "", Vec::new())?,
        ];

        let mut writer = Writer::with_wrap_width(Vec::new(), 0);
        for record in &records {
            writer.write_record(record)?;
        }

        let data = writer.into_inner();
        assert_eq!(data.iter().filter(|b| **b == b'\n').count(), 3);

        let mut reader = Reader::new(&data[..]);
        let actual = reader.records().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(actual, records);

        Ok(())
    }
}
