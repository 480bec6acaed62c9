//! A reader that dispatches to the reader for a stream's format.

pub(crate) mod progress;

use std::io;
use std::io::BufRead;

use tracing::debug;

use crate::Options;
use crate::Record;
use crate::fasta;
use crate::format::Format;
use crate::format::detect;
use crate::gff3;
use crate::psl;

/// The new line character.
const NEW_LINE: u8 = b'\n';

/// The carriage return character.
const CARRIAGE_RETURN: u8 = b'\r';

/// A reader over any supported format.
///
/// Records from the underlying per-format reader are wrapped in the closed
/// [`Record`] type.
#[derive(Debug)]
pub enum Reader<T>
where
    T: BufRead,
{
    /// A GFF3 reader.
    Gff3(gff3::Reader<T>),

    /// A PSL reader.
    Psl(psl::Reader<T>),

    /// A FASTA reader.
    Fasta(fasta::Reader<T>),
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Opens a reader for a stream.
    ///
    /// An explicit `hint` wins. Otherwise, the format is determined from the
    /// extension of the `identifier` and, failing that, by peeking at the
    /// buffered content of `inner` without consuming it.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::Format;
    /// use biocoord::Options;
    /// use biocoord::Reader;
    ///
    /// let data = b"##gff-version 3\nchr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1\n";
    /// let mut reader = Reader::open("stdin", None, &data[..], Options::default())?;
    /// assert_eq!(reader.format(), Format::Gff3);
    ///
    /// for result in reader.records() {
    ///     let record = result?;
    ///     assert_eq!(record.interval().to_string(), "chr1:+:0-100");
    /// }
    ///
    /// let err = Reader::open("stdin", None, &b"hello\n"[..], Options::default()).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "unknown format: could not determine the format of `stdin`"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(
        identifier: &str,
        hint: Option<Format>,
        mut inner: T,
        options: Options,
    ) -> crate::Result<Self> {
        let content = match Format::resolve(identifier, hint) {
            Some(_) => None,
            None => Some(inner.fill_buf()?),
        };

        let sniffed = content.is_some();
        let format = detect(identifier, hint, content)?;

        match sniffed {
            true => debug!("{identifier}: sniffed format {format} from content"),
            false => debug!("{identifier}: resolved format {format} without reading content"),
        }

        Ok(match format {
            Format::Gff3 => Reader::Gff3(gff3::Reader::with_options(inner, options)),
            Format::Psl => Reader::Psl(psl::Reader::with_options(inner, options)),
            Format::Fasta => Reader::Fasta(fasta::Reader::with_options(inner, options)),
        })
    }

    /// Gets the format being read.
    pub fn format(&self) -> Format {
        match self {
            Reader::Gff3(_) => Format::Gff3,
            Reader::Psl(_) => Format::Psl,
            Reader::Fasta(_) => Format::Fasta,
        }
    }

    /// Gets the options.
    pub fn options(&self) -> &Options {
        match self {
            Reader::Gff3(reader) => reader.options(),
            Reader::Psl(reader) => reader.options(),
            Reader::Fasta(reader) => reader.options(),
        }
    }

    /// Returns an iterator over the records.
    pub fn records(&mut self) -> Records<'_, T> {
        match self {
            Reader::Gff3(reader) => Records::Gff3(reader.records()),
            Reader::Psl(reader) => Records::Psl(reader.records()),
            Reader::Fasta(reader) => Records::Fasta(reader.records()),
        }
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        match self {
            Reader::Gff3(reader) => reader.into_inner(),
            Reader::Psl(reader) => reader.into_inner(),
            Reader::Fasta(reader) => reader.into_inner(),
        }
    }
}

/// An iterator over the records of a [`Reader`].
#[derive(Debug)]
pub enum Records<'a, T>
where
    T: BufRead,
{
    /// GFF3 records.
    Gff3(gff3::reader::Records<'a, T>),

    /// PSL records.
    Psl(psl::reader::Records<'a, T>),

    /// FASTA records.
    Fasta(fasta::reader::Records<'a, T>),
}

impl<T> Iterator for Records<'_, T>
where
    T: BufRead,
{
    type Item = crate::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Records::Gff3(records) => records.next().map(|result| result.map(Record::Gff3)),
            Records::Psl(records) => records.next().map(|result| result.map(Record::Psl)),
            Records::Fasta(records) => records.next().map(|result| result.map(Record::Fasta)),
        }
    }
}

/// Reads a line from a buffered reader into `buffer`, removing the line
/// ending (`\n` or `\r\n`).
///
/// Returns the number of bytes read, including the line ending, so callers
/// can track byte offsets. Zero means the end of the stream.
pub(crate) fn read_line<T>(reader: &mut T, buffer: &mut Vec<u8>) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    match reader.read_until(NEW_LINE, buffer) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buffer.ends_with(&[NEW_LINE]) {
                buffer.pop();

                if buffer.ends_with(&[CARRIAGE_RETURN]) {
                    buffer.pop();
                }
            }

            Ok(n)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::ErrorKind;

    /// A reader that fails if any content is requested.
    #[derive(Debug)]
    struct Untouchable;

    impl Read for Untouchable {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("content was read"))
        }
    }

    impl BufRead for Untouchable {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            Err(io::Error::other("content was peeked"))
        }

        fn consume(&mut self, _: usize) {}
    }

    #[test]
    fn test_read_line() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"hello\r\nworld!";
        let mut cursor = io::Cursor::new(data);

        let mut buffer = Vec::new();
        let len = read_line(&mut cursor, &mut buffer)?;
        assert_eq!(buffer, b"hello");
        assert_eq!(len, 7);

        let len = read_line(&mut cursor, &mut buffer)?;
        assert_eq!(buffer, b"world!");
        assert_eq!(len, 6);

        assert_eq!(read_line(&mut cursor, &mut buffer)?, 0);

        Ok(())
    }

    #[test]
    fn test_extension_skips_sniffing() -> Result<(), Box<dyn std::error::Error>> {
        let reader = Reader::open("sample.psl", None, Untouchable, Options::default())?;
        assert_eq!(reader.format(), Format::Psl);

        let hint = Some(Format::Fasta);
        let reader = Reader::open("sample.psl", hint, Untouchable, Options::default())?;
        assert_eq!(reader.format(), Format::Fasta);

        Ok(())
    }

    #[test]
    fn test_sniffing_consumes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"\n>seq1 desc\nACGT\nACGT\n";
        let mut reader = Reader::open("-", None, &data[..], Options::default())?;
        assert_eq!(reader.format(), Format::Fasta);

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(records.len(), 1);
        assert!(matches!(&records[0], Record::Fasta(record) if record.sequence() == b"ACGTACGT"));

        Ok(())
    }

    #[test]
    fn test_unknown_format() {
        let err = Reader::open("notes.txt", None, &b"hello\n"[..], Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownFormat);
    }

    #[test]
    fn test_empty_fasta_is_malformed() -> Result<(), Box<dyn std::error::Error>> {
        let mut reader = Reader::open("empty.fa", None, &b""[..], Options::default())?;
        let results = reader.records().collect::<Vec<_>>();

        assert_eq!(results.len(), 1);
        assert!(results[0]
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::MalformedRecord));

        Ok(())
    }
}
