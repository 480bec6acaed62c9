//! A FASTA reader.

use std::io::BufRead;

use tracing::trace;
use tracing::warn;

use crate::Error;
use crate::Options;
use crate::error::Fault;
use crate::error::Location;
use crate::error::Malformed;
use crate::fasta::Record;
use crate::fasta::record::HEADER_PREFIX;
use crate::fasta::record::ParseError;
use crate::format::Format;
use crate::reader::progress::Progress;
use crate::reader::read_line;
use crate::validate::Policy;

/// A record whose header has been read but whose sequence may still continue.
#[derive(Debug)]
struct Pending {
    /// The location of the header line.
    location: Location,

    /// The header text (without the leading `>`).
    header: Result<String, std::str::Utf8Error>,

    /// The sequence read so far.
    sequence: Vec<u8>,
}

impl Pending {
    /// Attempts to turn the pending record into a [`Record`].
    fn finish(self) -> crate::Result<Record> {
        let Pending {
            location,
            header,
            sequence,
        } = self;

        header
            .map_err(Fault::from)
            .and_then(|header| Record::try_from_header(&header, sequence).map_err(Fault::from))
            .map_err(|fault| fault.at(location))
    }
}

/// A FASTA reader.
///
/// Sequence lines are concatenated as raw bytes with their line endings
/// removed; only header lines must be valid UTF-8.
#[derive(Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The inner reader.
    inner: T,

    /// The options.
    options: Options,

    /// The position within the stream.
    progress: Progress,

    /// The record currently being read.
    pending: Option<Pending>,

    /// Whether any header has been seen.
    started: bool,

    /// Whether the stream is exhausted or was ended by an error.
    done: bool,

    /// The line buffer.
    buffer: Vec<u8>,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a FASTA reader with the default [`Options`].
    pub fn new(inner: T) -> Self {
        Self::with_options(inner, Options::default())
    }

    /// Creates a FASTA reader with the given [`Options`].
    pub fn with_options(inner: T, options: Options) -> Self {
        Self::resume(inner, options, Progress::new(Format::Fasta))
    }

    /// Creates a FASTA reader that continues from a position within an
    /// enclosing stream.
    pub(crate) fn resume(inner: T, options: Options, progress: Progress) -> Self {
        Self {
            inner,
            options,
            progress,
            pending: None,
            started: false,
            done: false,
            buffer: Vec::new(),
        }
    }

    /// Gets the options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Returns an iterator over the records.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::fasta;
    ///
    /// let data = b">seq1 desc\nACGT\nACGT\n>seq2\nTT\n";
    /// let mut reader = fasta::Reader::new(&data[..]);
    ///
    /// let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(records[0].interval().to_string(), "seq1:.:0-8");
    /// assert_eq!(records[1].sequence(), b"TT");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn records(&mut self) -> Records<'_, T> {
        Records { reader: self }
    }

    /// Reads the next record.
    fn read_record(&mut self) -> Option<crate::Result<Record>> {
        loop {
            if self.done {
                return None;
            }

            let read = match read_line(&mut self.inner, &mut self.buffer) {
                Ok(read) => read,
                Err(err) => return self.reject(Error::Io(err)),
            };

            if read == 0 {
                self.done = true;

                return match self.pending.take() {
                    Some(pending) => self.complete(pending),
                    None if !self.started => {
                        let location = self.progress.next_record();
                        let fault = Fault::from(Malformed::Fasta(ParseError::EmptyInput));
                        Some(Err(fault.at(location)))
                    }
                    None => None,
                };
            }

            self.progress.consume_line(read);

            if let Some(header) = self.buffer.strip_prefix(&[HEADER_PREFIX as u8][..]) {
                let pending = Pending {
                    location: self.progress.next_record(),
                    header: std::str::from_utf8(header).map(String::from),
                    sequence: Vec::new(),
                };

                self.started = true;

                if let Some(previous) = self.pending.replace(pending) {
                    return self.complete(previous);
                }

                continue;
            }

            match self.pending.as_mut() {
                Some(pending) => pending.sequence.extend_from_slice(&self.buffer),
                None if self.buffer.iter().all(u8::is_ascii_whitespace) => {}
                None => {
                    // Sequence without a header cannot be attributed to any
                    // record, so the stream cannot continue.
                    self.done = true;
                    let location = self.progress.next_record();
                    let fault = Fault::from(Malformed::Fasta(ParseError::MissingHeader));
                    return Some(Err(fault.at(location)));
                }
            }
        }
    }

    /// Finishes a pending record.
    fn complete(&mut self, pending: Pending) -> Option<crate::Result<Record>> {
        let location = pending.location;

        match pending.finish() {
            Ok(record) => {
                trace!("fasta: {}: {}", location, record.interval());
                Some(Ok(record))
            }
            Err(err) => self.reject(err),
        }
    }

    /// Surfaces an error, ending the stream if the error policy demands it.
    fn reject(&mut self, err: Error) -> Option<crate::Result<Record>> {
        match Policy::from(&self.options).halts_on(&err) {
            true => {
                self.done = true;
                self.pending = None;
            }
            false => warn!("fasta: skipping record: {}", err),
        }

        Some(Err(err))
    }
}

/// An iterator over the records of a [`Reader`].
#[derive(Debug)]
pub struct Records<'a, T>
where
    T: BufRead,
{
    /// The inner reader.
    reader: &'a mut Reader<T>,
}

impl<T> Iterator for Records<'_, T>
where
    T: BufRead,
{
    type Item = crate::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record()
    }
}
