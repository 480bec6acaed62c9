//! A GFF3 reader.

use std::io::BufRead;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::Error;
use crate::Options;
use crate::error::Fault;
use crate::error::Malformed;
use crate::fasta;
use crate::format::Format;
use crate::gff3::Directive;
use crate::gff3::Line;
use crate::gff3::Record;
use crate::reader::progress::Progress;
use crate::reader::read_line;
use crate::validate::Policy;
use crate::validate::Validate as _;

/// The state of the reader.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// The reader is within the feature lines.
    Features,

    /// The reader stopped at a `##FASTA` directive.
    Fasta,

    /// The stream is exhausted or was ended by an error.
    Done,
}

/// A GFF3 reader.
///
/// Comments and blank lines are skipped, and directives are retained as they
/// are read (see [`Reader::directives()`]). A `##FASTA` directive ends the
/// feature records; the sequences that follow can be read by handing off to
/// [`Reader::into_embedded_fasta()`].
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

    /// The directives read so far.
    directives: Vec<Directive>,

    /// The state of the reader.
    state: State,

    /// The line buffer.
    buffer: Vec<u8>,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a GFF3 reader with the default [`Options`].
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3;
    ///
    /// let data = b"##gff-version 3\nchr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1\n";
    /// let reader = gff3::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self::with_options(inner, Options::default())
    }

    /// Creates a GFF3 reader with the given [`Options`].
    pub fn with_options(inner: T, options: Options) -> Self {
        Self {
            inner,
            options,
            progress: Progress::new(Format::Gff3),
            directives: Vec::new(),
            state: State::Features,
            buffer: Vec::new(),
        }
    }

    /// Gets the options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Gets the directives read so far, in the order they appeared.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3;
    /// use biocoord::gff3::Directive;
    ///
    /// let data = b"##gff-version 3\n##sequence-region chr1 1 1000\n";
    /// let mut reader = gff3::Reader::new(&data[..]);
    /// assert_eq!(reader.records().count(), 0);
    ///
    /// assert_eq!(reader.directives().len(), 2);
    /// assert_eq!(
    ///     reader.directives()[0],
    ///     Directive::GffVersion(String::from("3"))
    /// );
    /// ```
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Gets a mutable reference to the inner reader.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Returns an iterator over the feature records.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3;
    ///
    /// let data = b"##gff-version 3\n# a comment\n\nchr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1\n";
    /// let mut reader = gff3::Reader::new(&data[..]);
    ///
    /// let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 1);
    /// assert_eq!(records[0].interval().to_string(), "chr1:+:0-100");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn records(&mut self) -> Records<'_, T> {
        Records { reader: self }
    }

    /// Consumes self and, if the reader stopped at a `##FASTA` directive,
    /// returns a FASTA reader over the rest of the stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3;
    ///
    /// let data = b"chr1\t.\tgene\t1\t4\t.\t+\t.\tID=g1\n##FASTA\n>chr1\nACGT\n";
    /// let mut reader = gff3::Reader::new(&data[..]);
    /// assert_eq!(reader.records().count(), 1);
    ///
    /// let mut fasta = reader.into_embedded_fasta().expect("a FASTA section");
    /// let records = fasta.records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records[0].sequence(), b"ACGT");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn into_embedded_fasta(self) -> Option<fasta::Reader<T>> {
        match self.state {
            State::Fasta => Some(fasta::Reader::resume(
                self.inner,
                self.options,
                Progress::resume(
                    Format::Fasta,
                    self.progress.line_no(),
                    self.progress.offset(),
                ),
            )),
            State::Features | State::Done => None,
        }
    }

    /// Reads the next feature record.
    fn read_record(&mut self) -> Option<crate::Result<Record>> {
        loop {
            if self.state != State::Features {
                return None;
            }

            let read = match read_line(&mut self.inner, &mut self.buffer) {
                Ok(read) => read,
                Err(err) => return self.reject(Error::Io(err)),
            };

            if read == 0 {
                self.state = State::Done;
                return None;
            }

            self.progress.consume_line(read);

            let line = match std::str::from_utf8(&self.buffer).map(|line| line.parse::<Line>()) {
                Ok(line) => line,
                Err(err) => {
                    let location = self.progress.next_record();
                    return self.reject(Fault::from(err).at(location));
                }
            };

            match line {
                Ok(Line::Empty) | Ok(Line::Comment(_)) => {}
                Ok(Line::Directive(directive)) => {
                    debug!(
                        "gff3: line {}: directive {}",
                        self.progress.line_no(),
                        directive
                    );

                    if directive == Directive::Fasta {
                        self.state = State::Fasta;
                    }

                    self.directives.push(directive);
                }
                Ok(Line::Record(record)) => {
                    let location = self.progress.next_record();

                    if let Err(violation) = record.validate(&self.options) {
                        let err = Fault::from(Malformed::Validation(violation)).at(location);
                        return self.reject(err);
                    }

                    trace!("gff3: {}: {}", location, record.interval());
                    return Some(Ok(record));
                }
                Err(err) => {
                    let location = match err {
                        crate::gff3::line::Error::InvalidRecord(_) => self.progress.next_record(),
                        crate::gff3::line::Error::InvalidDirective(_) => self.progress.location(),
                    };

                    return self.reject(Fault::from(err).at(location));
                }
            }
        }
    }

    /// Surfaces an error, ending the stream if the error policy demands it.
    fn reject(&mut self, err: Error) -> Option<crate::Result<Record>> {
        match Policy::from(&self.options).halts_on(&err) {
            true => self.state = State::Done,
            false => warn!("gff3: skipping record: {}", err),
        }

        Some(Err(err))
    }
}

/// An iterator over the feature records of a [`Reader`].
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
