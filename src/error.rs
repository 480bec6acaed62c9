//! Errors surfaced by the readers in this crate.
//!
//! Every record-level error carries a [`Location`] describing where in the
//! stream the offending record was found, along with the specific problem.

use std::io;

use crate::core::interval;
use crate::fasta;
use crate::format::Format;
use crate::gff3;
use crate::psl;
use crate::validate::Violation;

/// The position of a record within a stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location {
    /// The format of the stream.
    format: Format,

    /// The 1-based index of the record within the stream.
    record_no: usize,

    /// The 1-based line number where the record starts.
    line_no: usize,

    /// The byte offset of the start of that line.
    offset: u64,
}

impl Location {
    /// Creates a new [`Location`].
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::Format;
    /// use biocoord::error::Location;
    ///
    /// let location = Location::new(Format::Psl, 2, 7, 311);
    /// assert_eq!(
    ///     location.to_string(),
    ///     "PSL record 2 (line 7, byte offset 311)"
    /// );
    /// ```
    pub fn new(format: Format, record_no: usize, line_no: usize, offset: u64) -> Self {
        Self {
            format,
            record_no,
            line_no,
            offset,
        }
    }

    /// Gets the format of the stream.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Gets the 1-based index of the record within the stream.
    pub fn record_no(&self) -> usize {
        self.record_no
    }

    /// Gets the 1-based line number where the record starts.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Gets the byte offset of the line where the record starts.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} record {} (line {}, byte offset {})",
            self.format, self.record_no, self.line_no, self.offset
        )
    }
}

/// The reason a record is malformed.
#[derive(Debug)]
pub enum Malformed {
    /// The line was not valid UTF-8.
    Utf8(std::str::Utf8Error),

    /// A GFF3 feature line could not be parsed.
    Gff3(gff3::record::ParseError),

    /// A GFF3 directive could not be parsed.
    Gff3Directive(gff3::directive::ParseError),

    /// A PSL line could not be parsed.
    Psl(psl::record::ParseError),

    /// A FASTA record could not be parsed.
    Fasta(fasta::record::ParseError),

    /// The record parsed, but violates an invariant of its format.
    Validation(Violation),
}

impl Malformed {
    /// Whether the record was rejected because of its text encoding (invalid
    /// UTF-8 or invalid percent-encoding).
    pub fn is_encoding_error(&self) -> bool {
        match self {
            Malformed::Utf8(_) => true,
            Malformed::Gff3(err) => err.is_encoding_error(),
            Malformed::Fasta(err) => err.is_encoding_error(),
            Malformed::Gff3Directive(_) | Malformed::Psl(_) | Malformed::Validation(_) => false,
        }
    }
}

impl std::fmt::Display for Malformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Malformed::Utf8(err) => write!(f, "invalid encoding: {err}"),
            Malformed::Gff3(err) => write!(f, "parse error: {err}"),
            Malformed::Gff3Directive(err) => write!(f, "invalid directive: {err}"),
            Malformed::Psl(err) => write!(f, "parse error: {err}"),
            Malformed::Fasta(err) => write!(f, "parse error: {err}"),
            Malformed::Validation(err) => write!(f, "validation error: {err}"),
        }
    }
}

impl std::error::Error for Malformed {}

/// The kind of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The underlying stream failed.
    Io,

    /// The format of a resource could not be determined.
    UnknownFormat,

    /// A record described an impossible interval.
    InvalidInterval,

    /// A record could not be parsed or failed validation.
    MalformedRecord,
}

/// An error surfaced while detecting, reading, or parsing a resource.
#[derive(Debug)]
pub enum Error {
    /// An I/O error from the underlying stream.
    Io(io::Error),

    /// The format of the resource with the given identifier could not be
    /// determined.
    UnknownFormat(String),

    /// A record described an impossible interval. Streams always end after
    /// yielding this error.
    InvalidInterval(Location, interval::Error),

    /// A record was malformed.
    MalformedRecord(Location, Malformed),
}

impl Error {
    /// Gets the kind of the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::Error;
    /// use biocoord::ErrorKind;
    ///
    /// let err = Error::UnknownFormat(String::from("reads.bam"));
    /// assert_eq!(err.kind(), ErrorKind::UnknownFormat);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::UnknownFormat(_) => ErrorKind::UnknownFormat,
            Error::InvalidInterval(_, _) => ErrorKind::InvalidInterval,
            Error::MalformedRecord(_, _) => ErrorKind::MalformedRecord,
        }
    }

    /// Gets the location of the offending record, if the error concerns one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::InvalidInterval(location, _) | Error::MalformedRecord(location, _) => {
                Some(location)
            }
            Error::Io(_) | Error::UnknownFormat(_) => None,
        }
    }

    /// Whether the error stems from an invalid text encoding.
    pub fn is_encoding_error(&self) -> bool {
        match self {
            Error::MalformedRecord(_, malformed) => malformed.is_encoding_error(),
            _ => false,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::UnknownFormat(identifier) => write!(
                f,
                "unknown format: could not determine the format of `{identifier}`"
            ),
            Error::InvalidInterval(location, err) => {
                write!(f, "invalid interval in {location}: {err}")
            }
            Error::MalformedRecord(location, err) => {
                write!(f, "malformed record in {location}: {err}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A record-level failure that has not yet been tied to a [`Location`].
#[derive(Debug)]
pub(crate) enum Fault {
    /// An impossible interval.
    Interval(interval::Error),

    /// A malformed record.
    Malformed(Malformed),
}

impl Fault {
    /// Ties the fault to the location of the record that caused it.
    pub(crate) fn at(self, location: Location) -> Error {
        match self {
            Fault::Interval(err) => Error::InvalidInterval(location, err),
            Fault::Malformed(err) => Error::MalformedRecord(location, err),
        }
    }
}

impl From<Malformed> for Fault {
    fn from(err: Malformed) -> Self {
        Fault::Malformed(err)
    }
}

impl From<std::str::Utf8Error> for Fault {
    fn from(err: std::str::Utf8Error) -> Self {
        Fault::Malformed(Malformed::Utf8(err))
    }
}

impl From<gff3::record::Error> for Fault {
    fn from(err: gff3::record::Error) -> Self {
        match err {
            gff3::record::Error::Interval(err) => Fault::Interval(err),
            gff3::record::Error::Parse(err) => Fault::Malformed(Malformed::Gff3(err)),
            gff3::record::Error::Invalid(err) => Fault::Malformed(Malformed::Validation(err)),
        }
    }
}

impl From<gff3::directive::ParseError> for Fault {
    fn from(err: gff3::directive::ParseError) -> Self {
        match err {
            gff3::directive::ParseError::InvalidInterval(err) => Fault::Interval(err),
            err => Fault::Malformed(Malformed::Gff3Directive(err)),
        }
    }
}

impl From<gff3::line::Error> for Fault {
    fn from(err: gff3::line::Error) -> Self {
        match err {
            gff3::line::Error::InvalidDirective(err) => Fault::from(err),
            gff3::line::Error::InvalidRecord(err) => Fault::from(err),
        }
    }
}

impl From<psl::record::Error> for Fault {
    fn from(err: psl::record::Error) -> Self {
        match err {
            psl::record::Error::Interval(err) => Fault::Interval(err),
            psl::record::Error::Parse(err) => Fault::Malformed(Malformed::Psl(err)),
            psl::record::Error::Invalid(err) => Fault::Malformed(Malformed::Validation(err)),
        }
    }
}

impl From<fasta::record::Error> for Fault {
    fn from(err: fasta::record::Error) -> Self {
        match err {
            fasta::record::Error::Interval(err) => Fault::Interval(err),
            fasta::record::Error::Parse(err) => Fault::Malformed(Malformed::Fasta(err)),
            fasta::record::Error::Invalid(err) => Fault::Malformed(Malformed::Validation(err)),
        }
    }
}
