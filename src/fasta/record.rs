//! A FASTA record.

use std::str::FromStr;

use crate::Options;
use crate::core::Interval;
use crate::core::Number;
use crate::core::Strand;
use crate::core::interval;
use crate::options::DEFAULT_WRAP_WIDTH;
use crate::validate::Validate;
use crate::validate::Violation;

/// The prefix for a header line.
pub const HEADER_PREFIX: char = '>';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing FASTA text.
#[derive(Debug)]
pub enum ParseError {
    /// The input held no records at all.
    EmptyInput,

    /// Sequence data appeared before the first header.
    MissingHeader,

    /// A header line was not valid UTF-8.
    InvalidHeader(std::str::Utf8Error),

    /// More than one record was found where exactly one was expected.
    MultipleRecords,
}

impl ParseError {
    /// Whether the text was rejected because of its encoding.
    pub fn is_encoding_error(&self) -> bool {
        matches!(self, ParseError::InvalidHeader(_))
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "the input contains no records"),
            ParseError::MissingHeader => write!(
                f,
                "expected a header line starting with `{HEADER_PREFIX}` before any sequence"
            ),
            ParseError::InvalidHeader(err) => write!(f, "invalid header encoding: {err}"),
            ParseError::MultipleRecords => write!(f, "expected exactly one record"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Record`].
#[derive(Debug)]
pub enum Error {
    /// An interval error.
    Interval(interval::Error),

    /// A parse error.
    Parse(ParseError),

    /// The record is invalid.
    Invalid(Violation),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Interval(err) => write!(f, "interval error: {err}"),
            Error::Parse(err) => write!(f, "parse error: {err}"),
            Error::Invalid(err) => write!(f, "invalid record: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// A FASTA record.
///
/// A record's interval spans its whole sequence, `[0, len)`, on the unknown
/// strand. Line wrapping is not preserved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The interval covered by the sequence.
    interval: Interval,

    /// The description (everything after the identifier on the header line).
    description: String,

    /// The sequence.
    sequence: Vec<u8>,
}

impl Record {
    /// Attempts to create a new [`Record`].
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::fasta::Record;
    ///
    /// let record = Record::try_new("seq0", "", b"ACGT".to_vec())?;
    /// assert_eq!(record.interval().to_string(), "seq0:.:0-4");
    ///
    /// assert!(Record::try_new("", "", b"ACGT".to_vec()).is_err());
    /// assert!(Record::try_new("seq 0", "", b"ACGT".to_vec()).is_err());
    /// assert!(Record::try_new("seq0", "", b"AC>GT".to_vec()).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        identifier: impl Into<String>,
        description: impl Into<String>,
        sequence: Vec<u8>,
    ) -> Result<Self> {
        let identifier = identifier.into();

        check_identifier(&identifier).map_err(Error::Invalid)?;
        check_sequence(&sequence).map_err(Error::Invalid)?;

        let interval = Interval::try_new(identifier, 0, sequence.len() as Number, Strand::Unknown)
            .map_err(Error::Interval)?;

        Ok(Self {
            interval,
            description: description.into(),
            sequence,
        })
    }

    /// Attempts to create a new [`Record`] from the text of a header line
    /// (without the leading `>`) and its sequence.
    pub(crate) fn try_from_header(header: &str, sequence: Vec<u8>) -> Result<Self> {
        let (identifier, description) = header
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((header, ""));

        Self::try_new(identifier, description, sequence)
    }

    /// Gets the identifier.
    pub fn identifier(&self) -> &str {
        self.interval.reference()
    }

    /// Gets the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Gets the sequence.
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Gets the interval covered by the sequence.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Returns a record with the reverse complement of the sequence.
    ///
    /// IUPAC ambiguity codes are complemented, case is preserved, and any
    /// other characters are kept as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::fasta::Record;
    ///
    /// let record = Record::try_new("seq0", "", b"AACgtNRy-".to_vec())?;
    /// assert_eq!(record.reverse_complement().sequence(), b"-rYNacGTT");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn reverse_complement(&self) -> Self {
        Self {
            interval: self.interval.clone(),
            description: self.description.clone(),
            sequence: self.sequence.iter().rev().map(|b| complement(*b)).collect(),
        }
    }

    /// Returns a value that displays the record with its sequence wrapped at
    /// `width` characters per line (`0` writes a single line).
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::fasta::Record;
    ///
    /// let record = Record::try_new("seq0", "test", b"ACGTACGTAC".to_vec())?;
    /// assert_eq!(
    ///     record.display_wrapped(4).to_string(),
    ///     ">seq0 test\nACGT\nACGT\nAC"
    /// );
    /// assert_eq!(
    ///     record.display_wrapped(0).to_string(),
    ///     ">seq0 test\nACGTACGTAC"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn display_wrapped(&self, width: usize) -> Wrapped<'_> {
        Wrapped {
            record: self,
            width,
        }
    }

    /// Gets the header line, without the leading `>`.
    pub(crate) fn header(&self) -> String {
        match self.description.is_empty() {
            true => self.identifier().to_string(),
            false => format!("{} {}", self.identifier(), self.description),
        }
    }

    /// Splits the sequence into lines of at most `width` bytes.
    pub(crate) fn lines(&self, width: usize) -> impl Iterator<Item = &[u8]> + '_ {
        let width = match width {
            0 => self.sequence.len().max(1),
            width => width,
        };

        self.sequence.chunks(width)
    }
}

/// Checks that an identifier is non-empty and free of whitespace.
fn check_identifier(identifier: &str) -> std::result::Result<(), Violation> {
    if identifier.is_empty() {
        return Err(Violation::EmptyIdentifier);
    }

    if identifier.chars().any(char::is_whitespace) {
        return Err(Violation::WhitespaceInIdentifier(identifier.to_string()));
    }

    Ok(())
}

/// Checks that a sequence holds no header marker or line break.
fn check_sequence(sequence: &[u8]) -> std::result::Result<(), Violation> {
    match sequence
        .iter()
        .position(|b| matches!(b, b'>' | b'\n' | b'\r'))
    {
        Some(position) => Err(Violation::ReservedSequenceByte(
            position,
            sequence[position],
        )),
        None => Ok(()),
    }
}

/// Complements a single IUPAC nucleotide code, preserving case.
fn complement(base: u8) -> u8 {
    let complemented = match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        _ => return base,
    };

    match base.is_ascii_lowercase() {
        true => complemented.to_ascii_lowercase(),
        false => complemented,
    }
}

impl Validate for Record {
    fn validate(&self, _: &Options) -> std::result::Result<(), Violation> {
        check_identifier(self.identifier())?;
        check_sequence(&self.sequence)
    }
}

/// A [`Record`] displayed with a specific line width.
#[derive(Debug)]
pub struct Wrapped<'a> {
    /// The record.
    record: &'a Record,

    /// The line width.
    width: usize,
}

impl std::fmt::Display for Wrapped<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{HEADER_PREFIX}{}", self.record.header())?;

        for line in self.record.lines(self.width) {
            write!(f, "\n{}", String::from_utf8_lossy(line))?;
        }

        Ok(())
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_wrapped(DEFAULT_WRAP_WIDTH))
    }
}

impl FromStr for Record {
    type Err = Error;

    /// Parses exactly one FASTA record.
    fn from_str(s: &str) -> Result<Self> {
        let mut header = None;
        let mut sequence = Vec::new();

        for line in s.lines() {
            match line.strip_prefix(HEADER_PREFIX) {
                Some(_) if header.is_some() => {
                    return Err(Error::Parse(ParseError::MultipleRecords));
                }
                Some(text) => header = Some(text),
                None if header.is_none() && line.trim().is_empty() => {}
                None if header.is_none() => return Err(Error::Parse(ParseError::MissingHeader)),
                None => sequence.extend_from_slice(line.as_bytes()),
            }
        }

        let header = header.ok_or(Error::Parse(ParseError::EmptyInput))?;
        Self::try_from_header(header, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_sequence() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = ">seq1 desc\nACGT\nACGT\n".parse::<Record>()?;

        assert_eq!(record.identifier(), "seq1");
        assert_eq!(record.description(), "desc");
        assert_eq!(record.sequence(), b"ACGTACGT");
        assert_eq!(
            record.interval(),
            &Interval::try_new("seq1", 0, 8, Strand::Unknown)?
        );

        Ok(())
    }

    #[test]
    fn test_internal_whitespace_is_kept() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = ">seq1\r\nAC GT\r\nAC\r\n".parse::<Record>()?;
        assert_eq!(record.sequence(), b"AC GTAC");
        assert_eq!(record.description(), "");
        Ok(())
    }

    #[test]
    fn test_empty_sequence() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = ">empty".parse::<Record>()?;
        assert!(record.interval().is_empty());
        assert_eq!(record.to_string(), ">empty");
        assert_eq!(record.to_string().parse::<Record>()?, record);
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        let err = "".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::EmptyInput)));

        let err = "ACGT\n>seq1\nACGT".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MissingHeader)));

        let err = ">seq1\nA\n>seq2\nC".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MultipleRecords)));

        let err = "> seq1".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::EmptyIdentifier)));
    }

    #[test]
    fn test_wrapping_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sequence = b"ACGT".repeat(40);
        let record = Record::try_new("chr1", "a  spaced  description", sequence)?;

        let text = record.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().skip(1).all(|line| line.len() <= 60));
        assert_eq!(text.parse::<Record>()?, record);

        Ok(())
    }

    #[test]
    fn test_reverse_complement_twice() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = Record::try_new("seq0", "", b"ACGTRYKMBVDHNSWacgtn.-".to_vec())?;
        assert_eq!(record.reverse_complement().reverse_complement(), record);
        assert_eq!(
            record.reverse_complement().sequence(),
            b"-.nacgtWSNDHBVKMRYACGT"
        );
        Ok(())
    }

    #[test]
    fn test_sequence_cannot_break_framing() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Record::try_new("s", "", b"ACGT>x".to_vec()).unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(Violation::ReservedSequenceByte(4, b'>'))
        ));

        let err = Record::try_new("s", "", b"AC\nGT".to_vec()).unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(Violation::ReservedSequenceByte(2, b'\n'))
        ));

        let err = ">s\nAC>GT\n".parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::ReservedSequenceByte(..))));

        let record = Record::try_new("s", "", b"ACGTAC".to_vec())?;
        let text = record.display_wrapped(4).to_string();
        assert_eq!(text.parse::<Record>()?, record);

        Ok(())
    }
}
