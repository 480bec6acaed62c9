//! The query or target sequence of a PSL record.

use std::num::ParseIntError;

use crate::core::Interval;
use crate::core::Number;
use crate::core::Strand;
use crate::core::interval;

/// Errors associated with parsing a sequence.
#[derive(Debug)]
pub enum ParseError {
    /// An invalid sequence size.
    InvalidSize(ParseIntError),

    /// An invalid alignment start.
    InvalidAlignmentStart(ParseIntError),

    /// An invalid alignment end.
    InvalidAlignmentEnd(ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidSize(err) => write!(f, "invalid sequence size: {err}"),
            ParseError::InvalidAlignmentStart(err) => write!(f, "invalid alignment start: {err}"),
            ParseError::InvalidAlignmentEnd(err) => write!(f, "invalid alignment end: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Sequence`].
#[derive(Debug)]
pub enum Error {
    /// An interval error.
    Interval(interval::Error),

    /// A parse error.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Interval(err) => write!(f, "interval error: {err}"),
            Error::Parse(err) => write!(f, "parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The query or target sequence of a PSL record.
///
/// The aligned region is always held in forward-strand coordinates, as PSL
/// writes it in the `qStart`/`qEnd` and `tStart`/`tEnd` columns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sequence {
    /// The aligned region.
    interval: Interval,

    /// The total size of the sequence.
    size: Number,
}

impl Sequence {
    /// Creates a new [`Sequence`].
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Interval;
    /// use biocoord::core::Strand;
    /// use biocoord::psl::record::Sequence;
    ///
    /// let interval = Interval::try_new("seq0", 10, 20, Strand::Reverse)?;
    /// let sequence = Sequence::new(interval, 100);
    ///
    /// assert_eq!(sequence.name(), "seq0");
    /// assert_eq!(sequence.size(), 100);
    /// assert_eq!(sequence.strand(), Strand::Reverse);
    /// assert_eq!(sequence.start(), 10);
    /// assert_eq!(sequence.end(), 20);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(interval: Interval, size: Number) -> Self {
        Self { interval, size }
    }

    /// Attempts to create a new [`Sequence`] from the textual columns of a PSL
    /// line.
    pub(crate) fn try_from_str_parts(
        name: &str,
        size: &str,
        strand: Strand,
        start: &str,
        end: &str,
    ) -> Result<Self> {
        let size = size
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidSize(err)))?;
        let start = start
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidAlignmentStart(err)))?;
        let end = end
            .parse()
            .map_err(|err| Error::Parse(ParseError::InvalidAlignmentEnd(err)))?;

        let interval = Interval::try_new(name, start, end, strand).map_err(Error::Interval)?;

        Ok(Self { interval, size })
    }

    /// Gets the sequence name.
    pub fn name(&self) -> &str {
        self.interval.reference()
    }

    /// Gets the total size of the sequence.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.interval.strand()
    }

    /// Gets the start of the aligned region (forward strand).
    pub fn start(&self) -> Number {
        self.interval.start()
    }

    /// Gets the end of the aligned region (forward strand).
    pub fn end(&self) -> Number {
        self.interval.end()
    }

    /// Gets the aligned region as a canonical interval.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Maps a block given in source-native coordinates (relative to the
    /// reverse complement when on the reverse strand) to forward-strand
    /// coordinates.
    ///
    /// Returns [`None`] if the block does not fit within the sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Interval;
    /// use biocoord::core::Strand;
    /// use biocoord::psl::record::Sequence;
    ///
    /// let sequence = Sequence::new(Interval::try_new("seq0", 0, 100, Strand::Reverse)?, 100);
    /// assert_eq!(sequence.to_forward(10, 5), Some((85, 90)));
    ///
    /// let sequence = Sequence::new(Interval::try_new("seq0", 0, 100, Strand::Forward)?, 100);
    /// assert_eq!(sequence.to_forward(10, 5), Some((10, 15)));
    /// assert_eq!(sequence.to_forward(98, 5), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_forward(&self, start: Number, len: Number) -> Option<(Number, Number)> {
        let end = start.checked_add(len)?;

        if end > self.size {
            return None;
        }

        match self.strand() {
            Strand::Reverse => Some((self.size - end, self.size - start)),
            Strand::Forward | Strand::Unknown => Some((start, end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parts() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sequence = Sequence::try_from_str_parts("chr1", "1000", Strand::Forward, "10", "20")?;
        assert_eq!(sequence.interval().to_string(), "chr1:+:10-20");

        let err =
            Sequence::try_from_str_parts("chr1", "-1", Strand::Forward, "10", "20").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidSize(_))));

        let err =
            Sequence::try_from_str_parts("chr1", "1000", Strand::Forward, "20", "10").unwrap_err();
        assert!(matches!(
            err,
            Error::Interval(interval::Error::EndBeforeStart(20, 10))
        ));

        Ok(())
    }
}
