//! A 0-based, half-open interval upon a named reference sequence.
//!
//! Every format supported by this crate normalizes its native coordinates into
//! an [`Interval`], which covers the positions `[start, end)`.
//!
//! ```text
//! ================ seq0 ===============
//!
//!   0   1   2   3   4   5   6   7   8
//! | A | C | G | T | A | C | G | T | A |
//! -------------------------------------
//! |   |   | X | X | X | X |   |   |   |  <= seq0:+:2-6 (0-based, half-open)
//! |   |   | X | X | X | X |   |   |   |  <= 3-6 (1-based, fully-closed)
//! ```
//!
//! The start and end positions are always stored in forward-strand
//! coordinates, so `start <= end` regardless of the strand. The strand is
//! carried alongside to convey the biological orientation of the feature.
//!
//! An interval where `start == end` is zero-length (for example, an insertion
//! point between two bases). Such intervals are permitted by the model, but
//! not every format can represent them: see
//! [`Capabilities`](crate::format::Capabilities).

use std::str::FromStr;

use crate::core::Strand;

/// The numeric type for a position.
pub type Number = u64;

/// Whether a conversion is allowed to produce a zero-length interval.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ZeroLength {
    /// Zero-length results are rejected.
    Forbid,

    /// Zero-length results are allowed.
    Permit,
}

/// An error related to an [`Interval`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The reference sequence name was empty.
    EmptyReference,

    /// The end position was less than the start position.
    EndBeforeStart(Number, Number),

    /// A 1-based position was zero.
    ZeroOneBasedPosition,

    /// The conversion would produce a zero-length interval, but the caller
    /// forbade it.
    ZeroLengthForbidden(Number),

    /// The start position cannot be represented as a 1-based position.
    StartOutOfRange(Number),

    /// Could not parse an interval from the given value.
    Parse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyReference => write!(f, "reference sequence name cannot be empty"),
            Error::EndBeforeStart(start, end) => write!(
                f,
                "end position ({end}) cannot be less than the start position ({start})"
            ),
            Error::ZeroOneBasedPosition => {
                write!(f, "1-based start position must be at least 1, found 0")
            }
            Error::ZeroLengthForbidden(position) => write!(
                f,
                "zero-length interval at position {position} is not allowed here"
            ),
            Error::StartOutOfRange(start) => write!(
                f,
                "start position ({start}) must be less than {}",
                Number::MAX
            ),
            Error::Parse(value) => write!(f, "could not parse interval from the value: {value}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A 0-based, half-open interval.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Interval {
    /// The reference sequence name.
    reference: String,

    /// The start position (0-based, inclusive).
    start: Number,

    /// The end position (exclusive).
    end: Number,

    /// The strand.
    strand: Strand,
}

impl Interval {
    /// Attempts to create a new [`Interval`].
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Interval;
    /// use biocoord::core::Strand;
    ///
    /// let interval = Interval::try_new("chr1", 0, 100, Strand::Forward)?;
    /// assert_eq!(interval.len(), 100);
    ///
    /// // Zero-length intervals are structurally allowed.
    /// let interval = Interval::try_new("chr1", 10, 10, Strand::Unknown)?;
    /// assert!(interval.is_empty());
    ///
    /// assert!(Interval::try_new("chr1", 10, 9, Strand::Forward).is_err());
    /// assert!(Interval::try_new("", 0, 1, Strand::Forward).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        reference: impl Into<String>,
        start: Number,
        end: Number,
        strand: Strand,
    ) -> Result<Self> {
        let reference = reference.into();

        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }

        if end < start {
            return Err(Error::EndBeforeStart(start, end));
        }

        if start == Number::MAX {
            return Err(Error::StartOutOfRange(start));
        }

        Ok(Self {
            reference,
            start,
            end,
            strand,
        })
    }

    /// Converts a 1-based, fully-closed range `[pos1, pos2]` into an
    /// [`Interval`] covering `[pos1 - 1, pos2)`.
    ///
    /// A range where `pos2 == pos1 - 1` converts to a zero-length interval,
    /// which is only accepted with [`ZeroLength::Permit`].
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Interval;
    /// use biocoord::core::Strand;
    /// use biocoord::core::interval::ZeroLength;
    ///
    /// let interval =
    ///     Interval::from_one_based_closed("chr1", Strand::Forward, 1, 100, ZeroLength::Forbid)?;
    /// assert_eq!(interval.start(), 0);
    /// assert_eq!(interval.end(), 100);
    ///
    /// let interval =
    ///     Interval::from_one_based_closed("chr1", Strand::Forward, 11, 10, ZeroLength::Permit)?;
    /// assert!(interval.is_empty());
    ///
    /// assert!(
    ///     Interval::from_one_based_closed("chr1", Strand::Forward, 11, 10, ZeroLength::Forbid)
    ///         .is_err()
    /// );
    /// assert!(
    ///     Interval::from_one_based_closed("chr1", Strand::Forward, 0, 10, ZeroLength::Forbid)
    ///         .is_err()
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_one_based_closed(
        reference: impl Into<String>,
        strand: Strand,
        pos1: Number,
        pos2: Number,
        zero_length: ZeroLength,
    ) -> Result<Self> {
        if pos1 < 1 {
            return Err(Error::ZeroOneBasedPosition);
        }

        let start = pos1 - 1;

        if pos2 < start {
            return Err(Error::EndBeforeStart(pos1, pos2));
        }

        if pos2 == start && zero_length == ZeroLength::Forbid {
            return Err(Error::ZeroLengthForbidden(pos1));
        }

        Self::try_new(reference, start, pos2, strand)
    }

    /// Converts the interval back into a 1-based, fully-closed range.
    ///
    /// For a zero-length interval, this produces `pos2 == pos1 - 1`. Formats
    /// that cannot represent zero-length features must handle that case
    /// themselves.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Interval;
    /// use biocoord::core::Strand;
    ///
    /// let interval = Interval::try_new("chr1", 0, 100, Strand::Forward)?;
    /// assert_eq!(interval.to_one_based_closed(), (1, 100));
    ///
    /// let interval = Interval::try_new("chr1", 10, 10, Strand::Forward)?;
    /// assert_eq!(interval.to_one_based_closed(), (11, 10));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_one_based_closed(&self) -> (Number, Number) {
        // `try_new` keeps `start` below `Number::MAX`.
        (self.start + 1, self.end)
    }

    /// Gets the reference sequence name.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Gets the start position (0-based, inclusive).
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end position (exclusive).
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the number of positions covered by the interval.
    pub fn len(&self) -> Number {
        self.end - self.start
    }

    /// Whether the interval is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Indicates whether a 0-based position falls within the interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Interval;
    /// use biocoord::core::Strand;
    ///
    /// let interval = Interval::try_new("chr1", 10, 20, Strand::Reverse)?;
    ///
    /// assert!(interval.contains(10));
    /// assert!(interval.contains(19));
    /// assert!(!interval.contains(20));
    /// assert!(!interval.contains(9));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn contains(&self, position: Number) -> bool {
        self.start <= position && position < self.end
    }

    /// Consumes `self` and returns the same interval on the complementary
    /// strand.
    pub fn complement(self) -> Self {
        Self {
            strand: self.strand.complement(),
            ..self
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}",
            self.reference, self.strand, self.start, self.end
        )
    }
}

impl FromStr for Interval {
    type Err = Error;

    /// Parses an interval in the form `<reference>:<strand>:<start>-<end>`.
    ///
    /// The reference name itself may contain colons.
    fn from_str(s: &str) -> Result<Self> {
        let parse_error = || Error::Parse(s.to_string());

        let (rest, range) = s.rsplit_once(':').ok_or_else(parse_error)?;
        let (reference, strand) = rest.rsplit_once(':').ok_or_else(parse_error)?;
        let (start, end) = range.split_once('-').ok_or_else(parse_error)?;

        let strand = strand.parse::<Strand>().map_err(|_| parse_error())?;
        let start = start.parse::<Number>().map_err(|_| parse_error())?;
        let end = end.parse::<Number>().map_err(|_| parse_error())?;

        Self::try_new(reference, start, end, strand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_before_start() {
        let err = Interval::try_new("chr1", 10, 5, Strand::Forward).unwrap_err();
        assert_eq!(err, Error::EndBeforeStart(10, 5));
        assert_eq!(
            err.to_string(),
            "end position (5) cannot be less than the start position (10)"
        );
    }

    #[test]
    fn test_one_based_round_trip() -> Result<()> {
        for (pos1, pos2) in [(1, 1), (1, 100), (5, 4), (1, 0), (250, 1000)] {
            let interval = Interval::from_one_based_closed(
                "chr1",
                Strand::Forward,
                pos1,
                pos2,
                ZeroLength::Permit,
            )?;
            assert_eq!(interval.to_one_based_closed(), (pos1, pos2));
        }

        Ok(())
    }

    #[test]
    fn test_one_based_rejections() {
        let err =
            Interval::from_one_based_closed("chr1", Strand::Forward, 0, 5, ZeroLength::Permit)
                .unwrap_err();
        assert_eq!(err, Error::ZeroOneBasedPosition);

        let err =
            Interval::from_one_based_closed("chr1", Strand::Forward, 10, 8, ZeroLength::Permit)
                .unwrap_err();
        assert_eq!(err, Error::EndBeforeStart(10, 8));

        let err =
            Interval::from_one_based_closed("chr1", Strand::Forward, 10, 9, ZeroLength::Forbid)
                .unwrap_err();
        assert_eq!(err, Error::ZeroLengthForbidden(10));
    }

    #[test]
    fn test_start_must_have_a_one_based_position() -> Result<()> {
        let err = Interval::try_new("chr1", Number::MAX, Number::MAX, Strand::Forward).unwrap_err();
        assert_eq!(err, Error::StartOutOfRange(Number::MAX));

        let interval = Interval::try_new("chr1", Number::MAX - 1, Number::MAX, Strand::Forward)?;
        assert_eq!(interval.to_one_based_closed(), (Number::MAX, Number::MAX));

        Ok(())
    }

    #[test]
    fn test_display_and_parse() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let interval = Interval::try_new("HLA-A*01:01", 3, 7, Strand::Reverse)?;
        assert_eq!(interval.to_string(), "HLA-A*01:01:-:3-7");
        assert_eq!(interval.to_string().parse::<Interval>()?, interval);

        let err = "chr1:+:7".parse::<Interval>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not parse interval from the value: chr1:+:7"
        );

        Ok(())
    }

    #[test]
    fn test_complement_keeps_coordinates() -> Result<()> {
        let interval = Interval::try_new("chr1", 3, 7, Strand::Forward)?.complement();
        assert_eq!(interval.strand(), Strand::Reverse);
        assert_eq!((interval.start(), interval.end()), (3, 7));
        Ok(())
    }
}
