//! A GFF3 feature record.

pub mod attributes;
pub mod builder;

use std::num::ParseFloatError;
use std::num::ParseIntError;
use std::str::FromStr;

pub use attributes::Attributes;
pub use builder::Builder;

use crate::Options;
use crate::core::Interval;
use crate::core::Number;
use crate::core::Strand;
use crate::core::interval;
use crate::core::interval::ZeroLength;
use crate::core::strand::ParseStrandError;
use crate::validate::Validate;
use crate::validate::Violation;

/// The delimiter between columns.
pub const DELIMITER: char = '\t';

/// The number of columns in a feature line.
pub const NUM_FIELDS: usize = 9;

/// The value written for an absent column.
pub const MISSING: &str = ".";

/// The feature type that requires a phase.
const CDS: &str = "CDS";

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing a feature line.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of columns.
    IncorrectNumberOfFields(usize),

    /// A required column was empty.
    EmptyField(&'static str),

    /// An invalid start position.
    InvalidStart(ParseIntError),

    /// An invalid end position.
    InvalidEnd(ParseIntError),

    /// An invalid score.
    InvalidScore(ParseFloatError),

    /// An invalid strand.
    InvalidStrand(ParseStrandError),

    /// An invalid phase.
    InvalidPhase(ParseIntError),

    /// Invalid attributes.
    InvalidAttributes(attributes::ParseError),
}

impl ParseError {
    /// Whether the line was rejected because of its text encoding.
    pub fn is_encoding_error(&self) -> bool {
        match self {
            ParseError::InvalidAttributes(err) => err.is_encoding_error(),
            _ => false,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields: expected {NUM_FIELDS} fields, found {fields} fields"
            ),
            ParseError::EmptyField(field) => write!(f, "the {field} column cannot be empty"),
            ParseError::InvalidStart(err) => write!(f, "invalid start: {err}"),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {err}"),
            ParseError::InvalidScore(err) => write!(f, "invalid score: {err}"),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {err}"),
            ParseError::InvalidPhase(err) => write!(f, "invalid phase: {err}"),
            ParseError::InvalidAttributes(err) => write!(f, "invalid attributes: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Record`].
#[derive(Debug)]
pub enum Error {
    /// The feature's coordinates do not form a valid interval.
    Interval(interval::Error),

    /// A parse error.
    Parse(ParseError),

    /// The record parsed, but is invalid.
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

/// A GFF3 feature record.
///
/// The 1-based, fully-closed `start` and `end` columns are held as a
/// canonical [`Interval`] together with the strand column.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The feature's interval.
    interval: Interval,

    /// The source column.
    source: String,

    /// The type column.
    feature_type: String,

    /// The score.
    score: Option<f64>,

    /// The phase.
    phase: Option<u8>,

    /// The attributes.
    attributes: Attributes,
}

impl Record {
    /// Parses a feature line without validating the result.
    ///
    /// Most callers want [`str::parse()`], which also validates the record.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3::Record;
    ///
    /// // A CDS without a phase parses, but does not validate.
    /// let line = "chr1\t.\tCDS\t1\t9\t.\t+\t.\tID=c1";
    /// assert!(Record::parse(line).is_ok());
    /// assert!(line.parse::<Record>().is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let fields = s.split(DELIMITER).collect::<Vec<_>>();

        if fields.len() != NUM_FIELDS {
            return Err(Error::Parse(ParseError::IncorrectNumberOfFields(
                fields.len(),
            )));
        }

        let seqid = non_empty(fields[0], "seqid")?;
        let source = non_empty(fields[1], "source")?;
        let feature_type = non_empty(fields[2], "type")?;

        let start = fields[3]
            .parse::<Number>()
            .map_err(|err| Error::Parse(ParseError::InvalidStart(err)))?;
        let end = fields[4]
            .parse::<Number>()
            .map_err(|err| Error::Parse(ParseError::InvalidEnd(err)))?;

        let score = match fields[5] {
            MISSING => None,
            score => Some(
                score
                    .parse::<f64>()
                    .map_err(|err| Error::Parse(ParseError::InvalidScore(err)))?,
            ),
        };

        let strand = fields[6]
            .parse::<Strand>()
            .map_err(|err| Error::Parse(ParseError::InvalidStrand(err)))?;

        let phase = match fields[7] {
            MISSING => None,
            phase => Some(
                phase
                    .parse::<u8>()
                    .map_err(|err| Error::Parse(ParseError::InvalidPhase(err)))?,
            ),
        };

        let attributes = fields[8]
            .parse::<Attributes>()
            .map_err(|err| Error::Parse(ParseError::InvalidAttributes(err)))?;

        let interval =
            Interval::from_one_based_closed(seqid, strand, start, end, ZeroLength::Forbid)
                .map_err(Error::Interval)?;

        Ok(Self {
            interval,
            source: source.to_string(),
            feature_type: feature_type.to_string(),
            score,
            phase,
            attributes,
        })
    }

    /// Gets the feature's interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Strand;
    /// use biocoord::gff3::Record;
    ///
    /// let record = "chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1".parse::<Record>()?;
    ///
    /// assert_eq!(record.interval().reference(), "chr1");
    /// assert_eq!(record.interval().start(), 0);
    /// assert_eq!(record.interval().end(), 100);
    /// assert_eq!(record.interval().strand(), Strand::Forward);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Gets the source column.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Gets the type column.
    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    /// Gets the score.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Gets the phase.
    pub fn phase(&self) -> Option<u8> {
        self.phase
    }

    /// Gets the attributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3::Record;
    ///
    /// let record = "chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1".parse::<Record>()?;
    /// assert_eq!(record.attributes().first("ID"), Some("g1"));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Consumes `self` and returns the feature's interval.
    pub fn into_interval(self) -> Interval {
        self.interval
    }
}

/// Ensures a required column is not empty.
fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    match value.is_empty() {
        true => Err(Error::Parse(ParseError::EmptyField(field))),
        false => Ok(value),
    }
}

/// Checks that a column is non-empty and cannot break the line's framing.
fn check_column(name: &'static str, value: &str) -> std::result::Result<(), Violation> {
    if value.is_empty() {
        return Err(Violation::EmptyColumn(name));
    }

    if value.contains(['\t', '\n', '\r']) {
        return Err(Violation::ReservedCharacterInColumn(name));
    }

    Ok(())
}

impl Validate for Record {
    fn validate(&self, options: &Options) -> std::result::Result<(), Violation> {
        check_column("seqid", self.interval.reference())?;
        check_column("source", &self.source)?;
        check_column("type", &self.feature_type)?;

        for (key, values) in self.attributes.iter() {
            if key.is_empty() {
                return Err(Violation::EmptyAttributeKey);
            }

            if values.is_empty() && options.strict_attributes() {
                return Err(Violation::AttributeWithoutValue(key.to_string()));
            }
        }

        if let Some(score) = self.score {
            if !score.is_finite() {
                return Err(Violation::NonFiniteScore(score));
            }
        }

        match self.phase {
            Some(phase) if phase > 2 => Err(Violation::InvalidPhase(phase)),
            None if self.feature_type == CDS => Err(Violation::MissingPhase),
            _ => Ok(()),
        }
    }
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let record = Self::parse(s)?;
        record
            .validate(&Options::default())
            .map_err(Error::Invalid)?;
        Ok(record)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (start, end) = self.interval.to_one_based_closed();

        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t",
            self.interval.reference(),
            self.source,
            self.feature_type,
            start,
            end
        )?;

        match self.score {
            Some(score) => write!(f, "{score}\t")?,
            None => write!(f, "{MISSING}\t")?,
        }

        write!(f, "{}\t", self.interval.strand())?;

        match self.phase {
            Some(phase) => write!(f, "{phase}\t")?,
            None => write!(f, "{MISSING}\t")?,
        }

        write!(f, "{}", self.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_line() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1".parse::<Record>()?;

        assert_eq!(
            record.interval(),
            &Interval::try_new("chr1", 0, 100, Strand::Forward)?
        );
        assert_eq!(record.attributes().get("ID"), Some(&[String::from("g1")][..]));
        assert_eq!(record.source(), ".");
        assert_eq!(record.feature_type(), "gene");
        assert_eq!(record.score(), None);
        assert_eq!(record.phase(), None);

        Ok(())
    }

    #[test]
    fn test_eight_columns() {
        let err = "chr1\t.\tgene\t1\t100\t.\t+\t."
            .parse::<Record>()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Parse(ParseError::IncorrectNumberOfFields(8))
        ));
        assert_eq!(
            err.to_string(),
            "parse error: invalid number of fields: expected 9 fields, found 8 fields"
        );
    }

    #[test]
    fn test_end_before_start() {
        let err = "chr1\t.\tgene\t100\t10\t.\t+\t.\t."
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Interval(interval::Error::EndBeforeStart(100, 10))
        ));

        // `end == start - 1` would be a zero-length feature, which GFF3 cannot
        // represent.
        let err = "chr1\t.\tgene\t11\t10\t.\t+\t.\t."
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Interval(interval::Error::ZeroLengthForbidden(11))
        ));
    }

    #[test]
    fn test_unknown_strands() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\t.\tgene\t1\t1\t.\t.\t.\t.".parse::<Record>()?;
        assert_eq!(record.interval().strand(), Strand::Unknown);

        let record = "chr1\t.\tgene\t1\t1\t.\t?\t.\t.".parse::<Record>()?;
        assert_eq!(record.interval().strand(), Strand::Unknown);

        Ok(())
    }

    #[test]
    fn test_phase_validation() {
        let err = "chr1\t.\tCDS\t1\t9\t.\t+\t.\tID=c1"
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::MissingPhase)));

        let err = "chr1\t.\tCDS\t1\t9\t.\t+\t3\tID=c1"
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::InvalidPhase(3))));
        assert_eq!(
            err.to_string(),
            "invalid record: phase must be 0, 1, or 2, found 3"
        );
    }

    #[test]
    fn test_strict_attributes() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let line = "chr1\t.\tgene\t1\t9\t.\t+\t.\tID=g1;circular";

        let err = line.parse::<Record>().unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(Violation::AttributeWithoutValue(_))
        ));

        let options = crate::options::Builder::default()
            .strict_attributes(false)
            .build();
        let record = Record::parse(line)?;
        assert!(record.validate(&options).is_ok());
        assert_eq!(record.attributes().get("circular"), Some(&[] as &[String]));

        Ok(())
    }

    #[test]
    fn test_non_finite_score() {
        let err = "chr1\t.\tgene\t1\t9\tNaN\t+\t.\t."
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::NonFiniteScore(_))));
    }

    #[test]
    fn test_canonical_lines_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        for line in [
            "chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1",
            "chr1\tRefSeq\tCDS\t201\t300\t0.5\t-\t2\tID=cds1;Parent=t1,t2",
            "ctg%3B1\tmaker\texon\t5\t5\t12\t.\t.\tNote=a%3Bb%25c;Name=caf%C3%A9",
            "chrM\t.\tregion\t1\t16569\t.\t.\t.\t.",
        ] {
            let record = line.parse::<Record>()?;
            assert_eq!(record.to_string(), line);
            assert_eq!(record.to_string().parse::<Record>()?, record);
        }

        Ok(())
    }
}
