//! A builder for a GFF3 record.

use crate::Options;
use crate::core::Interval;
use crate::gff3::Record;
use crate::gff3::record::Attributes;
use crate::gff3::record::MISSING;
use crate::validate::Validate;
use crate::validate::Violation;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No interval was provided to the [`Builder`].
    Interval,

    /// No feature type was provided to the [`Builder`].
    FeatureType,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Interval => write!(f, "interval"),
            MissingError::FeatureType => write!(f, "feature type"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// A required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// The interval is zero-length, which GFF3 cannot represent.
    ZeroLengthInterval(Interval),

    /// The built record is invalid.
    Invalid(Violation),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::ZeroLengthInterval(interval) => {
                write!(f, "zero-length interval cannot be represented: {interval}")
            }
            Error::Invalid(err) => write!(f, "invalid record: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Record`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The feature's interval.
    interval: Option<Interval>,

    /// The source column.
    source: Option<String>,

    /// The type column.
    feature_type: Option<String>,

    /// The score.
    score: Option<f64>,

    /// The phase.
    phase: Option<u8>,

    /// The attributes.
    attributes: Attributes,
}

impl Builder {
    /// Sets the feature's interval.
    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the source column (defaults to `.`).
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the type column.
    pub fn feature_type(mut self, feature_type: impl Into<String>) -> Self {
        self.feature_type = Some(feature_type.into());
        self
    }

    /// Sets the score.
    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Sets the phase.
    pub fn phase(mut self, phase: u8) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Adds values for an attribute key.
    pub fn push_attribute(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(key, values);
        self
    }

    /// Consumes `self` to attempt to build a [`Record`].
    ///
    /// The record is validated with the default [`Options`].
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Interval;
    /// use biocoord::core::Strand;
    /// use biocoord::gff3::record::Builder;
    ///
    /// let record = Builder::default()
    ///     .interval(Interval::try_new("chr1", 0, 100, Strand::Forward)?)
    ///     .feature_type("gene")
    ///     .push_attribute("ID", vec![String::from("g1")])
    ///     .try_build()?;
    ///
    /// assert_eq!(record.to_string(), "chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Record> {
        let interval = self.interval.ok_or(Error::Missing(MissingError::Interval))?;
        let feature_type = self
            .feature_type
            .ok_or(Error::Missing(MissingError::FeatureType))?;

        if interval.is_empty() {
            return Err(Error::ZeroLengthInterval(interval));
        }

        let record = Record {
            interval,
            source: self.source.unwrap_or_else(|| MISSING.to_string()),
            feature_type,
            score: self.score,
            phase: self.phase,
            attributes: self.attributes,
        };

        record
            .validate(&Options::default())
            .map_err(Error::Invalid)?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Strand;

    #[test]
    fn it_fails_to_build_without_a_feature_type()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .interval(Interval::try_new("chr1", 0, 10, Strand::Forward)?)
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: feature type");

        Ok(())
    }

    #[test]
    fn it_fails_to_build_a_zero_length_feature()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .interval(Interval::try_new("chr1", 10, 10, Strand::Forward)?)
            .feature_type("insertion_site")
            .try_build()
            .unwrap_err();

        assert!(matches!(err, Error::ZeroLengthInterval(_)));

        Ok(())
    }

    #[test]
    fn it_validates_the_built_record() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .interval(Interval::try_new("chr1", 0, 9, Strand::Forward)?)
            .feature_type("CDS")
            .try_build()
            .unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::MissingPhase)));

        let record = Builder::default()
            .interval(Interval::try_new("chr1", 0, 9, Strand::Forward)?)
            .feature_type("CDS")
            .phase(0)
            .score(1.5)
            .try_build()?;
        assert_eq!(record.to_string(), "chr1\t.\tCDS\t1\t9\t1.5\t+\t0\t.");

        Ok(())
    }

    #[test]
    fn it_rejects_columns_that_cannot_be_written()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .interval(Interval::try_new("chr1", 0, 10, Strand::Forward)?)
            .source("")
            .feature_type("gene")
            .try_build()
            .unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::EmptyColumn("source"))));

        let err = Builder::default()
            .interval(Interval::try_new("chr1", 0, 10, Strand::Forward)?)
            .feature_type("gene\tx")
            .try_build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(Violation::ReservedCharacterInColumn("type"))
        ));
        assert_eq!(
            err.to_string(),
            "invalid record: the type column cannot contain a tab or a line break"
        );

        let record = Builder::default()
            .interval(Interval::try_new("chr1", 0, 10, Strand::Forward)?)
            .source("ensembl")
            .feature_type("gene")
            .try_build()?;
        assert_eq!(record.to_string().parse::<Record>()?, record);

        Ok(())
    }
}
