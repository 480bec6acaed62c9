//! A builder for a PSL record.

use nonempty::NonEmpty;

use crate::Options;
use crate::psl::Record;
use crate::psl::record::Block;
use crate::psl::record::Counts;
use crate::psl::record::Sequence;
use crate::validate::Validate;
use crate::validate::Violation;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No query sequence was provided to the [`Builder`].
    Query,

    /// No target sequence was provided to the [`Builder`].
    Target,

    /// No blocks were provided to the [`Builder`].
    Blocks,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Query => write!(f, "query"),
            MissingError::Target => write!(f, "target"),
            MissingError::Blocks => write!(f, "blocks"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The query field was provided multiple times to the [`Builder`].
    Query,

    /// The target field was provided multiple times to the [`Builder`].
    Target,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Query => write!(f, "query"),
            MultipleError::Target => write!(f, "target"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// The built record is invalid.
    Invalid(Violation),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
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
    /// The count columns.
    counts: Counts,

    /// The query sequence.
    query: Option<Sequence>,

    /// The target sequence.
    target: Option<Sequence>,

    /// The blocks.
    blocks: Option<NonEmpty<Block>>,

    /// Whether to write the target strand explicitly.
    explicit_target_strand: bool,
}

impl Builder {
    /// Sets the count columns.
    pub fn counts(mut self, counts: Counts) -> Self {
        self.counts = counts;
        self
    }

    /// Sets the query sequence for the [`Builder`].
    pub fn query(mut self, sequence: Sequence) -> Result<Self> {
        if self.query.is_some() {
            return Err(Error::Multiple(MultipleError::Query));
        }

        self.query = Some(sequence);
        Ok(self)
    }

    /// Sets the target sequence for the [`Builder`].
    ///
    /// The target strand is written explicitly in the strand column whenever
    /// it is not the forward strand.
    pub fn target(mut self, sequence: Sequence) -> Result<Self> {
        if self.target.is_some() {
            return Err(Error::Multiple(MultipleError::Target));
        }

        self.explicit_target_strand |= sequence.strand() != crate::core::Strand::Forward;
        self.target = Some(sequence);
        Ok(self)
    }

    /// Sets whether the target strand is written explicitly.
    ///
    /// A target strand other than the forward strand is always written, so
    /// `false` only takes effect for a forward target.
    pub fn explicit_target_strand(mut self, value: bool) -> Self {
        self.explicit_target_strand = value;
        self
    }

    /// Pushes a [`Block`] into the [`Builder`].
    pub fn push_block(mut self, block: Block) -> Self {
        let blocks = match self.blocks {
            Some(mut blocks) => {
                blocks.push(block);
                blocks
            }
            None => NonEmpty::new(block),
        };

        self.blocks = Some(blocks);
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
    /// use biocoord::psl::record::Block;
    /// use biocoord::psl::record::Builder;
    /// use biocoord::psl::record::Counts;
    /// use biocoord::psl::record::Sequence;
    ///
    /// let record = Builder::default()
    ///     .counts(Counts {
    ///         matches: 10,
    ///         ..Default::default()
    ///     })
    ///     .query(Sequence::new(Interval::try_new("q", 0, 10, Strand::Forward)?, 10))?
    ///     .target(Sequence::new(Interval::try_new("t", 5, 15, Strand::Forward)?, 20))?
    ///     .push_block(Block::new(10, 0, 5))
    ///     .try_build()?;
    ///
    /// assert_eq!(
    ///     record.to_string(),
    ///     "10\t0\t0\t0\t0\t0\t0\t0\t+\tq\t10\t0\t10\tt\t20\t5\t15\t1\t10,\t0,\t5,"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Record> {
        let query = self.query.ok_or(Error::Missing(MissingError::Query))?;
        let target = self.target.ok_or(Error::Missing(MissingError::Target))?;
        let blocks = self.blocks.ok_or(Error::Missing(MissingError::Blocks))?;

        let explicit_target_strand =
            self.explicit_target_strand || target.strand() != crate::core::Strand::Forward;

        let record = Record {
            counts: self.counts,
            query,
            target,
            blocks,
            explicit_target_strand,
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
    use crate::core::Interval;
    use crate::core::Strand;

    #[test]
    fn it_fails_to_build_without_blocks() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .query(Sequence::new(
                Interval::try_new("q", 0, 10, Strand::Forward)?,
                10,
            ))?
            .target(Sequence::new(
                Interval::try_new("t", 0, 10, Strand::Forward)?,
                10,
            ))?
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: blocks");

        Ok(())
    }

    #[test]
    fn it_fails_when_the_query_is_provided_more_than_once()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let query = Sequence::new(Interval::try_new("q", 0, 10, Strand::Forward)?, 10);

        let err = Builder::default()
            .query(query.clone())?
            .query(query)
            .unwrap_err();

        assert_eq!(err.to_string(), "singular field set multiple times: query");

        Ok(())
    }

    #[test]
    fn it_writes_a_reverse_target_strand() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = Builder::default()
            .query(Sequence::new(
                Interval::try_new("q", 0, 10, Strand::Forward)?,
                10,
            ))?
            .target(Sequence::new(
                Interval::try_new("t", 5, 15, Strand::Reverse)?,
                20,
            ))?
            .push_block(Block::new(10, 0, 5))
            .try_build()?;

        assert!(record.has_explicit_target_strand());
        assert_eq!(
            record.to_string(),
            "0\t0\t0\t0\t0\t0\t0\t0\t+-\tq\t10\t0\t10\tt\t20\t5\t15\t1\t10,\t0,\t5,"
        );
        assert_eq!(record.to_string().parse::<crate::psl::Record>()?, record);

        Ok(())
    }

    #[test]
    fn it_keeps_a_reverse_target_strand_explicit()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = Builder::default()
            .query(Sequence::new(
                Interval::try_new("q", 0, 10, Strand::Forward)?,
                10,
            ))?
            .target(Sequence::new(
                Interval::try_new("t", 5, 15, Strand::Reverse)?,
                20,
            ))?
            .explicit_target_strand(false)
            .push_block(Block::new(10, 0, 5))
            .try_build()?;

        assert!(record.has_explicit_target_strand());

        let parsed = record.to_string().parse::<crate::psl::Record>()?;
        assert_eq!(parsed.target().strand(), Strand::Reverse);
        assert_eq!(parsed, record);

        Ok(())
    }
}
