//! A PSL alignment record.

pub mod aligned;
pub mod block;
pub mod builder;
pub mod sequence;

use std::num::ParseIntError;
use std::str::FromStr;

pub use aligned::AlignedBlock;
pub use aligned::AlignedBlocks;
pub use block::Block;
pub use builder::Builder;
pub use sequence::Sequence;

use nonempty::NonEmpty;

use crate::Options;
use crate::core::Number;
use crate::core::Strand;
use crate::core::interval;
use crate::validate::Validate;
use crate::validate::Violation;

/// The delimiter between columns.
pub const DELIMITER: char = '\t';

/// The delimiter within the block lists.
pub const LIST_DELIMITER: char = ',';

/// The number of columns in a PSL line.
pub const NUM_FIELDS: usize = 21;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing a PSL line.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of columns.
    IncorrectNumberOfFields(usize),

    /// An invalid count column.
    InvalidCount(&'static str, ParseIntError),

    /// An invalid strand column.
    InvalidStrand(String),

    /// An invalid query sequence.
    InvalidQuerySequence(sequence::ParseError),

    /// An invalid target sequence.
    InvalidTargetSequence(sequence::ParseError),

    /// An invalid block count.
    InvalidBlockCount(ParseIntError),

    /// The block count was zero.
    NoBlocks,

    /// A block list did not have as many entries as the block count.
    BlockCountMismatch(&'static str, usize, usize),

    /// An entry in a block list could not be parsed.
    InvalidBlockList(&'static str, ParseIntError),

    /// A `psLayout` header ran on without its closing rule.
    UnterminatedHeader,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields: expected {NUM_FIELDS} fields, found {fields} fields"
            ),
            ParseError::InvalidCount(column, err) => write!(f, "invalid {column}: {err}"),
            ParseError::InvalidStrand(strand) => write!(
                f,
                "invalid strand: expected one or two of `+` and `-`, found `{strand}`"
            ),
            ParseError::InvalidQuerySequence(err) => write!(f, "invalid query sequence: {err}"),
            ParseError::InvalidTargetSequence(err) => write!(f, "invalid target sequence: {err}"),
            ParseError::InvalidBlockCount(err) => write!(f, "invalid block count: {err}"),
            ParseError::NoBlocks => write!(f, "a record must have at least one block"),
            ParseError::BlockCountMismatch(column, expected, found) => write!(
                f,
                "{column} has {found} entries, but the block count is {expected}"
            ),
            ParseError::InvalidBlockList(column, err) => write!(f, "invalid {column}: {err}"),
            ParseError::UnterminatedHeader => {
                write!(f, "the psLayout header is missing its closing rule")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a [`Record`].
#[derive(Debug)]
pub enum Error {
    /// An aligned region does not form a valid interval.
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

/// The count columns of a PSL record, in column order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counts {
    /// Matching bases that are not repeats.
    pub matches: Number,

    /// Mismatching bases.
    pub mismatches: Number,

    /// Matching bases that are part of repeats.
    pub repeat_matches: Number,

    /// `N` bases.
    pub n_count: Number,

    /// The number of inserts in the query.
    pub query_gap_count: Number,

    /// The number of bases inserted in the query.
    pub query_gap_bases: Number,

    /// The number of inserts in the target.
    pub target_gap_count: Number,

    /// The number of bases inserted in the target.
    pub target_gap_bases: Number,
}

/// The names of the count columns, in column order.
const COUNT_COLUMNS: [&str; 8] = [
    "matches",
    "mismatches",
    "repeat matches",
    "N count",
    "query gap count",
    "query gap bases",
    "target gap count",
    "target gap bases",
];

/// A PSL alignment record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The count columns.
    counts: Counts,

    /// The query sequence.
    query: Sequence,

    /// The target sequence.
    target: Sequence,

    /// The aligned blocks.
    blocks: NonEmpty<Block>,

    /// Whether the strand column carried the target strand.
    explicit_target_strand: bool,
}

impl Record {
    /// Parses a PSL line without validating the result.
    ///
    /// Most callers want [`str::parse()`], which also validates the record.
    pub fn parse(s: &str) -> Result<Self> {
        let fields = s.split(DELIMITER).collect::<Vec<_>>();

        if fields.len() != NUM_FIELDS {
            return Err(Error::Parse(ParseError::IncorrectNumberOfFields(
                fields.len(),
            )));
        }

        let mut values = [0; 8];

        for (i, value) in values.iter_mut().enumerate() {
            *value = fields[i]
                .parse()
                .map_err(|err| Error::Parse(ParseError::InvalidCount(COUNT_COLUMNS[i], err)))?;
        }

        let [
            matches,
            mismatches,
            repeat_matches,
            n_count,
            query_gap_count,
            query_gap_bases,
            target_gap_count,
            target_gap_bases,
        ] = values;

        let counts = Counts {
            matches,
            mismatches,
            repeat_matches,
            n_count,
            query_gap_count,
            query_gap_bases,
            target_gap_count,
            target_gap_bases,
        };

        let (query_strand, target_strand, explicit_target_strand) = parse_strands(fields[8])?;

        let query = Sequence::try_from_str_parts(
            fields[9],
            fields[10],
            query_strand,
            fields[11],
            fields[12],
        )
        .map_err(|err| match err {
            sequence::Error::Interval(err) => Error::Interval(err),
            sequence::Error::Parse(err) => Error::Parse(ParseError::InvalidQuerySequence(err)),
        })?;

        let target = Sequence::try_from_str_parts(
            fields[13],
            fields[14],
            target_strand,
            fields[15],
            fields[16],
        )
        .map_err(|err| match err {
            sequence::Error::Interval(err) => Error::Interval(err),
            sequence::Error::Parse(err) => Error::Parse(ParseError::InvalidTargetSequence(err)),
        })?;

        let block_count = fields[17]
            .parse::<usize>()
            .map_err(|err| Error::Parse(ParseError::InvalidBlockCount(err)))?;

        if block_count == 0 {
            return Err(Error::Parse(ParseError::NoBlocks));
        }

        let sizes = parse_list(fields[18], "block sizes", block_count)?;
        let query_starts = parse_list(fields[19], "query starts", block_count)?;
        let target_starts = parse_list(fields[20], "target starts", block_count)?;

        let blocks = sizes
            .into_iter()
            .zip(query_starts)
            .zip(target_starts)
            .map(|((size, query_start), target_start)| Block::new(size, query_start, target_start))
            .collect::<Vec<_>>();

        let blocks = NonEmpty::from_vec(blocks).ok_or(Error::Parse(ParseError::NoBlocks))?;

        Ok(Self {
            counts,
            query,
            target,
            blocks,
            explicit_target_strand,
        })
    }

    /// Gets the count columns.
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Gets the number of matching bases that are not repeats.
    pub fn matches(&self) -> Number {
        self.counts.matches
    }

    /// Gets the number of mismatching bases.
    pub fn mismatches(&self) -> Number {
        self.counts.mismatches
    }

    /// Gets the number of matching bases that are part of repeats.
    pub fn repeat_matches(&self) -> Number {
        self.counts.repeat_matches
    }

    /// Gets the query sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Strand;
    /// use biocoord::psl::Record;
    ///
    /// let line = "10\t0\t0\t0\t0\t0\t0\t0\t-\tq\t50\t5\t15\tt\t100\t20\t30\t1\t10,\t35,\t20,";
    /// let record = line.parse::<Record>()?;
    ///
    /// assert_eq!(record.query().interval().to_string(), "q:-:5-15");
    /// assert_eq!(record.query().strand(), Strand::Reverse);
    /// assert_eq!(record.query().size(), 50);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn query(&self) -> &Sequence {
        &self.query
    }

    /// Gets the target sequence.
    pub fn target(&self) -> &Sequence {
        &self.target
    }

    /// Gets the blocks, in source-native coordinates.
    pub fn blocks(&self) -> &NonEmpty<Block> {
        &self.blocks
    }

    /// Whether the strand column carried an explicit target strand (as
    /// written for translated searches).
    pub fn has_explicit_target_strand(&self) -> bool {
        self.explicit_target_strand
    }

    /// Steps through each block as a pair of forward-strand intervals.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::psl::Record;
    ///
    /// let line = "10\t0\t0\t0\t0\t0\t0\t0\t-\tq\t50\t5\t15\tt\t100\t20\t30\t1\t10,\t35,\t20,";
    /// let record = line.parse::<Record>()?;
    ///
    /// for result in record.aligned_blocks() {
    ///     let block = result?;
    ///     assert_eq!(block.query().to_string(), "q:-:5-15");
    ///     assert_eq!(block.target().to_string(), "t:+:20-30");
    /// }
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn aligned_blocks(&self) -> AlignedBlocks<'_> {
        AlignedBlocks::new(self)
    }
}

/// Parses the strand column into the query strand, the target strand, and
/// whether the target strand was explicit.
fn parse_strands(s: &str) -> Result<(Strand, Strand, bool)> {
    let invalid = || Error::Parse(ParseError::InvalidStrand(s.to_string()));

    let mut chars = s.chars();
    let query = chars.next().ok_or_else(invalid)?;
    let target = chars.next();

    if chars.next().is_some() {
        return Err(invalid());
    }

    let parse = |c: char| {
        let mut buffer = [0; 4];
        c.encode_utf8(&mut buffer)
            .parse::<Strand>()
            .map_err(|_| invalid())
    };

    match target {
        Some(target) => Ok((parse(query)?, parse(target)?, true)),
        None => Ok((parse(query)?, Strand::Forward, false)),
    }
}

/// Parses a comma-delimited block list (with an optional trailing comma).
fn parse_list(s: &str, column: &'static str, expected: usize) -> Result<Vec<Number>> {
    let s = s.strip_suffix(LIST_DELIMITER).unwrap_or(s);

    let values = match s.is_empty() {
        true => Vec::new(),
        false => s
            .split(LIST_DELIMITER)
            .map(|value| {
                value
                    .parse()
                    .map_err(|err| Error::Parse(ParseError::InvalidBlockList(column, err)))
            })
            .collect::<Result<Vec<_>>>()?,
    };

    if values.len() != expected {
        return Err(Error::Parse(ParseError::BlockCountMismatch(
            column,
            expected,
            values.len(),
        )));
    }

    Ok(values)
}

impl Validate for Record {
    fn validate(&self, _: &Options) -> std::result::Result<(), Violation> {
        for sequence in [&self.query, &self.target] {
            if !sequence.strand().is_known() {
                return Err(Violation::StrandRequired(sequence.name().to_string()));
            }

            if sequence.end() > sequence.size() {
                return Err(Violation::AlignmentExceedsSequence(
                    sequence.name().to_string(),
                    sequence.end(),
                    sequence.size(),
                ));
            }
        }

        let mut sum: Number = 0;
        let mut previous_target_start = None;

        for (i, block) in self.blocks.iter().enumerate() {
            if block.size() == 0 {
                return Err(Violation::ZeroSizedBlock(i));
            }

            if previous_target_start.is_some_and(|previous| block.target_start() < previous) {
                return Err(Violation::UnorderedBlocks(i));
            }

            previous_target_start = Some(block.target_start());

            if !within(&self.query, block.query_start(), block.size()) {
                return Err(Violation::QueryBlockOutOfBounds(i));
            }

            if !within(&self.target, block.target_start(), block.size()) {
                return Err(Violation::TargetBlockOutOfBounds(i));
            }

            sum = sum.saturating_add(block.size());
        }

        let aligned = self.query.interval().len().min(self.target.interval().len());

        if sum > aligned {
            return Err(Violation::BlockSizeSumExceedsAlignment(sum, aligned));
        }

        Ok(())
    }
}

/// Whether a source-native block lies within a sequence's aligned region once
/// mapped to forward-strand coordinates.
fn within(sequence: &Sequence, start: Number, len: Number) -> bool {
    sequence
        .to_forward(start, len)
        .is_some_and(|(start, end)| sequence.start() <= start && end <= sequence.end())
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
        let counts = &self.counts;

        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t",
            counts.matches,
            counts.mismatches,
            counts.repeat_matches,
            counts.n_count,
            counts.query_gap_count,
            counts.query_gap_bases,
            counts.target_gap_count,
            counts.target_gap_bases
        )?;

        write!(f, "{}", self.query.strand())?;

        if self.explicit_target_strand {
            write!(f, "{}", self.target.strand())?;
        }

        for sequence in [&self.query, &self.target] {
            write!(
                f,
                "\t{}\t{}\t{}\t{}",
                sequence.name(),
                sequence.size(),
                sequence.start(),
                sequence.end()
            )?;
        }

        write!(f, "\t{}\t", self.blocks.len())?;

        for block in &self.blocks {
            write!(f, "{}{LIST_DELIMITER}", block.size())?;
        }

        write!(f, "\t")?;

        for block in &self.blocks {
            write!(f, "{}{LIST_DELIMITER}", block.query_start())?;
        }

        write!(f, "\t")?;

        for block in &self.blocks {
            write!(f, "{}{LIST_DELIMITER}", block.target_start())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A two-block alignment of a forward-strand query.
    const FORWARD: &str = "20\t0\t0\t0\t1\t5\t1\t10\t+\tq1\t100\t10\t35\tchr1\t1000\t100\t130\t2\t\
                           10,10,\t10,25,\t100,120,";

    /// The same alignment with the query on the reverse strand.
    const REVERSE: &str = "20\t0\t0\t0\t1\t5\t1\t10\t-\tq1\t100\t10\t35\tchr1\t1000\t100\t130\t2\t\
                           10,10,\t65,80,\t100,120,";

    #[test]
    fn test_forward_record() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let record = FORWARD.parse::<Record>()?;

        assert_eq!(record.matches(), 20);
        assert_eq!(record.counts().target_gap_bases, 10);
        assert_eq!(record.query().interval().to_string(), "q1:+:10-35");
        assert_eq!(record.target().interval().to_string(), "chr1:+:100-130");
        assert_eq!(record.blocks().len(), 2);
        assert_eq!(record.blocks().last(), &Block::new(10, 25, 120));
        assert!(!record.has_explicit_target_strand());

        Ok(())
    }

    #[test]
    fn test_block_count_mismatch() {
        let line = "30\t0\t0\t0\t0\t0\t0\t0\t+\tq1\t100\t0\t30\tchr1\t1000\t0\t30\t2\t\
                    10,10,10,\t0,10,20,\t0,10,20,";
        let err = line.parse::<Record>().unwrap_err();

        assert!(matches!(
            err,
            Error::Parse(ParseError::BlockCountMismatch("block sizes", 2, 3))
        ));
        assert_eq!(
            err.to_string(),
            "parse error: block sizes has 3 entries, but the block count is 2"
        );
    }

    #[test]
    fn test_trailing_comma_is_optional() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let line = FORWARD.replace(",\t", "\t").trim_end_matches(',').to_string();
        assert!(!line.ends_with(','));

        let record = line.parse::<Record>()?;
        assert_eq!(record, FORWARD.parse::<Record>()?);
        assert_eq!(record.to_string(), FORWARD);

        Ok(())
    }

    #[test]
    fn test_canonical_lines_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        for line in [FORWARD, REVERSE] {
            let record = line.parse::<Record>()?;
            assert_eq!(record.to_string(), line);
            assert_eq!(record.to_string().parse::<Record>()?, record);
        }

        Ok(())
    }

    #[test]
    fn test_two_character_strands() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let line = FORWARD.replacen("\t+\t", "\t+-\t", 1);
        let line = line.replace("100,120,", "870,890,");
        let record = line.parse::<Record>()?;

        assert!(record.has_explicit_target_strand());
        assert_eq!(record.target().strand(), Strand::Reverse);
        assert_eq!(record.to_string(), line);

        let err = FORWARD
            .replacen("\t+\t", "\t+-+\t", 1)
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidStrand(_))));

        Ok(())
    }

    #[test]
    fn test_block_invariants() {
        // Blocks out of order on the target.
        let line = FORWARD.replace("100,120,", "120,100,");
        let err = line.parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::UnorderedBlocks(1))));

        // A block outside of the aligned query region.
        let line = FORWARD.replace("10,25,", "10,30,");
        let err = line.parse::<Record>().unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(Violation::QueryBlockOutOfBounds(1))
        ));

        // Reverse-strand block starts that were not reverse-complemented.
        let line = REVERSE.replace("65,80,", "10,25,");
        let err = line.parse::<Record>().unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(Violation::QueryBlockOutOfBounds(0))
        ));

        // An aligned region beyond the end of the target.
        let line = FORWARD.replace("chr1\t1000", "chr1\t120");
        let err = line.parse::<Record>().unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(Violation::AlignmentExceedsSequence(_, 130, 120))
        ));

        // Zero-sized blocks.
        let line = FORWARD.replace("10,10,\t", "10,0,\t");
        let err = line.parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::ZeroSizedBlock(1))));
    }

    #[test]
    fn test_block_size_sum() {
        // Overlapping blocks that each fit, but sum past the aligned length.
        let line = "40\t0\t0\t0\t0\t0\t0\t0\t+\tq1\t100\t0\t30\tchr1\t1000\t0\t30\t2\t\
                    20,20,\t0,10,\t0,10,";
        let err = line.parse::<Record>().unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(Violation::BlockSizeSumExceedsAlignment(40, 30))
        ));
    }

    #[test]
    fn test_unknown_strand() {
        let line = FORWARD.replacen("\t+\t", "\t.\t", 1);
        let err = line.parse::<Record>().unwrap_err();
        assert!(matches!(err, Error::Invalid(Violation::StrandRequired(_))));
    }
}
