//! Record validation.
//!
//! Every parser in this crate validates each record immediately after its
//! fields are parsed and before it is yielded. Validation failures are never
//! dropped silently: depending on the [`Policy`], the stream either ends at
//! the first failure or yields the failure and moves on to the next record.

use crate::core::Number;
use crate::Error;
use crate::ErrorKind;
use crate::Options;

/// A violated record invariant.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    /// A GFF3 attribute entry without a `=` (only under strict attributes).
    AttributeWithoutValue(String),

    /// A GFF3 attribute entry with an empty key.
    EmptyAttributeKey,

    /// A GFF3 score that is not a finite number.
    NonFiniteScore(f64),

    /// A GFF3 phase outside of `0`, `1`, or `2`.
    InvalidPhase(u8),

    /// A GFF3 `CDS` feature without a phase.
    MissingPhase,

    /// A GFF3 column that is empty.
    EmptyColumn(&'static str),

    /// A GFF3 column that contains a tab or a line break.
    ReservedCharacterInColumn(&'static str),

    /// A PSL sequence whose strand is unknown.
    StrandRequired(String),

    /// A PSL aligned region that extends beyond its sequence.
    AlignmentExceedsSequence(String, Number, Number),

    /// A PSL block with a size of zero.
    ZeroSizedBlock(usize),

    /// A PSL block that falls outside of the aligned query region.
    QueryBlockOutOfBounds(usize),

    /// A PSL block that falls outside of the aligned target region.
    TargetBlockOutOfBounds(usize),

    /// A PSL block whose target start precedes the previous block's.
    UnorderedBlocks(usize),

    /// The PSL block sizes sum to more than the aligned length of the query
    /// or the target.
    BlockSizeSumExceedsAlignment(Number, Number),

    /// A FASTA identifier that is empty.
    EmptyIdentifier,

    /// A FASTA identifier that contains whitespace.
    WhitespaceInIdentifier(String),

    /// A FASTA sequence byte that would break the record's framing.
    ReservedSequenceByte(usize, u8),
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::AttributeWithoutValue(key) => {
                write!(f, "attribute `{key}` is missing a `=`")
            }
            Violation::EmptyAttributeKey => write!(f, "attribute key cannot be empty"),
            Violation::NonFiniteScore(score) => write!(f, "score must be finite, found {score}"),
            Violation::InvalidPhase(phase) => {
                write!(f, "phase must be 0, 1, or 2, found {phase}")
            }
            Violation::MissingPhase => write!(f, "CDS features require a phase"),
            Violation::EmptyColumn(column) => write!(f, "the {column} column cannot be empty"),
            Violation::ReservedCharacterInColumn(column) => write!(
                f,
                "the {column} column cannot contain a tab or a line break"
            ),
            Violation::StrandRequired(name) => {
                write!(f, "sequence `{name}` must be on the `+` or `-` strand")
            }
            Violation::AlignmentExceedsSequence(name, end, size) => write!(
                f,
                "the aligned end ({end}) exceeds the size of sequence `{name}` ({size})"
            ),
            Violation::ZeroSizedBlock(index) => write!(f, "block {index} has a size of zero"),
            Violation::QueryBlockOutOfBounds(index) => {
                write!(f, "block {index} falls outside of the aligned query region")
            }
            Violation::TargetBlockOutOfBounds(index) => {
                write!(f, "block {index} falls outside of the aligned target region")
            }
            Violation::UnorderedBlocks(index) => write!(
                f,
                "block {index} starts before the previous block on the target"
            ),
            Violation::BlockSizeSumExceedsAlignment(sum, aligned) => write!(
                f,
                "block sizes sum to {sum}, which exceeds the aligned length ({aligned})"
            ),
            Violation::EmptyIdentifier => write!(f, "identifier cannot be empty"),
            Violation::WhitespaceInIdentifier(identifier) => {
                write!(f, "identifier `{identifier}` cannot contain whitespace")
            }
            Violation::ReservedSequenceByte(position, byte) => write!(
                f,
                "sequence byte {position} ({:?}) is not allowed in a sequence",
                char::from(*byte)
            ),
        }
    }
}

impl std::error::Error for Violation {}

/// A record that can be checked against its format's invariants.
pub trait Validate {
    /// Checks the record, returning the first violated invariant.
    fn validate(&self, options: &Options) -> Result<(), Violation>;
}

/// What a stream does after yielding an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Policy {
    /// End the stream after the first error.
    FailFast,

    /// Skip the offending record and continue with the next one.
    Continue,
}

impl Policy {
    /// Whether the stream must end after yielding `err`.
    ///
    /// Only malformed records can be skipped: invalid intervals, I/O failures,
    /// and unknown formats always end the stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::Error;
    /// use biocoord::validate::Policy;
    ///
    /// let err = Error::UnknownFormat(String::from("reads.bam"));
    /// assert!(Policy::Continue.halts_on(&err));
    /// assert!(Policy::FailFast.halts_on(&err));
    /// ```
    pub fn halts_on(&self, err: &Error) -> bool {
        match err.kind() {
            ErrorKind::MalformedRecord => *self == Policy::FailFast,
            ErrorKind::InvalidInterval | ErrorKind::UnknownFormat | ErrorKind::Io => true,
        }
    }
}

impl From<&Options> for Policy {
    fn from(options: &Options) -> Self {
        match options.fail_fast() {
            true => Policy::FailFast,
            false => Policy::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Builder;

    #[test]
    fn test_policy_from_options() {
        assert_eq!(Policy::from(&Options::default()), Policy::FailFast);

        let options = Builder::default().fail_fast(false).build();
        assert_eq!(Policy::from(&options), Policy::Continue);
    }

    #[test]
    fn test_violation_display() {
        assert_eq!(
            Violation::BlockSizeSumExceedsAlignment(12, 10).to_string(),
            "block sizes sum to 12, which exceeds the aligned length (10)"
        );
        assert_eq!(
            Violation::AttributeWithoutValue(String::from("Note")).to_string(),
            "attribute `Note` is missing a `=`"
        );
    }
}
