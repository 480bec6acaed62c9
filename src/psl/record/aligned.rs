//! Stepping through the blocks of a PSL record as forward-strand intervals.
//!
//! PSL stores the block starts of a reverse-strand sequence relative to its
//! reverse complement. Each block is mapped back to forward-strand coordinates
//! with `start' = size - end` and `end' = size - start`, and the biological
//! strand is kept on the resulting interval.

use crate::core::Interval;
use crate::core::interval;
use crate::psl::Record;
use crate::psl::record::Sequence;

/// An error related to stepping through aligned blocks.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The block at the given index does not fit within its sequence.
    BlockOutOfBounds(usize),

    /// The query and target intervals of a block differ in length.
    LengthsDontMatch(u64, u64),

    /// An interval error.
    Interval(interval::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BlockOutOfBounds(index) => {
                write!(f, "block {index} does not fit within its sequence")
            }
            Error::LengthsDontMatch(query, target) => write!(
                f,
                "query interval length ({query}) doesn't match target interval length ({target})"
            ),
            Error::Interval(err) => write!(f, "interval error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A pair of forward-strand intervals covered by one ungapped block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlignedBlock {
    /// The query interval.
    query: Interval,

    /// The target interval.
    target: Interval,
}

impl AlignedBlock {
    /// Attempts to create a new [`AlignedBlock`] from a query interval and a
    /// target interval of the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Interval;
    /// use biocoord::psl::record::AlignedBlock;
    ///
    /// let query = "q:-:0-10".parse::<Interval>()?;
    /// let target = "t:+:90-100".parse::<Interval>()?;
    /// AlignedBlock::try_new(query, target)?;
    ///
    /// let query = "q:-:0-10".parse::<Interval>()?;
    /// let target = "t:+:90-101".parse::<Interval>()?;
    /// assert!(AlignedBlock::try_new(query, target).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(query: Interval, target: Interval) -> Result<Self, Error> {
        if query.len() != target.len() {
            return Err(Error::LengthsDontMatch(query.len(), target.len()));
        }

        Ok(Self { query, target })
    }

    /// Gets the query interval.
    pub fn query(&self) -> &Interval {
        &self.query
    }

    /// Gets the target interval.
    pub fn target(&self) -> &Interval {
        &self.target
    }

    /// Consumes `self` and returns the query and target intervals.
    pub fn into_parts(self) -> (Interval, Interval) {
        (self.query, self.target)
    }
}

/// An iterator over the [`AlignedBlock`]s of a [`Record`].
#[derive(Debug)]
pub struct AlignedBlocks<'a> {
    /// The record.
    record: &'a Record,

    /// The index of the next block.
    index: usize,
}

impl<'a> AlignedBlocks<'a> {
    /// Creates a new [`AlignedBlocks`].
    pub(crate) fn new(record: &'a Record) -> Self {
        Self { record, index: 0 }
    }
}

impl Iterator for AlignedBlocks<'_> {
    type Item = Result<AlignedBlock, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        let block = self.record.blocks().get(index)?;
        self.index += 1;

        let query = match forward(self.record.query(), block.query_start(), block.size(), index) {
            Ok(interval) => interval,
            Err(err) => return Some(Err(err)),
        };

        let target = match forward(
            self.record.target(),
            block.target_start(),
            block.size(),
            index,
        ) {
            Ok(interval) => interval,
            Err(err) => return Some(Err(err)),
        };

        Some(AlignedBlock::try_new(query, target))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.blocks().len() - self.index;
        (remaining, Some(remaining))
    }
}

/// Maps a source-native block on a sequence to a forward-strand interval.
fn forward(sequence: &Sequence, start: u64, len: u64, index: usize) -> Result<Interval, Error> {
    let (start, end) = sequence
        .to_forward(start, len)
        .ok_or(Error::BlockOutOfBounds(index))?;

    Interval::try_new(sequence.name(), start, end, sequence.strand()).map_err(Error::Interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Strand;

    #[test]
    fn test_reverse_query_blocks() -> Result<(), Box<dyn std::error::Error>> {
        let line = "20\t0\t0\t0\t1\t5\t1\t10\t-\tq1\t100\t10\t35\tchr1\t1000\t100\t130\t2\t\
                    10,10,\t65,80,\t100,120,";
        let record = line.parse::<Record>()?;

        let blocks = record.aligned_blocks().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(blocks.len(), 2);

        assert_eq!(blocks[0].query().to_string(), "q1:-:25-35");
        assert_eq!(blocks[0].target().to_string(), "chr1:+:100-110");
        assert_eq!(blocks[1].query().to_string(), "q1:-:10-20");
        assert_eq!(blocks[1].target().to_string(), "chr1:+:120-130");

        for block in &blocks {
            assert!(record.query().start() <= block.query().start());
            assert!(block.query().end() <= record.query().end());
        }

        Ok(())
    }

    #[test]
    fn test_reverse_target_blocks() -> Result<(), Box<dyn std::error::Error>> {
        let line = "20\t0\t0\t0\t1\t5\t1\t10\t+-\tq1\t100\t10\t35\tchr1\t1000\t100\t130\t2\t\
                    10,10,\t10,25,\t870,890,";
        let record = line.parse::<Record>()?;

        let (query, target) = record
            .aligned_blocks()
            .next()
            .expect("a block")?
            .into_parts();
        assert_eq!(query.to_string(), "q1:+:10-20");
        assert_eq!(target.strand(), Strand::Reverse);
        assert_eq!((target.start(), target.end()), (120, 130));

        Ok(())
    }

    #[test]
    fn test_unvalidated_out_of_bounds_block() -> Result<(), Box<dyn std::error::Error>> {
        let line = "10\t0\t0\t0\t0\t0\t0\t0\t-\tq1\t100\t0\t10\tchr1\t1000\t0\t10\t1\t\
                    10,\t95,\t0,";
        let record = Record::parse(line)?;

        let err = record.aligned_blocks().next().expect("a block").unwrap_err();
        assert_eq!(err, Error::BlockOutOfBounds(0));

        Ok(())
    }
}
