//! An ungapped block of a PSL alignment.

use crate::core::Number;

/// A contiguous, ungapped block of a PSL alignment.
///
/// Start positions are source-native: on the reverse strand, they are
/// relative to the reverse complement of the sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Block {
    /// The size of the block.
    size: Number,

    /// The start of the block within the query.
    query_start: Number,

    /// The start of the block within the target.
    target_start: Number,
}

impl Block {
    /// Creates a new [`Block`].
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::psl::record::Block;
    ///
    /// let block = Block::new(10, 0, 100);
    ///
    /// assert_eq!(block.size(), 10);
    /// assert_eq!(block.query_start(), 0);
    /// assert_eq!(block.target_start(), 100);
    /// ```
    pub fn new(size: Number, query_start: Number, target_start: Number) -> Self {
        Self {
            size,
            query_start,
            target_start,
        }
    }

    /// Gets the size of the block.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the source-native start of the block within the query.
    pub fn query_start(&self) -> Number {
        self.query_start
    }

    /// Gets the source-native start of the block within the target.
    pub fn target_start(&self) -> Number {
        self.target_start
    }
}
