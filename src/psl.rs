//! The Pattern Space Layout format, as written by `blat`.
//!
//! Each record aligns a query sequence against a target sequence as a series
//! of ungapped blocks. The aligned regions (`qStart`/`qEnd`, `tStart`/`tEnd`)
//! are already 0-based, half-open, and on the forward strand, so they become
//! the record's canonical intervals as written. Block starts are
//! source-native; see [`Record::aligned_blocks()`] for the forward-strand
//! view.

pub mod reader;
pub mod record;
pub mod writer;

pub use reader::Reader;
pub use record::Record;
pub use writer::Writer;
