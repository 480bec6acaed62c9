//! The FASTA sequence format.
//!
//! A record's interval is the whole of its sequence, `[0, len)`, on the
//! unknown strand, named by the first word of the header line.

pub mod reader;
pub mod record;
pub mod writer;

pub use reader::Reader;
pub use record::Record;
pub use writer::Writer;
