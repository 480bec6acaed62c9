//! The Generic Feature Format, version 3.
//!
//! Feature lines carry 1-based, fully-closed coordinates, which are converted
//! to canonical [`Interval`](crate::core::Interval)s as records are parsed.
//! GFF3 cannot represent zero-length features.

pub mod directive;
pub mod line;
pub mod reader;
pub mod record;
pub mod writer;

pub use directive::Directive;
pub use line::Line;
pub use reader::Reader;
pub use record::Record;
pub use writer::Writer;
