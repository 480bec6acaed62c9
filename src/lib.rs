//! `biocoord` is a crate for reading genomic records from GFF3, PSL, and FASTA
//! files and normalizing their coordinates into a single interval model.
//!
//! Each format counts positions its own way: GFF3 uses 1-based, fully-closed
//! coordinates, PSL uses 0-based, half-open coordinates whose block starts
//! flip on the reverse strand, and FASTA has no coordinates at all beyond the
//! length of each sequence. This crate converts all of them into an
//! [`Interval`](crate::core::Interval), which is always 0-based, half-open,
//! and stored in forward-strand coordinates with the strand carried alongside.
//!
//! The crate provides two main points of entry:
//!
//! - A [`Reader`] that determines the format of a stream and yields
//!   [`Record`]s from it.
//! - Per-format readers and writers ([`gff3`], [`psl`], and [`fasta`]) for
//!   when the format is known ahead of time and the full record types are
//!   needed.
//!
//! ## Reading any supported format
//!
//! [`Reader::open()`] picks a format from an explicit hint, the extension of
//! the resource identifier, or (failing both) the first non-blank line of the
//! stream. The content is only peeked at, never consumed.
//!
//! ```
//! use biocoord::Format;
//! use biocoord::Options;
//! use biocoord::Reader;
//!
//! let data = b">seq1 desc\nACGT\nACGT\n";
//! let mut reader = Reader::open("stdin", None, &data[..], Options::default())?;
//! assert_eq!(reader.format(), Format::Fasta);
//!
//! for result in reader.records() {
//!     let record = result?;
//!     assert_eq!(record.interval().to_string(), "seq1:.:0-8");
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Errors
//!
//! Every record-level [`Error`] carries a [`Location`](error::Location) and
//! the reason the record was rejected. By default, readers stop at the first
//! malformed record. With [`Options::fail_fast()`] disabled, malformed records
//! are reported and skipped, but an impossible interval always ends the
//! stream.
//!
//! ```
//! use biocoord::ErrorKind;
//! use biocoord::gff3;
//! use biocoord::options::Builder;
//!
//! let data = b"chr1\t.\tgene\t1\t100\t.\t+\t.\n\
//!              chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1\n";
//!
//! let options = Builder::default().fail_fast(false).build();
//! let mut reader = gff3::Reader::with_options(&data[..], options);
//! let results = reader.records().collect::<Vec<_>>();
//!
//! assert_eq!(results.len(), 2);
//! assert!(results[0]
//!     .as_ref()
//!     .is_err_and(|err| err.kind() == ErrorKind::MalformedRecord));
//! assert!(results[1].is_ok());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod core;
pub mod error;
pub mod fasta;
pub mod format;
pub mod gff3;
pub mod options;
pub mod psl;
pub mod reader;
pub mod record;
pub mod validate;

pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
pub use format::Format;
pub use options::Options;
pub use record::Record;

pub use self::reader::Reader;
