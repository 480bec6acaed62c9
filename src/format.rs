//! Supported formats and format detection.
//!
//! Detection follows a fixed order of precedence:
//!
//! 1. An explicit format hint always wins.
//! 2. Otherwise, the extension of the resource identifier is consulted
//!    (case-insensitively, ignoring compression suffixes such as `.gz`).
//! 3. Otherwise, the leading content is sniffed.
//!
//! If none of these resolve a format, detection fails with
//! [`Error::UnknownFormat`].

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::Error;

/// Compression suffixes that are ignored for the purposes of detection.
const COMPRESSION_SUFFIXES: &[&str] = &[".gz", ".bgz"];

/// The number of tab-delimited fields in a PSL line.
const PSL_FIELD_COUNT: usize = 21;

/// The leading text of the PSL header written by `blat`.
pub(crate) const PSL_HEADER_PREFIX: &str = "psLayout";

/// Matches the GFF3 version directive.
static GFF_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##gff-version\s+3(\.\d+){0,2}\s*$").expect("gff-version pattern to compile")
});

/// An error related to parsing a [`Format`] from a string.
#[derive(Debug)]
pub struct ParseFormatError(String);

impl std::fmt::Display for ParseFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a supported format", self.0)
    }
}

impl std::error::Error for ParseFormatError {}

/// A supported format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// The Generic Feature Format, version 3.
    Gff3,

    /// The Pattern Space Layout format, as written by `blat`.
    Psl,

    /// The FASTA sequence format.
    Fasta,
}

/// The capabilities of a format's records.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capabilities {
    /// Whether records carry a meaningful strand.
    strand: bool,

    /// Whether records may describe zero-length intervals.
    zero_length: bool,
}

impl Capabilities {
    /// Whether records carry a meaningful strand.
    pub fn strand(&self) -> bool {
        self.strand
    }

    /// Whether records may describe zero-length intervals.
    pub fn zero_length(&self) -> bool {
        self.zero_length
    }
}

impl Format {
    /// Gets the capabilities of the format's records.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::Format;
    ///
    /// assert!(Format::Gff3.capabilities().strand());
    /// assert!(!Format::Gff3.capabilities().zero_length());
    ///
    /// assert!(!Format::Fasta.capabilities().strand());
    /// assert!(Format::Fasta.capabilities().zero_length());
    /// ```
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Format::Gff3 => Capabilities {
                strand: true,
                zero_length: false,
            },
            Format::Psl => Capabilities {
                strand: true,
                zero_length: false,
            },
            Format::Fasta => Capabilities {
                strand: false,
                zero_length: true,
            },
        }
    }

    /// Attempts to determine a format from the extension of a resource
    /// identifier (a path or a URL).
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::Format;
    ///
    /// assert_eq!(Format::from_identifier("sample.psl"), Some(Format::Psl));
    /// assert_eq!(Format::from_identifier("GENES.GFF3.gz"), Some(Format::Gff3));
    /// assert_eq!(
    ///     Format::from_identifier("https://example.com/hg38.fa.gz?download=1"),
    ///     Some(Format::Fasta)
    /// );
    /// assert_eq!(Format::from_identifier("notes.txt"), None);
    /// ```
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let path = match identifier.contains("://") {
            true => identifier
                .split(['?', '#'])
                .next()
                .unwrap_or(identifier),
            false => identifier,
        };

        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let mut name = name.to_ascii_lowercase();

        for suffix in COMPRESSION_SUFFIXES {
            if let Some(stripped) = name.strip_suffix(suffix) {
                name = stripped.to_string();
                break;
            }
        }

        let (_, extension) = name.rsplit_once('.')?;

        match extension {
            "gff3" => Some(Format::Gff3),
            "psl" => Some(Format::Psl),
            "fa" | "fasta" => Some(Format::Fasta),
            _ => None,
        }
    }

    /// Attempts to determine a format from the leading content of a resource.
    ///
    /// Only the first non-blank line is examined.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::Format;
    ///
    /// assert_eq!(Format::sniff(b"##gff-version 3\n"), Some(Format::Gff3));
    /// assert_eq!(Format::sniff(b"\n>seq0\nACGT\n"), Some(Format::Fasta));
    /// assert_eq!(Format::sniff(b"psLayout version 3\n"), Some(Format::Psl));
    /// assert_eq!(Format::sniff(b"hello world\n"), None);
    /// ```
    pub fn sniff(content: &[u8]) -> Option<Self> {
        let line = content
            .split(|b| *b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .find(|line| !line.iter().all(u8::is_ascii_whitespace))?;

        if line.starts_with(b">") {
            return Some(Format::Fasta);
        }

        // A truncated multi-byte character at the end of the peeked chunk is
        // not a reason to give up on the rest of the line.
        let line = match std::str::from_utf8(line) {
            Ok(line) => line,
            Err(err) => std::str::from_utf8(&line[..err.valid_up_to()]).ok()?,
        };

        if GFF_VERSION.is_match(line) {
            return Some(Format::Gff3);
        }

        if line.starts_with(PSL_HEADER_PREFIX) || line.split('\t').count() == PSL_FIELD_COUNT {
            return Some(Format::Psl);
        }

        None
    }

    /// Resolves a format from an explicit hint or from the identifier alone,
    /// without looking at any content.
    pub fn resolve(identifier: &str, hint: Option<Format>) -> Option<Self> {
        hint.or_else(|| Self::from_identifier(identifier))
    }
}

/// Detects the format of a resource.
///
/// The `content` is only consulted when neither the `hint` nor the
/// identifier's extension resolve a format.
///
/// # Examples
///
/// ```
/// use biocoord::Format;
/// use biocoord::format::detect;
///
/// assert_eq!(detect("sample.psl", None, None)?, Format::Psl);
/// assert_eq!(detect("sample.psl", Some(Format::Fasta), None)?, Format::Fasta);
/// assert_eq!(detect("stdin", None, Some(&b">seq0\nACGT\n"[..]))?, Format::Fasta);
/// assert!(detect("stdin", None, Some(&b"hello"[..])).is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn detect(
    identifier: &str,
    hint: Option<Format>,
    content: Option<&[u8]>,
) -> crate::Result<Format> {
    Format::resolve(identifier, hint)
        .or_else(|| content.and_then(Format::sniff))
        .ok_or_else(|| Error::UnknownFormat(identifier.to_string()))
}

impl FromStr for Format {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gff3" | "gff" => Ok(Format::Gff3),
            "psl" => Ok(Format::Psl),
            "fasta" | "fa" => Ok(Format::Fasta),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Gff3 => write!(f, "GFF3"),
            Format::Psl => write!(f, "PSL"),
            Format::Fasta => write!(f, "FASTA"),
        }
    }
}
