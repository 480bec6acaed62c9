//! Lines within a GFF3 file.

use std::str::FromStr;

use crate::gff3::Directive;
use crate::gff3::Record;
use crate::gff3::directive;
use crate::gff3::record;

/// The prefix for a comment line.
pub const COMMENT_PREFIX: char = '#';

/// An error related to parsing a [`Line`].
#[derive(Debug)]
pub enum Error {
    /// An invalid directive.
    InvalidDirective(directive::ParseError),

    /// An invalid feature record.
    InvalidRecord(record::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidDirective(err) => write!(f, "invalid directive: {err}"),
            Error::InvalidRecord(err) => write!(f, "invalid record: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A line within a GFF3 file.
///
/// Feature lines are parsed, but not validated, when a [`Line`] is parsed:
/// validation depends on the reader's [`Options`](crate::Options).
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    /// An empty line.
    Empty,

    /// A comment, without the leading `#`.
    Comment(String),

    /// A directive.
    Directive(Directive),

    /// A feature record.
    Record(Record),
}

impl FromStr for Line {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            Ok(Self::Empty)
        } else if s.starts_with(directive::PREFIX) {
            s.parse()
                .map(Self::Directive)
                .map_err(Error::InvalidDirective)
        } else if let Some(comment) = s.strip_prefix(COMMENT_PREFIX) {
            Ok(Self::Comment(comment.to_string()))
        } else {
            Record::parse(s)
                .map(Self::Record)
                .map_err(Error::InvalidRecord)
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Empty => Ok(()),
            Line::Comment(comment) => write!(f, "{COMMENT_PREFIX}{comment}"),
            Line::Directive(directive) => write!(f, "{directive}"),
            Line::Record(record) => write!(f, "{record}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_kinds() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("".parse::<Line>()?, Line::Empty);
        assert_eq!("  ".parse::<Line>()?, Line::Empty);
        assert_eq!(
            "# made by hand".parse::<Line>()?,
            Line::Comment(String::from(" made by hand"))
        );
        assert_eq!(
            "###".parse::<Line>()?,
            Line::Directive(Directive::ForwardReferencesResolved)
        );
        assert!(matches!(
            "chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1".parse::<Line>()?,
            Line::Record(_)
        ));

        Ok(())
    }

    #[test]
    fn test_invalid_record_line() {
        let err = "chr1\tgene".parse::<Line>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid record: parse error: invalid number of fields: expected 9 fields, found 2 \
             fields"
        );
    }
}
