//! GFF3 directives (lines starting with `##`).

use std::num::ParseIntError;
use std::str::FromStr;

use crate::core::Interval;
use crate::core::Number;
use crate::core::Strand;
use crate::core::interval;
use crate::core::interval::ZeroLength;

/// The prefix for a directive.
pub const PREFIX: &str = "##";

/// The line marking that all forward references have been resolved.
pub const FORWARD_REFERENCES_RESOLVED: &str = "###";

/// The name of the version directive.
const GFF_VERSION: &str = "gff-version";

/// The name of the sequence region directive.
const SEQUENCE_REGION: &str = "sequence-region";

/// The name of the directive that starts the embedded FASTA section.
const FASTA: &str = "FASTA";

/// An error associated with parsing a [`Directive`].
#[derive(Debug)]
pub enum ParseError {
    /// The line does not start with `##`.
    MissingPrefix,

    /// The version directive has no version.
    MissingVersion,

    /// The sequence region directive has an incorrect number of fields.
    IncorrectNumberOfSequenceRegionFields(usize),

    /// A sequence region position could not be parsed.
    InvalidPosition(ParseIntError),

    /// The sequence region does not describe a valid interval.
    InvalidInterval(interval::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingPrefix => write!(f, "directives must start with `{PREFIX}`"),
            ParseError::MissingVersion => write!(f, "the {GFF_VERSION} directive needs a version"),
            ParseError::IncorrectNumberOfSequenceRegionFields(fields) => write!(
                f,
                "invalid number of fields in the {SEQUENCE_REGION} directive: expected 3 fields, \
                 found {fields} fields"
            ),
            ParseError::InvalidPosition(err) => write!(f, "invalid position: {err}"),
            ParseError::InvalidInterval(err) => write!(f, "invalid interval: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A GFF3 directive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Directive {
    /// `##gff-version`, with the version as written.
    GffVersion(String),

    /// `##sequence-region`, converted to a canonical interval.
    SequenceRegion(Interval),

    /// `###`: all forward references have been resolved.
    ForwardReferencesResolved,

    /// `##FASTA`: the remainder of the stream is FASTA.
    Fasta,

    /// Any other directive, kept verbatim (without the leading `##`).
    Other(String),
}

impl FromStr for Directive {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == FORWARD_REFERENCES_RESOLVED {
            return Ok(Directive::ForwardReferencesResolved);
        }

        let body = s.strip_prefix(PREFIX).ok_or(ParseError::MissingPrefix)?;
        let mut fields = body.split_ascii_whitespace();

        match fields.next() {
            Some(GFF_VERSION) => fields
                .next()
                .map(|version| Directive::GffVersion(version.to_string()))
                .ok_or(ParseError::MissingVersion),
            Some(SEQUENCE_REGION) => {
                let fields = fields.collect::<Vec<_>>();

                if fields.len() != 3 {
                    return Err(ParseError::IncorrectNumberOfSequenceRegionFields(
                        fields.len(),
                    ));
                }

                let start = fields[1]
                    .parse::<Number>()
                    .map_err(ParseError::InvalidPosition)?;
                let end = fields[2]
                    .parse::<Number>()
                    .map_err(ParseError::InvalidPosition)?;

                Interval::from_one_based_closed(
                    fields[0],
                    Strand::Unknown,
                    start,
                    end,
                    ZeroLength::Forbid,
                )
                .map(Directive::SequenceRegion)
                .map_err(ParseError::InvalidInterval)
            }
            Some(FASTA) if body.trim_end() == FASTA => Ok(Directive::Fasta),
            _ => Ok(Directive::Other(body.to_string())),
        }
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::GffVersion(version) => write!(f, "{PREFIX}{GFF_VERSION} {version}"),
            Directive::SequenceRegion(interval) => {
                let (start, end) = interval.to_one_based_closed();
                write!(
                    f,
                    "{PREFIX}{SEQUENCE_REGION} {} {start} {end}",
                    interval.reference()
                )
            }
            Directive::ForwardReferencesResolved => write!(f, "{FORWARD_REFERENCES_RESOLVED}"),
            Directive::Fasta => write!(f, "{PREFIX}{FASTA}"),
            Directive::Other(body) => write!(f, "{PREFIX}{body}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            "##gff-version 3.1.26".parse::<Directive>()?,
            Directive::GffVersion(String::from("3.1.26"))
        );
        assert_eq!(
            "###".parse::<Directive>()?,
            Directive::ForwardReferencesResolved
        );
        assert_eq!("##FASTA".parse::<Directive>()?, Directive::Fasta);
        assert_eq!(
            "##species https://www.ncbi.nlm.nih.gov/Taxonomy/?id=9606".parse::<Directive>()?,
            Directive::Other(String::from(
                "species https://www.ncbi.nlm.nih.gov/Taxonomy/?id=9606"
            ))
        );

        Ok(())
    }

    #[test]
    fn test_sequence_region() -> Result<(), Box<dyn std::error::Error>> {
        let directive = "##sequence-region   ctg123 1 1497228".parse::<Directive>()?;

        let Directive::SequenceRegion(interval) = &directive else {
            panic!("expected a sequence region, found {directive:?}");
        };

        assert_eq!(interval.reference(), "ctg123");
        assert_eq!(interval.start(), 0);
        assert_eq!(interval.end(), 1497228);
        assert_eq!(directive.to_string(), "##sequence-region ctg123 1 1497228");

        Ok(())
    }

    #[test]
    fn test_invalid_sequence_regions() {
        let err = "##sequence-region ctg123 1".parse::<Directive>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of fields in the sequence-region directive: expected 3 fields, found \
             2 fields"
        );

        let err = "##sequence-region ctg123 100 1"
            .parse::<Directive>()
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidInterval(_)));
    }
}
