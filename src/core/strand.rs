//! The strand upon which an interval is located.

use std::str::FromStr;

/// An error related to the parsing of a strand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseStrandError(String);

impl std::fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a valid strand", self.0)
    }
}

impl std::error::Error for ParseStrandError {}

/// The strand of an interval.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Strand {
    /// The forward strand (`+`).
    Forward,

    /// The reverse strand (`-`).
    Reverse,

    /// A strand that is unknown or not relevant (`.`).
    Unknown,
}

impl Strand {
    /// Returns the complementary strand.
    ///
    /// [`Strand::Unknown`] is never flipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::core::Strand;
    ///
    /// assert_eq!(Strand::Forward.complement(), Strand::Reverse);
    /// assert_eq!(Strand::Reverse.complement(), Strand::Forward);
    /// assert_eq!(Strand::Unknown.complement(), Strand::Unknown);
    /// ```
    pub fn complement(self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
            Strand::Unknown => Strand::Unknown,
        }
    }

    /// Whether the strand is known (either forward or reverse).
    pub fn is_known(self) -> bool {
        !matches!(self, Strand::Unknown)
    }
}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Forward),
            "-" => Ok(Self::Reverse),
            // GFF3 uses `?` for "relevant but unknown", which carries no more
            // information than `.` once normalized.
            "." | "?" => Ok(Self::Unknown),
            c => Err(ParseStrandError(c.into())),
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
            Strand::Unknown => write!(f, "."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_from_str() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("+".parse::<Strand>()?, Strand::Forward);
        assert_eq!("-".parse::<Strand>()?, Strand::Reverse);
        assert_eq!(".".parse::<Strand>()?, Strand::Unknown);
        assert_eq!("?".parse::<Strand>()?, Strand::Unknown);

        let err = "x".parse::<Strand>().unwrap_err();
        assert_eq!(err.to_string(), "x is not a valid strand");

        Ok(())
    }

    #[test]
    fn test_strand_display() {
        assert_eq!(Strand::Forward.to_string(), "+");
        assert_eq!(Strand::Reverse.to_string(), "-");
        assert_eq!(Strand::Unknown.to_string(), ".");
    }

    #[test]
    fn test_complement_is_involutive() {
        for strand in [Strand::Forward, Strand::Reverse, Strand::Unknown] {
            assert_eq!(strand.complement().complement(), strand);
        }

        assert_eq!(Strand::Unknown.complement(), Strand::Unknown);
    }
}
