//! A record from any supported format.

use crate::core::Interval;
use crate::fasta;
use crate::format::Capabilities;
use crate::format::Format;
use crate::gff3;
use crate::psl;

/// A record from any supported format.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// A GFF3 feature record.
    Gff3(gff3::Record),

    /// A PSL alignment record.
    Psl(psl::Record),

    /// A FASTA sequence record.
    Fasta(fasta::Record),
}

impl Record {
    /// Gets the format the record was read from.
    pub fn format(&self) -> Format {
        match self {
            Record::Gff3(_) => Format::Gff3,
            Record::Psl(_) => Format::Psl,
            Record::Fasta(_) => Format::Fasta,
        }
    }

    /// Gets the capabilities of the record's format.
    pub fn capabilities(&self) -> Capabilities {
        self.format().capabilities()
    }

    /// Gets the canonical interval of the record.
    ///
    /// For PSL records, this is the aligned region of the target sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::Record;
    /// use biocoord::psl;
    ///
    /// let line = "10\t0\t0\t0\t0\t0\t0\t0\t-\tq\t10\t0\t10\tt\t20\t5\t15\t1\t10,\t0,\t5,";
    /// let record = Record::Psl(line.parse::<psl::Record>()?);
    ///
    /// assert_eq!(record.interval().to_string(), "t:+:5-15");
    /// assert!(record.capabilities().strand());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn interval(&self) -> &Interval {
        match self {
            Record::Gff3(record) => record.interval(),
            Record::Psl(record) => record.target().interval(),
            Record::Fasta(record) => record.interval(),
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Record::Gff3(record) => write!(f, "{record}"),
            Record::Psl(record) => write!(f, "{record}"),
            Record::Fasta(record) => write!(f, "{record}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gff3_record() -> Result<(), Box<dyn std::error::Error>> {
        let line = "chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1";
        let record = Record::Gff3(line.parse()?);

        assert_eq!(record.format(), Format::Gff3);
        assert!(!record.capabilities().zero_length());
        assert_eq!(record.interval().to_string(), "chr1:+:0-100");
        assert_eq!(record.to_string(), line);

        Ok(())
    }

    #[test]
    fn test_fasta_record() -> Result<(), Box<dyn std::error::Error>> {
        let record = Record::Fasta(">seq1 desc\nACGT".parse()?);

        assert!(!record.capabilities().strand());
        assert_eq!(record.interval().to_string(), "seq1:.:0-4");
        assert_eq!(record.to_string(), ">seq1 desc\nACGT");

        Ok(())
    }
}
