//! A GFF3 writer.

use std::io;
use std::io::Write;

use crate::gff3::Directive;
use crate::gff3::Record;

/// The version directive written at the top of every file.
pub const HEADER: &str = "##gff-version 3";

/// A GFF3 writer.
///
/// The `##gff-version 3` directive is written before anything else.
#[derive(Debug)]
pub struct Writer<W>
where
    W: Write,
{
    /// The inner writer.
    inner: W,

    /// Whether the version directive has been written.
    header_written: bool,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Creates a GFF3 writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            header_written: false,
        }
    }

    /// Writes a feature record.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3;
    ///
    /// let record = "chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1".parse::<gff3::Record>()?;
    ///
    /// let mut writer = gff3::Writer::new(Vec::new());
    /// writer.write_record(&record)?;
    ///
    /// assert_eq!(
    ///     String::from_utf8(writer.into_inner())?,
    ///     "##gff-version 3\nchr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1\n"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_record(&mut self, record: &Record) -> io::Result<()> {
        self.write_header()?;
        writeln!(self.inner, "{record}")
    }

    /// Writes a directive.
    ///
    /// A `##gff-version` directive is skipped, since the writer always
    /// writes its own.
    pub fn write_directive(&mut self, directive: &Directive) -> io::Result<()> {
        self.write_header()?;

        match directive {
            Directive::GffVersion(_) => Ok(()),
            directive => writeln!(self.inner, "{directive}"),
        }
    }

    /// Writes the version directive if it has not been written yet.
    pub fn write_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.inner, "{HEADER}")?;
            self.header_written = true;
        }

        Ok(())
    }

    /// Consumes self and returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_follow_the_header() -> Result<(), Box<dyn std::error::Error>> {
        let mut writer = Writer::new(Vec::new());
        writer.write_directive(&Directive::GffVersion(String::from("3.1.26")))?;
        writer.write_directive(&"##sequence-region chr1 1 100".parse()?)?;
        writer.write_record(&"chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1".parse()?)?;
        writer.write_directive(&Directive::ForwardReferencesResolved)?;

        assert_eq!(
            String::from_utf8(writer.into_inner())?,
            "##gff-version 3\n\
             ##sequence-region chr1 1 100\n\
             chr1\t.\tgene\t1\t100\t.\t+\t.\tID=g1\n\
             ###\n"
        );

        Ok(())
    }
}
