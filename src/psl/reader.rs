//! A PSL reader.

use std::io::BufRead;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::Error;
use crate::Options;
use crate::core::Number;
use crate::error::Fault;
use crate::format::Format;
use crate::format::PSL_HEADER_PREFIX;
use crate::psl::Record;
use crate::psl::record::DELIMITER;
use crate::psl::record::Error as RecordError;
use crate::psl::record::NUM_FIELDS;
use crate::psl::record::ParseError;
use crate::reader::progress::Progress;
use crate::reader::read_line;
use crate::validate::Policy;
use crate::validate::Validate as _;

/// The character that makes up the line closing the `psLayout` header.
const HEADER_RULE: char = '-';

/// The number of column title lines between the `psLayout` line and the rule.
const HEADER_COLUMN_LINES: usize = 2;

/// The state of the reader.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// No record has been read yet, so a header may still appear.
    Start,

    /// The reader is within the `psLayout` header.
    Header,

    /// The reader is within the records.
    Records,

    /// The stream is exhausted or was ended by an error.
    Done,
}

/// A PSL reader.
///
/// The `psLayout` header that `blat` writes by default is skipped, as are
/// blank lines.
#[derive(Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The inner reader.
    inner: T,

    /// The options.
    options: Options,

    /// The position within the stream.
    progress: Progress,

    /// The state of the reader.
    state: State,

    /// The number of column title lines seen within the header.
    header_lines: usize,

    /// The line buffer.
    buffer: Vec<u8>,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a PSL reader with the default [`Options`].
    pub fn new(inner: T) -> Self {
        Self::with_options(inner, Options::default())
    }

    /// Creates a PSL reader with the given [`Options`].
    pub fn with_options(inner: T, options: Options) -> Self {
        Self {
            inner,
            options,
            progress: Progress::new(Format::Psl),
            state: State::Start,
            header_lines: 0,
            buffer: Vec::new(),
        }
    }

    /// Gets the options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Returns an iterator over the records.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::psl;
    ///
    /// let data = b"10\t0\t0\t0\t0\t0\t0\t0\t+\tq\t10\t0\t10\tt\t20\t5\t15\t1\t10,\t0,\t5,\n";
    /// let mut reader = psl::Reader::new(&data[..]);
    ///
    /// for result in reader.records() {
    ///     let record = result?;
    ///     assert_eq!(record.target().interval().to_string(), "t:+:5-15");
    /// }
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn records(&mut self) -> Records<'_, T> {
        Records { reader: self }
    }

    /// Reads the next record.
    fn read_record(&mut self) -> Option<crate::Result<Record>> {
        loop {
            if self.state == State::Done {
                return None;
            }

            let read = match read_line(&mut self.inner, &mut self.buffer) {
                Ok(read) => read,
                Err(err) => return self.reject(Error::Io(err)),
            };

            if read == 0 {
                self.state = State::Done;
                return None;
            }

            self.progress.consume_line(read);

            let line = match std::str::from_utf8(&self.buffer) {
                Ok(line) => line,
                Err(err) => {
                    let location = self.progress.next_record();
                    return self.reject(Fault::from(err).at(location));
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match self.state {
                State::Start if line.starts_with(PSL_HEADER_PREFIX) => {
                    debug!("psl: line {}: skipping header", self.progress.line_no());
                    self.state = State::Header;
                    continue;
                }
                State::Header if line.trim_end().chars().all(|c| c == HEADER_RULE) => {
                    self.state = State::Records;
                    continue;
                }
                State::Header if !is_record_line(line) => {
                    self.header_lines += 1;

                    if self.header_lines <= HEADER_COLUMN_LINES {
                        continue;
                    }

                    self.state = State::Records;
                    let location = self.progress.next_record();
                    let err = RecordError::Parse(ParseError::UnterminatedHeader);
                    return self.reject(Fault::from(err).at(location));
                }
                State::Header => {
                    debug!(
                        "psl: line {}: header ended without a rule",
                        self.progress.line_no()
                    );
                }
                State::Start | State::Records | State::Done => {}
            }

            self.state = State::Records;

            let result = Record::parse(line).and_then(|record| {
                record
                    .validate(&self.options)
                    .map_err(RecordError::Invalid)?;
                Ok(record)
            });

            let location = self.progress.next_record();

            match result {
                Ok(record) => {
                    trace!("psl: {}: {}", location, record.target().interval());
                    return Some(Ok(record));
                }
                Err(err) => return self.reject(Fault::from(err).at(location)),
            }
        }
    }

    /// Surfaces an error, ending the stream if the error policy demands it.
    fn reject(&mut self, err: Error) -> Option<crate::Result<Record>> {
        match Policy::from(&self.options).halts_on(&err) {
            true => self.state = State::Done,
            false => warn!("psl: skipping record: {}", err),
        }

        Some(Err(err))
    }
}

/// Whether a line has the shape of a record rather than a header line.
fn is_record_line(line: &str) -> bool {
    let mut fields = line.trim_end().split(DELIMITER);

    let numeric = fields
        .next()
        .is_some_and(|field| field.parse::<Number>().is_ok());

    numeric && fields.count() + 1 == NUM_FIELDS
}

/// An iterator over the records of a [`Reader`].
#[derive(Debug)]
pub struct Records<'a, T>
where
    T: BufRead,
{
    /// The inner reader.
    reader: &'a mut Reader<T>,
}

impl<T> Iterator for Records<'_, T>
where
    T: BufRead,
{
    type Item = crate::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::options::Builder;
    use crate::psl::writer::HEADER;

    /// A valid record.
    const RECORD: &str = "10\t0\t0\t0\t0\t0\t0\t0\t+\tq\t10\t0\t10\tt\t20\t5\t15\t1\t10,\t0,\t5,";

    #[test]
    fn test_header_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let data = format!("{HEADER}{RECORD}\n\n{RECORD}\n");
        let mut reader = Reader::new(data.as_bytes());

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(records.len(), 2);

        Ok(())
    }

    #[test]
    fn test_records_may_follow_a_bare_header_line() -> Result<(), Box<dyn std::error::Error>> {
        let data = format!("psLayout version 3\n{RECORD}\n{RECORD}\n");
        let mut reader = Reader::new(data.as_bytes());

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(records.len(), 2);

        Ok(())
    }

    #[test]
    fn test_unterminated_header_is_malformed() {
        let data = format!("psLayout version 3\nmatch\nmatch\njunk\n{RECORD}\n");

        let mut reader = Reader::new(data.as_bytes());
        let results = reader.records().collect::<Vec<_>>();
        assert_eq!(results.len(), 1);

        let err = results[0].as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(err.to_string().contains("closing rule"));

        let options = Builder::default().fail_fast(false).build();
        let mut reader = Reader::with_options(data.as_bytes(), options);
        let results = reader.records().collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_block_count_mismatch_is_malformed() {
        let line = "30\t0\t0\t0\t0\t0\t0\t0\t+\tq\t100\t0\t30\tt\t100\t0\t30\t2\t\
                    10,10,10,\t0,10,20,\t0,10,20,";
        let data = format!("{line}\n{RECORD}\n");

        let mut reader = Reader::new(data.as_bytes());
        let results = reader.records().collect::<Vec<_>>();
        assert_eq!(results.len(), 1);
        assert!(results[0]
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::MalformedRecord));

        let options = Builder::default().fail_fast(false).build();
        let mut reader = Reader::with_options(data.as_bytes(), options);
        let results = reader.records().collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_invalid_interval_ends_the_stream() {
        let line = RECORD.replace("\t5\t15\t", "\t15\t5\t");
        let data = format!("{line}\n{RECORD}\n");

        let options = Builder::default().fail_fast(false).build();
        let mut reader = Reader::with_options(data.as_bytes(), options);
        let results = reader.records().collect::<Vec<_>>();

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::InvalidInterval(_, _))));
    }
}
