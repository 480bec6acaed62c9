//! The attributes column of a GFF3 record.

use std::str::FromStr;

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;

/// The value written for a record with no attributes.
pub const EMPTY: &str = ".";

/// The delimiter between attribute entries.
const ENTRY_DELIMITER: char = ';';

/// The delimiter between a key and its values.
const KEY_VALUE_DELIMITER: char = '=';

/// The delimiter between multiple values for the same key.
const VALUE_DELIMITER: char = ',';

/// Characters that must be escaped when written within a key or value.
///
/// Non-ASCII characters are always escaped by [`utf8_percent_encode`].
const ESCAPED: &AsciiSet = &CONTROLS
    .add(b';')
    .add(b'=')
    .add(b'&')
    .add(b',')
    .add(b'%');

/// An error related to parsing [`Attributes`].
#[derive(Debug)]
pub enum ParseError {
    /// A `%` was not followed by two hexadecimal digits.
    InvalidPercentEncoding(String),

    /// The percent-decoded bytes were not valid UTF-8.
    InvalidUtf8(String, std::str::Utf8Error),
}

impl ParseError {
    /// Whether this is an encoding error. For attributes, every parse error
    /// is one.
    pub fn is_encoding_error(&self) -> bool {
        true
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidPercentEncoding(value) => {
                write!(f, "invalid percent-encoding in `{value}`")
            }
            ParseError::InvalidUtf8(value, err) => {
                write!(f, "`{value}` does not decode to valid UTF-8: {err}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The attributes of a GFF3 record.
///
/// Keys are unique and kept in the order they were first seen. Each key maps
/// to an ordered list of values. A key written without a `=` maps to an empty
/// list, whereas `key=` maps to a single empty value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Attributes(Vec<(String, Vec<String>)>);

impl Attributes {
    /// Gets the values for a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3::record::Attributes;
    ///
    /// let attributes = "ID=g1;Parent=t1,t2".parse::<Attributes>()?;
    ///
    /// assert_eq!(attributes.get("ID"), Some(&[String::from("g1")][..]));
    /// assert_eq!(attributes.get("Parent").map(|values| values.len()), Some(2));
    /// assert_eq!(attributes.get("Name"), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Gets the first value for a key.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(|value| value.as_str())
    }

    /// Adds values for a key.
    ///
    /// If the key is already present, the values are appended to its existing
    /// values rather than replacing them.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::gff3::record::Attributes;
    ///
    /// let mut attributes = Attributes::default();
    /// attributes.insert("Alias", vec![String::from("a")]);
    /// attributes.insert("Alias", vec![String::from("b")]);
    ///
    /// assert_eq!(attributes.len(), 1);
    /// assert_eq!(attributes.to_string(), "Alias=a,b");
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();

        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.extend(values),
            None => self.0.push((key, values)),
        }
    }

    /// Gets an iterator over the keys and their values, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.0
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Gets the number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Attributes {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut attributes = Attributes::default();

        if s == EMPTY {
            return Ok(attributes);
        }

        for entry in s.split(ENTRY_DELIMITER) {
            let entry = entry.trim_start();

            if entry.is_empty() {
                continue;
            }

            match entry.split_once(KEY_VALUE_DELIMITER) {
                Some((key, values)) => {
                    let values = values
                        .split(VALUE_DELIMITER)
                        .map(decode)
                        .collect::<Result<Vec<_>, _>>()?;
                    attributes.insert(decode(key)?, values);
                }
                None => attributes.insert(decode(entry)?, Vec::new()),
            }
        }

        Ok(attributes)
    }
}

impl std::fmt::Display for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "{EMPTY}");
        }

        for (i, (key, values)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{ENTRY_DELIMITER}")?;
            }

            write!(f, "{}", utf8_percent_encode(key, ESCAPED))?;

            if values.is_empty() {
                continue;
            }

            write!(f, "{KEY_VALUE_DELIMITER}")?;

            for (j, value) in values.iter().enumerate() {
                if j > 0 {
                    write!(f, "{VALUE_DELIMITER}")?;
                }

                write!(f, "{}", utf8_percent_encode(value, ESCAPED))?;
            }
        }

        Ok(())
    }
}

/// Percent-decodes a key or value.
fn decode(s: &str) -> Result<String, ParseError> {
    let bytes = s.as_bytes();

    for (i, byte) in bytes.iter().enumerate() {
        if *byte != b'%' {
            continue;
        }

        let escape = bytes.get(i + 1..i + 3);

        if !matches!(escape, Some([a, b]) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()) {
            return Err(ParseError::InvalidPercentEncoding(s.to_string()));
        }
    }

    percent_decode_str(s)
        .decode_utf8()
        .map(|value| value.into_owned())
        .map_err(|err| ParseError::InvalidUtf8(s.to_string(), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoding() -> Result<(), Box<dyn std::error::Error>> {
        let attributes = "Note=a%3Bb%2Cc;Name=caf%C3%A9".parse::<Attributes>()?;
        assert_eq!(attributes.first("Note"), Some("a;b,c"));
        assert_eq!(attributes.first("Name"), Some("café"));

        Ok(())
    }

    #[test]
    fn test_canonical_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let line = "ID=g1;Note=50%25%20GC%3B%20high;Parent=t1,t2;Name=caf%C3%A9";
        let attributes = line.parse::<Attributes>()?;
        assert_eq!(attributes.first("Note"), Some("50% GC; high"));
        assert_eq!(attributes.to_string(), line.replace("%20", " "));

        Ok(())
    }

    #[test]
    fn test_key_only_and_empty_values() -> Result<(), Box<dyn std::error::Error>> {
        let attributes = "flag;Note=;ID=g1;".parse::<Attributes>()?;

        assert_eq!(attributes.get("flag"), Some(&[] as &[String]));
        assert_eq!(attributes.get("Note"), Some(&[String::new()][..]));
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes.to_string(), "flag;Note=;ID=g1");

        Ok(())
    }

    #[test]
    fn test_duplicate_keys_merge() -> Result<(), Box<dyn std::error::Error>> {
        let attributes = "Alias=a;ID=g1;Alias=b,c".parse::<Attributes>()?;
        assert_eq!(attributes.to_string(), "Alias=a,b,c;ID=g1");
        Ok(())
    }

    #[test]
    fn test_empty() -> Result<(), Box<dyn std::error::Error>> {
        let attributes = ".".parse::<Attributes>()?;
        assert!(attributes.is_empty());
        assert_eq!(attributes.to_string(), ".");
        Ok(())
    }

    #[test]
    fn test_invalid_encodings() {
        let err = "Note=100%".parse::<Attributes>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidPercentEncoding(_)));
        assert_eq!(err.to_string(), "invalid percent-encoding in `100%`");

        let err = "Note=%zz".parse::<Attributes>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidPercentEncoding(_)));

        let err = "Note=%FF".parse::<Attributes>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidUtf8(_, _)));
        assert!(err.is_encoding_error());
    }
}
