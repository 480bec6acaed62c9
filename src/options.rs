//! Options that control parsing and serialization.

/// The default line length for wrapped FASTA sequence output.
pub const DEFAULT_WRAP_WIDTH: usize = 60;

/// Options that control parsing and serialization.
///
/// Generally, you will want to use a [`Builder`] to construct one of these.
///
/// # Examples
///
/// ```
/// use biocoord::Options;
///
/// let options = Options::default();
///
/// assert!(options.fail_fast());
/// assert!(options.strict_attributes());
/// assert_eq!(options.wrap_width(), 60);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    /// Whether to abort a stream on the first malformed record.
    fail_fast: bool,

    /// Whether GFF3 attribute entries lacking a `=` are rejected.
    strict_attributes: bool,

    /// The line length for wrapped FASTA output (`0` disables wrapping).
    wrap_width: usize,
}

impl Options {
    /// Whether to abort a stream on the first malformed record.
    ///
    /// When this is `false`, malformed records are yielded as errors and the
    /// stream continues with the next record.
    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Whether GFF3 attribute entries lacking a `=` are rejected.
    pub fn strict_attributes(&self) -> bool {
        self.strict_attributes
    }

    /// The line length for wrapped FASTA sequence output.
    ///
    /// A width of `0` writes each sequence on a single line.
    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fail_fast: true,
            strict_attributes: true,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

/// A builder for [`Options`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The options being built.
    options: Options,
}

impl Builder {
    /// Sets whether to abort a stream on the first malformed record.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::options::Builder;
    ///
    /// let options = Builder::default().fail_fast(false).build();
    /// assert!(!options.fail_fast());
    /// ```
    pub fn fail_fast(mut self, value: bool) -> Self {
        self.options.fail_fast = value;
        self
    }

    /// Sets whether GFF3 attribute entries lacking a `=` are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::options::Builder;
    ///
    /// let options = Builder::default().strict_attributes(false).build();
    /// assert!(!options.strict_attributes());
    /// ```
    pub fn strict_attributes(mut self, value: bool) -> Self {
        self.options.strict_attributes = value;
        self
    }

    /// Sets the line length for wrapped FASTA output.
    ///
    /// # Examples
    ///
    /// ```
    /// use biocoord::options::Builder;
    ///
    /// let options = Builder::default().wrap_width(80).build();
    /// assert_eq!(options.wrap_width(), 80);
    /// ```
    pub fn wrap_width(mut self, value: usize) -> Self {
        self.options.wrap_width = value;
        self
    }

    /// Consumes `self` to build the [`Options`].
    pub fn build(self) -> Options {
        self.options
    }
}
