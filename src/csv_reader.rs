//! CSV file reading with streaming support and resumable offsets

use crate::csv::LineCursor;
use crate::error::{CsvError, Result};
use crate::types::BlankLine;
use indexmap::IndexSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Streaming CSV reader with comment filtering and byte-offset bookkeeping
///
/// Reads one logical row at a time. Quoted fields may span multiple physical
/// lines; comment lines are diverted into a separate list; blank lines follow
/// the configured [`BlankLine`] policy. When offset recording is enabled the
/// starting byte offset of every physical line is kept, so a later reader can
/// resume from any recorded offset via [`resume_at`](CsvReader::resume_at).
///
/// # Examples
///
/// ```no_run
/// use csvstream::CsvReader;
///
/// let mut reader = CsvReader::open("data.csv").unwrap();
///
/// while let Some(row) = reader.read_row().unwrap() {
///     println!("{:?}", row);
/// }
/// ```
///
/// # Comments and blank lines
///
/// ```no_run
/// use csvstream::{BlankLine, CsvReader};
///
/// let mut reader = CsvReader::open("data.csv")
///     .unwrap()
///     .comment_prefix("#")
///     .on_blank_line(BlankLine::SkipEntireLine);
///
/// while let Some(row) = reader.read_row().unwrap() {
///     println!("{:?}", row);
/// }
/// println!("comments: {:?}", reader.comments());
/// ```
pub struct CsvReader<R: Read + Seek> {
    reader: BufReader<R>,

    // Accumulated results
    columns: Vec<String>,
    comments: Vec<String>,
    line_offsets: Vec<u64>,

    // Cursor bookkeeping
    total_offset: u64,
    line_count: u64,
    is_line_empty: bool,
    skip_done: bool,

    // Configuration
    delimiter: u8,
    quote_char: u8,
    comment_prefix: String,
    skip_lines: usize,
    max_lines: Option<u64>,
    on_blank_line: BlankLine,
    column_filter: IndexSet<usize>,
    record_offsets: bool,
    resume_offset: Option<u64>,
}

impl CsvReader<File> {
    /// Open a CSV file for reading
    ///
    /// The file is owned exclusively by this reader and released when the
    /// reader is dropped. Content must be UTF-8; callers needing another
    /// encoding should decode the stream and use
    /// [`from_reader`](CsvReader::from_reader).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)
            .map_err(|e| CsvError::Read(format!("Failed to open CSV file: {}", e)))?;
        debug!(path = %path_ref.display(), "opened CSV file for reading");
        Ok(Self::from_reader(file))
    }
}

impl<R: Read + Seek> CsvReader<R> {
    /// Create a reader over any seekable stream
    pub fn from_reader(inner: R) -> Self {
        CsvReader {
            reader: BufReader::new(inner),
            columns: Vec::new(),
            comments: Vec::new(),
            line_offsets: Vec::new(),
            total_offset: 0,
            line_count: 0,
            is_line_empty: false,
            skip_done: false,
            delimiter: b',',
            quote_char: b'"',
            comment_prefix: String::new(),
            skip_lines: 0,
            max_lines: None,
            on_blank_line: BlankLine::default(),
            column_filter: IndexSet::new(),
            record_offsets: false,
            resume_offset: None,
        }
    }

    /// Set custom delimiter (builder pattern)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::CsvReader;
    ///
    /// let reader = CsvReader::open("data.csv")
    ///     .unwrap()
    ///     .delimiter(b';');
    /// ```
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: u8) -> Self {
        self.quote_char = quote;
        self
    }

    /// Divert lines whose trimmed text starts with `prefix` into the comment
    /// list instead of producing them as rows
    pub fn comment_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Discard this many leading physical lines before the first row
    ///
    /// Applied once, lazily, on the first `read_row` call. Comment lines are
    /// filtered out during the discard exactly as during normal reads.
    pub fn skip_lines(mut self, count: usize) -> Self {
        self.skip_lines = count;
        self
    }

    /// Cap the number of rows this reader will ever produce
    ///
    /// Once the cap is reached, `read_row` reports end of input without
    /// touching the stream again.
    pub fn max_lines(mut self, max: u64) -> Self {
        self.max_lines = Some(max);
        self
    }

    /// Set the blank-line policy (builder pattern)
    pub fn on_blank_line(mut self, policy: BlankLine) -> Self {
        self.on_blank_line = policy;
        self
    }

    /// Retain only fields at the given zero-based column positions
    ///
    /// Other fields are still parsed, to advance the cursor correctly, but
    /// discarded; scanning of a line stops early once every requested
    /// position has been collected.
    pub fn restrict_to_columns<I: IntoIterator<Item = usize>>(mut self, indexes: I) -> Self {
        self.column_filter.extend(indexes);
        self
    }

    /// Record the starting byte offset of every physical line read
    pub fn record_offsets(mut self, enabled: bool) -> Self {
        self.record_offsets = enabled;
        self
    }

    /// Reposition the stream to `offset` before the first line is read
    ///
    /// Consumed once. Pair with offsets obtained from
    /// [`line_offsets`](CsvReader::line_offsets) on an earlier reader to
    /// resume reading mid-file.
    pub fn resume_at(mut self, offset: u64) -> Self {
        self.resume_offset = Some(offset);
        self
    }

    /// Read the next logical row
    ///
    /// Returns `Ok(None)` at end of input. Malformed content (for example an
    /// unterminated quote at the true end of the stream) is not an error; the
    /// field keeps whatever was accumulated.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::CsvReader;
    ///
    /// let mut reader = CsvReader::open("data.csv").unwrap();
    /// while let Some(row) = reader.read_row().unwrap() {
    ///     println!("{:?}", row);
    /// }
    /// ```
    pub fn read_row(&mut self) -> Result<Option<Vec<String>>> {
        if let Some(max) = self.max_lines {
            if self.line_count >= max {
                return Ok(None);
            }
        }

        if !self.skip_done {
            self.skip_done = true;
            for _ in 0..self.skip_lines {
                if self.read_physical_line(false)?.is_none() {
                    break;
                }
            }
        }

        // Blank-line handling; written as a loop so a long run of blank
        // lines cannot grow the call stack.
        let line = loop {
            let Some(line) = self.read_physical_line(false)? else {
                return Ok(None);
            };
            if !line.is_empty() {
                self.is_line_empty = false;
                break line;
            }
            self.is_line_empty = true;
            match self.on_blank_line {
                BlankLine::EmptySingleColumn => {
                    self.columns.clear();
                    self.columns.push(String::new());
                    self.line_count += 1;
                    return Ok(Some(self.columns.clone()));
                }
                BlankLine::SkipEntireLine => continue,
                BlankLine::EndOfFile => return Ok(None),
            }
        };

        self.columns.clear();
        let mut cursor = LineCursor::new(line);
        let mut position = 0usize;
        let delimiter = self.delimiter;
        let quote_char = self.quote_char;

        loop {
            let field = if cursor.at_quote(quote_char) {
                cursor.read_quoted(delimiter, quote_char, || self.read_physical_line(true))?
            } else {
                cursor.read_unquoted(delimiter)
            };

            if !self.column_filter.is_empty() {
                if self.column_filter.contains(&position) {
                    self.columns.push(field);
                    if self.columns.len() == self.column_filter.len() {
                        // Every requested position collected; the rest of
                        // the line is never parsed.
                        break;
                    }
                }
            } else {
                self.columns.push(field);
            }

            position += 1;
            if cursor.at_end() {
                break;
            }
            cursor.skip_delimiter(delimiter);
        }

        self.line_count += 1;
        Ok(Some(self.columns.clone()))
    }

    /// Read one physical line, filtering comments and maintaining offsets.
    ///
    /// `continued` marks continuation reads inside an open quoted field;
    /// those never record a line offset. The offset recorded for a line is
    /// deduplicated only against the most recently recorded entry.
    fn read_physical_line(&mut self, continued: bool) -> Result<Option<String>> {
        if let Some(offset) = self.resume_offset.take() {
            self.reader
                .seek(SeekFrom::Start(offset))
                .map_err(|e| CsvError::Read(format!("Failed to seek to offset {}: {}", offset, e)))?;
            debug!(offset, "repositioned stream before reading");
        }

        let at_eof = self
            .reader
            .fill_buf()
            .map_err(|e| CsvError::Read(format!("Failed to read from stream: {}", e)))?
            .is_empty();
        if at_eof {
            return Ok(None);
        }

        if !continued
            && self.record_offsets
            && self.line_offsets.last() != Some(&self.total_offset)
        {
            self.line_offsets.push(self.total_offset);
        }

        let prefix = self.comment_prefix.trim();
        loop {
            let mut line = String::new();
            let bytes_read = self
                .reader
                .read_line(&mut line)
                .map_err(|e| CsvError::Read(format!("Failed to read line: {}", e)))?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.total_offset += bytes_read as u64;

            // Strip the line terminator
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }

            if !prefix.is_empty() && line.trim().starts_with(prefix) {
                self.comments.push(line);
                continue;
            }
            return Ok(Some(line));
        }
    }

    /// Fields of the most recently produced row
    pub fn fields(&self) -> &[String] {
        &self.columns
    }

    /// Comment lines encountered so far, in original order, prefix included
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Number of rows produced so far
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Cumulative byte offset consumed from the stream
    pub fn current_offset(&self) -> u64 {
        self.total_offset
    }

    /// Recorded physical line start offsets
    ///
    /// Empty unless [`record_offsets`](CsvReader::record_offsets) is enabled.
    pub fn line_offsets(&self) -> &[u64] {
        &self.line_offsets
    }

    /// Whether the most recently read physical line was blank
    pub fn is_line_empty(&self) -> bool {
        self.is_line_empty
    }

    /// Get iterator over rows
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::CsvReader;
    ///
    /// let mut reader = CsvReader::open("data.csv").unwrap();
    /// for row_result in reader.rows() {
    ///     let row = row_result.unwrap();
    ///     println!("{:?}", row);
    /// }
    /// ```
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows { reader: self }
    }
}

/// Iterator over CSV rows
pub struct Rows<'a, R: Read + Seek> {
    reader: &'a mut CsvReader<R>,
}

impl<'a, R: Read + Seek> Iterator for Rows<'a, R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}
