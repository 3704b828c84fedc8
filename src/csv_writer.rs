//! CSV file writing with per-line durability

use crate::csv::quote_value;
use crate::error::{CsvError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// CSV writer that accumulates fields and commits them one line at a time
///
/// Every field value is quoted unconditionally for format uniformity; absent
/// values are written as the literal text `null`. Each committed line is
/// flushed to the underlying stream before `commit_line` returns, so a
/// committed line is durable independent of later lines.
///
/// # Examples
///
/// ```no_run
/// use csvstream::CsvWriter;
///
/// let mut writer = CsvWriter::create("output.csv").unwrap();
/// writer.add_field(Some("Alice"));
/// writer.add_field(Some("30"));
/// writer.add_field(None);
/// writer.commit_line().unwrap();
/// writer.finish().unwrap();
/// ```
pub struct CsvWriter<W: Write> {
    writer: W,

    // Pending fields, already quoted, cleared on every commit
    fields: Vec<String>,
    row_count: u64,

    // Configuration
    delimiter: u8,
    quote_char: u8,
    comment_prefix: String,
    field_count: usize,
}

impl CsvWriter<BufWriter<File>> {
    /// Create a new CSV file, truncating any existing content
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref)
            .map_err(|e| CsvError::Write(format!("Failed to create CSV file: {}", e)))?;
        debug!(path = %path_ref.display(), "created CSV file for writing");
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Open a CSV file for appending, creating it if absent
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path_ref)
            .map_err(|e| CsvError::Write(format!("Failed to open CSV file for append: {}", e)))?;
        debug!(path = %path_ref.display(), "opened CSV file for appending");
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Create a writer over any sink
    pub fn from_writer(writer: W) -> Self {
        CsvWriter {
            writer,
            fields: Vec::new(),
            row_count: 0,
            delimiter: b',',
            quote_char: b'"',
            comment_prefix: "#".to_string(),
            field_count: 0,
        }
    }

    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: u8) -> Self {
        self.quote_char = quote;
        self
    }

    /// Set the prefix emitted in front of comment lines (default `#`)
    pub fn comment_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Fix the output width to `count` fields per line
    ///
    /// Committed lines with fewer pending fields are padded with trailing
    /// empty slots; fields beyond the width are silently dropped. Zero means
    /// unconstrained.
    pub fn field_count(mut self, count: usize) -> Self {
        self.field_count = count;
        self
    }

    /// Append one field to the pending line
    ///
    /// `None` is encoded as the unquoted literal `null`; any other value is
    /// wrapped in the quote character with embedded quotes doubled.
    pub fn add_field(&mut self, value: Option<&str>) {
        let encoded = match value {
            None => "null".to_string(),
            Some(v) => quote_value(v, self.quote_char),
        };
        self.fields.push(encoded);
    }

    /// Append several fields to the pending line
    pub fn add_fields<'a, I>(&mut self, values: I)
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        for value in values {
            self.add_field(value);
        }
    }

    /// Write comment lines immediately, bypassing the pending field buffer
    ///
    /// `text` is split on every newline variant and one prefixed physical
    /// line is written per segment. Fails when no comment prefix is
    /// configured.
    pub fn add_comment(&mut self, text: &str) -> Result<()> {
        if self.comment_prefix.trim().is_empty() {
            return Err(CsvError::Config(
                "A comment prefix must be configured before comments can be written".to_string(),
            ));
        }

        let normalized = text.replace("\r\n", "\n").replace("\n\r", "\n");
        for segment in normalized.split(['\n', '\r']) {
            let line = format!("{}{}\n", self.comment_prefix, segment);
            self.writer
                .write_all(line.as_bytes())
                .map_err(|e| CsvError::Write(format!("Failed to write comment: {}", e)))?;
        }
        self.writer
            .flush()
            .map_err(|e| CsvError::Write(format!("Failed to flush comment: {}", e)))
    }

    /// Join the pending fields into one record and write it out
    ///
    /// The line is flushed synchronously before this returns and the pending
    /// buffer is cleared unconditionally, so committing with no fields added
    /// produces a single empty line.
    pub fn commit_line(&mut self) -> Result<()> {
        let width = if self.field_count > 0 {
            self.field_count
        } else {
            self.fields.len()
        };

        let mut line = String::new();
        for i in 0..width {
            if i > 0 {
                line.push(self.delimiter as char);
            }
            if let Some(field) = self.fields.get(i) {
                line.push_str(field);
            }
        }
        line.push('\n');

        self.writer
            .write_all(line.as_bytes())
            .map_err(|e| CsvError::Write(format!("Failed to write line: {}", e)))?;
        self.writer
            .flush()
            .map_err(|e| CsvError::Write(format!("Failed to flush line: {}", e)))?;

        self.fields.clear();
        self.row_count += 1;
        Ok(())
    }

    /// Number of fields currently pending in the buffer
    pub fn pending_fields(&self) -> usize {
        self.fields.len()
    }

    /// Number of lines committed so far
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Borrow the underlying sink
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Flush and release the underlying stream
    ///
    /// Dropping the writer also flushes buffered data, but only `finish`
    /// surfaces flush failures.
    pub fn finish(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| CsvError::Write(format!("Failed to flush file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> CsvWriter<Vec<u8>> {
        CsvWriter::from_writer(Vec::new())
    }

    fn contents(w: &CsvWriter<Vec<u8>>) -> String {
        String::from_utf8(w.get_ref().clone()).unwrap()
    }

    #[test]
    fn test_fields_always_quoted() {
        let mut w = sink();
        w.add_field(Some("plain"));
        w.add_field(Some("a,b"));
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "\"plain\",\"a,b\"\n");
    }

    #[test]
    fn test_null_literal() {
        let mut w = sink();
        w.add_field(None);
        w.add_field(Some(""));
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "null,\"\"\n");
    }

    #[test]
    fn test_embedded_quotes_doubled() {
        let mut w = sink();
        w.add_field(Some(r#"Say "Hi""#));
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "\"Say \"\"Hi\"\"\"\n");
    }

    #[test]
    fn test_padding_to_field_count() {
        let mut w = sink().field_count(3);
        w.add_field(Some("a"));
        w.add_field(Some("b"));
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "\"a\",\"b\",\n");
    }

    #[test]
    fn test_truncation_beyond_field_count() {
        let mut w = sink().field_count(3);
        w.add_fields([Some("a"), Some("b"), Some("c"), Some("d")]);
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "\"a\",\"b\",\"c\"\n");
    }

    #[test]
    fn test_empty_commit_writes_empty_line() {
        let mut w = sink();
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "\n");
        assert_eq!(w.row_count(), 1);
    }

    #[test]
    fn test_buffer_cleared_after_commit() {
        let mut w = sink();
        w.add_field(Some("a"));
        w.commit_line().unwrap();
        assert_eq!(w.pending_fields(), 0);
        w.add_field(Some("b"));
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "\"a\"\n\"b\"\n");
    }

    #[test]
    fn test_comments_written_immediately() {
        let mut w = sink();
        w.add_field(Some("pending"));
        w.add_comment("first\nsecond").unwrap();
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "#first\n#second\n\"pending\"\n");
    }

    #[test]
    fn test_comment_crlf_split() {
        let mut w = sink().comment_prefix("; ");
        w.add_comment("one\r\ntwo").unwrap();
        assert_eq!(contents(&w), "; one\n; two\n");
    }

    #[test]
    fn test_comment_requires_prefix() {
        let mut w = sink().comment_prefix("");
        let err = w.add_comment("nope").unwrap_err();
        assert!(matches!(err, CsvError::Config(_)));
    }

    #[test]
    fn test_custom_delimiter() {
        let mut w = sink().delimiter(b';');
        w.add_fields([Some("a"), Some("b")]);
        w.commit_line().unwrap();
        assert_eq!(contents(&w), "\"a\";\"b\"\n");
    }

    #[test]
    fn test_append_mode() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("append.csv");
        {
            let mut w = CsvWriter::create(&path)?;
            w.add_field(Some("first"));
            w.commit_line()?;
            w.finish()?;
        }
        {
            let mut w = CsvWriter::append(&path)?;
            w.add_field(Some("second"));
            w.commit_line()?;
            w.finish()?;
        }
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\"first\"\n\"second\"\n");
        Ok(())
    }
}
