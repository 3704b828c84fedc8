//! Line cursor for field tokenization
//!
//! Holds the text of the physical line currently being scanned together with
//! the byte position within it. A fresh cursor is built for every logical row
//! so no parse state leaks between rows; quoted fields that span physical
//! lines pull continuation lines through a caller-supplied fetch callback.

use crate::error::Result;

/// Scanning state for one logical row: current line text plus byte position.
///
/// Delimiter and quote characters are single ASCII bytes, so byte-indexed
/// scanning is safe on UTF-8 line text.
pub(crate) struct LineCursor {
    line: String,
    pos: usize,
}

impl LineCursor {
    pub(crate) fn new(line: String) -> Self {
        Self { line, pos: 0 }
    }

    /// True once the entire current line has been consumed.
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// True when the next unread byte is the quote character.
    pub(crate) fn at_quote(&self, quote_char: u8) -> bool {
        self.line.as_bytes().get(self.pos) == Some(&quote_char)
    }

    /// Consume a single delimiter if one sits at the cursor.
    pub(crate) fn skip_delimiter(&mut self, delimiter: u8) {
        if self.line.as_bytes().get(self.pos) == Some(&delimiter) {
            self.pos += 1;
        }
    }

    /// Read an unquoted field: text up to the next delimiter or end of line.
    ///
    /// Leaves the cursor on the delimiter itself (or at end of line).
    pub(crate) fn read_unquoted(&mut self, delimiter: u8) -> String {
        let start = self.pos;
        let rest = &self.line.as_bytes()[start..];
        self.pos = match rest.iter().position(|&b| b == delimiter) {
            Some(i) => start + i,
            None => self.line.len(),
        };
        self.line[start..self.pos].to_string()
    }

    /// Read a quoted field starting at the opening quote.
    ///
    /// Doubled quote characters collapse to one literal quote; a lone quote
    /// closes the field. When the line ends while the quote is still open,
    /// `fetch` supplies the next physical line and a `\n` joins the pieces,
    /// which is how multi-line fields work. If `fetch` reports end of input
    /// the field terminates with whatever was accumulated; that is not an
    /// error. Any text between the closing quote and the next delimiter is
    /// appended to the field verbatim.
    pub(crate) fn read_quoted<F>(
        &mut self,
        delimiter: u8,
        quote_char: u8,
        mut fetch: F,
    ) -> Result<String>
    where
        F: FnMut() -> Result<Option<String>>,
    {
        // Skip the opening quote
        if self.at_quote(quote_char) {
            self.pos += 1;
        }

        let mut field = String::new();
        loop {
            while self.at_end() {
                match fetch()? {
                    None => {
                        // End of input inside an open quote: best effort
                        self.line.clear();
                        self.pos = 0;
                        return Ok(field);
                    }
                    Some(next) => {
                        self.line = next;
                        self.pos = 0;
                        field.push('\n');
                    }
                }
            }

            let bytes = self.line.as_bytes();
            if bytes[self.pos] == quote_char {
                if bytes.get(self.pos + 1) == Some(&quote_char) {
                    // Doubled quote: one literal quote character
                    field.push(quote_char as char);
                    self.pos += 2;
                } else {
                    break;
                }
            } else {
                // Copy the run of ordinary bytes up to the next quote
                let start = self.pos;
                let run = bytes[start..]
                    .iter()
                    .position(|&b| b == quote_char)
                    .unwrap_or(bytes.len() - start);
                self.pos = start + run;
                field.push_str(&self.line[start..self.pos]);
            }
        }

        // Consume the closing quote, then append any trailing characters
        // appearing before the next delimiter.
        self.pos += 1;
        let suffix = self.read_unquoted(delimiter);
        field.push_str(&suffix);
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_more() -> Result<Option<String>> {
        Ok(None)
    }

    #[test]
    fn test_unquoted_simple() {
        let mut cur = LineCursor::new("a,b,c".to_string());
        assert_eq!(cur.read_unquoted(b','), "a");
        cur.skip_delimiter(b',');
        assert_eq!(cur.read_unquoted(b','), "b");
        cur.skip_delimiter(b',');
        assert_eq!(cur.read_unquoted(b','), "c");
        assert!(cur.at_end());
    }

    #[test]
    fn test_unquoted_empty_field() {
        let mut cur = LineCursor::new(",x".to_string());
        assert_eq!(cur.read_unquoted(b','), "");
        cur.skip_delimiter(b',');
        assert_eq!(cur.read_unquoted(b','), "x");
    }

    #[test]
    fn test_quoted_simple() {
        let mut cur = LineCursor::new(r#""a,b",c"#.to_string());
        let field = cur.read_quoted(b',', b'"', no_more).unwrap();
        assert_eq!(field, "a,b");
        cur.skip_delimiter(b',');
        assert_eq!(cur.read_unquoted(b','), "c");
    }

    #[test]
    fn test_quoted_doubled_quotes() {
        let mut cur = LineCursor::new(r#""Say ""Hi""",x"#.to_string());
        let field = cur.read_quoted(b',', b'"', no_more).unwrap();
        assert_eq!(field, r#"Say "Hi""#);
    }

    #[test]
    fn test_quoted_trailing_suffix_joins_field() {
        // Text between the closing quote and the delimiter is appended
        let mut cur = LineCursor::new(r#""ab"cd,e"#.to_string());
        let field = cur.read_quoted(b',', b'"', no_more).unwrap();
        assert_eq!(field, "abcd");
        cur.skip_delimiter(b',');
        assert_eq!(cur.read_unquoted(b','), "e");
    }

    #[test]
    fn test_quoted_multi_line() {
        let mut lines = vec!["line two\",x".to_string()].into_iter();
        let mut cur = LineCursor::new("\"line one".to_string());
        let field = cur
            .read_quoted(b',', b'"', || Ok(lines.next()))
            .unwrap();
        assert_eq!(field, "line one\nline two");
        cur.skip_delimiter(b',');
        assert_eq!(cur.read_unquoted(b','), "x");
    }

    #[test]
    fn test_quoted_unterminated_at_eof() {
        let mut cur = LineCursor::new("\"never closed".to_string());
        let field = cur.read_quoted(b',', b'"', no_more).unwrap();
        assert_eq!(field, "never closed");
        assert!(cur.at_end());
    }

    #[test]
    fn test_quoted_utf8_content() {
        let mut cur = LineCursor::new("\"héllo wörld\",x".to_string());
        let field = cur.read_quoted(b',', b'"', no_more).unwrap();
        assert_eq!(field, "héllo wörld");
    }
}
