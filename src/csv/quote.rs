//! Field quoting for the write side

/// Quote a field value for output.
///
/// The value is wrapped in the quote character on both ends and any embedded
/// quote character is doubled. Quoting is unconditional so that every written
/// field has the same shape, whether or not it contains special characters.
pub(crate) fn quote_value(value: &str, quote_char: u8) -> String {
    let quote = quote_char as char;
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
    out
}
