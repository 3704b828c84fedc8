//! Shared type definitions

/// Determines how an entirely blank physical line is handled by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlankLine {
    /// Produce a row containing exactly one empty field.
    EmptySingleColumn,
    /// Blank lines are discarded; reading continues with the next line.
    #[default]
    SkipEntireLine,
    /// A blank line is treated as end of input, even if more data follows.
    EndOfFile,
}
