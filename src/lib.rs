//! # csvstream
//!
//! Streaming delimited-text reader/writer with comment lines, column
//! subsetting and resumable byte offsets.
//!
//! ## Features
//!
//! - **Row-by-row streaming** - constant memory regardless of file size
//! - **Quoted fields** - embedded delimiters, doubled quotes, fields spanning
//!   multiple physical lines
//! - **Comment lines** - configurable prefix, collected separately from data
//! - **Blank-line policies** - empty row, skip, or treat as end of file
//! - **Column subsetting** - parse a line but keep only selected positions
//! - **Offset ledger** - record physical line start offsets and resume a
//!   fresh reader from any recorded offset
//! - **Table transfer** - import/export against any storage engine through
//!   the [`TabularStore`] trait
//!
//! ## Reading
//!
//! ```no_run
//! use csvstream::{BlankLine, CsvReader};
//!
//! let mut reader = CsvReader::open("data.csv")
//!     .unwrap()
//!     .comment_prefix("#")
//!     .on_blank_line(BlankLine::SkipEntireLine);
//!
//! while let Some(row) = reader.read_row().unwrap() {
//!     println!("{:?}", row);
//! }
//! ```
//!
//! ## Writing
//!
//! ```no_run
//! use csvstream::CsvWriter;
//!
//! let mut writer = CsvWriter::create("output.csv").unwrap();
//! writer.add_field(Some("Alice"));
//! writer.add_field(None); // written as the literal `null`
//! writer.commit_line().unwrap();
//! writer.finish().unwrap();
//! ```
//!
//! ## Resuming
//!
//! ```no_run
//! use csvstream::CsvReader;
//!
//! let mut first = CsvReader::open("data.csv").unwrap().record_offsets(true);
//! while let Some(_) = first.read_row().unwrap() {}
//! let offsets = first.line_offsets().to_vec();
//!
//! // Later: pick up again at the second physical line
//! let mut resumed = CsvReader::open("data.csv").unwrap().resume_at(offsets[1]);
//! while let Some(row) = resumed.read_row().unwrap() {
//!     println!("{:?}", row);
//! }
//! ```

pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod transfer;
pub mod types;

mod csv;

pub use csv_reader::{CsvReader, Rows};
pub use csv_writer::CsvWriter;
pub use error::{CsvError, Result};
pub use transfer::{ColumnInfo, ColumnType, MemoryStore, TableTransfer, TabularStore};
pub use types::BlankLine;
