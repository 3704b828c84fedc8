//! CSV Reader example
//!
//! Demonstrates reading with comment filtering, blank-line handling,
//! column subsetting and offset recording.

use csvstream::{BlankLine, CsvReader};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "data.csv".to_string());

    // Pass 1: read everything, recording line offsets
    let offsets = {
        let mut reader = CsvReader::open(&path)?
            .comment_prefix("#")
            .on_blank_line(BlankLine::SkipEntireLine)
            .record_offsets(true);

        for (i, row_result) in reader.rows().enumerate() {
            let row = row_result?;
            if i < 5 {
                println!("Row {}: {:?}", i + 1, row);
            }
        }
        println!("Rows read: {}", reader.line_count());
        println!("Comments:  {:?}", reader.comments());
        reader.line_offsets().to_vec()
    };

    // Pass 2: resume from the second recorded line, keeping columns 0 and 1
    if offsets.len() > 1 {
        let mut reader = CsvReader::open(&path)?
            .resume_at(offsets[1])
            .restrict_to_columns([0, 1]);

        println!("\nResumed at offset {}:", offsets[1]);
        while let Some(row) = reader.read_row()? {
            println!("  {:?}", row);
        }
    }

    Ok(())
}
