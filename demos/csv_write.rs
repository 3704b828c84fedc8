//! CSV Writer example
//!
//! Demonstrates field quoting, null values, comments and fixed-width lines.

use csvstream::CsvWriter;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "output.csv".to_string());

    let mut writer = CsvWriter::create(&path)?.field_count(3);

    writer.add_comment("written by the csv_write example")?;

    writer.add_field(Some("name"));
    writer.add_field(Some("age"));
    writer.add_field(Some("note"));
    writer.commit_line()?;

    writer.add_field(Some("Alice"));
    writer.add_field(Some("30"));
    writer.add_field(Some("likes \"quotes\" and,commas"));
    writer.commit_line()?;

    // Missing third field: the line is padded to the fixed width
    writer.add_field(Some("Bob"));
    writer.add_field(None);
    writer.commit_line()?;

    println!("Wrote {} lines to {}", writer.row_count(), path);
    writer.finish()?;
    Ok(())
}
