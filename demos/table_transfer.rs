//! Table transfer example
//!
//! Imports a CSV file into an in-memory store and exports it back out,
//! the same way a real storage engine would plug in via `TabularStore`.

use csvstream::{MemoryStore, TableTransfer};
use std::error::Error;
use std::io::Write;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dir = std::env::temp_dir();
    let source = dir.join("transfer_demo_in.csv");
    let sink = dir.join("transfer_demo_out.csv");

    let mut f = std::fs::File::create(&source)?;
    f.write_all(b"name,city\nAlice,NYC\nBob,SF\n")?;
    drop(f);

    let mut store = MemoryStore::new();
    let mut transfer = TableTransfer::new(&mut store, "people")?;

    let imported = transfer.import_csv(&source, true)?;
    println!("Imported {} rows", imported);

    let exported = transfer.export_csv(&sink, false)?;
    println!("Exported {} rows to {}", exported, sink.display());
    println!("---\n{}", std::fs::read_to_string(&sink)?);

    Ok(())
}
