//! Table import/export against an abstract tabular store
//!
//! The reader and writer only exchange opaque text with the storage engine;
//! schema discovery, table creation and row persistence live behind the
//! [`TabularStore`] trait. Any engine that can enumerate columns, run a
//! parameterized insert and iterate query results can plug in here.

use crate::csv_reader::CsvReader;
use crate::csv_writer::CsvWriter;
use crate::error::{CsvError, Result};
use crate::types::BlankLine;
use indexmap::IndexMap;
use std::path::Path;
use tracing::info;

/// Column type as reported by the storage engine
///
/// Field values stay opaque text on this side of the boundary; the type only
/// drives export decisions (BLOB columns are never written to CSV) and table
/// creation on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnType {
    Text,
    Integer,
    Real,
    Boolean,
    Blob,
    /// No declared type; used for tables created from a CSV header, where
    /// per-row types are unknown.
    Any,
}

/// Name and type of one destination column
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: ColumnType,
}

impl ColumnInfo {
    pub fn new<S: Into<String>>(name: S, data_type: ColumnType) -> Self {
        ColumnInfo {
            name: name.into(),
            data_type,
        }
    }
}

/// The three capabilities the import/export routines need from a storage
/// engine. `None` values model SQL NULL on both sides.
pub trait TabularStore {
    /// Column metadata for `table`, in declaration order. An empty vector
    /// means the table does not exist.
    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Create `table` with the given column definitions.
    fn create_table(&mut self, table: &str, columns: &[ColumnInfo]) -> Result<()>;

    /// Insert one row of values, positionally matched to the table columns.
    fn insert_row(&mut self, table: &str, values: &[Option<String>]) -> Result<()>;

    /// Iterate every row of `table` with values in column order.
    fn scan<'a>(
        &'a self,
        table: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<Vec<Option<String>>>> + 'a>>;
}

/// Imports a CSV file into a table and exports a table back to CSV
///
/// # Examples
///
/// ```no_run
/// use csvstream::{MemoryStore, TableTransfer};
///
/// let mut store = MemoryStore::new();
/// let mut transfer = TableTransfer::new(&mut store, "people").unwrap();
/// let imported = transfer.import_csv("people.csv", true).unwrap();
/// println!("imported {} rows", imported);
/// transfer.export_csv("people_out.csv", false).unwrap();
/// ```
pub struct TableTransfer<'a, S: TabularStore> {
    store: &'a mut S,
    table: String,
}

impl<'a, S: TabularStore> TableTransfer<'a, S> {
    /// Bind a transfer to one destination table
    pub fn new<T: Into<String>>(store: &'a mut S, table: T) -> Result<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(CsvError::Config("A table name is required".to_string()));
        }
        Ok(TableTransfer { store, table })
    }

    /// Import a CSV file into the table, returning the number of rows inserted
    ///
    /// When `first_line_header` is set the first row supplies the column
    /// names and is not inserted; otherwise columns are named
    /// `csv_column_1..n` from the first row's width. The table is created
    /// with untyped columns when it does not exist yet; when it does, its
    /// column count must match the file.
    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P, first_line_header: bool) -> Result<u64> {
        let path = path.as_ref();

        // One-row read to learn the header names and column count
        let mut header_columns: Vec<String> = Vec::new();
        {
            let mut reader = CsvReader::open(path)?
                .on_blank_line(BlankLine::SkipEntireLine)
                .max_lines(1);
            if let Some(row) = reader.read_row()? {
                for (i, field) in row.iter().enumerate() {
                    if first_line_header {
                        header_columns.push(field.clone());
                    } else {
                        header_columns.push(format!("csv_column_{}", i + 1));
                    }
                }
            }
        }
        if header_columns.is_empty() {
            return Err(CsvError::Config(
                "Columns are required, check the source file".to_string(),
            ));
        }

        let mut table_columns = self.store.columns(&self.table)?;
        if table_columns.is_empty() {
            let definitions: Vec<ColumnInfo> = header_columns
                .iter()
                .map(|name| ColumnInfo::new(name.clone(), ColumnType::Any))
                .collect();
            self.store.create_table(&self.table, &definitions)?;
            table_columns = self.store.columns(&self.table)?;
            if table_columns.is_empty() {
                return Err(CsvError::Config(format!(
                    "Unable to create or find table {}",
                    self.table
                )));
            }
        }
        if table_columns.len() != header_columns.len() {
            return Err(CsvError::Config(format!(
                "Number of columns in the file ({}) must match the table ({})",
                header_columns.len(),
                table_columns.len()
            )));
        }

        let mut reader = CsvReader::open(path)?.on_blank_line(BlankLine::SkipEntireLine);
        if first_line_header {
            reader = reader.skip_lines(1);
        }

        let mut inserted = 0u64;
        while let Some(row) = reader.read_row()? {
            let values: Vec<Option<String>> = row.into_iter().map(Some).collect();
            self.store.insert_row(&self.table, &values)?;
            inserted += 1;
        }

        info!(table = %self.table, rows = inserted, "imported CSV file");
        Ok(inserted)
    }

    /// Export the table to a CSV file, returning the number of data rows
    ///
    /// The first written line carries the column names. BLOB columns are
    /// left out entirely. `append` selects append-or-overwrite at open time.
    pub fn export_csv<P: AsRef<Path>>(&mut self, path: P, append: bool) -> Result<u64> {
        let columns = self.store.columns(&self.table)?;
        if columns.is_empty() {
            return Err(CsvError::Config(format!(
                "Table {} does not exist",
                self.table
            )));
        }

        let mut writer = if append {
            CsvWriter::append(path)?
        } else {
            CsvWriter::create(path)?
        };

        let kept: Vec<(usize, &ColumnInfo)> = columns
            .iter()
            .enumerate()
            .filter(|(_, col)| col.data_type != ColumnType::Blob)
            .collect();

        for (_, col) in &kept {
            writer.add_field(Some(&col.name));
        }
        writer.commit_line()?;

        let mut exported = 0u64;
        for row in self.store.scan(&self.table)? {
            let row = row?;
            for (index, _) in &kept {
                writer.add_field(row.get(*index).and_then(|v| v.as_deref()));
            }
            writer.commit_line()?;
            exported += 1;
        }
        writer.finish()?;

        info!(table = %self.table, rows = exported, "exported table to CSV");
        Ok(exported)
    }
}

/// In-memory [`TabularStore`] reference implementation
///
/// Keeps tables in insertion order. Useful for tests and as a template for
/// real engine adapters.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: IndexMap<String, TableData>,
}

#[derive(Debug, Default)]
struct TableData {
    columns: Vec<ColumnInfo>,
    rows: Vec<Vec<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently stored for `table`, empty when absent
    pub fn rows(&self, table: &str) -> &[Vec<Option<String>>] {
        self.tables
            .get(table)
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[])
    }
}

impl TabularStore for MemoryStore {
    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        Ok(self
            .tables
            .get(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    fn create_table(&mut self, table: &str, columns: &[ColumnInfo]) -> Result<()> {
        self.tables.insert(
            table.to_string(),
            TableData {
                columns: columns.to_vec(),
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    fn insert_row(&mut self, table: &str, values: &[Option<String>]) -> Result<()> {
        let data = self
            .tables
            .get_mut(table)
            .ok_or_else(|| CsvError::Config(format!("Table {} does not exist", table)))?;
        if values.len() != data.columns.len() {
            return Err(CsvError::Config(format!(
                "Row width {} does not match table width {}",
                values.len(),
                data.columns.len()
            )));
        }
        data.rows.push(values.to_vec());
        Ok(())
    }

    fn scan<'a>(
        &'a self,
        table: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<Vec<Option<String>>>> + 'a>> {
        let data = self
            .tables
            .get(table)
            .ok_or_else(|| CsvError::Config(format!("Table {} does not exist", table)))?;
        Ok(Box::new(data.rows.iter().map(|row| Ok(row.clone()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_import_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "people.csv", "name,age\nAlice,30\nBob,25\n");

        let mut store = MemoryStore::new();
        let mut transfer = TableTransfer::new(&mut store, "people").unwrap();
        let count = transfer.import_csv(&path, true).unwrap();
        assert_eq!(count, 2);

        let columns = store.columns("people").unwrap();
        assert_eq!(columns[0].name, "name");
        assert_eq!(columns[1].name, "age");
        assert_eq!(
            store.rows("people")[0],
            vec![Some("Alice".to_string()), Some("30".to_string())]
        );
    }

    #[test]
    fn test_import_without_header_names_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "raw.csv", "1,2,3\n4,5,6\n");

        let mut store = MemoryStore::new();
        let mut transfer = TableTransfer::new(&mut store, "raw").unwrap();
        let count = transfer.import_csv(&path, false).unwrap();
        assert_eq!(count, 2);

        let columns = store.columns("raw").unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["csv_column_1", "csv_column_2", "csv_column_3"]);
    }

    #[test]
    fn test_import_column_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "two.csv", "a,b\n1,2\n");

        let mut store = MemoryStore::new();
        store
            .create_table(
                "three",
                &[
                    ColumnInfo::new("x", ColumnType::Text),
                    ColumnInfo::new("y", ColumnType::Text),
                    ColumnInfo::new("z", ColumnType::Text),
                ],
            )
            .unwrap();

        let mut transfer = TableTransfer::new(&mut store, "three").unwrap();
        let err = transfer.import_csv(&path, true).unwrap_err();
        assert!(matches!(err, CsvError::Config(_)));
    }

    #[test]
    fn test_import_empty_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.csv", "");

        let mut store = MemoryStore::new();
        let mut transfer = TableTransfer::new(&mut store, "t").unwrap();
        assert!(transfer.import_csv(&path, true).is_err());
    }

    #[test]
    fn test_blank_table_name_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            TableTransfer::new(&mut store, "  "),
            Err(CsvError::Config(_))
        ));
    }

    #[test]
    fn test_export_skips_blob_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut store = MemoryStore::new();
        store
            .create_table(
                "docs",
                &[
                    ColumnInfo::new("id", ColumnType::Integer),
                    ColumnInfo::new("body", ColumnType::Blob),
                    ColumnInfo::new("title", ColumnType::Text),
                ],
            )
            .unwrap();
        store
            .insert_row(
                "docs",
                &[
                    Some("1".to_string()),
                    Some("<bytes>".to_string()),
                    Some("Intro".to_string()),
                ],
            )
            .unwrap();

        let mut transfer = TableTransfer::new(&mut store, "docs").unwrap();
        let count = transfer.export_csv(&path, false).unwrap();
        assert_eq!(count, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\"id\",\"title\"\n\"1\",\"Intro\"\n");
    }

    #[test]
    fn test_export_null_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nulls.csv");

        let mut store = MemoryStore::new();
        store
            .create_table("t", &[ColumnInfo::new("a", ColumnType::Text)])
            .unwrap();
        store.insert_row("t", &[None]).unwrap();

        let mut transfer = TableTransfer::new(&mut store, "t").unwrap();
        transfer.export_csv(&path, false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\"a\"\nnull\n");
    }

    #[test]
    fn test_roundtrip_import_export_import() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_file(&dir, "in.csv", "name,note\nAlice,\"Line1\nLine2\"\n");
        let out = dir.path().join("out.csv");

        let mut store = MemoryStore::new();
        {
            let mut transfer = TableTransfer::new(&mut store, "notes").unwrap();
            transfer.import_csv(&source, true).unwrap();
            transfer.export_csv(&out, false).unwrap();
        }

        let mut second = MemoryStore::new();
        let mut transfer = TableTransfer::new(&mut second, "notes").unwrap();
        let count = transfer.import_csv(&out, true).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            second.rows("notes")[0],
            vec![Some("Alice".to_string()), Some("Line1\nLine2".to_string())]
        );
    }
}
