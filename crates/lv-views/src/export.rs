//! CSV export of a table view

use std::io;
use std::path::Path;
use csv::{Terminator, WriterBuilder};
use thiserror::Error;
use tracing::info;

use crate::tables::{TableEngine, TableRow};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Write every row of the current view, filtered and sorted, as CSV.
///
/// Only visible columns are written, with their titles as the header and
/// their formatters applied. Returns the number of data rows written.
pub fn write_csv<R, W>(table: &TableEngine<R>, writer: W) -> Result<usize, ExportError>
where
    R: TableRow,
    W: io::Write,
{
    let columns = table.visible_columns();
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(columns.iter().map(|c| c.title.as_str()))?;
    let mut count = 0;
    for row in table.rows() {
        writer.write_record(columns.iter().map(|c| c.format(row)))?;
        count += 1;
    }
    writer.flush()?;

    Ok(count)
}

/// [`write_csv`] into a new file at `path`
pub fn export_csv<R: TableRow>(table: &TableEngine<R>, path: impl AsRef<Path>) -> Result<usize, ExportError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    let count = write_csv(table, io::BufWriter::new(file))?;
    info!("Exported {} rows to {}", count, path.display());
    Ok(count)
}
