use crate::error::IngestError;
use crate::ingest::accumulator::AccumulatedTable;
use crate::types::category::DataCategory;
use crate::utils::ensure_output_dir_exists;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// What [`write_table`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { path: PathBuf, rows: usize },
    /// Nothing was fetched for the category; no file was touched.
    NoData(DataCategory),
}

/// Writes the accumulated rows of one category to `<output_dir>/<file name>`.
///
/// The CSV has a header row, no index column, and keeps the column order of
/// the fetched frames with `Region` last. An empty table writes nothing and
/// logs `"<label>: No data fetched"` instead.
pub fn write_table(table: AccumulatedTable, output_dir: &Path) -> Result<WriteOutcome, IngestError> {
    let category = table.category();
    let Some(mut df) = table.into_frame()? else {
        info!("{}: No data fetched", category.notice_label());
        return Ok(WriteOutcome::NoData(category));
    };

    ensure_output_dir_exists(output_dir)?;
    let path = output_dir.join(category.file_name());
    let mut file =
        std::fs::File::create(&path).map_err(|e| IngestError::CsvWriteIo(path.clone(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| IngestError::CsvWritePolars(path.clone(), e))?;

    let rows = df.height();
    info!("Wrote {} {} rows to {}", rows, category, path.display());
    Ok(WriteOutcome::Written { path, rows })
}
