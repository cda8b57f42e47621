use crate::transparency::error::{FetchError, ParseError};
use crate::types::time_range::InvalidRangeError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure aborts the run; nothing here is retried.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to parse market document for region {region}, period {period}")]
    Parse {
        region: String,
        period: String,
        #[source]
        source: ParseError,
    },

    #[error("Unknown region code '{0}'")]
    UnknownRegion(String),

    #[error("Region table is empty")]
    EmptyRegionTable,

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("Output path exists but is not a directory: '{0}'")]
    OutputNotDirectory(PathBuf),

    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing CSV file '{0}'")]
    CsvWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing CSV file '{0}'")]
    CsvWritePolars(PathBuf, #[source] PolarsError),
}
