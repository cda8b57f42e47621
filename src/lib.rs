//! Downloads actual load and generation time series from the ENTSO-E
//! transparency platform and writes them as consolidated CSV files
//! (`load.csv`, `gen.csv`), one row per data point, tagged with the region it
//! was fetched for.

mod config;
mod error;
mod ingest;
mod transparency;
mod types;
mod utils;

pub use config::{IngestConfig, DEFAULT_BASE_URL, DEFAULT_PROCESS_TYPE};
pub use error::IngestError;

pub use ingest::accumulator::{AccumulatedTable, REGION};
pub use ingest::loader::Ingestor;
pub use ingest::writer::{write_table, WriteOutcome};

pub use transparency::client::{DocumentSource, TransparencyClient};
pub use transparency::error::{FetchError, ParseError};
pub use transparency::parser::{
    acknowledgement_reason, parse_generation_document, parse_load_document,
};
pub use transparency::request::RequestParams;

pub use types::category::DataCategory;
pub use types::region::{Region, RegionTable, DEFAULT_REGION_CODES, KNOWN_REGIONS};
pub use types::time_range::{split_date_range, InvalidRangeError, TimeRange};
