//! Defines the data categories the tool downloads and the per-category
//! constants of the transparency platform (document type, span limit, output
//! file).

use chrono::Duration;
use std::fmt;

/// The kind of time series requested from the platform.
///
/// Each category maps to one report of the platform and one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCategory {
    /// Actual total load per bidding zone (document type `A65`).
    Load,
    /// Actual generation per production type (document type `A75`).
    Generation,
}

impl DataCategory {
    /// The `documentType` query parameter.
    pub fn document_type(&self) -> &'static str {
        match self {
            DataCategory::Load => "A65",
            DataCategory::Generation => "A75",
        }
    }

    /// Longest period the platform serves in a single request.
    pub fn max_chunk(&self) -> Duration {
        match self {
            DataCategory::Load => Duration::days(365),
            DataCategory::Generation => Duration::days(1),
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            DataCategory::Load => "load.csv",
            DataCategory::Generation => "gen.csv",
        }
    }

    /// Prefix of the notice logged when a category yields no rows.
    pub fn notice_label(&self) -> &'static str {
        match self {
            DataCategory::Load => "LoadLoader",
            DataCategory::Generation => "GenLoader",
        }
    }

    /// Whether the request also binds the area to `in_Domain`.
    pub(crate) fn binds_in_domain(&self) -> bool {
        matches!(self, DataCategory::Generation)
    }
}

/// # Examples
///
/// ```
/// use entsoe_ingest::DataCategory;
///
/// assert_eq!(DataCategory::Load.to_string(), "Load");
/// assert_eq!(format!("{}", DataCategory::Generation), "Generation");
/// ```
impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataCategory::Load => "Load",
            DataCategory::Generation => "Generation",
        };
        write!(f, "{}", name)
    }
}
