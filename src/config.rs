use crate::types::region::RegionTable;
use bon::Builder;
use std::fmt;

/// Public REST endpoint of the ENTSO-E transparency platform.
pub const DEFAULT_BASE_URL: &str = "https://web-api.tp.entsoe.eu/api";

/// `A16`: realised values.
pub const DEFAULT_PROCESS_TYPE: &str = "A16";

/// Everything a run needs besides the time range and output directory.
///
/// # Examples
///
/// ```
/// use entsoe_ingest::{IngestConfig, RegionTable, DEFAULT_BASE_URL};
///
/// let config = IngestConfig::builder()
///     .security_token("00000000-0000-0000-0000-000000000000")
///     .regions(RegionTable::from_codes(&["DE", "NE"]).unwrap())
///     .build();
/// assert_eq!(config.base_url, DEFAULT_BASE_URL);
/// assert_eq!(config.process_type, "A16");
/// assert_eq!(config.regions.len(), 2);
/// ```
#[derive(Clone, Builder)]
pub struct IngestConfig {
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,

    #[builder(into)]
    pub security_token: String,

    #[builder(into, default = DEFAULT_PROCESS_TYPE.to_string())]
    pub process_type: String,

    #[builder(default)]
    pub regions: RegionTable,

    /// Draw a progress bar on stderr while fetching.
    #[builder(default = true)]
    pub show_progress: bool,
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("base_url", &self.base_url)
            .field("security_token", &"<redacted>")
            .field("process_type", &self.process_type)
            .field("regions", &self.regions)
            .field("show_progress", &self.show_progress)
            .finish()
    }
}
