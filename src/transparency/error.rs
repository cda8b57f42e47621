use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    // `reason` is the acknowledgement text from the body, or the status phrase
    #[error("HTTP request failed for {url} with status {status}: {reason}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed market document")]
    Xml(#[from] quick_xml::DeError),

    #[error("Invalid timestamp '{0}' in market document")]
    InvalidTimestamp(String, #[source] chrono::ParseError),

    #[error("Unsupported resolution '{0}' in market document")]
    UnsupportedResolution(String),

    #[error("Point position {0} is out of range")]
    InvalidPosition(u32),

    #[error("Failed building DataFrame from market document")]
    DataFrame(#[from] polars::error::PolarsError),
}
