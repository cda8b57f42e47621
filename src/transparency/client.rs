use crate::config::IngestConfig;
use crate::transparency::error::FetchError;
use crate::transparency::parser::acknowledgement_reason;
use crate::transparency::request::RequestParams;
use log::{debug, warn};
use reqwest::blocking::Client;

/// Anything that can turn request parameters into a raw XML market document.
///
/// [`TransparencyClient`] is the real implementation; the fetch loops only
/// depend on this trait.
pub trait DocumentSource {
    fn fetch(&self, params: &RequestParams) -> Result<String, FetchError>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for &S {
    fn fetch(&self, params: &RequestParams) -> Result<String, FetchError> {
        (**self).fetch(params)
    }
}

/// Blocking HTTP client for the transparency platform REST API.
pub struct TransparencyClient {
    base_url: String,
    security_token: String,
    http: Client,
}

impl TransparencyClient {
    pub fn new(config: &IngestConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .gzip(true)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            base_url: config.base_url.clone(),
            security_token: config.security_token.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl DocumentSource for TransparencyClient {
    /// Performs one GET request and returns the body.
    ///
    /// Non-success statuses become [`FetchError::HttpStatus`]; the platform
    /// explains those in an acknowledgement document, whose reason text is
    /// carried over when present.
    fn fetch(&self, params: &RequestParams) -> Result<String, FetchError> {
        let mut query = vec![("securityToken", self.security_token.clone())];
        query.extend(params.query_pairs());
        debug!(
            "GET {} documentType={} area={} period={}",
            self.base_url,
            params.category.document_type(),
            params.area_code,
            params.period
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .map_err(|e| FetchError::NetworkRequest(self.base_url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let reason = acknowledgement_reason(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("no reason given")
                    .to_string()
            });
            warn!("HTTP error for {}: {} ({})", self.base_url, status, reason);
            return Err(FetchError::HttpStatus {
                url: self.base_url.clone(),
                status,
                reason,
            });
        }

        response
            .text()
            .map_err(|e| FetchError::BodyRead(self.base_url.clone(), e))
    }
}
