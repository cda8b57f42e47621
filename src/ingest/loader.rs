//! The fetch loops: one request per `(chunk, region)` pair, strictly in that
//! order, with every parsed frame tagged and appended to the category's
//! [`AccumulatedTable`].

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::ingest::accumulator::AccumulatedTable;
use crate::ingest::writer::{write_table, WriteOutcome};
use crate::transparency::client::DocumentSource;
use crate::transparency::error::ParseError;
use crate::transparency::parser::{parse_generation_document, parse_load_document};
use crate::transparency::request::RequestParams;
use crate::types::category::DataCategory;
use crate::types::region::Region;
use crate::types::time_range::TimeRange;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::Path;

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Runs the fetch loops against a [`DocumentSource`].
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use entsoe_ingest::{DataCategory, IngestConfig, Ingestor, TimeRange, TransparencyClient};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IngestConfig::builder().security_token("my-token").build();
/// let client = TransparencyClient::new(&config)?;
/// let ingestor = Ingestor::new(client, config);
///
/// let range = TimeRange::from_dates(
///     NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
/// )?;
/// ingestor.run(DataCategory::Load, &range, Path::new("./data"))?;
/// ingestor.run(DataCategory::Generation, &range, Path::new("./data"))?;
/// # Ok(())
/// # }
/// ```
pub struct Ingestor<S> {
    source: S,
    config: IngestConfig,
}

impl<S: DocumentSource> Ingestor<S> {
    pub fn new(source: S, config: IngestConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Fetches the category over `range` and writes its CSV into `output_dir`.
    ///
    /// Any fetch or parse failure aborts before anything is written.
    pub fn run(
        &self,
        category: DataCategory,
        range: &TimeRange,
        output_dir: &Path,
    ) -> Result<WriteOutcome, IngestError> {
        let table = match category {
            DataCategory::Load => self.fetch_load(range)?,
            DataCategory::Generation => self.fetch_generation(range)?,
        };
        write_table(table, output_dir)
    }

    /// Load loop: each response parses into a single frame.
    pub fn fetch_load(&self, range: &TimeRange) -> Result<AccumulatedTable, IngestError> {
        let mut table = AccumulatedTable::new(DataCategory::Load);
        self.for_each_response(DataCategory::Load, range, |region, params, xml| {
            let frame =
                parse_load_document(xml).map_err(|source| parse_failure(region, params, source))?;
            table.push_tagged(frame, region)
        })?;
        Ok(table)
    }

    /// Generation loop: each response parses into one frame per production
    /// type, and each of those is appended on its own.
    pub fn fetch_generation(&self, range: &TimeRange) -> Result<AccumulatedTable, IngestError> {
        let mut table = AccumulatedTable::new(DataCategory::Generation);
        self.for_each_response(DataCategory::Generation, range, |region, params, xml| {
            let series = parse_generation_document(xml)
                .map_err(|source| parse_failure(region, params, source))?;
            debug!(
                "{} production types for {} in {}",
                series.len(),
                region.code,
                params.period
            );
            for (_psr_type, frame) in series {
                table.push_tagged(frame, region)?;
            }
            Ok(())
        })?;
        Ok(table)
    }

    fn for_each_response<F>(
        &self,
        category: DataCategory,
        range: &TimeRange,
        mut handle: F,
    ) -> Result<(), IngestError>
    where
        F: FnMut(&Region, &RequestParams, &str) -> Result<(), IngestError>,
    {
        let chunks = range.split(category.max_chunk())?;
        let regions = &self.config.regions;
        info!(
            "Fetching data for {}, periodStart={}, periodEnd={}, regions={}...",
            category,
            range.period_start(),
            range.period_end(),
            regions.len()
        );

        let progress = self.progress_bar((chunks.len() * regions.len()) as u64, category);
        for chunk in &chunks {
            debug!("{} chunk {}", category, chunk);
            for region in regions {
                let params = RequestParams::new(category, &self.config.process_type, region, *chunk);
                let xml = self.source.fetch(&params)?;
                handle(region, &params, &xml)?;
                progress.inc(1);
            }
        }
        progress.finish_and_clear();
        Ok(())
    }

    fn progress_bar(&self, total: u64, category: DataCategory) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            bar.set_style(style);
        }
        bar.set_message(category.to_string());
        bar
    }
}

fn parse_failure(region: &Region, params: &RequestParams, source: ParseError) -> IngestError {
    IngestError::Parse {
        region: region.code.clone(),
        period: params.period.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::accumulator::REGION;
    use crate::transparency::error::FetchError;
    use crate::transparency::parser::tests::{document_xml, time_series_xml, NO_DATA_XML};
    use crate::types::region::RegionTable;
    use chrono::NaiveDate;
    use polars::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned documents keyed by `(area code, periodStart)` and records
    /// every request it receives.
    struct FakeSource {
        responses: HashMap<(String, String), String>,
        fallback: Option<String>,
        fail_on_call: Option<usize>,
        calls: RefCell<Vec<RequestParams>>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                fallback: None,
                fail_on_call: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn respond(mut self, area: &str, period_start: &str, xml: String) -> Self {
            self.responses
                .insert((area.to_string(), period_start.to_string()), xml);
            self
        }

        fn otherwise(mut self, xml: &str) -> Self {
            self.fallback = Some(xml.to_string());
            self
        }

        fn failing_on_call(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }
    }

    impl DocumentSource for FakeSource {
        fn fetch(&self, params: &RequestParams) -> Result<String, FetchError> {
            self.calls.borrow_mut().push(params.clone());
            if self.fail_on_call == Some(self.calls.borrow().len()) {
                return Err(FetchError::HttpStatus {
                    url: "fake".to_string(),
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    reason: "down".to_string(),
                });
            }
            let key = (params.area_code.clone(), params.period.period_start());
            Ok(self
                .responses
                .get(&key)
                .cloned()
                .or_else(|| self.fallback.clone())
                .unwrap_or_else(|| NO_DATA_XML.to_string()))
        }
    }

    const HU: &str = "10YHU-MAVIR----U";
    const IT: &str = "10YIT-GRTN-----B";

    fn config(codes: &[&str]) -> IngestConfig {
        IngestConfig::builder()
            .security_token("test")
            .regions(RegionTable::from_codes(codes).unwrap())
            .show_progress(false)
            .build()
    }

    fn days(start: u32, end: u32) -> TimeRange {
        TimeRange::from_dates(
            NaiveDate::from_ymd_opt(2021, 1, start).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, end).unwrap(),
        )
        .unwrap()
    }

    fn load_xml(area: &str, values: &[f64]) -> String {
        document_xml(&[time_series_xml(area, None, "2021-01-01T00:00Z", "PT60M", values)])
    }

    fn region_column(df: &DataFrame) -> Vec<String> {
        df.column(REGION)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_load_two_regions_three_rows_each() -> Result<(), Box<dyn std::error::Error>> {
        let source = FakeSource::new()
            .respond(HU, "202101010000", load_xml(HU, &[1.0, 2.0, 3.0]))
            .respond(IT, "202101010000", load_xml(IT, &[4.0, 5.0, 6.0]));
        let ingestor = Ingestor::new(source, config(&["HU", "IT"]));

        let table = ingestor.fetch_load(&days(1, 2))?;

        assert_eq!(table.row_count(), 6);
        let df = table.into_frame()?.unwrap();
        assert_eq!(df.height(), 6);
        assert_eq!(region_column(&df), ["HU", "HU", "HU", "IT", "IT", "IT"]);
        let areas: Vec<Option<&str>> = df.column("AreaID")?.str()?.into_iter().collect();
        assert_eq!(areas[0], Some(HU));
        assert_eq!(areas[5], Some(IT));
        Ok(())
    }

    #[test]
    fn test_load_uses_year_chunks() -> Result<(), Box<dyn std::error::Error>> {
        let source = FakeSource::new();
        let ingestor = Ingestor::new(&source, config(&["HU"]));
        let range = TimeRange::from_dates(
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
        )?;

        ingestor.fetch_load(&range)?;

        let periods: Vec<(String, String)> = source
            .calls
            .borrow()
            .iter()
            .map(|p| (p.period.period_start(), p.period.period_end()))
            .collect();
        assert_eq!(
            periods,
            [
                ("202101010000".to_string(), "202201010000".to_string()),
                ("202201010000".to_string(), "202206010000".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_generation_requests_in_chunk_then_region_order() -> Result<(), Box<dyn std::error::Error>> {
        let source = FakeSource::new();
        let ingestor = Ingestor::new(&source, config(&["HU", "IT"]));

        ingestor.fetch_generation(&days(1, 3))?;

        let calls: Vec<(String, String, &'static str)> = source
            .calls
            .borrow()
            .iter()
            .map(|p| (p.period.period_start(), p.area_code.clone(), p.category.document_type()))
            .collect();
        assert_eq!(
            calls,
            [
                ("202101010000".to_string(), HU.to_string(), "A75"),
                ("202101010000".to_string(), IT.to_string(), "A75"),
                ("202101020000".to_string(), HU.to_string(), "A75"),
                ("202101020000".to_string(), IT.to_string(), "A75"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_generation_appends_every_series() -> Result<(), Box<dyn std::error::Error>> {
        let hu_doc = document_xml(&[
            time_series_xml(HU, Some("B16"), "2021-01-01T00:00Z", "PT60M", &[1.0, 2.0]),
            time_series_xml(HU, Some("B14"), "2021-01-01T00:00Z", "PT60M", &[3.0]),
        ]);
        let it_doc = document_xml(&[time_series_xml(
            IT,
            Some("B04"),
            "2021-01-02T00:00Z",
            "PT15M",
            &[7.0, 8.0, 9.0, 10.0],
        )]);
        let source = FakeSource::new()
            .respond(HU, "202101010000", hu_doc)
            .respond(IT, "202101020000", it_doc);
        let ingestor = Ingestor::new(source, config(&["HU", "IT"]));

        let table = ingestor.fetch_generation(&days(1, 3))?;

        assert_eq!(table.row_count(), 7);
        let df = table.into_frame()?.unwrap();
        assert_eq!(
            df.get_column_names(),
            ["StartTime", "EndTime", "AreaID", "UnitName", "PsrType", "quantity", REGION]
        );
        assert_eq!(region_column(&df), ["HU", "HU", "HU", "IT", "IT", "IT", "IT"]);
        let psr: Vec<Option<&str>> = df.column("PsrType")?.str()?.into_iter().collect();
        assert_eq!(psr[..3], [Some("B16"), Some("B16"), Some("B14")]);
        Ok(())
    }

    #[test]
    fn test_run_writes_load_csv() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let source = FakeSource::new().respond(HU, "202101010000", load_xml(HU, &[1.5, 2.5]));
        let ingestor = Ingestor::new(source, config(&["HU", "IT"]));

        let outcome = ingestor.run(DataCategory::Load, &days(1, 2), dir.path())?;

        let path = dir.path().join("load.csv");
        assert_eq!(outcome, WriteOutcome::Written { path: path.clone(), rows: 2 });
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path))?
            .finish()?;
        assert_eq!(
            df.get_column_names(),
            ["StartTime", "EndTime", "AreaID", "UnitName", "Load", REGION]
        );
        assert_eq!(df.height(), 2);
        Ok(())
    }

    #[test]
    fn test_all_empty_responses_write_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let empty_gl = document_xml(&[]);
        let ingestor = Ingestor::new(FakeSource::new().otherwise(&empty_gl), config(&["HU", "IT"]));

        let load = ingestor.run(DataCategory::Load, &days(1, 2), dir.path())?;
        let generation = ingestor.run(DataCategory::Generation, &days(1, 3), dir.path())?;

        assert_eq!(load, WriteOutcome::NoData(DataCategory::Load));
        assert_eq!(generation, WriteOutcome::NoData(DataCategory::Generation));
        assert!(!dir.path().join("load.csv").exists());
        assert!(!dir.path().join("gen.csv").exists());
        Ok(())
    }

    #[test]
    fn test_fetch_failure_aborts_without_output() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let source = FakeSource::new()
            .otherwise(&load_xml(HU, &[1.0]))
            .failing_on_call(2);
        let ingestor = Ingestor::new(&source, config(&["HU", "IT", "PO"]));

        let result = ingestor.run(DataCategory::Load, &days(1, 2), dir.path());

        assert!(matches!(result, Err(IngestError::Fetch(FetchError::HttpStatus { .. }))));
        assert_eq!(source.calls.borrow().len(), 2);
        assert!(!dir.path().join("load.csv").exists());
        Ok(())
    }

    #[test]
    fn test_parse_failure_names_region() {
        let source = FakeSource::new().otherwise("<GL_MarketDocument><TimeSeries>");
        let ingestor = Ingestor::new(source, config(&["IT"]));

        let err = ingestor.fetch_load(&days(1, 2)).unwrap_err();

        assert!(matches!(err, IngestError::Parse { ref region, .. } if region == "IT"));
    }
}
