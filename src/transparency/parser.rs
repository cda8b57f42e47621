//! Turns platform XML market documents into Polars `DataFrame`s.
//!
//! Both the load (`A65`) and generation (`A75`) reports share the
//! `GL_MarketDocument` layout: a list of `TimeSeries`, each with one or more
//! `Period`s holding a start instant, a resolution and numbered `Point`s. A
//! point's interval is `start + resolution * (position - 1)` and lasts one
//! resolution step.
//!
//! When the platform has nothing to return it answers with an
//! `Acknowledgement_MarketDocument` instead. That is treated as an empty
//! result, not an error.

use crate::transparency::error::ParseError;
use chrono::{Duration, NaiveDateTime};
use log::warn;
use polars::prelude::*;
use serde::Deserialize;

pub const START_TIME: &str = "StartTime";
pub const END_TIME: &str = "EndTime";
pub const AREA_ID: &str = "AreaID";
pub const UNIT_NAME: &str = "UnitName";
pub const LOAD: &str = "Load";
pub const PSR_TYPE: &str = "PsrType";
pub const QUANTITY: &str = "quantity";

/// Series without a `MktPSRType` are grouped under this name.
pub const UNKNOWN_PSR_TYPE: &str = "Unknown";

const DOCUMENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%MZ";
const OUTPUT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M+00:00Z";

#[derive(Debug, Deserialize)]
struct MarketDocument {
    #[serde(rename = "TimeSeries", default)]
    time_series: Vec<TimeSeries>,
    #[serde(rename = "Reason", default)]
    reason: Option<Reason>,
}

#[derive(Debug, Deserialize)]
struct Reason {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    #[serde(rename = "inBiddingZone_Domain.mRID")]
    in_domain: Option<DomainId>,
    #[serde(rename = "outBiddingZone_Domain.mRID")]
    out_domain: Option<DomainId>,
    #[serde(rename = "quantity_Measure_Unit.name")]
    unit_name: Option<String>,
    #[serde(rename = "MktPSRType")]
    psr_type: Option<MktPsrType>,
    #[serde(rename = "Period", default)]
    periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
struct DomainId {
    #[serde(rename = "$text")]
    mrid: String,
}

#[derive(Debug, Deserialize)]
struct MktPsrType {
    #[serde(rename = "psrType")]
    code: String,
}

#[derive(Debug, Deserialize)]
struct Period {
    #[serde(rename = "timeInterval")]
    time_interval: TimeInterval,
    resolution: String,
    #[serde(rename = "Point", default)]
    points: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct TimeInterval {
    start: String,
}

#[derive(Debug, Deserialize)]
struct Point {
    position: u32,
    quantity: f64,
}

/// Column-wise buffer for the rows of one frame.
#[derive(Debug, Default)]
struct Rows {
    start: Vec<String>,
    end: Vec<String>,
    area: Vec<String>,
    unit: Vec<String>,
    quantity: Vec<f64>,
}

impl Rows {
    fn extend_from(&mut self, series: &TimeSeries, area: &str) -> Result<(), ParseError> {
        let unit = series.unit_name.as_deref().unwrap_or_default();
        for period in &series.periods {
            let period_start = parse_timestamp(&period.time_interval.start)?;
            let step = parse_resolution(&period.resolution)?;
            for point in &period.points {
                let start = point_start(period_start, step, point.position)?;
                self.start.push(start.format(OUTPUT_TIME_FORMAT).to_string());
                self.end
                    .push((start + step).format(OUTPUT_TIME_FORMAT).to_string());
                self.area.push(area.to_string());
                self.unit.push(unit.to_string());
                self.quantity.push(point.quantity);
            }
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.quantity.len()
    }
}

fn decode(xml: &str) -> Result<MarketDocument, ParseError> {
    let document: MarketDocument = quick_xml::de::from_str(xml)?;
    if document.time_series.is_empty() {
        if let Some(text) = document.reason.as_ref().and_then(|r| r.text.as_deref()) {
            warn!("Platform returned no time series: {}", text);
        }
    }
    Ok(document)
}

/// Reason text of an acknowledgement document, if `xml` is one.
pub fn acknowledgement_reason(xml: &str) -> Option<String> {
    quick_xml::de::from_str::<MarketDocument>(xml)
        .ok()?
        .reason?
        .text
        .map(|text| text.trim().to_string())
}

/// Parses a load document into one frame with columns
/// `StartTime, EndTime, AreaID, UnitName, Load`.
///
/// A document without time series yields a frame with zero rows and the same
/// columns.
pub fn parse_load_document(xml: &str) -> Result<DataFrame, ParseError> {
    let document = decode(xml)?;
    let mut rows = Rows::default();
    for series in &document.time_series {
        let area = series
            .out_domain
            .as_ref()
            .or(series.in_domain.as_ref())
            .map(|d| d.mrid.as_str())
            .unwrap_or_default();
        rows.extend_from(series, area)?;
    }

    Ok(df!(
        START_TIME => rows.start,
        END_TIME => rows.end,
        AREA_ID => rows.area,
        UNIT_NAME => rows.unit,
        LOAD => rows.quantity,
    )?)
}

/// Parses a generation document into one frame per production type, with
/// columns `StartTime, EndTime, AreaID, UnitName, PsrType, quantity`.
///
/// Frames come in the order their production type first appears. Series that
/// share a production type (e.g. the generation and consumption sides of
/// pumped storage) end up in the same frame.
pub fn parse_generation_document(xml: &str) -> Result<Vec<(String, DataFrame)>, ParseError> {
    let document = decode(xml)?;
    let mut groups: Vec<(String, Rows)> = Vec::new();
    for series in &document.time_series {
        let psr_type = series
            .psr_type
            .as_ref()
            .map(|p| p.code.as_str())
            .unwrap_or(UNKNOWN_PSR_TYPE);
        let area = series
            .in_domain
            .as_ref()
            .or(series.out_domain.as_ref())
            .map(|d| d.mrid.as_str())
            .unwrap_or_default();

        let index = match groups.iter().position(|(name, _)| name == psr_type) {
            Some(index) => index,
            None => {
                groups.push((psr_type.to_string(), Rows::default()));
                groups.len() - 1
            }
        };
        groups[index].1.extend_from(series, area)?;
    }

    groups
        .into_iter()
        .map(|(psr_type, rows)| {
            let height = rows.len();
            let frame = df!(
                START_TIME => rows.start,
                END_TIME => rows.end,
                AREA_ID => rows.area,
                UNIT_NAME => rows.unit,
                PSR_TYPE => vec![psr_type.as_str(); height],
                QUANTITY => rows.quantity,
            )?;
            Ok((psr_type, frame))
        })
        .collect()
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(text.trim(), DOCUMENT_TIME_FORMAT)
        .map_err(|e| ParseError::InvalidTimestamp(text.to_string(), e))
}

/// Parses the ISO 8601 durations the platform uses: `PT{n}M`, `PT{n}H`, `P{n}D`.
fn parse_resolution(text: &str) -> Result<Duration, ParseError> {
    let unsupported = || ParseError::UnsupportedResolution(text.to_string());
    let text = text.trim();

    let (amount, to_duration): (&str, fn(i64) -> Option<Duration>) =
        if let Some(minutes) = text.strip_prefix("PT").and_then(|r| r.strip_suffix('M')) {
            (minutes, Duration::try_minutes)
        } else if let Some(hours) = text.strip_prefix("PT").and_then(|r| r.strip_suffix('H')) {
            (hours, Duration::try_hours)
        } else if let Some(days) = text.strip_prefix('P').and_then(|r| r.strip_suffix('D')) {
            (days, Duration::try_days)
        } else {
            return Err(unsupported());
        };

    let amount: i64 = amount.parse().map_err(|_| unsupported())?;
    if amount <= 0 {
        return Err(unsupported());
    }
    to_duration(amount).ok_or_else(unsupported)
}

fn point_start(
    period_start: NaiveDateTime,
    step: Duration,
    position: u32,
) -> Result<NaiveDateTime, ParseError> {
    // positions are 1-based
    let offset = position
        .checked_sub(1)
        .and_then(|index| i32::try_from(index).ok())
        .and_then(|index| step.checked_mul(index))
        .ok_or(ParseError::InvalidPosition(position))?;
    period_start
        .checked_add_signed(offset)
        .ok_or(ParseError::InvalidPosition(position))
}
