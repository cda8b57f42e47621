//! Half-open time ranges and the splitter that cuts them into chunks the
//! transparency platform accepts in a single request.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Timestamp layout the platform expects for `periodStart` / `periodEnd`.
pub(crate) const API_PERIOD_FORMAT: &str = "%Y%m%d%H%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRangeError {
    #[error("Range start {start} is not before range end {end}")]
    EmptyRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Chunk duration must be positive, got {0}")]
    NonPositiveChunk(Duration),

    #[error("Date {0} cannot be represented as a timestamp")]
    UnrepresentableDate(NaiveDate),
}

/// A half-open interval `[start, end)` of timezone-naive UTC timestamps.
///
/// A `TimeRange` can only be built through [`TimeRange::new`] (or one of the
/// helpers that call it), so `start < end` always holds.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use entsoe_ingest::TimeRange;
///
/// let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2021, 1, 3).unwrap();
/// let range = TimeRange::from_dates(start, end).unwrap();
/// assert_eq!(range.period_start(), "202101010000");
/// assert_eq!(range.period_end(), "202101030000");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, InvalidRangeError> {
        if start >= end {
            return Err(InvalidRangeError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds the range `[start 00:00, end 00:00)`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidRangeError> {
        let Some(start_dt) = start.and_hms_opt(0, 0, 0) else {
            return Err(InvalidRangeError::UnrepresentableDate(start));
        };
        let Some(end_dt) = end.and_hms_opt(0, 0, 0) else {
            return Err(InvalidRangeError::UnrepresentableDate(end));
        };
        Self::new(start_dt, end_dt)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `periodStart` query value, `YYYYMMDDHHMM`.
    pub fn period_start(&self) -> String {
        self.start.format(API_PERIOD_FORMAT).to_string()
    }

    /// `periodEnd` query value, `YYYYMMDDHHMM`.
    pub fn period_end(&self) -> String {
        self.end.format(API_PERIOD_FORMAT).to_string()
    }

    /// Splits this range into consecutive chunks of at most `max_chunk`.
    ///
    /// See [`split_date_range`].
    pub fn split(&self, max_chunk: Duration) -> Result<Vec<TimeRange>, InvalidRangeError> {
        split_date_range(self.start, self.end, max_chunk)
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Divides `[start, end)` into ordered, gap-free, non-overlapping sub-ranges
/// whose union is exactly `[start, end)`.
///
/// Every chunk is `max_chunk` long except the last one, which is clamped to
/// `end`.
///
/// # Errors
///
/// Returns [`InvalidRangeError::EmptyRange`] if `start >= end` and
/// [`InvalidRangeError::NonPositiveChunk`] if `max_chunk` is zero or negative.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use entsoe_ingest::split_date_range;
///
/// let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2021, 1, 3).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let days = split_date_range(start, end, Duration::days(1)).unwrap();
/// assert_eq!(days.len(), 2);
/// assert_eq!(days[0].end(), days[1].start());
/// ```
pub fn split_date_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
    max_chunk: Duration,
) -> Result<Vec<TimeRange>, InvalidRangeError> {
    if max_chunk <= Duration::zero() {
        return Err(InvalidRangeError::NonPositiveChunk(max_chunk));
    }
    let whole = TimeRange::new(start, end)?;

    let mut chunks = Vec::new();
    let mut cursor = whole.start;
    while cursor < whole.end {
        let next = cursor
            .checked_add_signed(max_chunk)
            .map_or(whole.end, |candidate| candidate.min(whole.end));
        chunks.push(TimeRange {
            start: cursor,
            end: next,
        });
        cursor = next;
    }
    Ok(chunks)
}
