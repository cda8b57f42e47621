//! Regions (bidding zones) to download data for.

use crate::error::IngestError;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Every region the tool knows an area code for, as `(code, area code)`.
///
/// The codes are the short names used in the output `Region` column.
pub const KNOWN_REGIONS: [(&str, &str); 9] = [
    ("HU", "10YHU-MAVIR----U"),
    ("IT", "10YIT-GRTN-----B"),
    ("PO", "10YPL-AREA-----S"),
    ("SP", "10YES-REE------0"),
    ("UK", "10Y1001A1001A92E"),
    ("DE", "10Y1001A1001A83F"),
    ("DK", "10Y1001A1001A65H"),
    ("SE", "10YSE-1--------K"),
    ("NE", "10YNL----------L"),
];

/// Regions fetched when none are chosen explicitly.
pub const DEFAULT_REGION_CODES: [&str; 3] = ["HU", "IT", "PO"];

/// A human-readable region code paired with the provider's area identifier
/// (EIC code) for its bidding zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub code: String,
    pub area_code: String,
}

impl Region {
    pub fn new(code: impl Into<String>, area_code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            area_code: area_code.into(),
        }
    }

    /// Looks a code up in [`KNOWN_REGIONS`], ignoring case.
    pub fn known(code: &str) -> Option<Self> {
        KNOWN_REGIONS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(known, area)| Self::new(*known, *area))
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.area_code)
    }
}

/// Ordered, non-empty list of regions. Iteration order is request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    pub fn new(regions: Vec<Region>) -> Result<Self, IngestError> {
        if regions.is_empty() {
            return Err(IngestError::EmptyRegionTable);
        }
        Ok(Self { regions })
    }

    /// Builds a table from region codes, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UnknownRegion`] for a code missing from
    /// [`KNOWN_REGIONS`] and [`IngestError::EmptyRegionTable`] if `codes` is empty.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self, IngestError> {
        let regions = codes
            .iter()
            .map(|code| {
                let code = code.as_ref().trim();
                Region::known(code).ok_or_else(|| IngestError::UnknownRegion(code.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(regions)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGION_CODES
                .iter()
                .filter_map(|code| Region::known(code))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RegionTable {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
