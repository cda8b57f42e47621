use crate::types::category::DataCategory;
use crate::types::region::Region;
use crate::types::time_range::TimeRange;

/// Query parameters of one platform request.
///
/// Built fresh for every `(chunk, region)` pair and never mutated. The
/// security token is not part of it; the transport appends that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    pub category: DataCategory,
    pub process_type: String,
    pub area_code: String,
    pub period: TimeRange,
}

impl RequestParams {
    pub fn new(
        category: DataCategory,
        process_type: impl Into<String>,
        region: &Region,
        period: TimeRange,
    ) -> Self {
        Self {
            category,
            process_type: process_type.into(),
            area_code: region.area_code.clone(),
            period,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("documentType", self.category.document_type().to_string()),
            ("processType", self.process_type.clone()),
            ("outBiddingZone_Domain", self.area_code.clone()),
        ];
        if self.category.binds_in_domain() {
            pairs.push(("in_Domain", self.area_code.clone()));
        }
        pairs.push(("periodStart", self.period.period_start()));
        pairs.push(("periodEnd", self.period.period_end()));
        pairs
    }
}
