use crate::error::IngestError;
use crate::types::category::DataCategory;
use crate::types::region::Region;
use polars::prelude::*;

/// Name of the column holding the region code a row was fetched for.
pub const REGION: &str = "Region";

/// Append-only collection of frames fetched for one category.
///
/// Frames are kept in fetch order and only concatenated on
/// [`AccumulatedTable::into_frame`]. Rows are never deduplicated.
#[derive(Debug)]
pub struct AccumulatedTable {
    category: DataCategory,
    frames: Vec<DataFrame>,
    rows: usize,
}

impl AccumulatedTable {
    pub fn new(category: DataCategory) -> Self {
        Self {
            category,
            frames: Vec::new(),
            rows: 0,
        }
    }

    pub fn category(&self) -> DataCategory {
        self.category
    }

    /// Tags every row of `frame` with `region` and appends it.
    pub fn push_tagged(&mut self, mut frame: DataFrame, region: &Region) -> Result<(), IngestError> {
        let height = frame.height();
        frame.with_column(Series::new(
            REGION.into(),
            vec![region.code.as_str(); height],
        ))?;
        self.rows += height;
        self.frames.push(frame);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Concatenates everything accumulated, or `None` if no rows were fetched.
    pub fn into_frame(self) -> Result<Option<DataFrame>, IngestError> {
        if self.is_empty() {
            return Ok(None);
        }
        let lazy_frames: Vec<LazyFrame> = self
            .frames
            .into_iter()
            .filter(|frame| frame.height() > 0)
            .map(|frame| frame.lazy())
            .collect();
        let frame = concat(lazy_frames, UnionArgs::default())?.collect()?;
        Ok(Some(frame))
    }
}
