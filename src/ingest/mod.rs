/// Rainfall data sources.
///
/// The HTTP layer only ever talks to a [`RainfallSource`]; `hcfws` is the
/// production implementation backed by the Harris County Flood Warning
/// System gage detail pages.

pub mod hcfws;

#[cfg(test)]
pub(crate) mod fixtures;

use std::sync::Arc;

use crate::model::ScrapeError;

/// Something that can total a station's rainfall over the reporting period.
pub trait RainfallSource {
    /// Total rainfall in inches over the 7 complete days before today.
    ///
    /// `Ok(None)` means the source answered but had no usable data for the
    /// station; `Err` means the source itself failed.
    fn scrape_rainfall_totals(&self, location_id: &str) -> Result<Option<f64>, ScrapeError>;

    /// Wall-clock time of the lookup, as reported to clients.
    fn current_timestamp(&self) -> String;
}

/// Builds a fresh source for each rainfall request.
pub type SourceFactory =
    Arc<dyn Fn() -> Result<Box<dyn RainfallSource>, ScrapeError> + Send + Sync>;
