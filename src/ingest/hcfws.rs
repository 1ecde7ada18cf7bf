/// Harris County Flood Warning System (FWS) gage page client.
///
/// Handles URL construction, page retrieval and HTML table parsing for the
/// FWS gage detail view:
///   https://www.harriscountyfws.org/GageDetail/Index/{site_id}
///
/// The page is requested with a custom span covering the reporting window
/// and the rainfall view selected, which renders one table row per
/// increment. See `fixtures.rs` for annotated examples of the row shapes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::analysis::totals::{ReportingWindow, window_total};
use crate::config::ScraperConfig;
use crate::ingest::{RainfallSource, SourceFactory};
use crate::model::{ObservedAt, RAINFALL_PERIOD_DAYS, RainfallIncrement, ScrapeError};

/// Timestamp layout used in the `From`/`to` query parameters.
const QUERY_TIME_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Layout of the `timestamp` field in rainfall responses.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TIMED_ROW_FORMATS: &[&str] = &["%m/%d/%Y %I:%M %p", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];
const DAILY_ROW_FORMAT: &str = "%m/%d/%Y";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the gage detail URL for `site_id` covering `window`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use hcfws_rainfall_service::analysis::totals::ReportingWindow;
/// use hcfws_rainfall_service::ingest::hcfws::build_gage_url;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
/// let window = ReportingWindow::ending_before(today, 7);
/// let url = build_gage_url("https://www.harriscountyfws.org", "590", &window);
/// assert!(url.starts_with("https://www.harriscountyfws.org/GageDetail/Index/590?"));
/// ```
pub fn build_gage_url(base_url: &str, site_id: &str, window: &ReportingWindow) -> String {
    let from = window.start().format(QUERY_TIME_FORMAT).to_string();
    let to = window.end().format(QUERY_TIME_FORMAT).to_string();

    format!(
        "{}/GageDetail/Index/{}?From={}&to={}&span=Custom&r=1&v=rainfall&selIdx=0",
        base_url.trim_end_matches('/'),
        urlencoding::encode(site_id),
        urlencoding::encode(&from),
        urlencoding::encode(&to),
    )
}

// ---------------------------------------------------------------------------
// Page parsing
// ---------------------------------------------------------------------------

/// Extracts every parseable rainfall row from a gage page.
///
/// Rows need at least two `td` cells: observation time, then increment in
/// inches. Header rows, missing-data markers ("--", "N/A") and negative
/// sensor resets are skipped.
pub fn parse_rainfall_rows(html: &str, row_selector: &Selector) -> Vec<RainfallIncrement> {
    let document = Html::parse_document(html);
    let mut increments = Vec::new();

    let Ok(cell_selector) = Selector::parse("td") else {
        return increments;
    };

    for row in document.select(row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| normalize_text(&cell.text().collect::<String>()))
            .collect();

        if cells.len() < 2 {
            continue;
        }

        let Some(observed_at) = parse_observed_at(&cells[0]) else {
            debug!("Skipping row with unreadable time '{}'", cells[0]);
            continue;
        };

        let Some(inches) = parse_inches(&cells[1]) else {
            debug!("Skipping row at '{}' with value '{}'", cells[0], cells[1]);
            continue;
        };

        increments.push(RainfallIncrement { observed_at, inches });
    }

    debug!("Parsed {} rainfall rows", increments.len());
    increments
}

fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_observed_at(text: &str) -> Option<ObservedAt> {
    for format in TIMED_ROW_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ObservedAt::Timed(at));
        }
    }
    NaiveDate::parse_from_str(text, DAILY_ROW_FORMAT)
        .ok()
        .map(ObservedAt::Day)
}

fn parse_inches(text: &str) -> Option<f64> {
    let value = text.trim();
    let value = value
        .strip_suffix('"')
        .or_else(|| value.strip_suffix("in"))
        .unwrap_or(value)
        .trim();

    value
        .parse::<f64>()
        .ok()
        .filter(|inches| inches.is_finite() && *inches >= 0.0)
}

// ---------------------------------------------------------------------------
// Scraper
// ---------------------------------------------------------------------------

/// Production [`RainfallSource`] backed by the FWS website.
pub struct HarrisCountyRainfallScraper {
    client: reqwest::blocking::Client,
    base_url: String,
    row_selector: Selector,
}

impl HarrisCountyRainfallScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        let row_selector = Selector::parse(&config.row_selector).map_err(|e| {
            ScrapeError::Client(format!("Invalid row selector '{}': {}", config.row_selector, e))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            row_selector,
        })
    }

    /// Factory handed to the endpoint; builds one scraper per request.
    pub fn factory(config: ScraperConfig) -> SourceFactory {
        Arc::new(move || {
            let scraper = HarrisCountyRainfallScraper::new(&config)?;
            Ok(Box::new(scraper) as Box<dyn RainfallSource>)
        })
    }

    /// Fetches the gage page HTML. `Ok(None)` when FWS has no such gage.
    pub fn fetch_gage_page(
        &self,
        site_id: &str,
        window: &ReportingWindow,
    ) -> Result<Option<String>, ScrapeError> {
        let url = build_gage_url(&self.base_url, site_id, window);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "text/html")
            .send()?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ScrapeError::Http(status.as_u16()));
        }

        Ok(Some(response.text()?))
    }

    /// Total rainfall for `site_id` over an explicit window.
    pub fn rainfall_for_window(
        &self,
        site_id: &str,
        window: &ReportingWindow,
    ) -> Result<Option<f64>, ScrapeError> {
        let Some(html) = self.fetch_gage_page(site_id, window)? else {
            info!("Gage {} not found on FWS", site_id);
            return Ok(None);
        };

        let increments = parse_rainfall_rows(&html, &self.row_selector);
        Ok(window_total(&increments, window))
    }
}

impl RainfallSource for HarrisCountyRainfallScraper {
    fn scrape_rainfall_totals(&self, location_id: &str) -> Result<Option<f64>, ScrapeError> {
        let today = Local::now().date_naive();
        let window = ReportingWindow::ending_before(today, RAINFALL_PERIOD_DAYS);
        self.rainfall_for_window(location_id, &window)
    }

    fn current_timestamp(&self) -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
