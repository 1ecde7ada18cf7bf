/// hcfws_rainfall_service: Harris County FWS rainfall totals over HTTP.
///
/// # Module structure
///
/// ```text
/// hcfws_rainfall_service
/// ├── model      — shared data types (RainfallIncrement, ScrapeError, …)
/// ├── config     — service configuration loader (rainfall_service.toml + env)
/// ├── stations   — FWS gage registry served by /locations
/// ├── logging    — tracing subscriber setup
/// ├── endpoint   — HTTP API: /rainfall, /health, /locations
/// ├── ingest
/// │   ├── hcfws  — FWS gage page URL construction + HTML parsing
/// │   └── fixtures (test only) — representative gage page payloads
/// └── analysis
///     └── totals — reporting window, accumulation and rounding
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod stations;
