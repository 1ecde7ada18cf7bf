/// HTTP endpoint for Harris County rainfall totals
///
/// Provides the small REST API polled by spreadsheet clients. All domain
/// work is delegated to a [`RainfallSource`] built fresh for each request.
///
/// Endpoints:
/// - GET /rainfall?location={site_id} - 7-day rainfall total (default site 590)
/// - GET /health - Service health check
/// - GET /locations - Directory of supported stations
///
/// Every response allows cross-origin access from any origin.

use std::any::Any;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use threadpool::ThreadPool;
use tiny_http::{Header, Method};
use tracing::{debug, error, info, warn};

use crate::analysis::totals::round_inches;
use crate::config::ServiceConfig;
use crate::ingest::SourceFactory;
use crate::model::{RAINFALL_PERIOD_DESCRIPTION, ScrapeError};
use crate::stations::{DEFAULT_LOCATION_ID, describe_location, station_directory};

pub const SERVICE_NAME: &str = "Harris County FWS Rainfall Scraper API";

const AVAILABLE_ENDPOINTS: &[&str] = &["/rainfall", "/health", "/locations"];
const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Successful rainfall lookup
#[derive(Debug, Serialize, Deserialize)]
pub struct RainfallResponse {
    pub success: bool,
    pub location_id: String,
    /// Rounded to hundredths of an inch.
    pub total_rainfall_inches: f64,
    pub period: String,
    pub timestamp: String,
}

/// The source answered but had nothing for this station
#[derive(Debug, Serialize, Deserialize)]
pub struct RainfallUnavailableResponse {
    pub success: bool,
    pub error: String,
    pub location_id: String,
}

/// Unhandled failure while serving a request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub success: bool,
    pub locations: BTreeMap<String, String>,
}

/// Framework-neutral response produced by [`Router::handle`].
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self { status, body: Some(body), headers: Vec::new() },
            Err(e) => Self::error(500, &e.to_string()),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: Some(serde_json::json!({ "success": false, "error": message })),
            headers: Vec::new(),
        }
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Looks up a response header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Renders the response for tiny_http, adding the CORS and content
    /// type headers.
    pub fn into_http_response(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let bytes = match &self.body {
            Some(json) => serde_json::to_string_pretty(json)
                .map(String::into_bytes)
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let mut headers = vec![("Access-Control-Allow-Origin".to_string(), "*".to_string())];
        if self.body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers.extend(self.headers);

        let mut response = tiny_http::Response::from_data(bytes)
            .with_status_code(tiny_http::StatusCode::from(self.status));

        for (name, value) in headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => warn!("Dropping invalid response header {}", name),
            }
        }

        response
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Rainfall,
    Health,
    Locations,
}

/// Maps requests onto handlers. Shared read-only across worker threads.
pub struct Router {
    factory: SourceFactory,
}

impl Router {
    pub fn new(factory: SourceFactory) -> Self {
        Self { factory }
    }

    /// Dispatches one request.
    ///
    /// `requested_headers` is the value of `Access-Control-Request-Headers`,
    /// echoed back on preflight.
    pub fn handle(
        &self,
        method: &Method,
        url: &str,
        requested_headers: Option<&str>,
    ) -> ApiResponse {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));

        let route = match path {
            "/rainfall" => Route::Rainfall,
            "/health" => Route::Health,
            "/locations" => Route::Locations,
            _ => return handle_not_found(),
        };

        match method {
            Method::Get | Method::Head => match route {
                Route::Rainfall => self.handle_rainfall(query),
                Route::Health => handle_health(),
                Route::Locations => handle_locations(),
            },
            Method::Options => handle_preflight(requested_headers),
            _ => {
                ApiResponse::error(405, "Method not allowed").with_header("Allow", ALLOWED_METHODS)
            }
        }
    }

    /// Handle /rainfall endpoint
    fn handle_rainfall(&self, query: &str) -> ApiResponse {
        let location_id =
            query_param(query, "location").unwrap_or_else(|| DEFAULT_LOCATION_ID.to_string());

        info!(
            "Fetching rainfall data for location {} ({})",
            location_id,
            describe_location(&location_id)
        );

        match self.lookup_rainfall(&location_id) {
            Ok(Some((total, timestamp))) => {
                info!("Successfully retrieved rainfall data: {} inches", total);
                ApiResponse::json(
                    200,
                    &RainfallResponse {
                        success: true,
                        location_id,
                        total_rainfall_inches: round_inches(total),
                        period: RAINFALL_PERIOD_DESCRIPTION.to_string(),
                        timestamp,
                    },
                )
            }
            Ok(None) => {
                error!("Failed to retrieve rainfall data for location {}", location_id);
                ApiResponse::json(
                    200,
                    &RainfallUnavailableResponse {
                        success: false,
                        error: "Failed to retrieve rainfall data".to_string(),
                        location_id,
                    },
                )
            }
            Err(message) => {
                error!("Error in rainfall lookup for location {}: {}", location_id, message);
                ApiResponse::json(
                    500,
                    &ErrorResponse {
                        success: false,
                        error: message,
                    },
                )
            }
        }
    }

    /// Builds a source, asks it for the total, then for the timestamp.
    /// Errors and panics from either the factory or the source come back
    /// as the message text.
    fn lookup_rainfall(&self, location_id: &str) -> Result<Option<(f64, String)>, String> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(
            || -> Result<Option<(f64, String)>, ScrapeError> {
                let source = (self.factory)()?;
                let total = source.scrape_rainfall_totals(location_id)?;
                Ok(total.map(|t| (t, source.current_timestamp())))
            },
        ));

        match outcome {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

/// Handle /health endpoint
fn handle_health() -> ApiResponse {
    ApiResponse::json(
        200,
        &HealthResponse {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
        },
    )
}

/// Handle /locations endpoint
fn handle_locations() -> ApiResponse {
    let locations = station_directory()
        .into_iter()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect();

    ApiResponse::json(200, &LocationsResponse { success: true, locations })
}

fn handle_preflight(requested_headers: Option<&str>) -> ApiResponse {
    let response = ApiResponse {
        status: 200,
        body: None,
        headers: Vec::new(),
    }
    .with_header("Allow", ALLOWED_METHODS)
    .with_header("Access-Control-Allow-Methods", ALLOWED_METHODS);

    match requested_headers {
        Some(headers) => response.with_header("Access-Control-Allow-Headers", headers),
        None => response,
    }
}

fn handle_not_found() -> ApiResponse {
    ApiResponse::json(
        404,
        &serde_json::json!({
            "success": false,
            "error": "Not found",
            "available_endpoints": AVAILABLE_ENDPOINTS,
        }),
    )
}

/// First value of `name` in a form-encoded query string. A bare key or
/// `key=` yields an empty string.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key) == name).then(|| decode_component(value))
        })
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Rainfall source panicked".to_string()
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to start HTTP server on {address}: {message}")]
    Bind { address: String, message: String },
}

/// tiny_http listener feeding a fixed worker pool.
pub struct EndpointServer {
    server: tiny_http::Server,
    router: Arc<Router>,
    pool: ThreadPool,
}

impl EndpointServer {
    pub fn bind(address: &str, workers: usize, router: Router) -> Result<Self, ServerError> {
        let server = tiny_http::Server::http(address).map_err(|e| ServerError::Bind {
            address: address.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            server,
            router: Arc::new(router),
            pool: ThreadPool::new(workers.max(1)),
        })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serves requests until the listener is closed.
    pub fn run(self) {
        for request in self.server.incoming_requests() {
            let router = Arc::clone(&self.router);
            self.pool.execute(move || respond(&router, request));
        }
    }
}

fn respond(router: &Router, request: tiny_http::Request) {
    let requested_headers = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Access-Control-Request-Headers"))
        .map(|h| h.value.as_str().to_string());

    let response = router.handle(request.method(), request.url(), requested_headers.as_deref());
    debug!("{} {} -> {}", request.method(), request.url(), response.status);

    if let Err(e) = request.respond(response.into_http_response()) {
        warn!("Failed to send response: {}", e);
    }
}

/// Start HTTP endpoint server with the configured address and worker pool.
/// Blocks for the lifetime of the server.
pub fn start_endpoint_server(
    config: &ServiceConfig,
    factory: SourceFactory,
) -> Result<(), ServerError> {
    let address = config.server.bind_address();
    let server = EndpointServer::bind(&address, config.server.workers, Router::new(factory))?;

    info!("HTTP endpoint listening on http://{}", address);
    info!("  GET /rainfall?location={{site_id}} - 7-day rainfall total");
    info!("  GET /health - Service health check");
    info!("  GET /locations - Supported stations");

    server.run();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
