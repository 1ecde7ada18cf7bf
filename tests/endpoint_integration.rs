/// Integration tests for the rainfall HTTP API
///
/// These tests boot the real tiny_http server on an ephemeral port and
/// verify:
/// 1. Static endpoints (/health, /locations) and CORS headers
/// 2. The full pipeline: request → HCFWS scraper → fake FWS gage page → JSON
/// 3. Failure tiers: missing gage (200 failure) vs upstream error (500)
///
/// No network access is needed; the FWS site is replaced by a local
/// tiny_http server serving a generated gage page.
///
/// Run with: cargo test --test endpoint_integration

use chrono::{Duration, Local};
use hcfws_rainfall_service::config::ScraperConfig;
use hcfws_rainfall_service::endpoint::{EndpointServer, Router};
use hcfws_rainfall_service::ingest::hcfws::HarrisCountyRainfallScraper;
use hcfws_rainfall_service::ingest::{RainfallSource, SourceFactory};
use hcfws_rainfall_service::model::ScrapeError;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::thread;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Starts the rainfall API and returns its base URL.
fn spawn_service(factory: SourceFactory) -> String {
    let server = EndpointServer::bind("127.0.0.1:0", 2, Router::new(factory))
        .expect("failed to bind rainfall API");
    let addr = server.local_addr().expect("server should report an IP address");
    thread::spawn(move || server.run());
    format!("http://{}", addr)
}

/// Starts a stand-in for the FWS website. Gage 999 does not exist; every
/// other gage page responds with `status` and `html`. Requested URLs are
/// recorded.
fn spawn_fake_fws(status: u16, html: String) -> (String, Arc<Mutex<Vec<String>>>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("failed to bind fake FWS");
    let addr = server.server_addr().to_ip().expect("fake FWS should have an IP address");
    let requested = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requested);

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let url = request.url().to_string();
            log.lock().unwrap().push(url.clone());

            let response = if url.starts_with("/GageDetail/Index/999?") {
                tiny_http::Response::from_string("Gage not found").with_status_code(404)
            } else {
                tiny_http::Response::from_string(html.clone())
                    .with_status_code(status)
                    .with_header(
                        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..])
                            .unwrap(),
                    )
            };
            let _ = request.respond(response);
        }
    });

    (format!("http://{}", addr), requested)
}

/// Gage page with rows relative to today: 0.40 + 0.333 inside the window,
/// plus rows from today and from ten days ago that must be ignored.
fn gage_page_html() -> String {
    let today = Local::now().date_naive();
    let stamp = |days_ago: i64, time: &str| {
        format!("{} {}", (today - Duration::days(days_ago)).format("%m/%d/%Y"), time)
    };

    format!(
        r#"<html><body>
        <table id="gageDataTable">
          <thead><tr><th>Date/Time</th><th>Rainfall (in)</th></tr></thead>
          <tbody>
            <tr><td>{}</td><td>2.00</td></tr>
            <tr><td>{}</td><td>0.333</td></tr>
            <tr><td>{}</td><td>--</td></tr>
            <tr><td>{}</td><td>0.40</td></tr>
            <tr><td>{}</td><td>1.00</td></tr>
          </tbody>
        </table>
        </body></html>"#,
        stamp(10, "08:00 AM"),
        stamp(3, "02:30 PM"),
        stamp(2, "06:00 AM"),
        stamp(1, "10:00 AM"),
        stamp(0, "11:00 PM"),
    )
}

fn scraper_factory(base_url: &str) -> SourceFactory {
    HarrisCountyRainfallScraper::factory(ScraperConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..ScraperConfig::default()
    })
}

/// Source that always fails; used where the rainfall route is not under test.
struct FailingSource;

impl RainfallSource for FailingSource {
    fn scrape_rainfall_totals(&self, _: &str) -> Result<Option<f64>, ScrapeError> {
        Err(ScrapeError::Http(503))
    }

    fn current_timestamp(&self) -> String {
        String::new()
    }
}

fn failing_factory() -> SourceFactory {
    Arc::new(|| Ok(Box::new(FailingSource) as Box<dyn RainfallSource>))
}

fn get_json(url: &str) -> (u16, reqwest::header::HeaderMap, Value) {
    let response = reqwest::blocking::get(url).expect("request failed");
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.json::<Value>().expect("body should be JSON");
    (status, headers, body)
}

// ---------------------------------------------------------------------------
// 1. Static endpoints
// ---------------------------------------------------------------------------

#[test]
fn test_health_reports_healthy_even_when_source_is_down() {
    let base = spawn_service(failing_factory());
    let (status, headers, body) = get_json(&format!("{}/health", base));

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Harris County FWS Rainfall Scraper API");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["content-type"], "application/json");
}

#[test]
fn test_locations_returns_the_ten_registered_gages() {
    let base = spawn_service(failing_factory());

    for _ in 0..2 {
        let (status, headers, body) = get_json(&format!("{}/locations", base));
        assert_eq!(status, 200);
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(body["success"], true);

        let locations = body["locations"].as_object().unwrap();
        assert_eq!(locations.len(), 10);
        assert_eq!(locations["520"], "White Oak Bayou @ Heights Boulevard");
        assert_eq!(locations["490"], "Keegans Bayou @ Keegan Road");
    }
}

#[test]
fn test_unknown_route_is_json_404_with_cors() {
    let base = spawn_service(failing_factory());
    let (status, headers, body) = get_json(&format!("{}/stations", base));

    assert_eq!(status, 404);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(body["success"], false);
}

#[test]
fn test_head_health_has_headers_but_no_body() {
    let base = spawn_service(failing_factory());
    let response = reqwest::blocking::Client::new()
        .head(format!("{}/health", base))
        .send()
        .expect("HEAD failed");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()["content-type"], "application/json");
    assert!(response.bytes().expect("body should be readable").is_empty());
}

#[test]
fn test_post_is_405_with_cors_and_never_reaches_source() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let factory: SourceFactory = Arc::new(move || {
        *counter.lock().unwrap() += 1;
        Ok(Box::new(FailingSource) as Box<dyn RainfallSource>)
    });
    let base = spawn_service(factory);

    let response = reqwest::blocking::Client::new()
        .post(format!("{}/rainfall?location=590", base))
        .send()
        .expect("POST failed");

    assert_eq!(response.status().as_u16(), 405);
    let headers = response.headers().clone();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["allow"], "GET, HEAD, OPTIONS");
    let body = response.json::<Value>().expect("body should be JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Method not allowed");
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn test_preflight_allows_any_origin() {
    let base = spawn_service(failing_factory());
    let response = reqwest::blocking::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/rainfall", base))
        .header("Origin", "https://docs.google.com")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .expect("preflight failed");

    assert_eq!(response.status().as_u16(), 200);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, HEAD, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "content-type");
}

// ---------------------------------------------------------------------------
// 2. Full rainfall pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_rainfall_defaults_to_590_and_sums_window() {
    let (fws, requested) = spawn_fake_fws(200, gage_page_html());
    let base = spawn_service(scraper_factory(&fws));

    let (status, headers, body) = get_json(&format!("{}/rainfall", base));

    assert_eq!(status, 200, "body: {}", body);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(body["success"], true);
    assert_eq!(body["location_id"], "590");
    assert_eq!(body["total_rainfall_inches"].as_f64(), Some(0.73));
    assert_eq!(body["period"], "7 complete days prior to today");
    assert!(!body["timestamp"].as_str().unwrap().is_empty());

    let urls = requested.lock().unwrap();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("/GageDetail/Index/590?"), "got {}", urls[0]);
    assert!(urls[0].contains("v=rainfall"));
}

#[test]
fn test_rainfall_for_explicit_location() {
    let (fws, requested) = spawn_fake_fws(200, gage_page_html());
    let base = spawn_service(scraper_factory(&fws));

    let (status, _, body) = get_json(&format!("{}/rainfall?location=440", base));

    assert_eq!(status, 200);
    assert_eq!(body["location_id"], "440");
    assert!(requested.lock().unwrap()[0].starts_with("/GageDetail/Index/440?"));
}

// ---------------------------------------------------------------------------
// 3. Failure tiers
// ---------------------------------------------------------------------------

#[test]
fn test_missing_gage_is_200_failure_envelope() {
    let (fws, _) = spawn_fake_fws(200, gage_page_html());
    let base = spawn_service(scraper_factory(&fws));

    let (status, _, body) = get_json(&format!("{}/rainfall?location=999", base));

    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to retrieve rainfall data");
    assert_eq!(body["location_id"], "999");
}

#[test]
fn test_page_without_rows_is_200_failure_envelope() {
    let (fws, _) = spawn_fake_fws(200, "<html><body><p>Maintenance</p></body></html>".to_string());
    let base = spawn_service(scraper_factory(&fws));

    let (status, _, body) = get_json(&format!("{}/rainfall?location=520", base));

    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["location_id"], "520");
}

#[test]
fn test_upstream_error_is_500_with_message() {
    let (fws, _) = spawn_fake_fws(503, "Service Unavailable".to_string());
    let base = spawn_service(scraper_factory(&fws));

    let (status, headers, body) = get_json(&format!("{}/rainfall?location=530", base));

    assert_eq!(status, 500);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Harris County FWS returned HTTP 503");
    assert!(body.get("location_id").is_none());
}

#[test]
fn test_unreachable_upstream_is_500() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let base = spawn_service(scraper_factory("http://127.0.0.1:9"));

    let (status, _, body) = get_json(&format!("{}/rainfall", base));

    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().starts_with("Request to Harris County FWS failed"),
        "got {}",
        body["error"]
    );
}
