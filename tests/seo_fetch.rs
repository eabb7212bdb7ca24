// tests/seo_fetch.rs
//
// Fetch-level tests for the SEO view: request construction with encoded
// query parameters, the success-flag contract, and the defensive reshape
// of a partially-populated response.

use std::sync::Arc;

use traffic_analytics_dashboard::http::DynHttp;
use traffic_analytics_dashboard::seo;
use traffic_analytics_dashboard::{StubFetcher, ViewError};

const BASE: &str = "https://api.seoreviewtools.com/website-traffic-v2";

fn stubbed() -> (DynHttp, Arc<StubFetcher>) {
    let stub = Arc::new(StubFetcher::new());
    let http: DynHttp = stub.clone();
    (http, stub)
}

#[tokio::test]
async fn query_parameters_are_percent_encoded() {
    let (http, stub) = stubbed();
    stub.push_response(200, r#"{"success": true, "data": {}}"#);

    seo::fetch_website_seo(&http, BASE, "k&y=1", "news.example.com")
        .await
        .expect("fetch should succeed");

    assert_eq!(
        stub.calls(),
        vec![format!("{BASE}?key=k%26y%3D1&domain=news.example.com")]
    );
}

#[tokio::test]
async fn upstream_rejection_surfaces_its_message() {
    let (http, stub) = stubbed();
    stub.push_response(200, r#"{"success": false, "message": "Invalid key"}"#);
    let err = seo::fetch_website_seo(&http, BASE, "bad", "example.com")
        .await
        .unwrap_err();
    assert_eq!(err, ViewError::Upstream("Invalid key".into()));

    let (http, stub) = stubbed();
    stub.push_response(200, r#"{"success": false}"#);
    let err = seo::fetch_website_seo(&http, BASE, "bad", "example.com")
        .await
        .unwrap_err();
    assert_eq!(err, ViewError::Upstream("Unknown error".into()));
}

#[tokio::test]
async fn transport_failures_keep_their_own_shape() {
    let (http, stub) = stubbed();
    stub.push_error(ViewError::Transport("dns error".into()));
    let err = seo::fetch_website_seo(&http, BASE, "k", "example.com")
        .await
        .unwrap_err();
    assert_eq!(err, ViewError::Transport("dns error".into()));

    let (http, stub) = stubbed();
    stub.push_response(500, "oops");
    let err = seo::fetch_website_seo(&http, BASE, "k", "example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::Transport(_)));
}

#[tokio::test]
async fn partial_data_yields_na_tiles_and_placeholders() {
    let (http, stub) = stubbed();
    stub.push_response(
        200,
        r#"{"success": true, "data": {
            "visits": 250000,
            "avg_session_duration": 125,
            "traffic_device_split": {"desktop": 64.2, "mobile": 33.1, "tablet": 2.7}
        }}"#,
    );

    let report = seo::fetch_website_seo(&http, BASE, "k", "example.com")
        .await
        .expect("fetch should succeed");

    let values: Vec<&str> = report.tiles.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["N/A", "250,000", "N/A", "2m 5s"]);

    assert_eq!(report.devices.len(), 3);
    // Absent collections stay empty; the UI renders a placeholder for them.
    assert!(report.countries.is_empty());
    assert!(report.sources.is_empty());

    // The raw body rides along untouched for the expander.
    assert_eq!(report.raw["data"]["visits"], 250000);
}

#[tokio::test]
async fn missing_data_object_still_succeeds_with_empty_report() {
    let (http, stub) = stubbed();
    stub.push_response(200, r#"{"success": true}"#);

    let report = seo::fetch_website_seo(&http, BASE, "k", "example.com")
        .await
        .expect("fetch should succeed");
    assert!(report.tiles.iter().all(|t| t.value == "N/A"));
    assert!(report.countries.is_empty());
    assert!(report.devices.is_empty());
    assert!(report.sources.is_empty());
}
