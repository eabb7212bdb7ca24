// tests/wikipedia_fetch.rs
//
// Fetch-level tests for the Wikipedia pageviews view, driven through the
// stub transport: outcome taxonomy (404 vs transport vs empty), request
// construction, and the reshaped report.

use std::sync::Arc;

use chrono::NaiveDate;

use traffic_analytics_dashboard::http::DynHttp;
use traffic_analytics_dashboard::wikipedia::{self, PageviewRecord};
use traffic_analytics_dashboard::{StubFetcher, ViewError};

const BASE: &str =
    "https://wikimedia.org/api/rest_v1/metrics/pageviews/per-article/en.wikipedia/all-access/user";

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

fn stubbed() -> (DynHttp, Arc<StubFetcher>) {
    let stub = Arc::new(StubFetcher::new());
    let http: DynHttp = stub.clone();
    (http, stub)
}

#[tokio::test]
async fn success_reshapes_items_in_api_order() {
    let (http, stub) = stubbed();
    stub.push_response(
        200,
        r#"{"items":[
            {"project":"en.wikipedia","article":"Rust","timestamp":"2025060300","views":500},
            {"project":"en.wikipedia","article":"Rust","timestamp":"2025060100","views":900},
            {"project":"en.wikipedia","article":"Rust","timestamp":"2025060200","views":900}
        ]}"#,
    );

    let report = wikipedia::fetch_pageviews(&http, BASE, "Rust", d(2025, 6, 1), d(2025, 6, 3))
        .await
        .expect("fetch should succeed");

    // Records keep response order, even when it is not chronological.
    assert_eq!(
        report.records,
        vec![
            PageviewRecord { date: d(2025, 6, 3), pageviews: 500 },
            PageviewRecord { date: d(2025, 6, 1), pageviews: 900 },
            PageviewRecord { date: d(2025, 6, 2), pageviews: 900 },
        ]
    );
    assert_eq!(report.stats.total_views, 2300);
    // First maximum wins on ties.
    assert_eq!(report.stats.peak_date, d(2025, 6, 1));
    assert_eq!(report.stats.peak_date_label, "Jun 01, 2025");

    assert_eq!(
        stub.calls(),
        vec![format!("{BASE}/Rust/daily/20250601/20250603")]
    );
}

#[tokio::test]
async fn not_found_is_distinct_from_transport_failure() {
    let (http, stub) = stubbed();
    stub.push_response(404, r#"{"type":"about:blank","title":"Not found."}"#);
    let err = wikipedia::fetch_pageviews(&http, BASE, "Nope", d(2025, 6, 1), d(2025, 6, 3))
        .await
        .unwrap_err();
    assert_eq!(err, ViewError::NotFound("Nope".into()));

    let (http, stub) = stubbed();
    stub.push_response(503, "upstream sad");
    let err = wikipedia::fetch_pageviews(&http, BASE, "Rust", d(2025, 6, 1), d(2025, 6, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::Transport(_)));
}

#[tokio::test]
async fn network_failure_propagates_as_transport() {
    let (http, stub) = stubbed();
    stub.push_error(ViewError::Transport("connection refused".into()));
    let err = wikipedia::fetch_pageviews(&http, BASE, "Rust", d(2025, 6, 1), d(2025, 6, 3))
        .await
        .unwrap_err();
    assert_eq!(err, ViewError::Transport("connection refused".into()));
}

#[tokio::test]
async fn empty_item_list_is_semantic_empty() {
    let (http, stub) = stubbed();
    stub.push_response(200, r#"{"items":[]}"#);
    let err = wikipedia::fetch_pageviews(&http, BASE, "Obscure", d(2025, 6, 1), d(2025, 6, 3))
        .await
        .unwrap_err();
    assert_eq!(err, ViewError::Empty("Obscure".into()));
    assert_eq!(err.to_string(), "No data available for 'Obscure'.");
}

#[tokio::test]
async fn inverted_range_short_circuits_before_any_request() {
    let (http, stub) = stubbed();
    let err = wikipedia::fetch_pageviews(&http, BASE, "Rust", d(2025, 6, 3), d(2025, 6, 1))
        .await
        .unwrap_err();
    assert!(err.is_warning());
    assert!(stub.calls().is_empty(), "no request may be issued");
}

#[test]
fn titles_with_spaces_become_underscored_path_segments() {
    let url = wikipedia::build_pageviews_url(BASE, "Rust (programming language)", d(2025, 1, 2), d(2025, 3, 4));
    assert_eq!(
        url,
        format!("{BASE}/Rust_(programming_language)/daily/20250102/20250304")
    );
}
