//! # Wikipedia pageview analytics
//! Fetches daily per-article pageview counts from the Wikimedia metrics API
//! and reshapes them for the time-series view. The only nontrivial input
//! handling in the dashboard lives here: a pasted article URL normalizes to
//! a bare title before the request is built.

use chrono::NaiveDate;
use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::http::DynHttp;

/// One day of traffic, in API response order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageviewRecord {
    pub date: NaiveDate,
    pub pageviews: u64,
}

/// KPI tile inputs for the pageviews view.
#[derive(Debug, Clone, Serialize)]
pub struct PageviewStats {
    pub total_views: u64,
    pub avg_daily_views: f64,
    pub peak_views: u64,
    pub peak_date: NaiveDate,
    /// Preformatted peak day, e.g. "Jul 04, 2026".
    pub peak_date_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageviewReport {
    pub article: String,
    pub records: Vec<PageviewRecord>,
    pub stats: PageviewStats,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    items: Vec<ApiItem>,
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    /// "YYYYMMDD00"
    timestamp: String,
    views: u64,
}

/// Turn user input into a bare article title. Full article URLs reduce to
/// their last path segment, percent-decoded, underscores mapped to spaces;
/// anything else passes through trimmed.
pub fn normalize_article_input(input: &str) -> String {
    static RE_WIKI_URL: OnceCell<Regex> = OnceCell::new();
    let re = RE_WIKI_URL
        .get_or_init(|| Regex::new(r"(?i)en\.wikipedia\.org/wiki/([^/?#]+)").unwrap());

    let trimmed = input.trim();
    if let Some(caps) = re.captures(trimmed) {
        let segment = &caps[1];
        let decoded = urlencoding::decode(segment)
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| segment.to_string());
        return decoded.replace('_', " ");
    }
    trimmed.to_string()
}

/// Dates may not reach into the future; the pickers clamp the same way.
pub fn clamp_to_today(d: NaiveDate, today: NaiveDate) -> NaiveDate {
    d.min(today)
}

/// Default window shown by the view: the last 30 days.
pub fn default_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - chrono::Duration::days(30), today)
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), ViewError> {
    if start > end {
        return Err(ViewError::InvalidInput(
            "Start date cannot be after end date.".to_string(),
        ));
    }
    Ok(())
}

pub fn build_pageviews_url(
    base: &str,
    article_title: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> String {
    let article_formatted = article_title.replace(' ', "_");
    format!(
        "{}/{}/daily/{}/{}",
        base.trim_end_matches('/'),
        article_formatted,
        start.format("%Y%m%d"),
        end.format("%Y%m%d"),
    )
}

fn parse_item_date(ts: &str) -> Result<NaiveDate, ViewError> {
    NaiveDate::parse_from_str(ts, "%Y%m%d00")
        .map_err(|e| ViewError::Transport(format!("unexpected timestamp '{ts}': {e}")))
}

/// Map one upstream reply to records. 404 is its own outcome; any other
/// non-2xx status or an undecodable body is a transport failure; a valid
/// body with no rows is the semantic-empty case.
pub fn parse_pageviews_response(
    article: &str,
    status: u16,
    body: &str,
) -> Result<Vec<PageviewRecord>, ViewError> {
    if status == 404 {
        return Err(ViewError::NotFound(article.to_string()));
    }
    if !(200..300).contains(&status) {
        return Err(ViewError::Transport(format!("HTTP status {status}")));
    }

    let parsed: ApiResponse = serde_json::from_str(body)
        .map_err(|e| ViewError::Transport(format!("decoding pageviews body: {e}")))?;
    if parsed.items.is_empty() {
        return Err(ViewError::Empty(article.to_string()));
    }

    let mut records = Vec::with_capacity(parsed.items.len());
    for item in parsed.items {
        records.push(PageviewRecord {
            date: parse_item_date(&item.timestamp)?,
            pageviews: item.views,
        });
    }
    Ok(records)
}

/// Aggregate the series for the KPI tiles. First maximum wins on ties.
pub fn compute_stats(records: &[PageviewRecord]) -> Option<PageviewStats> {
    let first = records.first()?;
    let total_views: u64 = records.iter().map(|r| r.pageviews).sum();
    let avg_daily_views = total_views as f64 / records.len() as f64;

    let mut peak = first;
    for r in records {
        if r.pageviews > peak.pageviews {
            peak = r;
        }
    }
    Some(PageviewStats {
        total_views,
        avg_daily_views,
        peak_views: peak.pageviews,
        peak_date: peak.date,
        peak_date_label: peak.date.format("%b %d, %Y").to_string(),
    })
}

/// One complete render pass: build the URL, issue the GET, reshape.
pub async fn fetch_pageviews(
    http: &DynHttp,
    base: &str,
    article_title: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PageviewReport, ViewError> {
    validate_range(start, end)?;
    let url = build_pageviews_url(base, article_title, start, end);

    counter!("pageviews_fetch_total").increment(1);
    let resp = match http.get(&url).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, article = article_title, "pageviews fetch failed");
            counter!("pageviews_fetch_errors_total").increment(1);
            return Err(e);
        }
    };

    let records = parse_pageviews_response(article_title, resp.status, &resp.body)
        .inspect_err(|e| {
            if !matches!(e, ViewError::Empty(_)) {
                tracing::warn!(error = %e, article = article_title, "pageviews response rejected");
                counter!("pageviews_fetch_errors_total").increment(1);
            }
        })?;

    // Non-empty by construction; compute_stats only returns None on an
    // empty slice.
    let stats = compute_stats(&records)
        .ok_or_else(|| ViewError::Empty(article_title.to_string()))?;

    Ok(PageviewReport {
        article: article_title.to_string(),
        records,
        stats,
    })
}
