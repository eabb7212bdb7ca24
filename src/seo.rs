//! # Website SEO & traffic analytics
//! One GET against the SEO Review Tools endpoint, then a defensive reshape
//! of its loosely-specified response into KPI tiles and chart rows. The
//! upstream schema is third-party-defined; every field is optional and the
//! raw body is carried through untouched for the UI's expander.

use std::collections::BTreeMap;

use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ViewError;
use crate::http::DynHttp;

#[derive(Debug, Deserialize)]
struct SeoEnvelope {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<SeoData>,
}

/// The `data` object, presence-checked only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoData {
    pub global_rank: Option<u64>,
    pub visits: Option<u64>,
    /// Fraction in [0,1] as delivered by the API.
    pub bounce_rate: Option<f64>,
    /// Seconds.
    pub avg_session_duration: Option<f64>,
    #[serde(default)]
    pub traffic_country: Vec<CountryTraffic>,
    #[serde(default)]
    pub traffic_device_split: BTreeMap<String, f64>,
    #[serde(default)]
    pub traffic_sources: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryTraffic {
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub traffic_percentage: Option<f64>,
}

/// One labeled scalar shown prominently above the charts.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KpiTile {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethRow {
    pub country_code: String,
    pub country_name: String,
    pub traffic_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

/// Everything the SEO view renders in one pass. Empty chart collections
/// mean the UI shows an informational placeholder instead.
#[derive(Debug, Clone, Serialize)]
pub struct SeoReport {
    pub domain: String,
    pub tiles: Vec<KpiTile>,
    pub countries: Vec<ChoroplethRow>,
    pub devices: Vec<PieSlice>,
    pub sources: Vec<PieSlice>,
    /// Verbatim upstream response for the raw-JSON expander.
    pub raw: Value,
}

pub fn build_seo_url(base: &str, api_key: &str, domain: &str) -> String {
    format!(
        "{}?key={}&domain={}",
        base,
        urlencoding::encode(api_key),
        urlencoding::encode(domain),
    )
}

/// Thousands-separated integer, e.g. 1234567 -> "1,234,567".
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Seconds -> "XmYs", truncating sub-second precision: 125 -> "2m 5s".
pub fn format_session_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}m {}s", total / 60, total % 60)
}

/// Fractional bounce rate -> one-decimal percentage: 0.47 -> "47.0%".
pub fn format_bounce_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

const NOT_AVAILABLE: &str = "N/A";

/// The four KPI tiles; any absent field renders "N/A".
pub fn kpi_tiles(data: &SeoData) -> Vec<KpiTile> {
    vec![
        KpiTile {
            label: "Global Rank".to_string(),
            value: data
                .global_rank
                .map(|r| format!("#{}", format_count(r)))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        },
        KpiTile {
            label: "Monthly Visits".to_string(),
            value: data
                .visits
                .map(format_count)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        },
        KpiTile {
            label: "Bounce Rate".to_string(),
            value: data
                .bounce_rate
                .map(format_bounce_rate)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        },
        KpiTile {
            label: "Avg. Session".to_string(),
            value: data
                .avg_session_duration
                .map(format_session_duration)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        },
    ]
}

fn choropleth_rows(data: &SeoData) -> Vec<ChoroplethRow> {
    data.traffic_country
        .iter()
        .filter_map(|c| {
            let code = c.country_code.clone()?;
            Some(ChoroplethRow {
                country_name: c.country_name.clone().unwrap_or_else(|| code.clone()),
                country_code: code,
                traffic_percentage: c.traffic_percentage.unwrap_or(0.0),
            })
        })
        .collect()
}

fn pie_slices(split: &BTreeMap<String, f64>) -> Vec<PieSlice> {
    split
        .iter()
        .map(|(label, value)| PieSlice {
            label: label.clone(),
            value: *value,
        })
        .collect()
}

/// Map one upstream reply to a report. A non-2xx status or undecodable body
/// is a transport failure; a decoded body with `success: false` surfaces
/// the API's own message verbatim.
pub fn parse_seo_response(domain: &str, status: u16, body: &str) -> Result<SeoReport, ViewError> {
    if !(200..300).contains(&status) {
        return Err(ViewError::Transport(format!("HTTP status {status}")));
    }
    let envelope: SeoEnvelope = serde_json::from_str(body)
        .map_err(|e| ViewError::Transport(format!("decoding SEO body: {e}")))?;
    if !envelope.success {
        return Err(ViewError::Upstream(
            envelope
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    let data = envelope.data.unwrap_or_default();
    let raw = serde_json::from_str(body).unwrap_or(Value::Null);
    Ok(SeoReport {
        domain: domain.to_string(),
        tiles: kpi_tiles(&data),
        countries: choropleth_rows(&data),
        devices: pie_slices(&data.traffic_device_split),
        sources: pie_slices(&data.traffic_sources),
        raw,
    })
}

/// One complete render pass for a domain.
pub async fn fetch_website_seo(
    http: &DynHttp,
    base: &str,
    api_key: &str,
    domain: &str,
) -> Result<SeoReport, ViewError> {
    let url = build_seo_url(base, api_key, domain);

    counter!("seo_fetch_total").increment(1);
    let resp = match http.get(&url).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, domain, "SEO fetch failed");
            counter!("seo_fetch_errors_total").increment(1);
            return Err(e);
        }
    };

    parse_seo_response(domain, resp.status, &resp.body).inspect_err(|e| {
        tracing::warn!(error = %e, domain, "SEO response rejected");
        counter!("seo_fetch_errors_total").increment(1);
    })
}
