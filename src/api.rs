use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::config::DashboardConfig;
use crate::error::ViewError;
use crate::http::DynHttp;
use crate::seo::{self, SeoReport};
use crate::traffic::TrafficView;
use crate::wikipedia::{self, PageviewReport};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub http: DynHttp,
}

impl AppState {
    pub fn new(config: Arc<DashboardConfig>, http: DynHttp) -> Self {
        Self { config, http }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/views", get(list_views))
        .route("/api/traffic", get(traffic_view))
        .route("/api/wikipedia", get(wikipedia_view))
        .route("/api/seo", get(seo_view))
        .fallback_service(ServeDir::new("ui"))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Uniform per-view reply. Failures stay inside this envelope with HTTP
/// 200: they surface inline in the UI and end that render pass, nothing
/// more.
#[derive(Debug, Serialize)]
pub struct ViewResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ViewResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "ok",
            message: Some(message.into()),
            data: Some(data),
        }
    }

    fn failed(err: &ViewError) -> Self {
        Self {
            status: if err.is_warning() { "warning" } else { "error" },
            message: Some(err.to_string()),
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ViewDescriptor {
    id: &'static str,
    label: &'static str,
}

/// The three sidebar options; the UI dispatches flatly on `id`.
async fn list_views() -> Json<Vec<ViewDescriptor>> {
    Json(vec![
        ViewDescriptor {
            id: "traffic",
            label: "Simulated NYC Road Traffic",
        },
        ViewDescriptor {
            id: "wikipedia",
            label: "Wikipedia Article Traffic",
        },
        ViewDescriptor {
            id: "seo",
            label: "Website SEO & Traffic",
        },
    ])
}

/// Generation cannot fail; every call draws a fresh grid.
async fn traffic_view() -> Json<ViewResponse<TrafficView>> {
    counter!("traffic_render_total").increment(1);
    Json(ViewResponse::ok(
        "Simulated traffic data generated.",
        TrafficView::generate(),
    ))
}

#[derive(Debug, Deserialize)]
struct WikipediaQuery {
    article: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

async fn wikipedia_view(
    State(state): State<AppState>,
    Query(q): Query<WikipediaQuery>,
) -> Json<ViewResponse<PageviewReport>> {
    let raw = q.article.unwrap_or_default();
    if raw.trim().is_empty() {
        return Json(ViewResponse::failed(&ViewError::InvalidInput(
            "Please enter an article title or URL.".to_string(),
        )));
    }
    let title = wikipedia::normalize_article_input(&raw);

    let today = Utc::now().date_naive();
    let (default_start, default_end) = wikipedia::default_range(today);
    let start = wikipedia::clamp_to_today(q.start.unwrap_or(default_start), today);
    let end = wikipedia::clamp_to_today(q.end.unwrap_or(default_end), today);

    match wikipedia::fetch_pageviews(&state.http, &state.config.pageviews_base, &title, start, end)
        .await
    {
        Ok(report) => Json(ViewResponse::ok(
            format!("Data retrieved for '{title}'!"),
            report,
        )),
        Err(e) => Json(ViewResponse::failed(&e)),
    }
}

#[derive(Debug, Deserialize)]
struct SeoQuery {
    key: Option<String>,
    domain: Option<String>,
}

async fn seo_view(
    State(state): State<AppState>,
    Query(q): Query<SeoQuery>,
) -> Json<ViewResponse<SeoReport>> {
    let key = q
        .key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| state.config.seo_api_key.clone());
    let domain = q.domain.filter(|d| !d.trim().is_empty());

    let (Some(key), Some(domain)) = (key, domain) else {
        return Json(ViewResponse::failed(&ViewError::InvalidInput(
            "API key and domain are required.".to_string(),
        )));
    };

    match seo::fetch_website_seo(&state.http, &state.config.seo_base, &key, &domain).await {
        Ok(report) => Json(ViewResponse::ok(
            format!("Data retrieved for {domain}!"),
            report,
        )),
        Err(e) => Json(ViewResponse::failed(&e)),
    }
}
