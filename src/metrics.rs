use axum::{routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("traffic_render_total", "Synthetic traffic views generated.");
        describe_counter!("pageviews_fetch_total", "Wikipedia pageview lookups issued.");
        describe_counter!(
            "pageviews_fetch_errors_total",
            "Wikipedia lookups that ended in a transport or upstream error."
        );
        describe_counter!("seo_fetch_total", "SEO metric lookups issued.");
        describe_counter!(
            "seo_fetch_errors_total",
            "SEO lookups that ended in a transport or upstream error."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize Prometheus recorder and expose a static gauge with the
    /// grid size so dashboards can sanity-check the generator.
    pub fn init(grid_points: usize) -> Self {
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        ensure_metrics_described();
        gauge!("traffic_grid_points").set((grid_points * grid_points) as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
