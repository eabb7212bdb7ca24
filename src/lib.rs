// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod seo;
pub mod traffic;
pub mod wikipedia;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState, ViewResponse};
pub use crate::config::DashboardConfig;
pub use crate::error::ViewError;
pub use crate::http::{DynHttp, HttpFetch, ReqwestFetcher, StubFetcher};
