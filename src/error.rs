// src/error.rs
// Failure taxonomy for the view handlers. Every variant is terminal for a
// single render pass and surfaces directly in the UI envelope.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    /// Bad user input (empty required field, inverted date range).
    /// No upstream request is made for these.
    #[error("{0}")]
    InvalidInput(String),

    /// The upstream explicitly said the article does not exist (HTTP 404).
    #[error("Article '{0}' not found on Wikipedia.")]
    NotFound(String),

    /// Network failure, non-2xx status, or an undecodable body.
    #[error("API request failed: {0}")]
    Transport(String),

    /// The upstream answered but flagged the request as unsuccessful;
    /// carries its message verbatim.
    #[error("{0}")]
    Upstream(String),

    /// Structurally valid response with no data rows.
    #[error("No data available for '{0}'.")]
    Empty(String),
}

impl ViewError {
    /// Severity bucket used by the response envelope: input problems are
    /// warnings (nothing was attempted), everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, ViewError::InvalidInput(_))
    }
}
