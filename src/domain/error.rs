//! Catalog error taxonomy
//!
//! Shared by the store, the AI gateway and the catalog service. The HTTP
//! layer maps each variant onto a status code in `crate::error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Menu {0} not found")]
    NotFound(i64),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("AI service unavailable: {0}")]
    AiUnavailable(String),

    #[error("AI service returned an empty response")]
    AiEmptyResponse,

    #[error("Malformed AI response: {0}")]
    MalformedAiResponse(String),
}

impl CatalogError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// True for failures originating in the AI dependency.
    pub fn is_ai_failure(&self) -> bool {
        matches!(
            self,
            Self::AiUnavailable(_) | Self::AiEmptyResponse | Self::MalformedAiResponse(_)
        )
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
