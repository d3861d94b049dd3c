//! Error types for vitae-renderer.

use thiserror::Error;

/// All errors that can arise from model and template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// JSON serialization error (building the model's value tree).
    #[error("model serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
