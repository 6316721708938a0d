//! Error types for the Image Hub client.
//!
//! - [`ApiError`] - failures talking to the catalog API
//! - [`ValidationError`] - client-side checks that block a request
//! - [`HubError`] - top-level wrapper
//!
//! Conversion into [`HubError`] is automatic via `From`, so `?` works
//! across the boundary.

use serde_json::Value;
use thiserror::Error;

/// Fallback shown when an upload fails without a server-provided reason.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload image. Please try again.";

// =============================================================================
// API Errors
// =============================================================================

/// Errors from the catalog HTTP API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Transport failure (DNS, connection reset, CORS, aborted fetch).
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete before the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or("no details"))]
    Status { status: u16, detail: Option<String> },

    /// The body could not be decoded into the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("Failed to build request: {0}")]
    Request(String),
}

impl ApiError {
    /// Build a status error from a raw response body.
    ///
    /// FastAPI bodies look like `{"detail": "..."}` or, for validation
    /// failures, `{"detail": [{"msg": "..."}, ...]}`. Anything else is kept
    /// verbatim when non-empty.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = match serde_json::from_str::<Value>(body) {
            Ok(value) => extract_detail(&value),
            Err(_) => None,
        }
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        ApiError::Status { status, detail }
    }

    /// Whether one retry after a backoff is worth attempting.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Status { status, .. } => matches!(status, 502..=504),
            ApiError::Decode(_) | ApiError::Request(_) => false,
        }
    }

    /// Server-provided reason, if the server sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message for an upload failure banner.
    pub fn upload_message(&self) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string())
    }
}

fn extract_detail(value: &Value) -> Option<String> {
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Client-side validation failures. The display text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No image file selected.
    #[error("Please select an image file")]
    MissingFile,

    /// Title left empty.
    #[error("Title is required")]
    MissingTitle,

    /// The selected file is not a JPEG.
    #[error("Only JPEG images are supported")]
    UnsupportedFileType { mime: String },

    /// A submission is already running.
    #[error("Upload already in progress")]
    InProgress,
}

// =============================================================================
// Top-level
// =============================================================================

/// Any error the client can surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HubError {
    /// API error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Validation error.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for client operations.
pub type HubResult<T> = Result<T, HubError>;
