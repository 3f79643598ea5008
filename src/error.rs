//! Error types and handling for the airport profile service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the airport profile service
#[derive(Error, Debug)]
pub enum AirportProfileError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The airport provider returned no record for the code
    #[error("Airport code {code} not found")]
    AirportNotFound { code: String },

    /// The airport provider returned more than one record for the code
    #[error("Airport code {code} is ambiguous: {matches} results returned")]
    AmbiguousAirport { code: String, matches: usize },

    /// Upstream provider errors (network, non-2xx, provider error body, malformed body)
    #[error("{provider} error: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AirportProfileError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new upstream provider error
    pub fn upstream<S: Into<String>>(provider: &'static str, message: S) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
        }
    }

    /// Validation-class errors are the caller's fault and never retried
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::AirportNotFound { .. } | Self::AmbiguousAirport { .. }
        )
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::AmbiguousAirport { .. } => StatusCode::BAD_REQUEST,
            Self::AirportNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Config { .. } | Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { .. } => {
                "Service is misconfigured. Please check the provider API keys.".to_string()
            }
            Self::Validation { message } => message.clone(),
            Self::AirportNotFound { .. } | Self::AmbiguousAirport { .. } => self.to_string(),
            Self::Upstream { provider, message } => {
                format!("Upstream provider {provider} failed: {message}")
            }
            Self::Io { .. } => "Internal I/O failure.".to_string(),
        }
    }
}

impl IntoResponse for AirportProfileError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(json!({ "detail": self.user_message() }))).into_response()
    }
}
