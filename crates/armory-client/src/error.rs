//! Error types for community API operations

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    // Configuration errors
    #[error("Region '{0}' is not valid")]
    InvalidRegion(String),

    #[error("Locale '{locale}' is not valid for region '{region}'")]
    InvalidLocale { locale: String, region: String },

    #[error("The following fields are not valid: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    #[error("A public key is required when a secret key is configured")]
    MissingPublicKey,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // Request errors
    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status: {0}")]
    HttpStatus(StatusCode),

    // Response errors
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Create an invalid locale error
    pub fn invalid_locale(locale: impl Into<String>, region: impl Into<String>) -> Self {
        Self::InvalidLocale {
            locale: locale.into(),
            region: region.into(),
        }
    }

    /// Create a signing error from any displayable cause
    pub fn signing(reason: impl std::fmt::Display) -> Self {
        Self::Signing(reason.to_string())
    }

    /// Whether the error was caused by caller input rather than the network
    /// or the remote service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRegion(_)
                | Self::InvalidLocale { .. }
                | Self::InvalidFields(_)
                | Self::MissingPublicKey
                | Self::InvalidUrl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
