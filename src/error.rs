//! Error Types
//!
//! Typed failures for the gateway, payload construction and receipt handling.
//! The console shell wraps these in `anyhow` at the edges.

use thiserror::Error as ThisError;

/// Message shown when the server rejects a call without saying why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

///
/// GatewayError
///

#[derive(Debug, ThisError)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    #[error("could not decode response: {0}")]
    Decode(String),

    /// The call completed but `ResponseCode` was not the success sentinel.
    #[error("{message}")]
    Rejected { code: i64, message: String },

    #[error("response carried no data")]
    MissingData,
}

impl GatewayError {
    /// Text fit for a toast or an inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            GatewayError::Rejected { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return GatewayError::Status { status: status.as_u16() };
        }
        if err.is_decode() {
            return GatewayError::Decode(err.to_string());
        }
        GatewayError::Transport(err.to_string())
    }
}

///
/// PayloadError
///

#[derive(Debug, ThisError, PartialEq)]
pub enum PayloadError {
    #[error("student merit record is not loaded")]
    MeritNotLoaded,

    #[error("{0} has not been selected")]
    MissingSelection(&'static str),

    #[error("class admission mode is not known yet")]
    AdmissionModeUnknown,

    #[error("annual income '{0}' is not a number")]
    InvalidAnnualIncome(String),
}

///
/// DocumentError
///

#[derive(Debug, ThisError)]
pub enum DocumentError {
    #[error("document is empty")]
    Empty,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not a PDF document")]
    NotPdf,

    #[error("could not write document: {0}")]
    Io(#[from] std::io::Error),
}

///
/// EnrollmentError
///

#[derive(Debug, ThisError)]
pub enum EnrollmentError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}
