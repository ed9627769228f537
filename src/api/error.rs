//! Request failures
//!
//! `Display` of every variant is the message shown to the user.

use thiserror::Error;

/// Why a submission did not produce a result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// Nothing staged
    #[error("Please select an image file")]
    NoFiles,
    /// Another request is still in flight
    #[error("A request is already in progress")]
    Busy,
    /// The request could not be completed; detail is logged, not shown
    #[error("Could not reach the OCR service")]
    Transport(String),
    /// No response within the configured timeout (seconds)
    #[error("The OCR service did not respond within {0} seconds")]
    Timeout(u64),
    /// Non-success HTTP status
    #[error("{message}")]
    Server { status: u16, message: String },
    /// Success status but `success: false`
    #[error("{0}")]
    Rejected(String),
    /// Body could not be decoded
    #[error("The OCR service returned an unreadable response")]
    Decode(String),
    /// Cancelled by the user
    #[error("Request cancelled")]
    Cancelled,
}
