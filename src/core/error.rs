use crate::models::ZipCode;
use thiserror::Error;

/// Errors that can occur while ranking hospitals for a request
///
/// All variants are caused by user input and are reported back as
/// validation failures; no partial ranking is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    #[error("Unknown zip code: {0}")]
    UnknownZipCode(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid maximum distance: {0}")]
    InvalidDistance(String),
}

impl RankError {
    pub fn unknown_zip(zip: ZipCode) -> Self {
        RankError::UnknownZipCode(zip.to_string())
    }

    /// Short machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            RankError::UnknownZipCode(_) => "unknown_zip_code",
            RankError::InvalidWeights(_) => "invalid_weights",
            RankError::InvalidDistance(_) => "invalid_distance",
        }
    }
}
