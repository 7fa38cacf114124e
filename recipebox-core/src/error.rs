use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Could not parse recipe from {0}")]
    Unparseable(&'static str),

    #[error("Extraction request failed: {0}")]
    RequestFailed(String),

    #[error("Extractor not configured: {0}")]
    NotConfigured(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShareError {
    #[error("Share request not found")]
    NotFound,

    #[error("Share request has expired")]
    Expired,
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Push delivery failed: {0}")]
    DeliveryFailed(String),
}
