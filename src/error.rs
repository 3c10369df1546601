use thiserror::Error;

/// Failure talking to one of the vendor endpoints.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// Failure pulling the machine type out of a product response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("product response is not an array")]
    NotAnArray,

    #[error("product response is empty")]
    Empty,

    #[error("product record has no 'Name' field")]
    MissingName,

    #[error("no 'Type' found in 'Name'")]
    TypeNotFound,

    #[error("no token follows 'Type' in 'Name'")]
    MissingToken,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing amount of serials to generate")]
    MissingAmount,

    #[error("invalid amount '{0}': expected a positive integer")]
    InvalidAmount(String),

    #[error("invalid job count '{0}': expected a positive integer")]
    InvalidJobs(String),

    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
}
