//! Error types for the rates service.

/// Domain-level errors (validation failures).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),
}

/// Errors surfaced by an upstream rate source.
///
/// Both variants are terminal for the call that produced them; no retry is
/// performed at this layer.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network failure or non-success HTTP status from the upstream source.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// Transport succeeded but the payload does not match the expected
    /// shape (e.g. the requested target currency is missing from the
    /// rates map).
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
