use super::retry::FailureKind;
use crate::domain::ValidationError;

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`AriregisterClient`](super::AriregisterClient) and the
/// configuration setters.
///
/// Every failure falls into one of four kinds:
/// - authentication (credentials missing or rejected),
/// - configuration (invalid settings, detected before any call),
/// - validation (a caller-supplied value was rejected),
/// - API (everything that went wrong talking to the service).
pub enum Error {
    /// Credentials are missing, or the service refused them.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// A setting is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A value failed format, range or safety rules.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// SOAP fault, HTTP failure, exhausted retries or any unexpected failure.
    /// `message` keeps the underlying detail.
    #[error("API error: {message}")]
    Api {
        kind: FailureKind,
        status: Option<u16>,
        message: String,
    },
}

impl Error {
    /// Failure category for [`Error::Api`], `None` for the other kinds.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
