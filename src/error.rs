//! Crate-wide error taxonomy
//!
//! Every failed intent surfaces as exactly one [`ExchangeError`] kind so
//! callers can route it: validation errors are inline and recoverable,
//! session errors prompt re-login, not-found and conflict trigger a refetch,
//! everything else is shown generically with user-initiated retry only.

use thiserror::Error;

use crate::api::exchange::ApiError;
use crate::machine::TransitionError;

#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Illegal local transition, rejected before any network call.
    #[error("invalid action: {0}")]
    Validation(#[from] TransitionError),

    /// Another mutating call for the same request is still outstanding.
    #[error("an operation is already in flight for request {0}")]
    InFlight(String),

    /// The target book is closed to new requests.
    #[error("this book is no longer open to exchange requests")]
    BookInactive,

    /// The user already has a live (non-declined) request on this book.
    #[error("you already have an exchange request for this book")]
    DuplicateRequest,

    /// The offered book cannot back a request (not owned, or inactive).
    #[error("cannot offer this book: {0}")]
    InvalidOffer(String),

    /// Credential invalid or expired; distinct from business-rule failures
    /// so the caller can prompt re-authentication.
    #[error("session expired or unauthorized: {0}")]
    Session(String),

    /// Referenced request or book no longer exists.
    #[error("this item is no longer available: {0}")]
    NotFound(String),

    /// The server rejected the transition because state changed
    /// concurrently; the caller should refetch and reconcile.
    #[error("request state changed on the server: {0}")]
    Conflict(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// Opaque backend or transport failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ExchangeError {
    /// True when the caller should re-authenticate.
    pub fn is_session(&self) -> bool {
        matches!(self, ExchangeError::Session(_))
    }

    /// True when the caller should refetch its lists and reconcile rather
    /// than show the error verbatim.
    pub fn needs_refetch(&self) -> bool {
        matches!(self, ExchangeError::NotFound(_) | ExchangeError::Conflict(_))
    }
}

impl From<ApiError> for ExchangeError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::BadRequest(msg) => ExchangeError::BadRequest(msg),
            ApiError::Authorization(msg) => ExchangeError::Session(msg),
            ApiError::NotFound(msg) => ExchangeError::NotFound(msg),
            ApiError::Conflict(msg) => ExchangeError::Conflict(msg),
            ApiError::Internal(msg) => ExchangeError::Internal(msg),
            ApiError::Http(code, msg) => ExchangeError::Internal(format!("HTTP {}: {}", code, msg)),
            ApiError::Request(msg) => ExchangeError::Internal(msg),
            ApiError::Deserialization(msg) => ExchangeError::Internal(msg),
        }
    }
}
