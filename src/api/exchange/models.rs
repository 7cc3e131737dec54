//! Wire models and error types for the exchange backend API

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Book, ExchangeRequest};

/// Body of `POST /exchange/requests/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequestBody {
    pub requested_book_id: i64,
    pub offered_book_id: i64,
}

/// `GET /exchange/requests/?bookID=` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestsEnvelope {
    pub requests: Vec<ExchangeRequest>,
}

/// `GET /exchange/requests/made` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestsMadeEnvelope {
    pub requests_made: Vec<ExchangeRequest>,
}

/// `GET /exchange/requests/received` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestsReceivedEnvelope {
    pub requests_received: Vec<ExchangeRequest>,
}

/// `GET /books/` response.
#[derive(Debug, Clone, Deserialize)]
pub struct BooksEnvelope {
    pub books: Vec<Book>,
}

/// Structured error envelope the backend wraps every failure in.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// One of BAD_REQUEST, AUTHORIZATION, NOT_FOUND, CONFLICT, INTERNAL.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// Error type for API operations, classified from the error envelope when
/// the backend sent one, otherwise from the HTTP status code.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Credential invalid or expired; the session must be renewed.
    #[error("authorization failed: {0}")]
    Authorization(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// State changed concurrently on the server.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("server error: {0}")]
    Internal(String),
    #[error("unexpected HTTP status {0}: {1}")]
    Http(u16, String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to parse response: {0}")]
    Deserialization(String),
}
