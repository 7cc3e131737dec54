//! HTTP client for the book exchange backend

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use tracing::warn;
use uuid::Uuid;

use super::models::{
    ApiError, BooksEnvelope, CreateRequestBody, ErrorEnvelope, RequestsEnvelope,
    RequestsMadeEnvelope, RequestsReceivedEnvelope,
};
use crate::models::{Book, ExchangeRequest};
use crate::session::Session;

/// Exchange backend API client.
///
/// The session credential is injected per call rather than stored here, so a
/// single client outlives login/logout cycles.
pub struct ExchangeClient {
    http_client: HttpClient,
    base_url: String,
}

impl ExchangeClient {
    /// Create a new client for the given API base URL
    /// (e.g. `https://host/api`).
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create default headers with authorization
    fn create_headers(&self, session: &Session) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", session.token()))
            .map_err(|e| ApiError::Request(format!("Failed to create auth header: {}", e)))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    /// Headers for mutating calls: adds a fresh idempotency key so the
    /// backend can deduplicate if it supports it.
    fn create_mutation_headers(&self, session: &Session) -> Result<HeaderMap, ApiError> {
        let mut headers = self.create_headers(session)?;
        let key = HeaderValue::from_str(&Uuid::new_v4().to_string())
            .map_err(|e| ApiError::Request(format!("Failed to create idempotency key: {}", e)))?;
        headers.insert("Idempotency-Key", key);
        Ok(headers)
    }

    /// Parse an error response, preferring the structured envelope over the
    /// bare HTTP status code.
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body_text) {
            let message = envelope.error.message;
            return match envelope.error.kind.as_str() {
                "BAD_REQUEST" => ApiError::BadRequest(message),
                "AUTHORIZATION" => ApiError::Authorization(message),
                "NOT_FOUND" => ApiError::NotFound(message),
                "CONFLICT" => ApiError::Conflict(message),
                "INTERNAL" => ApiError::Internal(message),
                other => {
                    warn!("Unknown error type '{}' from backend", other);
                    ApiError::Http(status_code, message)
                }
            };
        }

        match status_code {
            400 => ApiError::BadRequest(body_text),
            401 | 403 => ApiError::Authorization(body_text),
            404 => ApiError::NotFound(body_text),
            409 => ApiError::Conflict(body_text),
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::Internal(body_text)
            }
            _ => ApiError::Http(status_code, body_text),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        session: &Session,
        url: String,
    ) -> Result<T, ApiError> {
        let headers = self.create_headers(session)?;
        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Deserialization(format!("Failed to parse response: {}", e)))
    }

    /// POST /exchange/requests/{id}/{action}
    async fn post_action(
        &self,
        session: &Session,
        request_id: &str,
        action: &str,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/exchange/requests/{}/{}",
            self.base_url, request_id, action
        );
        let headers = self.create_mutation_headers(session)?;
        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// POST /exchange/requests/
    ///
    /// Submits a new exchange request; returns the created request with its
    /// generated id and `status = pending`.
    pub async fn create_request(
        &self,
        session: &Session,
        body: &CreateRequestBody,
    ) -> Result<ExchangeRequest, ApiError> {
        let url = format!("{}/exchange/requests/", self.base_url);
        let headers = self.create_mutation_headers(session)?;
        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;
        let response = Self::check_status(response).await?;
        response
            .json::<ExchangeRequest>()
            .await
            .map_err(|e| ApiError::Deserialization(format!("Failed to parse response: {}", e)))
    }

    pub async fn accept(&self, session: &Session, request_id: &str) -> Result<(), ApiError> {
        self.post_action(session, request_id, "accept").await
    }

    pub async fn decline(&self, session: &Session, request_id: &str) -> Result<(), ApiError> {
        self.post_action(session, request_id, "decline").await
    }

    pub async fn confirm(&self, session: &Session, request_id: &str) -> Result<(), ApiError> {
        self.post_action(session, request_id, "confirm").await
    }

    /// DELETE /exchange/requests/{id}/delete
    ///
    /// Cancels a pending request; the backend removes it entirely.
    pub async fn cancel(&self, session: &Session, request_id: &str) -> Result<(), ApiError> {
        let url = format!("{}/exchange/requests/{}/delete", self.base_url, request_id);
        let headers = self.create_mutation_headers(session)?;
        let response = self
            .http_client
            .delete(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// GET /exchange/requests/{id}
    pub async fn request_by_id(
        &self,
        session: &Session,
        request_id: &str,
    ) -> Result<ExchangeRequest, ApiError> {
        let url = format!("{}/exchange/requests/{}", self.base_url, request_id);
        self.get_json(session, url).await
    }

    /// GET /exchange/requests/made
    pub async fn requests_made(&self, session: &Session) -> Result<Vec<ExchangeRequest>, ApiError> {
        let url = format!("{}/exchange/requests/made", self.base_url);
        let envelope: RequestsMadeEnvelope = self.get_json(session, url).await?;
        Ok(envelope.requests_made)
    }

    /// GET /exchange/requests/received
    pub async fn requests_received(
        &self,
        session: &Session,
    ) -> Result<Vec<ExchangeRequest>, ApiError> {
        let url = format!("{}/exchange/requests/received", self.base_url);
        let envelope: RequestsReceivedEnvelope = self.get_json(session, url).await?;
        Ok(envelope.requests_received)
    }

    /// GET /exchange/requests/?bookID={id}
    ///
    /// All requests targeting a book; used to gate new requests against it.
    pub async fn requests_for_book(
        &self,
        session: &Session,
        book_id: i64,
    ) -> Result<Vec<ExchangeRequest>, ApiError> {
        let url = format!("{}/exchange/requests/?bookID={}", self.base_url, book_id);
        let envelope: RequestsEnvelope = self.get_json(session, url).await?;
        Ok(envelope.requests)
    }

    /// GET /books/
    pub async fn books(&self, session: &Session) -> Result<Vec<Book>, ApiError> {
        let url = format!("{}/books/", self.base_url);
        let envelope: BooksEnvelope = self.get_json(session, url).await?;
        Ok(envelope.books)
    }

    /// GET /books/{id}
    pub async fn book_by_id(&self, session: &Session, book_id: i64) -> Result<Book, ApiError> {
        let url = format!("{}/books/{}", self.base_url, book_id);
        self.get_json(session, url).await
    }
}
