//! Exchange backend API: transport trait, reqwest client and wire models

pub mod client;
pub mod models;

pub use client::ExchangeClient;
pub use models::{ApiError, CreateRequestBody};

use crate::models::{Book, ExchangeRequest};
use crate::session::Session;

/// Remote operations the negotiation coordinator depends on.
///
/// [`ExchangeClient`] is the production implementation; tests substitute an
/// in-memory backend.
#[allow(async_fn_in_trait)]
pub trait ExchangeApi {
    async fn create_request(
        &self,
        session: &Session,
        body: &CreateRequestBody,
    ) -> Result<ExchangeRequest, ApiError>;

    async fn accept(&self, session: &Session, request_id: &str) -> Result<(), ApiError>;

    async fn decline(&self, session: &Session, request_id: &str) -> Result<(), ApiError>;

    async fn confirm(&self, session: &Session, request_id: &str) -> Result<(), ApiError>;

    async fn cancel(&self, session: &Session, request_id: &str) -> Result<(), ApiError>;

    async fn request_by_id(
        &self,
        session: &Session,
        request_id: &str,
    ) -> Result<ExchangeRequest, ApiError>;

    async fn requests_made(&self, session: &Session) -> Result<Vec<ExchangeRequest>, ApiError>;

    async fn requests_received(&self, session: &Session) -> Result<Vec<ExchangeRequest>, ApiError>;

    async fn requests_for_book(
        &self,
        session: &Session,
        book_id: i64,
    ) -> Result<Vec<ExchangeRequest>, ApiError>;

    async fn books(&self, session: &Session) -> Result<Vec<Book>, ApiError>;

    async fn book_by_id(&self, session: &Session, book_id: i64) -> Result<Book, ApiError>;
}

impl ExchangeApi for ExchangeClient {
    async fn create_request(
        &self,
        session: &Session,
        body: &CreateRequestBody,
    ) -> Result<ExchangeRequest, ApiError> {
        ExchangeClient::create_request(self, session, body).await
    }

    async fn accept(&self, session: &Session, request_id: &str) -> Result<(), ApiError> {
        ExchangeClient::accept(self, session, request_id).await
    }

    async fn decline(&self, session: &Session, request_id: &str) -> Result<(), ApiError> {
        ExchangeClient::decline(self, session, request_id).await
    }

    async fn confirm(&self, session: &Session, request_id: &str) -> Result<(), ApiError> {
        ExchangeClient::confirm(self, session, request_id).await
    }

    async fn cancel(&self, session: &Session, request_id: &str) -> Result<(), ApiError> {
        ExchangeClient::cancel(self, session, request_id).await
    }

    async fn request_by_id(
        &self,
        session: &Session,
        request_id: &str,
    ) -> Result<ExchangeRequest, ApiError> {
        ExchangeClient::request_by_id(self, session, request_id).await
    }

    async fn requests_made(&self, session: &Session) -> Result<Vec<ExchangeRequest>, ApiError> {
        ExchangeClient::requests_made(self, session).await
    }

    async fn requests_received(&self, session: &Session) -> Result<Vec<ExchangeRequest>, ApiError> {
        ExchangeClient::requests_received(self, session).await
    }

    async fn requests_for_book(
        &self,
        session: &Session,
        book_id: i64,
    ) -> Result<Vec<ExchangeRequest>, ApiError> {
        ExchangeClient::requests_for_book(self, session, book_id).await
    }

    async fn books(&self, session: &Session) -> Result<Vec<Book>, ApiError> {
        ExchangeClient::books(self, session).await
    }

    async fn book_by_id(&self, session: &Session, book_id: i64) -> Result<Book, ApiError> {
        ExchangeClient::book_by_id(self, session, book_id).await
    }
}
