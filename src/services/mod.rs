//! Coordinator and query services

pub mod exchange_service;
pub mod listing_service;

pub use exchange_service::ExchangeCoordinator;
pub use listing_service::{BookGate, ContactDetails, RequestCard};
