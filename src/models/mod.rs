//! Domain models

pub mod book;
pub mod dialog;
pub mod request;

pub use book::{Book, Location, Owner};
pub use request::{DisplayStatus, ExchangeRequest, Party, RequestStatus};
