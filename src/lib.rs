//! Client-side core for a peer-to-peer book exchange marketplace.
//!
//! Users list books they own and negotiate one-to-one swaps: a requester
//! offers one of their books for another user's book, the owner accepts or
//! declines, and after acceptance both parties confirm the physical exchange
//! to reach the terminal `exchanged` state.
//!
//! The crate is organised around three pieces:
//! - [`machine`]: the pure negotiation state machine (legal transitions,
//!   authorization, derived display status),
//! - [`services::ExchangeCoordinator`]: intent dispatch, optimistic cache
//!   updates and server reconciliation over the [`api`] transport,
//! - [`api`]: the reqwest client for the backend REST API.

pub mod api;
pub mod cache;
pub mod error;
pub mod machine;
pub mod models;
pub mod services;
pub mod session;
