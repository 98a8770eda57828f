//! Ticket tracking with locally persisted accounts.
//!
//! Identity and session state survive restarts through a key-value area
//! ([`storage`]); tickets live in memory ([`tickets`]). Page navigation is
//! gated by [`guard`] using the session owned by [`auth::SessionManager`].

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod storage;
pub mod tickets;
