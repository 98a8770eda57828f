//! Domain models.
//!
//! - [`Account`]: a locally stored identity with its plaintext credential and
//!   session flag. The ordered list of accounts is the *directory*.
//! - [`Ticket`]: a support ticket held in memory.

mod account;
mod ticket;

pub use account::*;
pub use ticket::*;
