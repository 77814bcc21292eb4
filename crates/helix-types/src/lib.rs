//! Shared types and adapter traits for the Helix settings server.
//!
//! Adapter crates depend only on this crate, so they compile independently
//! of the settings core and the HTTP application.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod host_adapter;
pub mod option_store;
pub mod prelude;

// vim: ts=4
