//! Helix settings server
//!
//! Wires an option store and a host adapter into the settings service and
//! serves it under `/helix/v1` behind an admin bearer token.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod auth;
pub mod routes;

pub use app::{App, AppBuilder, AppState, VERSION};
pub use helix_settings as settings;
pub use helix_types::{error, host_adapter, option_store, prelude};

// vim: ts=4
