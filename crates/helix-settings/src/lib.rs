//! Settings core of the Helix server.
//!
//! Exposes a curated subset of the host's option store as typed, validated
//! settings: the schema catalogue, the key mapping to option names, type-based
//! sanitization, special-case write strategies (timezone, language) and the
//! HTTP handlers built on top of the service.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
pub mod mapping;
pub mod sanitize;
pub mod schema;
pub mod service;
pub mod special;
pub mod timezone;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use schema::{build_registry, HostSnapshot};
pub use service::{SettingsService, UpdateResult};
pub use types::{AllowListFilter, SettingType, SettingValue};

// vim: ts=4
