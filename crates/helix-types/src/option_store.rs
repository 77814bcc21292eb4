//! Option store adapter
//!
//! A flat, string-keyed key/value namespace owned by the host. The settings
//! core only reads and writes the option names it maps to.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait OptionStore: Debug + Send + Sync {
	/// Reads an option. `None` if it was never written.
	async fn get_option(&self, name: &str) -> HxResult<Option<Value>>;

	/// Writes an option.
	/// Returns `false` if the stored value already equals `value` (nothing written).
	async fn update_option(&self, name: &str, value: Value) -> HxResult<bool>;

	/// Writes several options as one atomic unit.
	/// Returns `true` if at least one of them changed.
	async fn update_options(&self, changes: &[(&str, Value)]) -> HxResult<bool>;
}

// vim: ts=4
