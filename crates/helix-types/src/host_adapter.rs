//! Host environment adapter
//!
//! Read-only lookups the settings schema needs for its dynamic defaults and
//! choice lists, plus the language pack installer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// A translation offered by the host's translation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
	pub locale: Box<str>,
	#[serde(rename = "nativeName")]
	pub native_name: Box<str>,
}

#[async_trait]
pub trait HostAdapter: Debug + Send + Sync {
	/// Locales with a translation installed locally
	async fn installed_languages(&self) -> HxResult<Vec<Box<str>>>;

	/// Every translation the host could install
	async fn available_translations(&self) -> HxResult<Vec<Translation>>;

	/// The empty locale is the built-in English and is always installed
	async fn is_language_installed(&self, locale: &str) -> HxResult<bool> {
		if locale.is_empty() {
			return Ok(true);
		}
		Ok(self.installed_languages().await?.iter().any(|l| &**l == locale))
	}

	/// Fetches and installs a language pack.
	/// Returns `false` if installation is unavailable or did not produce the translation.
	async fn install_language_pack(&self, locale: &str) -> HxResult<bool>;

	/// City-based timezone identifiers (e.g. "Europe/Budapest")
	async fn timezone_identifiers(&self) -> HxResult<Vec<Box<str>>>;
}

// vim: ts=4
