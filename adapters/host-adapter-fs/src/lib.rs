//! Filesystem-backed host adapter for the Helix settings server.
//!
//! Languages live as translation files in a languages directory, timezones
//! come from the system zoneinfo tables, and language packs are downloaded
//! from an optional mirror.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod language;
mod timezone;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use helix_types::host_adapter::{HostAdapter, Translation};
use helix_types::prelude::*;

#[derive(Debug)]
pub struct HostAdapterFs {
	lang_dir: Box<Path>,
	zoneinfo_dir: Box<Path>,
	/// Base URL of the language pack mirror, installation is unavailable without it
	mirror: Option<Box<str>>,
	client: reqwest::Client,
}

impl HostAdapterFs {
	pub async fn new(
		lang_dir: impl Into<PathBuf>,
		zoneinfo_dir: impl Into<PathBuf>,
		mirror: Option<&str>,
	) -> HxResult<Self> {
		let lang_dir = lang_dir.into().into_boxed_path();
		tokio::fs::create_dir_all(&lang_dir).await?;

		Ok(Self {
			lang_dir,
			zoneinfo_dir: zoneinfo_dir.into().into_boxed_path(),
			mirror: mirror.map(Box::from),
			client: reqwest::Client::new(),
		})
	}
}

#[async_trait]
impl HostAdapter for HostAdapterFs {
	async fn installed_languages(&self) -> HxResult<Vec<Box<str>>> {
		language::installed(&self.lang_dir).await
	}

	async fn available_translations(&self) -> HxResult<Vec<Translation>> {
		Ok(language::catalogue())
	}

	async fn install_language_pack(&self, locale: &str) -> HxResult<bool> {
		if !language::in_catalogue(locale) {
			info!("Language '{}' is not offered by the translation catalogue", locale);
			return Ok(false);
		}
		let Some(mirror) = &self.mirror else {
			info!("No language pack mirror configured, cannot install '{}'", locale);
			return Ok(false);
		};

		let po_file = format!("{}.po", locale);
		if !language::download(&self.client, mirror, &self.lang_dir, &po_file).await? {
			return Ok(false);
		}

		// Compiled translations are optional
		let mo_file = format!("{}.mo", locale);
		if let Err(err) = language::download(&self.client, mirror, &self.lang_dir, &mo_file).await {
			warn!("Downloading {} failed: {}", mo_file, err);
		}

		let installed = tokio::fs::try_exists(self.lang_dir.join(&po_file)).await?;
		if installed {
			info!("Language pack '{}' installed", locale);
		}
		Ok(installed)
	}

	async fn timezone_identifiers(&self) -> HxResult<Vec<Box<str>>> {
		timezone::read_identifiers(&self.zoneinfo_dir).await
	}
}

// vim: ts=4
