//! In-memory adapters for unit tests

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

use helix_types::host_adapter::{HostAdapter, Translation};
use helix_types::option_store::OptionStore;
use helix_types::prelude::*;

use crate::schema::HostSnapshot;

/// Option store with the host's update semantics
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
	options: Mutex<IndexMap<String, Value>>,
	/// Writes report "nothing changed" without writing
	reject_writes: bool,
}

impl MemoryOptionStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(options: &[(&str, Value)]) -> Self {
		let store = Self::new();
		{
			let mut map = store.options.lock();
			for (name, value) in options {
				map.insert((*name).to_string(), value.clone());
			}
		}
		store
	}

	pub fn rejecting_writes(options: &[(&str, Value)]) -> Self {
		Self { reject_writes: true, ..Self::with(options) }
	}

	pub fn value(&self, name: &str) -> Option<Value> {
		self.options.lock().get(name).cloned()
	}
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
	async fn get_option(&self, name: &str) -> HxResult<Option<Value>> {
		Ok(self.value(name))
	}

	async fn update_option(&self, name: &str, value: Value) -> HxResult<bool> {
		let mut options = self.options.lock();
		if self.reject_writes || options.get(name) == Some(&value) {
			return Ok(false);
		}
		options.insert(name.to_string(), value);
		Ok(true)
	}

	async fn update_options(&self, changes: &[(&str, Value)]) -> HxResult<bool> {
		let mut options = self.options.lock();
		if self.reject_writes {
			return Ok(false);
		}
		let mut changed = false;
		for (name, value) in changes {
			if options.get(*name) != Some(value) {
				options.insert((*name).to_string(), value.clone());
				changed = true;
			}
		}
		Ok(changed)
	}
}

/// Host with a fixed language and timezone catalogue
#[derive(Debug)]
pub struct StaticHost {
	pub installed: Mutex<Vec<Box<str>>>,
	pub translations: Vec<Translation>,
	/// Locales the installer succeeds for
	pub installable: Vec<Box<str>>,
	pub timezones: Vec<Box<str>>,
	pub install_calls: AtomicUsize,
}

impl Default for StaticHost {
	fn default() -> Self {
		Self {
			installed: Mutex::new(vec!["de_DE".into()]),
			translations: vec![
				Translation { locale: "de_DE".into(), native_name: "Deutsch".into() },
				Translation { locale: "hu_HU".into(), native_name: "Magyar".into() },
				Translation { locale: "fr_FR".into(), native_name: "Français".into() },
			],
			installable: vec!["hu_HU".into()],
			timezones: vec![
				"America/New_York".into(),
				"Asia/Kolkata".into(),
				"Europe/Budapest".into(),
				"UTC".into(),
			],
			install_calls: AtomicUsize::new(0),
		}
	}
}

impl StaticHost {
	pub fn install_calls(&self) -> usize {
		self.install_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl HostAdapter for StaticHost {
	async fn installed_languages(&self) -> HxResult<Vec<Box<str>>> {
		Ok(self.installed.lock().clone())
	}

	async fn available_translations(&self) -> HxResult<Vec<Translation>> {
		Ok(self.translations.clone())
	}

	async fn install_language_pack(&self, locale: &str) -> HxResult<bool> {
		self.install_calls.fetch_add(1, Ordering::SeqCst);
		if !self.installable.iter().any(|l| &**l == locale) {
			return Ok(false);
		}
		self.installed.lock().push(locale.into());
		Ok(true)
	}

	async fn timezone_identifiers(&self) -> HxResult<Vec<Box<str>>> {
		Ok(self.timezones.clone())
	}
}

/// Snapshot of a fresh site served by the default `StaticHost`
pub fn snapshot() -> HostSnapshot {
	let host = StaticHost::default();
	let installed_languages = host.installed.lock().clone();
	HostSnapshot {
		site_title: "Helix Test".into(),
		date_format: "F j, Y".into(),
		time_format: "g:i a".into(),
		timezone_string: "UTC".into(),
		installed_languages,
		translations: host.translations.clone(),
		timezones: host.timezones.clone(),
		..HostSnapshot::default()
	}
}

// vim: ts=4
