//! Store write strategies
//!
//! Most settings map to a single option and are written as is. Settings whose
//! update spans several options or has side effects get their own handler,
//! looked up by key from a table built once at startup.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use helix_types::host_adapter::HostAdapter;
use helix_types::option_store::OptionStore;
use helix_types::prelude::*;

use crate::mapping::{GMT_OFFSET_OPTION, TIMEZONE_OPTION};
use crate::timezone::{format_offset, parse_timezone, TimezoneSpec};
use crate::types::SettingValue;

/// The setting being read or written, with its resolved option name
#[derive(Debug, Clone, Copy)]
pub struct SettingTarget<'a> {
	pub key: &'a str,
	pub store_key: &'a str,
}

#[async_trait]
pub trait SettingHandler: Debug + Send + Sync {
	/// Persist an already sanitized value
	async fn update(
		&self,
		store: &dyn OptionStore,
		target: SettingTarget<'_>,
		value: &SettingValue,
	) -> HxResult<()>;

	/// Current value, `default` if the option was never written
	async fn read(
		&self,
		store: &dyn OptionStore,
		target: SettingTarget<'_>,
		default: &SettingValue,
	) -> HxResult<Value> {
		Ok(store.get_option(target.store_key).await?.unwrap_or_else(|| default.to_json()))
	}
}

/// Write one option.
/// A write that changes nothing is a success as long as the stored value matches.
async fn write_option(
	store: &dyn OptionStore,
	target: SettingTarget<'_>,
	value: Value,
) -> HxResult<()> {
	if store.update_option(target.store_key, value.clone()).await? {
		return Ok(());
	}

	if store.get_option(target.store_key).await?.as_ref() == Some(&value) {
		debug!("Setting '{}' unchanged", target.key);
		return Ok(());
	}

	warn!("Option '{}' was not written for setting '{}'", target.store_key, target.key);
	Err(Error::UpdateFailed(target.key.to_string()))
}

/// Single option write through the key mapping
#[derive(Debug, Default)]
pub struct GenericHandler;

#[async_trait]
impl SettingHandler for GenericHandler {
	async fn update(
		&self,
		store: &dyn OptionStore,
		target: SettingTarget<'_>,
		value: &SettingValue,
	) -> HxResult<()> {
		write_option(store, target, value.to_json()).await
	}
}

/// Timezone: a city identifier and a manual offset live in two options,
/// exactly one of them is set at any time.
#[derive(Debug, Default)]
pub struct TimezoneHandler;

fn offset_value(value: &Value) -> Option<f64> {
	match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
		_ => None,
	}
}

#[async_trait]
impl SettingHandler for TimezoneHandler {
	async fn update(
		&self,
		store: &dyn OptionStore,
		target: SettingTarget<'_>,
		value: &SettingValue,
	) -> HxResult<()> {
		let text = value.to_string();
		let changes = match parse_timezone(&text)? {
			TimezoneSpec::Offset(offset) => [
				(GMT_OFFSET_OPTION, Value::from(offset)),
				(TIMEZONE_OPTION, Value::String(String::new())),
			],
			TimezoneSpec::City(city) => [
				(TIMEZONE_OPTION, Value::String(city)),
				(GMT_OFFSET_OPTION, Value::String(String::new())),
			],
		};

		// Both options change in one store operation
		if store.update_options(&changes).await? {
			return Ok(());
		}

		for (name, value) in &changes {
			if store.get_option(name).await?.as_ref() != Some(value) {
				warn!("Timezone options were not written (value: {})", text);
				return Err(Error::UpdateFailed(target.key.to_string()));
			}
		}
		debug!("Setting '{}' unchanged", target.key);
		Ok(())
	}

	/// Reports a manual offset in "UTC+N" notation when no city is set
	async fn read(
		&self,
		store: &dyn OptionStore,
		_target: SettingTarget<'_>,
		default: &SettingValue,
	) -> HxResult<Value> {
		if let Some(Value::String(city)) = store.get_option(TIMEZONE_OPTION).await? {
			if !city.is_empty() {
				return Ok(Value::String(city));
			}
		}

		let offset = store.get_option(GMT_OFFSET_OPTION).await?.as_ref().and_then(offset_value);
		Ok(match offset {
			Some(offset) => Value::String(format_offset(offset)),
			None => default.to_json(),
		})
	}
}

/// Site language: a locale can only be selected once its translation is
/// installed. A missing translation is installed and the write retried once.
#[derive(Debug)]
pub struct LanguageHandler {
	host: Arc<dyn HostAdapter>,
}

impl LanguageHandler {
	pub fn new(host: Arc<dyn HostAdapter>) -> Self {
		Self { host }
	}

	/// `false` if the locale is not installed (nothing written)
	async fn write_locale(
		&self,
		store: &dyn OptionStore,
		target: SettingTarget<'_>,
		locale: &str,
	) -> HxResult<bool> {
		if !self.host.is_language_installed(locale).await? {
			return Ok(false);
		}
		write_option(store, target, Value::String(locale.to_string())).await?;
		Ok(true)
	}
}

#[async_trait]
impl SettingHandler for LanguageHandler {
	async fn update(
		&self,
		store: &dyn OptionStore,
		target: SettingTarget<'_>,
		value: &SettingValue,
	) -> HxResult<()> {
		let locale = value.to_string();
		if self.write_locale(store, target, &locale).await? {
			return Ok(());
		}

		info!("Language '{}' is not installed, installing language pack", locale);
		let installed = match self.host.install_language_pack(&locale).await {
			Ok(installed) => installed,
			Err(err) => {
				warn!("Language pack installation failed for '{}': {}", locale, err);
				false
			}
		};

		if installed && self.write_locale(store, target, &locale).await? {
			info!("Language pack '{}' installed", locale);
			return Ok(());
		}

		warn!("Language '{}' could not be installed automatically", locale);
		Err(Error::LanguagePackUnavailable(locale))
	}
}

/// Handler lookup by setting key, with the generic handler as fallback
#[derive(Debug)]
pub struct HandlerTable {
	handlers: HashMap<String, Box<dyn SettingHandler>>,
	generic: GenericHandler,
}

impl HandlerTable {
	/// Table with the timezone and language handlers registered
	pub fn new(host: Arc<dyn HostAdapter>) -> Self {
		Self { handlers: HashMap::new(), generic: GenericHandler }
			.with_handler("timezone", TimezoneHandler)
			.with_handler("language", LanguageHandler::new(host))
	}

	pub fn with_handler(mut self, key: impl Into<String>, handler: impl SettingHandler + 'static) -> Self {
		self.handlers.insert(key.into(), Box::new(handler));
		self
	}

	pub fn get(&self, key: &str) -> &dyn SettingHandler {
		self.handlers.get(key).map_or(&self.generic as &dyn SettingHandler, |handler| &**handler)
	}
}


// vim: ts=4
