//! Settings service: read and update settings through the option store
//!
//! The schema is rebuilt from a fresh host snapshot for every call, so values
//! and dynamic choice lists are never cached across requests.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use helix_types::host_adapter::HostAdapter;
use helix_types::option_store::OptionStore;
use helix_types::prelude::*;

use crate::mapping::resolve_store_key;
use crate::sanitize::sanitize;
use crate::schema::{build_registry, HostSnapshot};
use crate::special::{HandlerTable, SettingHandler, SettingTarget};
use crate::types::{
	AllowListFilter, Category, EnumOption, FrozenSettingsRegistry, SettingType, SettingValue,
};

/// One setting as listed in the categorized view
#[derive(Debug, Clone, Serialize)]
pub struct SettingView {
	pub value: Value,
	pub label: String,
	pub description: String,
	#[serde(rename = "type")]
	pub typ: SettingType,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub options: Option<Vec<EnumOption>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max: Option<f64>,
}

/// Categories in schema order, each with its settings in schema order
pub type SettingsView = IndexMap<Category, IndexMap<String, SettingView>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingEntry {
	pub setting: String,
	pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingUpdated {
	pub setting: String,
	pub value: Value,
	pub updated: bool,
}

/// Outcome of a batch update. Both maps may be populated (partial success).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateResult {
	pub updated: Map<String, Value>,
	#[serde(skip_serializing_if = "Map::is_empty")]
	pub errors: Map<String, Value>,
}

pub struct SettingsService {
	store: Arc<dyn OptionStore>,
	host: Arc<dyn HostAdapter>,
	handlers: HandlerTable,
	allow_list_filter: Option<AllowListFilter>,
}

impl std::fmt::Debug for SettingsService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsService")
			.field("store", &self.store)
			.field("host", &self.host)
			.field("handlers", &self.handlers)
			.field("allow_list_filter", &self.allow_list_filter.is_some())
			.finish()
	}
}

impl SettingsService {
	pub fn new(store: Arc<dyn OptionStore>, host: Arc<dyn HostAdapter>) -> Self {
		let handlers = HandlerTable::new(host.clone());
		Self { store, host, handlers, allow_list_filter: None }
	}

	/// Post-process the allow-list (add or remove keys)
	pub fn with_allow_list_filter(mut self, filter: AllowListFilter) -> Self {
		self.allow_list_filter = Some(filter);
		self
	}

	/// Replace or add the store write strategy of a setting
	pub fn with_handler(
		mut self,
		key: impl Into<String>,
		handler: impl SettingHandler + 'static,
	) -> Self {
		self.handlers = self.handlers.with_handler(key, handler);
		self
	}

	/// Build the schema from the current host state
	pub async fn registry(&self) -> HxResult<FrozenSettingsRegistry> {
		let snapshot = HostSnapshot::collect(self.store.as_ref(), self.host.as_ref()).await?;
		build_registry(&snapshot)
	}

	/// Keys permitted for reads and writes
	pub fn allowed_keys(&self, registry: &FrozenSettingsRegistry) -> IndexSet<String> {
		registry.allowed_keys(self.allow_list_filter.as_ref())
	}

	/// Every schema setting with its current value and metadata
	pub async fn get_all(&self) -> HxResult<SettingsView> {
		let registry = self.registry().await?;
		let mut view = SettingsView::new();

		for (category, settings) in registry.categories() {
			let mut entries = IndexMap::with_capacity(settings.len());
			for def in settings.values() {
				let target = SettingTarget { key: &def.key, store_key: resolve_store_key(&def.key) };
				let value =
					self.handlers.get(&def.key).read(self.store.as_ref(), target, &def.default).await?;
				entries.insert(
					def.key.clone(),
					SettingView {
						value,
						label: def.label.clone(),
						description: def.description.clone(),
						typ: def.typ,
						options: def.options.clone(),
						min: def.min,
						max: def.max,
					},
				);
			}
			view.insert(category, entries);
		}

		Ok(view)
	}

	/// Current value of one allowed setting
	pub async fn get_one(&self, key: &str) -> HxResult<SettingEntry> {
		let registry = self.registry().await?;
		if !self.allowed_keys(&registry).contains(key) {
			warn!("Read of setting '{}' rejected", key);
			return Err(Error::SettingNotAllowed(key.to_string()));
		}

		let target = SettingTarget { key, store_key: resolve_store_key(key) };
		let value = match registry.get(key) {
			Some(def) => self.handlers.get(key).read(self.store.as_ref(), target, &def.default).await?,
			// Allowed by the filter but not part of the schema
			None => self.store.get_option(target.store_key).await?.unwrap_or(Value::Null),
		};

		Ok(SettingEntry { setting: key.to_string(), value })
	}

	/// Sanitize and write one setting
	pub async fn update_one(&self, key: &str, raw: &Value) -> HxResult<SettingUpdated> {
		let registry = self.registry().await?;
		let allowed = self.allowed_keys(&registry);
		let value = self.apply(&registry, &allowed, key, raw).await?;

		Ok(SettingUpdated { setting: key.to_string(), value: value.to_json(), updated: true })
	}

	/// Sanitize and write several settings independently, in request order.
	/// Fails only if nothing was provided or nothing could be written.
	pub async fn update_many(&self, raw: &Map<String, Value>) -> HxResult<UpdateResult> {
		if raw.is_empty() {
			return Err(Error::NoSettingsProvided);
		}

		let registry = self.registry().await?;
		let allowed = self.allowed_keys(&registry);
		let mut result = UpdateResult::default();

		for (key, value) in raw {
			match self.apply(&registry, &allowed, key, value).await {
				Ok(value) => {
					result.updated.insert(key.clone(), value.to_json());
				}
				Err(err) => {
					result.errors.insert(key.clone(), Value::String(err.to_string()));
				}
			}
		}

		if result.updated.is_empty() {
			warn!("Batch update failed for all {} settings", result.errors.len());
			return Err(Error::BatchFailed(result.errors));
		}

		Ok(result)
	}

	async fn apply(
		&self,
		registry: &FrozenSettingsRegistry,
		allowed: &IndexSet<String>,
		key: &str,
		raw: &Value,
	) -> HxResult<SettingValue> {
		if !allowed.contains(key) {
			warn!("Update of setting '{}' rejected", key);
			return Err(Error::SettingNotAllowed(key.to_string()));
		}

		let value = sanitize(registry, key, raw)
			.inspect_err(|err| warn!("Invalid value for setting '{}': {}", key, err))?;

		let target = SettingTarget { key, store_key: resolve_store_key(key) };
		self.handlers.get(key).update(self.store.as_ref(), target, &value).await?;
		info!("Setting '{}' updated (option '{}')", key, target.store_key);

		Ok(value)
	}
}


// vim: ts=4
