//! Settings types and definitions
//!
//! Core types of the settings schema: value types, enum options, setting
//! definitions and the registry they are collected into.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use helix_types::prelude::*;

/// Setting-specific replacement for the type-based sanitization
pub type SettingSanitizer = Box<dyn Fn(&Value) -> HxResult<SettingValue> + Send + Sync>;

/// Post-processing step applied to the computed allow-list.
/// Injected at startup; may add or remove keys.
pub type AllowListFilter = Box<dyn Fn(&mut IndexSet<String>) + Send + Sync>;

/// Value type of a setting, drives sanitization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
	String,
	Email,
	Url,
	Integer,
	Number,
	Boolean,
}

impl SettingType {
	pub fn as_str(&self) -> &'static str {
		match self {
			SettingType::String => "string",
			SettingType::Email => "email",
			SettingType::Url => "url",
			SettingType::Integer => "integer",
			SettingType::Number => "number",
			SettingType::Boolean => "boolean",
		}
	}

	pub fn is_numeric(&self) -> bool {
		matches!(self, SettingType::Integer | SettingType::Number)
	}

	/// Check whether a value has the shape produced by sanitizing this type
	pub fn accepts(&self, value: &SettingValue) -> bool {
		matches!(
			(self, value),
			(SettingType::String | SettingType::Email | SettingType::Url, SettingValue::String(_))
				| (SettingType::Integer, SettingValue::Int(_))
				| (SettingType::Number, SettingValue::Number(_) | SettingValue::Int(_))
				| (SettingType::Boolean, SettingValue::Bool(_))
		)
	}
}

/// Grouping of settings for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	SiteInformation,
	ContentReading,
	WritingPublishing,
	MediaAssets,
	UsersMembership,
	HelixSpecific,
}

impl Category {
	pub fn as_str(&self) -> &'static str {
		match self {
			Category::SiteInformation => "site_information",
			Category::ContentReading => "content_reading",
			Category::WritingPublishing => "writing_publishing",
			Category::MediaAssets => "media_assets",
			Category::UsersMembership => "users_membership",
			Category::HelixSpecific => "helix_specific",
		}
	}
}

/// Sanitized setting value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)] // No type tag - type comes from SettingDefinition
pub enum SettingValue {
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),   // Must be before Number to keep whole numbers integral
	Number(f64),
	String(String),
}

impl SettingValue {
	pub fn to_json(&self) -> Value {
		match self {
			SettingValue::Bool(b) => Value::Bool(*b),
			SettingValue::Int(i) => Value::from(*i),
			SettingValue::Number(n) => Value::from(*n),
			SettingValue::String(s) => Value::String(s.clone()),
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			SettingValue::String(s) => Some(s),
			_ => None,
		}
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::String(_) => "string",
			SettingValue::Int(_) => "integer",
			SettingValue::Number(_) => "number",
			SettingValue::Bool(_) => "boolean",
		}
	}
}

impl std::fmt::Display for SettingValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SettingValue::Bool(b) => write!(f, "{}", b),
			SettingValue::Int(i) => write!(f, "{}", i),
			SettingValue::Number(n) => write!(f, "{}", n),
			SettingValue::String(s) => write!(f, "{}", s),
		}
	}
}

impl From<&str> for SettingValue {
	fn from(s: &str) -> Self {
		SettingValue::String(s.to_string())
	}
}

impl From<String> for SettingValue {
	fn from(s: String) -> Self {
		SettingValue::String(s)
	}
}

impl From<i64> for SettingValue {
	fn from(i: i64) -> Self {
		SettingValue::Int(i)
	}
}

impl From<i32> for SettingValue {
	fn from(i: i32) -> Self {
		SettingValue::Int(i64::from(i))
	}
}

impl From<f64> for SettingValue {
	fn from(n: f64) -> Self {
		SettingValue::Number(n)
	}
}

impl From<bool> for SettingValue {
	fn from(b: bool) -> Self {
		SettingValue::Bool(b)
	}
}

/// One member of a setting's enum: a raw value or a labelled value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumOption {
	Value(SettingValue),
	Labeled {
		value: SettingValue,
		label: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		installed: Option<bool>,
	},
}

impl EnumOption {
	pub fn labeled(value: impl Into<SettingValue>, label: impl Into<String>) -> Self {
		EnumOption::Labeled { value: value.into(), label: label.into(), installed: None }
	}

	pub fn value(&self) -> &SettingValue {
		match self {
			EnumOption::Value(value) | EnumOption::Labeled { value, .. } => value,
		}
	}
}

/// Setting definition - defines metadata for each setting
pub struct SettingDefinition {
	/// Public setting key (e.g., "siteTitle")
	pub key: String,
	pub category: Category,
	pub label: String,
	pub description: String,
	pub typ: SettingType,

	/// Used when the option store has no value yet
	pub default: SettingValue,

	/// Allowed values in declared order
	pub options: Option<Vec<EnumOption>>,

	/// Inclusive bounds, advisory only (numeric types)
	pub min: Option<f64>,
	pub max: Option<f64>,

	/// Replaces the type-based sanitization entirely
	pub sanitizer: Option<SettingSanitizer>,
}

impl Debug for SettingDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingDefinition")
			.field("key", &self.key)
			.field("category", &self.category)
			.field("typ", &self.typ)
			.field("default", &self.default)
			.field("options", &self.options.as_ref().map(Vec::len))
			.field("min", &self.min)
			.field("max", &self.max)
			.field("sanitizer", &self.sanitizer.is_some())
			.finish()
	}
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(key: impl Into<String>, typ: SettingType) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(key, typ)
	}

	/// Enum member values with labels unwrapped, in declared order
	pub fn enum_values(&self) -> Option<Vec<&SettingValue>> {
		self.options.as_ref().map(|opts| opts.iter().map(EnumOption::value).collect())
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	key: String,
	typ: SettingType,
	category: Category,
	label: Option<String>,
	description: Option<String>,
	default: Option<SettingValue>,
	options: Option<Vec<EnumOption>>,
	min: Option<f64>,
	max: Option<f64>,
	sanitizer: Option<SettingSanitizer>,
}

impl SettingDefinitionBuilder {
	pub fn new(key: impl Into<String>, typ: SettingType) -> Self {
		Self {
			key: key.into(),
			typ,
			category: Category::HelixSpecific,
			label: None,
			description: None,
			default: None,
			options: None,
			min: None,
			max: None,
			sanitizer: None,
		}
	}

	pub fn category(mut self, category: Category) -> Self {
		self.category = category;
		self
	}

	/// Set the label (required)
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Set the description (required)
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Set the default value (required)
	pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Restrict to raw enum values
	pub fn values<V: Into<SettingValue>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
		self.options = Some(values.into_iter().map(|v| EnumOption::Value(v.into())).collect());
		self
	}

	/// Restrict to enum options (possibly labelled)
	pub fn options(mut self, options: Vec<EnumOption>) -> Self {
		self.options = Some(options);
		self
	}

	pub fn min(mut self, min: f64) -> Self {
		self.min = Some(min);
		self
	}

	pub fn max(mut self, max: f64) -> Self {
		self.max = Some(max);
		self
	}

	/// Set a custom sanitizer replacing the type-based one
	pub fn sanitizer<F>(mut self, f: F) -> Self
	where
		F: Fn(&Value) -> HxResult<SettingValue> + Send + Sync + 'static,
	{
		self.sanitizer = Some(Box::new(f));
		self
	}

	/// Build the SettingDefinition
	pub fn build(self) -> HxResult<SettingDefinition> {
		let label = self
			.label
			.ok_or_else(|| Error::ConfigError(format!("Setting '{}' has no label", self.key)))?;
		let description = self.description.ok_or_else(|| {
			Error::ConfigError(format!("Setting '{}' has no description", self.key))
		})?;
		let default = self
			.default
			.ok_or_else(|| Error::ConfigError(format!("Setting '{}' has no default", self.key)))?;

		if !self.typ.accepts(&default) {
			return Err(Error::ConfigError(format!(
				"Default of setting '{}' is {}, expected {}",
				self.key,
				default.type_name(),
				self.typ.as_str()
			)));
		}

		if (self.min.is_some() || self.max.is_some()) && !self.typ.is_numeric() {
			return Err(Error::ConfigError(format!(
				"Setting '{}' has bounds but is not numeric",
				self.key
			)));
		}

		if let Some(opt) = self
			.options
			.as_ref()
			.and_then(|opts| opts.iter().find(|opt| !self.typ.accepts(opt.value())))
		{
			return Err(Error::ConfigError(format!(
				"Enum value '{}' of setting '{}' is not {}",
				opt.value(),
				self.key,
				self.typ.as_str()
			)));
		}

		Ok(SettingDefinition {
			key: self.key,
			category: self.category,
			label,
			description,
			typ: self.typ,
			default,
			options: self.options,
			min: self.min,
			max: self.max,
			sanitizer: self.sanitizer,
		})
	}
}

type CategoryMap = IndexMap<Category, IndexMap<String, SettingDefinition>>;

/// Mutable registry used while the schema is assembled
pub struct SettingsRegistry {
	categories: CategoryMap,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self { categories: IndexMap::new() }
	}

	/// Register a new setting definition. Keys are unique across all categories.
	pub fn register(&mut self, def: SettingDefinition) -> HxResult<()> {
		if self.categories.values().any(|settings| settings.contains_key(&def.key)) {
			return Err(Error::ConfigError(format!("Setting '{}' is already registered", def.key)));
		}

		self.categories.entry(def.category).or_default().insert(def.key.clone(), def);
		Ok(())
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		debug!("Freezing settings registry with {} definitions", self.len());
		FrozenSettingsRegistry { categories: self.categories }
	}

	/// Get number of registered settings
	pub fn len(&self) -> usize {
		self.categories.values().map(IndexMap::len).sum()
	}

	/// Check if registry is empty
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for SettingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Immutable settings schema
pub struct FrozenSettingsRegistry {
	categories: CategoryMap,
}

impl FrozenSettingsRegistry {
	/// Get a setting definition by key
	pub fn get(&self, key: &str) -> Option<&SettingDefinition> {
		self.categories.values().find_map(|settings| settings.get(key))
	}

	/// Categories in registration order, each with its settings in registration order
	pub fn categories(
		&self,
	) -> impl Iterator<Item = (Category, &IndexMap<String, SettingDefinition>)> {
		self.categories.iter().map(|(category, settings)| (*category, settings))
	}

	/// List all registered settings
	pub fn list(&self) -> impl Iterator<Item = &SettingDefinition> {
		self.categories.values().flat_map(IndexMap::values)
	}

	/// Every key across all categories, passed through the allow-list filter
	pub fn allowed_keys(&self, filter: Option<&AllowListFilter>) -> IndexSet<String> {
		let mut keys: IndexSet<String> = self.list().map(|def| def.key.clone()).collect();
		if let Some(filter) = filter {
			filter(&mut keys);
		}
		keys
	}

	/// Get number of registered settings
	pub fn len(&self) -> usize {
		self.categories.values().map(IndexMap::len).sum()
	}

	/// Check if registry is empty
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}


// vim: ts=4
