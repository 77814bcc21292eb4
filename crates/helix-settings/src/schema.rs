//! Settings catalogue
//!
//! The schema is built from static definitions plus a snapshot of host state
//! (current site title, locale, installed languages, timezone identifiers).
//! Building it never mutates anything.

use serde_json::Value;

use helix_types::host_adapter::{HostAdapter, Translation};
use helix_types::option_store::OptionStore;
use helix_types::prelude::*;

use crate::mapping::{LOCALE_OPTION, TIMEZONE_OPTION};
use crate::timezone::{sanitize_timezone, timezone_choices};
use crate::types::{
	Category, EnumOption, FrozenSettingsRegistry, SettingDefinition, SettingType, SettingsRegistry,
};

const DEFAULT_DATE_FORMAT: &str = "F j, Y";
const DEFAULT_TIME_FORMAT: &str = "g:i a";
const DEFAULT_TIMEZONE: &str = "UTC";
const DEFAULT_LANGUAGE_LABEL: &str = "English (United States)";
const NOT_INSTALLED_SUFFIX: &str = " (Not Installed)";

/// Host state the dynamic parts of the schema depend on
#[derive(Debug, Clone, Default)]
pub struct HostSnapshot {
	pub site_title: String,
	pub tagline: String,
	pub site_url: String,
	pub home_url: String,
	pub admin_email: String,
	/// Current locale, empty for the built-in English
	pub locale: String,
	pub date_format: String,
	pub time_format: String,
	pub timezone_string: String,
	pub installed_languages: Vec<Box<str>>,
	pub translations: Vec<Translation>,
	pub timezones: Vec<Box<str>>,
}

impl HostSnapshot {
	/// Read-only lookups against the option store and the host environment
	pub async fn collect(store: &dyn OptionStore, host: &dyn HostAdapter) -> HxResult<Self> {
		Ok(Self {
			site_title: read_text(store, "blogname", "").await?,
			tagline: read_text(store, "blogdescription", "").await?,
			site_url: read_text(store, "siteurl", "").await?,
			home_url: read_text(store, "home", "").await?,
			admin_email: read_text(store, "admin_email", "").await?,
			locale: read_text(store, LOCALE_OPTION, "").await?,
			date_format: read_text(store, "date_format", DEFAULT_DATE_FORMAT).await?,
			time_format: read_text(store, "time_format", DEFAULT_TIME_FORMAT).await?,
			timezone_string: read_text(store, TIMEZONE_OPTION, DEFAULT_TIMEZONE).await?,
			installed_languages: host.installed_languages().await?,
			translations: host.available_translations().await?,
			timezones: host.timezone_identifiers().await?,
		})
	}
}

async fn read_text(store: &dyn OptionStore, name: &str, fallback: &str) -> HxResult<String> {
	Ok(match store.get_option(name).await? {
		Some(Value::String(s)) => s,
		Some(Value::Null) | None => fallback.to_string(),
		Some(other) => other.to_string(),
	})
}

/// Language choices: the built-in English first, then every available translation.
/// Translations not installed yet are marked so the caller can warn about the install step.
pub fn language_choices(snapshot: &HostSnapshot) -> Vec<EnumOption> {
	let mut choices = vec![EnumOption::labeled("", DEFAULT_LANGUAGE_LABEL)];
	for translation in &snapshot.translations {
		let installed = snapshot.installed_languages.iter().any(|l| *l == translation.locale);
		let label = if installed {
			translation.native_name.to_string()
		} else {
			format!("{}{}", translation.native_name, NOT_INSTALLED_SUFFIX)
		};
		choices.push(EnumOption::Labeled {
			value: (&*translation.locale).into(),
			label,
			installed: Some(installed),
		});
	}
	choices
}

/// Build the full settings schema from a host snapshot
pub fn build_registry(snapshot: &HostSnapshot) -> HxResult<FrozenSettingsRegistry> {
	let mut registry = SettingsRegistry::new();

	register_site_information(&mut registry, snapshot)?;
	register_content_reading(&mut registry, snapshot)?;
	register_writing_publishing(&mut registry)?;
	register_media_assets(&mut registry)?;
	register_users_membership(&mut registry)?;
	register_helix_specific(&mut registry)?;

	Ok(registry.freeze())
}

fn register_site_information(
	registry: &mut SettingsRegistry,
	snapshot: &HostSnapshot,
) -> HxResult<()> {
	let category = Category::SiteInformation;

	registry.register(
		SettingDefinition::builder("siteTitle", SettingType::String)
			.category(category)
			.label("Site Title")
			.description("In a few words, explain what this site is about.")
			.default(snapshot.site_title.as_str())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("tagline", SettingType::String)
			.category(category)
			.label("Tagline")
			.description("In a few words, explain what this site is about.")
			.default(snapshot.tagline.as_str())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("siteUrl", SettingType::Url)
			.category(category)
			.label("WordPress Address (URL)")
			.description("The address of your WordPress core files.")
			.default(snapshot.site_url.as_str())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("homeUrl", SettingType::Url)
			.category(category)
			.label("Site Address (URL)")
			.description(
				"The address you want people to type in their browser to reach your website.",
			)
			.default(snapshot.home_url.as_str())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("adminEmail", SettingType::Email)
			.category(category)
			.label("Administration Email Address")
			.description("This address is used for admin purposes.")
			.default(snapshot.admin_email.as_str())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("language", SettingType::String)
			.category(category)
			.label("Site Language")
			.description("The language for your site.")
			.default(snapshot.locale.as_str())
			.options(language_choices(snapshot))
			.build()?,
	)?;

	// Cities come from the host, offsets are fixed
	let cities = snapshot.timezones.clone();
	registry.register(
		SettingDefinition::builder("timezone", SettingType::String)
			.category(category)
			.label("Timezone")
			.description(
				"Choose either a city in the same timezone as you or a UTC timezone offset.",
			)
			.default(snapshot.timezone_string.as_str())
			.options(timezone_choices(&snapshot.timezones))
			.sanitizer(move |raw| sanitize_timezone(&cities, raw))
			.build()?,
	)?;

	Ok(())
}

fn register_content_reading(
	registry: &mut SettingsRegistry,
	snapshot: &HostSnapshot,
) -> HxResult<()> {
	let category = Category::ContentReading;

	registry.register(
		SettingDefinition::builder("showOnFront", SettingType::String)
			.category(category)
			.label("Your homepage displays")
			.description("What to show on the front page.")
			.values(["posts", "page"])
			.default("posts")
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("pageOnFront", SettingType::Integer)
			.category(category)
			.label("Homepage")
			.description("The page to show on the front page.")
			.default(0)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("pageForPosts", SettingType::Integer)
			.category(category)
			.label("Posts page")
			.description("The page to show posts.")
			.default(0)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("postsPerPage", SettingType::Integer)
			.category(category)
			.label("Blog pages show at most")
			.description("Number of posts to show per page.")
			.default(10)
			.min(1.0)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("blogPublic", SettingType::Boolean)
			.category(category)
			.label("Search engine visibility")
			.description("Discourage search engines from indexing this site.")
			.default(true)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("dateFormat", SettingType::String)
			.category(category)
			.label("Date Format")
			.description("Format for displaying dates.")
			.default(snapshot.date_format.as_str())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("timeFormat", SettingType::String)
			.category(category)
			.label("Time Format")
			.description("Format for displaying times.")
			.default(snapshot.time_format.as_str())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("startOfWeek", SettingType::Integer)
			.category(category)
			.label("Week Starts On")
			.description("The day of the week the calendar should start on.")
			.values(0..=6)
			.default(1)
			.build()?,
	)?;

	Ok(())
}

fn register_writing_publishing(registry: &mut SettingsRegistry) -> HxResult<()> {
	let category = Category::WritingPublishing;

	registry.register(
		SettingDefinition::builder("defaultCategory", SettingType::Integer)
			.category(category)
			.label("Default Post Category")
			.description("The default category for new posts.")
			.default(1)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("defaultPostFormat", SettingType::String)
			.category(category)
			.label("Default Post Format")
			.description("The default format for new posts.")
			.values([
				"standard", "aside", "gallery", "image", "link", "quote", "status", "video", "audio",
				"chat",
			])
			.default("standard")
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("useSmilies", SettingType::Boolean)
			.category(category)
			.label("Convert emoticons")
			.description("Convert emoticons like :-) and :-P to graphics on display.")
			.default(true)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("defaultCommentStatus", SettingType::String)
			.category(category)
			.label("Default comment status")
			.description("Allow people to submit comments on new posts.")
			.values(["open", "closed"])
			.default("open")
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("defaultPingStatus", SettingType::String)
			.category(category)
			.label("Default ping status")
			.description(
				"Allow link notifications from other blogs (pingbacks and trackbacks) on new posts.",
			)
			.values(["open", "closed"])
			.default("open")
			.build()?,
	)?;

	Ok(())
}

fn register_media_assets(registry: &mut SettingsRegistry) -> HxResult<()> {
	let category = Category::MediaAssets;

	registry.register(
		SettingDefinition::builder("siteLogo", SettingType::Integer)
			.category(category)
			.label("Site Logo")
			.description("The site logo.")
			.default(0)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("siteIcon", SettingType::Integer)
			.category(category)
			.label("Site Icon")
			.description("The site icon (favicon).")
			.default(0)
			.build()?,
	)?;

	// Image sizes: (key, label, description, default)
	let sizes: [(&str, &str, &str, i64); 6] = [
		("thumbnailSizeW", "Thumbnail Width", "Maximum width of thumbnail images.", 150),
		("thumbnailSizeH", "Thumbnail Height", "Maximum height of thumbnail images.", 150),
		("mediumSizeW", "Medium Width", "Maximum width of medium-sized images.", 300),
		("mediumSizeH", "Medium Height", "Maximum height of medium-sized images.", 300),
		("largeSizeW", "Large Width", "Maximum width of large images.", 1024),
		("largeSizeH", "Large Height", "Maximum height of large images.", 1024),
	];
	for (key, label, description, default) in sizes {
		registry.register(
			SettingDefinition::builder(key, SettingType::Integer)
				.category(category)
				.label(label)
				.description(description)
				.default(default)
				.build()?,
		)?;
	}

	registry.register(
		SettingDefinition::builder("uploadsUseYearmonthFolders", SettingType::Boolean)
			.category(category)
			.label("Organize uploads into date-based folders")
			.description("Organize my uploads into month- and year-based folders.")
			.default(true)
			.build()?,
	)?;

	Ok(())
}

fn register_users_membership(registry: &mut SettingsRegistry) -> HxResult<()> {
	let category = Category::UsersMembership;

	registry.register(
		SettingDefinition::builder("usersCanRegister", SettingType::Boolean)
			.category(category)
			.label("Anyone can register")
			.description("Allow anyone to register as a user.")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("defaultRole", SettingType::String)
			.category(category)
			.label("New User Default Role")
			.description("The default role for new users.")
			.values(["subscriber", "contributor", "author", "editor", "administrator"])
			.default("subscriber")
			.build()?,
	)?;

	Ok(())
}

fn register_helix_specific(registry: &mut SettingsRegistry) -> HxResult<()> {
	registry.register(
		SettingDefinition::builder("helixUseDefaultAdmin", SettingType::Boolean)
			.category(Category::HelixSpecific)
			.label("Use Default WordPress Admin")
			.description("Use the default WordPress admin interface instead of Helix.")
			.default(false)
			.build()?,
	)?;

	Ok(())
}


// vim: ts=4
