//! Mapping between public setting keys and option store names
//!
//! Keys without an explicit entry are stored under their own name.

/// Option holding the city-based timezone (e.g. "Europe/Budapest")
pub const TIMEZONE_OPTION: &str = "timezone_string";
/// Option holding the manual UTC offset in fractional hours
pub const GMT_OFFSET_OPTION: &str = "gmt_offset";
/// Option holding the site locale
pub const LOCALE_OPTION: &str = "WPLANG";

pub const OPTION_MAPPING: &[(&str, &str)] = &[
	("siteTitle", "blogname"),
	("tagline", "blogdescription"),
	("siteUrl", "siteurl"),
	("homeUrl", "home"),
	("adminEmail", "admin_email"),
	("language", LOCALE_OPTION),
	("timezone", TIMEZONE_OPTION),
	("dateFormat", "date_format"),
	("timeFormat", "time_format"),
	("startOfWeek", "start_of_week"),
	("postsPerPage", "posts_per_page"),
	("showOnFront", "show_on_front"),
	("pageOnFront", "page_on_front"),
	("pageForPosts", "page_for_posts"),
	("defaultCategory", "default_category"),
	("defaultPostFormat", "default_post_format"),
	("useSmilies", "use_smilies"),
	("defaultCommentStatus", "default_comment_status"),
	("defaultPingStatus", "default_ping_status"),
	("siteLogo", "site_logo"),
	("siteIcon", "site_icon"),
	("thumbnailSizeW", "thumbnail_size_w"),
	("thumbnailSizeH", "thumbnail_size_h"),
	("mediumSizeW", "medium_size_w"),
	("mediumSizeH", "medium_size_h"),
	("largeSizeW", "large_size_w"),
	("largeSizeH", "large_size_h"),
	("uploadsUseYearmonthFolders", "uploads_use_yearmonth_folders"),
	("usersCanRegister", "users_can_register"),
	("defaultRole", "default_role"),
	("blogPublic", "blog_public"),
	("helixUseDefaultAdmin", "helix_use_default_admin"),
];

/// Resolve the option store name of a setting key
pub fn resolve_store_key(key: &str) -> &str {
	OPTION_MAPPING
		.iter()
		.find(|(setting, _)| *setting == key)
		.map_or(key, |(_, option)| *option)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_mapped_keys() {
		assert_eq!(resolve_store_key("siteTitle"), "blogname");
		assert_eq!(resolve_store_key("language"), "WPLANG");
		assert_eq!(resolve_store_key("timezone"), "timezone_string");
		assert_eq!(resolve_store_key("uploadsUseYearmonthFolders"), "uploads_use_yearmonth_folders");
	}

	#[test]
	fn test_unmapped_keys_map_to_themselves() {
		assert_eq!(resolve_store_key("bogusKey"), "bogusKey");
		assert_eq!(resolve_store_key(""), "");
	}

	#[test]
	fn test_mapping_is_injective() {
		let mut options: Vec<&str> = OPTION_MAPPING.iter().map(|(_, option)| *option).collect();
		options.sort_unstable();
		options.dedup();
		assert_eq!(options.len(), OPTION_MAPPING.len());
	}
}

// vim: ts=4
