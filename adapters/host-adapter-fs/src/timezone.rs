//! Timezone identifiers from the system zoneinfo tables

use std::path::Path;

use helix_types::prelude::*;

/// Zone tables in order of preference
const ZONE_TABLES: &[&str] = &["zone1970.tab", "zone.tab"];

/// Regions offered as city-based timezones
const REGIONS: &[&str] = &[
	"Africa",
	"America",
	"Antarctica",
	"Arctic",
	"Asia",
	"Atlantic",
	"Australia",
	"Europe",
	"Indian",
	"Pacific",
];

/// Parse a zone table: tab separated, the third column is the identifier
pub(crate) fn parse_zone_table(content: &str) -> Vec<Box<str>> {
	content
		.lines()
		.filter(|line| !line.starts_with('#'))
		.filter_map(|line| line.split('\t').nth(2))
		.map(str::trim)
		.filter(|tz| tz.split_once('/').is_some_and(|(region, _)| REGIONS.contains(&region)))
		.map(Box::from)
		.collect()
}

/// Sorted city identifiers followed by "UTC"
pub(crate) async fn read_identifiers(zoneinfo_dir: &Path) -> HxResult<Vec<Box<str>>> {
	let mut identifiers = Vec::new();

	for table in ZONE_TABLES {
		match tokio::fs::read_to_string(zoneinfo_dir.join(table)).await {
			Ok(content) => {
				identifiers = parse_zone_table(&content);
				break;
			}
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
			Err(err) => return Err(err.into()),
		}
	}

	if identifiers.is_empty() {
		warn!("No zone table found in {}", zoneinfo_dir.display());
	}

	identifiers.sort_unstable();
	identifiers.dedup();
	identifiers.push("UTC".into());
	Ok(identifiers)
}


// vim: ts=4
