use std::{env, path, sync::Arc};

use helix::prelude::*;
use helix::AppBuilder;
use helix_host_adapter_fs::HostAdapterFs;
use helix_option_adapter_sqlite::OptionAdapterSqlite;

pub struct Config {
	pub listen: String,
	pub admin_token: String,
	pub db_dir: path::PathBuf,
	pub lang_dir: path::PathBuf,
	pub zoneinfo_dir: path::PathBuf,
	pub lang_pack_mirror: Option<String>,
}

impl Config {
	fn from_env() -> Self {
		let db_dir = path::PathBuf::from(env::var("DB_DIR").unwrap_or("./data".to_string()));
		Config {
			listen: env::var("LISTEN").unwrap_or("127.0.0.1:8080".to_string()),
			admin_token: env::var("ADMIN_TOKEN").unwrap_or_default(),
			lang_dir: env::var("LANG_DIR").map_or_else(|_| db_dir.join("languages"), path::PathBuf::from),
			zoneinfo_dir: path::PathBuf::from(
				env::var("ZONEINFO_DIR").unwrap_or("/usr/share/zoneinfo".to_string()),
			),
			lang_pack_mirror: env::var("LANG_PACK_MIRROR").ok().filter(|m| !m.is_empty()),
			db_dir,
		}
	}
}

#[tokio::main]
async fn main() -> HxResult<()> {
	let config = Config::from_env();

	let mut builder = AppBuilder::new();

	let option_store = OptionAdapterSqlite::new(config.db_dir.join("options.db")).await?;
	let host_adapter = HostAdapterFs::new(
		config.lang_dir,
		config.zoneinfo_dir,
		config.lang_pack_mirror.as_deref(),
	)
	.await?;

	builder
		.listen(config.listen)
		.admin_token(config.admin_token)
		.option_store(Arc::new(option_store))
		.host_adapter(Arc::new(host_adapter));

	builder.run().await
}

// vim: ts=4
