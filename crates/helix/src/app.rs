//! App builder - constructs and runs the Helix settings server

use indexmap::IndexSet;
use std::sync::Arc;

use helix_settings::{AllowListFilter, SettingsService};

use crate::host_adapter::HostAdapter;
use crate::option_store::OptionStore;
use crate::prelude::*;
use crate::routes;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub settings: Arc<SettingsService>,
	pub admin_token: Box<str>,
}

pub type App = Arc<AppState>;

pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub admin_token: Option<Box<str>>,
}

#[derive(Debug, Default)]
pub struct Adapters {
	pub option_store: Option<Arc<dyn OptionStore>>,
	pub host_adapter: Option<Arc<dyn HostAdapter>>,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	adapters: Adapters,
	allow_list_filter: Option<AllowListFilter>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A second builder in the same process keeps the first subscriber
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts { listen: "127.0.0.1:8080".into(), admin_token: None },
			adapters: Adapters::default(),
			allow_list_filter: None,
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn admin_token(&mut self, admin_token: impl Into<Box<str>>) -> &mut Self {
		self.opts.admin_token = Some(admin_token.into());
		self
	}

	/// Narrows or extends the set of keys the API accepts
	pub fn allow_list_filter<F>(&mut self, filter: F) -> &mut Self
	where
		F: Fn(&mut IndexSet<String>) + Send + Sync + 'static,
	{
		self.allow_list_filter = Some(Box::new(filter));
		self
	}

	// Adapters
	pub fn option_store(&mut self, option_store: Arc<dyn OptionStore>) -> &mut Self {
		self.adapters.option_store = Some(option_store);
		self
	}
	pub fn host_adapter(&mut self, host_adapter: Arc<dyn HostAdapter>) -> &mut Self {
		self.adapters.host_adapter = Some(host_adapter);
		self
	}

	/// Validates the configuration and assembles the shared state
	pub async fn build(self) -> HxResult<App> {
		let Some(option_store) = self.adapters.option_store else {
			error!("FATAL: No option store configured");
			return Err(Error::ConfigError("No option store configured".into()));
		};
		let Some(host_adapter) = self.adapters.host_adapter else {
			error!("FATAL: No host adapter configured");
			return Err(Error::ConfigError("No host adapter configured".into()));
		};
		let Some(admin_token) = self.opts.admin_token.filter(|token| !token.trim().is_empty())
		else {
			error!("FATAL: No admin token configured");
			return Err(Error::ConfigError("No admin token configured".into()));
		};

		let mut settings = SettingsService::new(option_store, host_adapter);
		if let Some(filter) = self.allow_list_filter {
			settings = settings.with_allow_list_filter(filter);
		}

		// Fail early if the schema cannot be built from the current host state
		let registry = settings.registry().await?;
		info!("Settings schema: {} settings", settings.allowed_keys(&registry).len());

		Ok(Arc::new(AppState { settings: Arc::new(settings), admin_token }))
	}

	pub async fn run(self) -> HxResult<()> {
		info!("     ___           ___");
		info!("    /  /  HELIX   /  /   V{}", VERSION);
		info!("   /__/  settings /__/");

		let listen = self.opts.listen.clone();
		let app = self.build().await?;
		let router = routes::init(app);

		let listener = tokio::net::TcpListener::bind(&*listen).await?;
		info!("Listening on {}", listen);
		axum::serve(listener, router).await?;

		Ok(())
	}
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState").field("settings", &self.settings).finish_non_exhaustive()
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for AppBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppBuilder")
			.field("listen", &self.opts.listen)
			.field("admin_token", &self.opts.admin_token.is_some())
			.field("adapters", &self.adapters)
			.field("allow_list_filter", &self.allow_list_filter.is_some())
			.finish()
	}
}

// vim: ts=4
