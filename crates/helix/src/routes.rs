//! HTTP routes

use axum::{
	middleware,
	routing::get,
	Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use helix_settings::handler;

use crate::app::{App, VERSION};
use crate::auth::require_admin;

async fn health() -> Json<Value> {
	Json(json!({ "status": "ok", "version": VERSION }))
}

pub fn init(app: App) -> Router {
	let settings_router = Router::new()
		.route(
			"/settings",
			get(handler::list_settings)
				.post(handler::update_settings)
				.put(handler::update_settings)
				.patch(handler::update_settings),
		)
		.route(
			"/settings/{key}",
			get(handler::get_setting)
				.post(handler::update_setting)
				.put(handler::update_setting)
				.patch(handler::update_setting),
		)
		.with_state(app.settings.clone())
		.route_layer(middleware::from_fn_with_state(app, require_admin));

	Router::new()
		.nest("/helix/v1", settings_router)
		.route("/health", get(health))
		.layer(TraceLayer::new_for_http())
}

// vim: ts=4
