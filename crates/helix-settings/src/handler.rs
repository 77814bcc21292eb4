//! Settings HTTP handlers

use axum::{
	body::Bytes,
	extract::{Path, State},
	http::StatusCode,
	Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use helix_types::prelude::*;

use crate::service::{SettingEntry, SettingUpdated, SettingsService, SettingsView, UpdateResult};

/// GET /settings - All settings grouped by category
pub async fn list_settings(
	State(settings): State<Arc<SettingsService>>,
) -> HxResult<(StatusCode, Json<SettingsView>)> {
	let view = settings.get_all().await?;
	Ok((StatusCode::OK, Json(view)))
}

/// GET /settings/{key}
pub async fn get_setting(
	State(settings): State<Arc<SettingsService>>,
	Path(key): Path<String>,
) -> HxResult<(StatusCode, Json<SettingEntry>)> {
	let entry = settings.get_one(&key).await?;
	Ok((StatusCode::OK, Json(entry)))
}

/// POST /settings - Batch update from a flat key -> value object.
/// An empty body counts as an empty batch.
pub async fn update_settings(
	State(settings): State<Arc<SettingsService>>,
	body: Bytes,
) -> HxResult<(StatusCode, Json<UpdateResult>)> {
	let changes: Map<String, Value> = if body.iter().all(u8::is_ascii_whitespace) {
		Map::new()
	} else {
		serde_json::from_slice(&body)?
	};

	let result = settings.update_many(&changes).await?;
	Ok((StatusCode::OK, Json(result)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
	#[serde(default)]
	pub value: Value,
}

/// POST /settings/{key}
pub async fn update_setting(
	State(settings): State<Arc<SettingsService>>,
	Path(key): Path<String>,
	Json(req): Json<UpdateSettingRequest>,
) -> HxResult<(StatusCode, Json<SettingUpdated>)> {
	let updated = settings.update_one(&key, &req.value).await?;
	Ok((StatusCode::OK, Json(updated)))
}

// vim: ts=4
