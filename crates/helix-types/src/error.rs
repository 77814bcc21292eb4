//! Error type shared by the settings core, the adapters and the HTTP layer
//!
//! Every failure is scoped to the request that triggered it. The HTTP status
//! and the machine-readable code of each variant are decided here so handlers
//! can simply propagate with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

pub type HxResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	PermissionDenied,
	DbError,
	Parse,
	Internal(String),
	ConfigError(String),
	ValidationError(String),
	Io(String),
	NetworkError(String),

	// settings
	/// Key is not part of the settings schema
	InvalidSetting(String),
	/// Key is rejected by the allow-list gate
	SettingNotAllowed(String),
	InvalidEmail,
	/// Value is not a member of the setting's enum (allowed values in declared order)
	InvalidEnumValue { key: String, allowed: Vec<String> },
	NoSettingsProvided,
	/// Store write did not take effect and the stored value still differs
	UpdateFailed(String),
	/// Locale could not be installed automatically
	LanguagePackUnavailable(String),
	/// Every entry of a batch update failed (key -> message, request order)
	BatchFailed(Map<String, Value>),
}

impl Error {
	/// Machine-readable error code used in HTTP responses
	pub fn code(&self) -> &'static str {
		match self {
			Error::PermissionDenied => "E-PERMISSION-DENIED",
			Error::DbError => "E-DB",
			Error::Parse => "E-PARSE",
			Error::Internal(_) | Error::ConfigError(_) => "E-INTERNAL",
			Error::ValidationError(_) => "E-VALIDATION",
			Error::Io(_) => "E-IO",
			Error::NetworkError(_) => "E-NETWORK",
			Error::InvalidSetting(_) => "E-INVALID-SETTING",
			Error::SettingNotAllowed(_) => "E-SETTING-NOT-ALLOWED",
			Error::InvalidEmail => "E-INVALID-EMAIL",
			Error::InvalidEnumValue { .. } => "E-INVALID-ENUM-VALUE",
			Error::NoSettingsProvided => "E-NO-SETTINGS",
			Error::UpdateFailed(_) => "E-UPDATE-FAILED",
			Error::LanguagePackUnavailable(_) => "E-LANGUAGE-PACK-UNAVAILABLE",
			Error::BatchFailed(_) => "E-SETTINGS-UPDATE-FAILED",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::InvalidSetting(_)
			| Error::InvalidEmail
			| Error::InvalidEnumValue { .. }
			| Error::ValidationError(_)
			| Error::NoSettingsProvided
			| Error::BatchFailed(_)
			| Error::Parse => StatusCode::BAD_REQUEST,
			Error::SettingNotAllowed(_) | Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::LanguagePackUnavailable(_) => StatusCode::FAILED_DEPENDENCY,
			Error::UpdateFailed(_)
			| Error::DbError
			| Error::Io(_)
			| Error::Internal(_)
			| Error::ConfigError(_)
			| Error::NetworkError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::PermissionDenied => write!(f, "Permission denied"),
			Error::DbError => write!(f, "Database error"),
			Error::Parse => write!(f, "Parse error"),
			Error::Internal(msg) => write!(f, "Internal error: {}", msg),
			Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
			Error::ValidationError(msg) => write!(f, "{}", msg),
			Error::Io(msg) => write!(f, "I/O error: {}", msg),
			Error::NetworkError(msg) => write!(f, "Network error: {}", msg),
			Error::InvalidSetting(key) => write!(f, "Invalid setting: {}", key),
			Error::SettingNotAllowed(key) => write!(f, "Setting \"{}\" is not allowed.", key),
			Error::InvalidEmail => write!(f, "Invalid email address."),
			Error::InvalidEnumValue { key, allowed } => {
				write!(f, "Invalid value for {}. Allowed values: {}", key, allowed.join(", "))
			}
			Error::NoSettingsProvided => write!(f, "No settings provided."),
			Error::UpdateFailed(key) => write!(f, "Failed to update setting \"{}\".", key),
			Error::LanguagePackUnavailable(locale) => write!(
				f,
				"Language \"{}\" could not be installed automatically. Please install the language pack manually and select it again.",
				locale
			),
			Error::BatchFailed(_) => write!(f, "Failed to update any settings."),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::Io(err.to_string())
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::debug!("JSON error: {}", err);
		Error::Parse
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::warn!("{} ({})", self, self.code());
		}

		let details = match &self {
			Error::BatchFailed(errors) => Some(serde_json::json!({ "errors": errors })),
			Error::InvalidEnumValue { key, allowed } => {
				Some(serde_json::json!({ "setting": key, "allowed": allowed }))
			}
			Error::InvalidSetting(key)
			| Error::SettingNotAllowed(key)
			| Error::UpdateFailed(key) => Some(serde_json::json!({ "setting": key })),
			Error::LanguagePackUnavailable(locale) => Some(serde_json::json!({ "locale": locale })),
			_ => None,
		};

		// Internal details stay in the log
		let message = match &self {
			Error::DbError | Error::Internal(_) | Error::ConfigError(_) | Error::Io(_) => {
				"Internal server error".to_string()
			}
			_ => self.to_string(),
		};

		let mut error = serde_json::json!({
			"code": self.code(),
			"message": message,
		});
		if let (Some(details), Some(obj)) = (details, error.as_object_mut()) {
			obj.insert("details".into(), details);
		}

		(status, Json(serde_json::json!({ "error": error }))).into_response()
	}
}


// vim: ts=4
