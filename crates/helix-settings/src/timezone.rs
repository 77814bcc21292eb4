//! Timezone values
//!
//! A site timezone is either a city identifier ("Asia/Kolkata", stored in the
//! timezone option) or a manual UTC offset in fractional hours (stored in the
//! offset option). Offsets are accepted as "UTC+5.5" or as a bare "5.5".

use regex::Regex;
use serde_json::Value;

use helix_types::prelude::*;

use crate::types::{EnumOption, SettingValue};

/// Manual offsets offered next to the city identifiers
pub const OFFSET_CHOICES: &[f64] = &[
	-12.0, -11.5, -11.0, -10.5, -10.0, -9.5, -9.0, -8.5, -8.0, -7.5, -7.0, -6.5, -6.0, -5.5, -5.0,
	-4.5, -4.0, -3.5, -3.0, -2.5, -2.0, -1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5,
	4.0, 4.5, 5.0, 5.5, 5.75, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 8.75, 9.0, 9.5, 10.0, 10.5, 11.0, 11.5,
	12.0, 12.75, 13.0, 13.75, 14.0,
];

#[derive(Debug, Clone, PartialEq)]
pub enum TimezoneSpec {
	/// Offset from UTC in fractional hours
	Offset(f64),
	/// City-based identifier
	City(String),
}

/// Parse one of the three accepted timezone forms
pub fn parse_timezone(value: &str) -> HxResult<TimezoneSpec> {
	let value = value.trim();
	if value.is_empty() {
		return Err(Error::ValidationError("Timezone cannot be empty".into()));
	}

	let offset_re = Regex::new(r"^UTC([+-])(\d+(?:\.\d+)?)$")
		.map_err(|e| Error::Internal(format!("timezone regex compilation failed: {}", e)))?;
	if let Some(caps) = offset_re.captures(value) {
		let hours: f64 = caps[2].parse().map_err(|_| Error::Parse)?;
		let offset = if &caps[1] == "-" { -hours } else { hours };
		return Ok(TimezoneSpec::Offset(offset));
	}

	if let Some(offset) = parse_bare_offset(value) {
		return Ok(TimezoneSpec::Offset(offset));
	}

	Ok(TimezoneSpec::City(value.to_string()))
}

/// "5.5", "-3", "+1" -> fractional hours
fn parse_bare_offset(value: &str) -> Option<f64> {
	let numeric = value.chars().any(|c| c.is_ascii_digit())
		&& value.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
	if !numeric {
		return None;
	}
	value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// "UTC+5.5", "UTC-3", "UTC+0"
pub fn format_offset(offset: f64) -> String {
	let sign = if offset < 0.0 { '-' } else { '+' };
	let abs = offset.abs();
	if abs.fract() == 0.0 {
		format!("UTC{}{:.0}", sign, abs)
	} else {
		format!("UTC{}{}", sign, abs)
	}
}

/// "UTC+5:30" style label
fn offset_label(offset: f64) -> String {
	let sign = if offset < 0.0 { '-' } else { '+' };
	let abs = offset.abs();
	let hours = abs.trunc();
	let minutes = ((abs - hours) * 60.0).round();
	if minutes == 0.0 {
		format!("UTC{}{:.0}", sign, hours)
	} else {
		format!("UTC{}{:.0}:{:02.0}", sign, hours, minutes)
	}
}

/// "America/Argentina/Buenos_Aires" -> "America - Argentina - Buenos Aires"
fn city_label(city: &str) -> String {
	city.replace('_', " ").split('/').collect::<Vec<_>>().join(" - ")
}

/// Choice list: city identifiers first, then the manual offsets
pub fn timezone_choices(cities: &[Box<str>]) -> Vec<EnumOption> {
	cities
		.iter()
		.map(|city| EnumOption::labeled(&**city, city_label(city)))
		.chain(
			OFFSET_CHOICES
				.iter()
				.map(|offset| EnumOption::labeled(format_offset(*offset), offset_label(*offset))),
		)
		.collect()
}

/// Whether `offset` is one of the offered manual offsets
pub fn is_offered_offset(offset: f64) -> bool {
	OFFSET_CHOICES.iter().any(|choice| (choice - offset).abs() < f64::EPSILON)
}

/// Custom sanitizer of the timezone setting.
/// Offsets must be one of the offered choices, cities must be offered by the host.
pub fn sanitize_timezone(cities: &[Box<str>], raw: &Value) -> HxResult<SettingValue> {
	let text = match raw {
		Value::String(s) => s.trim().to_string(),
		Value::Number(n) => n.to_string(),
		_ => {
			return Err(Error::ValidationError(
				"Invalid value for timezone: expected a string".into(),
			));
		}
	};

	let valid = match parse_timezone(&text)? {
		TimezoneSpec::Offset(offset) => is_offered_offset(offset),
		TimezoneSpec::City(city) => cities.iter().any(|c| **c == *city),
	};
	if !valid {
		return Err(Error::InvalidEnumValue {
			key: "timezone".into(),
			allowed: timezone_choices(cities).iter().map(|opt| opt.value().to_string()).collect(),
		});
	}

	Ok(SettingValue::String(text))
}


// vim: ts=4
