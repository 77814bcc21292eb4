//! Type-based sanitization and validation of incoming setting values
//!
//! Raw values arrive as arbitrary JSON. Each setting type coerces them into
//! a `SettingValue`; settings with an enum additionally require membership.
//! Numeric bounds are advisory and never enforced here.

use serde_json::Value;

use helix_types::prelude::*;

use crate::types::{FrozenSettingsRegistry, SettingDefinition, SettingType, SettingValue};

/// Schemes a URL setting may carry
const ALLOWED_PROTOCOLS: &[&str] = &[
	"http", "https", "ftp", "ftps", "mailto", "news", "irc", "irc6", "ircs", "gopher", "nntp",
	"feed", "telnet", "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

/// Sanitize a raw value for the setting `key`
pub fn sanitize(registry: &FrozenSettingsRegistry, key: &str, raw: &Value) -> HxResult<SettingValue> {
	let def = registry.get(key).ok_or_else(|| Error::InvalidSetting(key.to_string()))?;
	sanitize_value(def, raw)
}

/// Sanitize a raw value against a definition
pub fn sanitize_value(def: &SettingDefinition, raw: &Value) -> HxResult<SettingValue> {
	if let Some(sanitizer) = &def.sanitizer {
		return sanitizer(raw);
	}

	let sanitized = match def.typ {
		SettingType::String => SettingValue::String(sanitize_text_field(&scalar_text(def, raw)?)),
		SettingType::Email => {
			let email = sanitize_email(&scalar_text(def, raw)?);
			if !is_email(&email) {
				return Err(Error::InvalidEmail);
			}
			SettingValue::String(email)
		}
		SettingType::Url => SettingValue::String(sanitize_url(&scalar_text(def, raw)?)),
		SettingType::Integer => SettingValue::Int(to_absint(def, raw)?),
		SettingType::Number => SettingValue::Number(to_number(def, raw)?),
		SettingType::Boolean => SettingValue::Bool(to_bool(def, raw)?),
	};

	if let Some(values) = def.enum_values() {
		if !values.iter().any(|v| **v == sanitized) {
			return Err(Error::InvalidEnumValue {
				key: def.key.clone(),
				allowed: values.iter().map(ToString::to_string).collect(),
			});
		}
	}

	Ok(sanitized)
}

fn not_scalar(def: &SettingDefinition) -> Error {
	Error::ValidationError(format!("Invalid value for {}: expected a single value", def.key))
}

/// Text representation of a scalar JSON value
fn scalar_text(def: &SettingDefinition, raw: &Value) -> HxResult<String> {
	match raw {
		Value::String(s) => Ok(s.clone()),
		Value::Number(n) => Ok(n.to_string()),
		Value::Bool(true) => Ok("1".to_string()),
		Value::Bool(false) | Value::Null => Ok(String::new()),
		Value::Array(_) | Value::Object(_) => Err(not_scalar(def)),
	}
}

fn is_trim_char(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B')
}

/// Plain-text normalization: strips markup and percent-encoded octets,
/// collapses whitespace and trims.
pub fn sanitize_text_field(input: &str) -> String {
	let stripped = strip_tags(input);
	let without_octets = strip_octets(&stripped);

	let mut out = String::with_capacity(without_octets.len());
	let mut in_space = false;
	for c in without_octets.chars() {
		if matches!(c, ' ' | '\t' | '\n' | '\r') {
			if !in_space {
				out.push(' ');
			}
			in_space = true;
		} else {
			out.push(c);
			in_space = false;
		}
	}
	out.trim_matches(is_trim_char).to_string()
}

/// Removes `<...>` tags. A `<` that does not open a tag is escaped.
fn strip_tags(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	let mut rest = input;
	while let Some(pos) = rest.find('<') {
		out.push_str(&rest[..pos]);
		let after = &rest[pos + 1..];
		let opens_tag = after
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
		match after.find('>') {
			Some(end) if opens_tag => rest = &after[end + 1..],
			Some(_) => {
				out.push_str("&lt;");
				rest = after;
			}
			// Unterminated tag swallows the rest of the input
			None if opens_tag => rest = "",
			None => {
				out.push_str("&lt;");
				rest = after;
			}
		}
	}
	out.push_str(rest);
	out
}

/// Removes `%XX` octets until none are left
fn strip_octets(input: &str) -> String {
	let mut current = input.to_string();
	loop {
		let bytes = current.as_bytes();
		let found = (0..bytes.len().saturating_sub(2)).find(|&i| {
			bytes[i] == b'%' && bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit()
		});
		match found {
			Some(i) => current.replace_range(i..i + 3, ""),
			None => return current,
		}
	}
}

fn is_local_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c)
}

fn is_domain_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '-'
}

/// Strips characters not allowed in an email address.
/// Returns an empty string if nothing resembling an address remains.
pub fn sanitize_email(input: &str) -> String {
	let input = input.trim_matches(is_trim_char);
	if input.len() < 6 {
		return String::new();
	}
	let Some((local, domain)) = input.split_once('@') else {
		return String::new();
	};
	if local.is_empty() {
		return String::new();
	}

	let local: String = local.chars().filter(|c| is_local_char(*c)).collect();
	if local.is_empty() {
		return String::new();
	}

	if domain.contains("..") {
		return String::new();
	}
	let domain = domain.trim_matches(|c| is_trim_char(c) || c == '.');
	let subs: Vec<String> = domain
		.split('.')
		.map(|sub| {
			let sub: String = sub.chars().filter(|c| is_domain_char(*c)).collect();
			sub.trim_matches('-').to_string()
		})
		.filter(|sub| !sub.is_empty())
		.collect();
	if subs.len() < 2 {
		return String::new();
	}

	format!("{}@{}", local, subs.join("."))
}

/// Checks the shape of an (already sanitized) email address
pub fn is_email(email: &str) -> bool {
	if email.len() < 6 {
		return false;
	}
	let Some((local, domain)) = email.split_once('@') else {
		return false;
	};
	if local.is_empty() || !local.chars().all(is_local_char) {
		return false;
	}
	if domain.contains("..") || domain.starts_with('.') || domain.ends_with('.') {
		return false;
	}
	let subs: Vec<&str> = domain.split('.').collect();
	subs.len() >= 2
		&& subs.iter().all(|sub| {
			!sub.is_empty()
				&& !sub.starts_with('-')
				&& !sub.ends_with('-')
				&& sub.chars().all(is_domain_char)
		})
}

fn is_url_char(c: char) -> bool {
	!c.is_ascii() || c.is_ascii_alphanumeric() || "-~+_.?#=!&;,/:%@$|*'()[]".contains(c)
}

/// Normalizes a URL and strips disallowed schemes. Unusable input yields an empty string.
pub fn sanitize_url(input: &str) -> String {
	let trimmed = input.trim_matches(is_trim_char);
	if trimmed.is_empty() {
		return String::new();
	}

	let cleaned: String =
		trimmed.replace(' ', "%20").chars().filter(|c| is_url_char(*c)).collect();
	if cleaned.is_empty() {
		return String::new();
	}

	// Relative references carry no scheme
	if cleaned.starts_with(['/', '#', '?']) {
		return cleaned;
	}

	let candidate = if cleaned.contains(':') { cleaned } else { format!("http://{}", cleaned) };
	match url::Url::parse(&candidate) {
		Ok(parsed) if ALLOWED_PROTOCOLS.contains(&parsed.scheme()) => candidate,
		Ok(parsed) => {
			debug!("Stripping URL with disallowed scheme: {}", parsed.scheme());
			String::new()
		}
		Err(_) => String::new(),
	}
}

/// Parses the leading numeric part of a string ("12abc" -> 12, "abc" -> 0)
fn leading_number(s: &str) -> f64 {
	let s = s.trim_start_matches(is_trim_char);
	let bytes = s.as_bytes();
	let mut end = 0;
	if end < bytes.len() && matches!(bytes[end], b'+' | b'-') {
		end += 1;
	}
	let int_start = end;
	while end < bytes.len() && bytes[end].is_ascii_digit() {
		end += 1;
	}
	let mut digits = end - int_start;
	if end < bytes.len() && bytes[end] == b'.' {
		let frac_start = end + 1;
		let mut frac_end = frac_start;
		while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
			frac_end += 1;
		}
		if digits > 0 || frac_end > frac_start {
			digits += frac_end - frac_start;
			end = frac_end;
		}
	}
	if digits == 0 {
		return 0.0;
	}
	if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
		let mut exp_end = end + 1;
		if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
			exp_end += 1;
		}
		let exp_digits_start = exp_end;
		while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
			exp_end += 1;
		}
		if exp_end > exp_digits_start {
			end = exp_end;
		}
	}
	s[..end].parse().unwrap_or(0.0)
}

fn to_number(def: &SettingDefinition, raw: &Value) -> HxResult<f64> {
	let n = match raw {
		Value::Number(n) => n.as_f64().unwrap_or(0.0),
		Value::String(s) => leading_number(s),
		Value::Bool(b) => f64::from(u8::from(*b)),
		Value::Null => 0.0,
		Value::Array(_) | Value::Object(_) => return Err(not_scalar(def)),
	};
	if !n.is_finite() {
		return Err(Error::ValidationError(format!("Invalid value for {}: out of range", def.key)));
	}
	Ok(n)
}

/// Non-negative whole number (absolute value, truncated)
fn to_absint(def: &SettingDefinition, raw: &Value) -> HxResult<i64> {
	if let Value::Number(n) = raw {
		if let Some(i) = n.as_i64() {
			return Ok(i.saturating_abs());
		}
	}
	// Float to int casts saturate
	#[allow(clippy::cast_possible_truncation)]
	let i = to_number(def, raw)?.trunc() as i64;
	Ok(i.saturating_abs())
}

/// Strict boolean from common representations.
/// "false", "0" and "" are false, any other string is true.
fn to_bool(def: &SettingDefinition, raw: &Value) -> HxResult<bool> {
	match raw {
		Value::Bool(b) => Ok(*b),
		Value::Number(n) => Ok(n.as_f64().is_some_and(|n| n != 0.0)),
		Value::String(s) => {
			let s = s.trim_matches(is_trim_char).to_ascii_lowercase();
			Ok(!matches!(s.as_str(), "false" | "0" | ""))
		}
		Value::Null => Ok(false),
		Value::Array(_) | Value::Object(_) => Err(not_scalar(def)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	use crate::types::{Category, EnumOption, SettingsRegistry};

	fn def(key: &str, typ: SettingType, default: SettingValue) -> SettingDefinition {
		SettingDefinition::builder(key, typ)
			.category(Category::SiteInformation)
			.label(key)
			.description(key)
			.default(default)
			.build()
			.unwrap()
	}

	fn registry() -> FrozenSettingsRegistry {
		let mut registry = SettingsRegistry::new();
		registry.register(def("siteTitle", SettingType::String, "".into())).unwrap();
		registry.register(def("adminEmail", SettingType::Email, "a@example.com".into())).unwrap();
		registry.register(def("siteUrl", SettingType::Url, "".into())).unwrap();
		registry.register(def("postsPerPage", SettingType::Integer, 10.into())).unwrap();
		registry.register(def("ratio", SettingType::Number, 1.5.into())).unwrap();
		registry.register(def("blogPublic", SettingType::Boolean, true.into())).unwrap();
		registry
			.register(
				SettingDefinition::builder("defaultRole", SettingType::String)
					.label("Role")
					.description("Role")
					.default("subscriber")
					.values(["subscriber", "contributor", "author", "editor", "administrator"])
					.build()
					.unwrap(),
			)
			.unwrap();
		registry
			.register(
				SettingDefinition::builder("startOfWeek", SettingType::Integer)
					.label("Week")
					.description("Week")
					.default(1)
					.values([0, 1, 2, 3, 4, 5, 6])
					.build()
					.unwrap(),
			)
			.unwrap();
		registry
			.register(
				SettingDefinition::builder("language", SettingType::String)
					.label("Language")
					.description("Language")
					.default("")
					.options(vec![
						EnumOption::labeled("", "English (United States)"),
						EnumOption::labeled("de_DE", "Deutsch"),
					])
					.build()
					.unwrap(),
			)
			.unwrap();
		registry
			.register(
				SettingDefinition::builder("shout", SettingType::String)
					.label("Shout")
					.description("Shout")
					.default("")
					.values(["quiet"])
					.sanitizer(|raw| {
						Ok(SettingValue::String(raw.as_str().unwrap_or_default().to_uppercase()))
					})
					.build()
					.unwrap(),
			)
			.unwrap();
		registry.freeze()
	}

	#[test]
	fn test_unknown_setting() {
		let res = sanitize(&registry(), "bogusKey", &json!("x"));
		assert!(matches!(res, Err(Error::InvalidSetting(key)) if key == "bogusKey"));
	}

	#[test]
	fn test_string_strips_markup_and_whitespace() {
		let reg = registry();
		let res = sanitize(&reg, "siteTitle", &json!("  <b>My</b>\n\n Site\t%41 ")).unwrap();
		assert_eq!(res, SettingValue::String("My Site".into()));
		let res = sanitize(&reg, "siteTitle", &json!("a < b")).unwrap();
		assert_eq!(res, SettingValue::String("a &lt; b".into()));
		let res = sanitize(&reg, "siteTitle", &json!("<script>alert(1)</script>Hi")).unwrap();
		assert_eq!(res, SettingValue::String("alert(1)Hi".into()));
	}

	#[test]
	fn test_string_from_scalars() {
		let reg = registry();
		assert_eq!(sanitize(&reg, "siteTitle", &json!(42)).unwrap(), "42".into());
		assert_eq!(sanitize(&reg, "siteTitle", &json!(true)).unwrap(), "1".into());
		assert!(matches!(
			sanitize(&reg, "siteTitle", &json!(["a"])),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn test_email() {
		let reg = registry();
		assert_eq!(
			sanitize(&reg, "adminEmail", &json!(" admin@example.com ")).unwrap(),
			"admin@example.com".into()
		);
		assert_eq!(
			sanitize(&reg, "adminEmail", &json!("ad min@exa_mple.com")).unwrap(),
			"admin@example.com".into()
		);
		assert!(matches!(
			sanitize(&reg, "adminEmail", &json!("not-an-email")),
			Err(Error::InvalidEmail)
		));
		assert!(matches!(sanitize(&reg, "adminEmail", &json!("a@b")), Err(Error::InvalidEmail)));
		assert!(matches!(
			sanitize(&reg, "adminEmail", &json!("user@localhost")),
			Err(Error::InvalidEmail)
		));
	}

	#[test]
	fn test_url() {
		let reg = registry();
		assert_eq!(
			sanitize(&reg, "siteUrl", &json!("https://example.com/blog")).unwrap(),
			"https://example.com/blog".into()
		);
		assert_eq!(
			sanitize(&reg, "siteUrl", &json!("example.com")).unwrap(),
			"http://example.com".into()
		);
		assert_eq!(
			sanitize(&reg, "siteUrl", &json!("https://example.com/a b")).unwrap(),
			"https://example.com/a%20b".into()
		);
		assert_eq!(sanitize(&reg, "siteUrl", &json!("javascript:alert(1)")).unwrap(), "".into());
		assert_eq!(sanitize(&reg, "siteUrl", &json!("/relative")).unwrap(), "/relative".into());
		assert_eq!(sanitize(&reg, "siteUrl", &json!("")).unwrap(), "".into());
	}

	#[test]
	fn test_integer_is_non_negative_and_truncated() {
		let reg = registry();
		assert_eq!(sanitize(&reg, "postsPerPage", &json!(15)).unwrap(), SettingValue::Int(15));
		assert_eq!(sanitize(&reg, "postsPerPage", &json!(-7)).unwrap(), SettingValue::Int(7));
		assert_eq!(sanitize(&reg, "postsPerPage", &json!(3.9)).unwrap(), SettingValue::Int(3));
		assert_eq!(sanitize(&reg, "postsPerPage", &json!("12abc")).unwrap(), SettingValue::Int(12));
		assert_eq!(sanitize(&reg, "postsPerPage", &json!("-4.5")).unwrap(), SettingValue::Int(4));
		assert_eq!(sanitize(&reg, "postsPerPage", &json!("abc")).unwrap(), SettingValue::Int(0));
		assert_eq!(sanitize(&reg, "postsPerPage", &json!(true)).unwrap(), SettingValue::Int(1));
	}

	#[test]
	fn test_number() {
		let reg = registry();
		assert_eq!(sanitize(&reg, "ratio", &json!("5.5")).unwrap(), SettingValue::Number(5.5));
		assert_eq!(sanitize(&reg, "ratio", &json!(-2)).unwrap(), SettingValue::Number(-2.0));
		assert_eq!(sanitize(&reg, "ratio", &json!("1e3x")).unwrap(), SettingValue::Number(1000.0));
		assert_eq!(sanitize(&reg, "ratio", &json!(".5")).unwrap(), SettingValue::Number(0.5));
		assert!(matches!(sanitize(&reg, "ratio", &json!("1e999")), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_boolean_accepted_forms() {
		let reg = registry();
		for raw in [json!(true), json!("true"), json!(1), json!("1"), json!("TRUE"), json!("yes")] {
			assert_eq!(sanitize(&reg, "blogPublic", &raw).unwrap(), SettingValue::Bool(true), "{}", raw);
		}
		for raw in [json!(false), json!("false"), json!(0), json!("0"), json!(""), json!(null)] {
			assert_eq!(
				sanitize(&reg, "blogPublic", &raw).unwrap(),
				SettingValue::Bool(false),
				"{}",
				raw
			);
		}
	}

	#[test]
	fn test_boolean_arbitrary_strings_are_true() {
		let reg = registry();
		assert_eq!(sanitize(&reg, "blogPublic", &json!("banana")).unwrap(), SettingValue::Bool(true));
		assert_eq!(sanitize(&reg, "blogPublic", &json!("no")).unwrap(), SettingValue::Bool(true));
		assert_eq!(sanitize(&reg, "blogPublic", &json!("off")).unwrap(), SettingValue::Bool(true));
		assert_eq!(sanitize(&reg, "blogPublic", &json!(" FALSE ")).unwrap(), SettingValue::Bool(false));
		assert!(matches!(
			sanitize(&reg, "blogPublic", &json!({"a": 1})),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn test_enum_member_accepted() {
		let reg = registry();
		assert_eq!(sanitize(&reg, "defaultRole", &json!("editor")).unwrap(), "editor".into());
		assert_eq!(sanitize(&reg, "startOfWeek", &json!("3")).unwrap(), SettingValue::Int(3));
		assert_eq!(sanitize(&reg, "language", &json!("de_DE")).unwrap(), "de_DE".into());
		assert_eq!(sanitize(&reg, "language", &json!("")).unwrap(), "".into());
	}

	#[test]
	fn test_enum_violation_lists_values_in_order() {
		let reg = registry();
		let err = sanitize(&reg, "defaultRole", &json!("owner")).unwrap_err();
		let Error::InvalidEnumValue { key, allowed } = &err else {
			panic!("unexpected error: {:?}", err);
		};
		assert_eq!(key, "defaultRole");
		assert_eq!(allowed, &["subscriber", "contributor", "author", "editor", "administrator"]);
		assert!(err
			.to_string()
			.ends_with("Allowed values: subscriber, contributor, author, editor, administrator"));

		let err = sanitize(&reg, "startOfWeek", &json!(9)).unwrap_err();
		assert!(err.to_string().contains("0, 1, 2, 3, 4, 5, 6"));

		let err = sanitize(&reg, "language", &json!("fr_FR")).unwrap_err();
		assert!(matches!(err, Error::InvalidEnumValue { .. }));
	}

	#[test]
	fn test_custom_sanitizer_replaces_type_rules() {
		// Enum is not checked when a custom sanitizer is declared
		let res = sanitize(&registry(), "shout", &json!("loud")).unwrap();
		assert_eq!(res, "LOUD".into());
	}

	#[test]
	fn test_sanitize_is_idempotent() {
		let reg = registry();
		let cases = [
			("siteTitle", json!("  <i>Hello</i>   world %2%41 < 3 ")),
			("siteTitle", json!("%4%411")),
			("adminEmail", json!("Ad min@Example..com")),
			("adminEmail", json!("-x-@-a-.b-.com")),
			("siteUrl", json!("example.com/some path")),
			("siteUrl", json!("ftp://files.example.com")),
			("postsPerPage", json!("-12.7")),
			("ratio", json!("3.25kg")),
			("defaultRole", json!("author")),
		];
		for (key, raw) in cases {
			let Ok(once) = sanitize(&reg, key, &raw) else {
				continue;
			};
			let twice = sanitize(&reg, key, &once.to_json()).unwrap();
			assert_eq!(once, twice, "{} {}", key, raw);
		}
	}
}

// vim: ts=4
