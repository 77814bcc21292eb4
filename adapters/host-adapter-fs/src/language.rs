//! Installed translations and language pack downloads
//!
//! A translation is installed when `<locale>.po` exists in the languages
//! directory. Packs are fetched from a mirror serving `<locale>.po` and
//! `<locale>.mo` files.

use std::path::Path;

use helix_types::host_adapter::Translation;
use helix_types::prelude::*;

/// Translations the host can install: (locale, native name)
pub(crate) const CATALOGUE: &[(&str, &str)] = &[
	("en_GB", "English (United Kingdom)"),
	("es_ES", "Español"),
	("fr_FR", "Français"),
	("de_DE", "Deutsch"),
	("it_IT", "Italiano"),
	("pt_BR", "Português do Brasil"),
	("ru_RU", "Русский"),
	("ja", "日本語"),
	("zh_CN", "简体中文"),
	("ar", "العربية"),
	("hi_IN", "हिन्दी"),
	("ko_KR", "한국어"),
	("nl_NL", "Nederlands"),
	("sv_SE", "Svenska"),
	("da_DK", "Dansk"),
	("fi", "Suomi"),
	("no", "Norsk"),
	("pl_PL", "Polski"),
	("tr_TR", "Türkçe"),
];

pub(crate) fn catalogue() -> Vec<Translation> {
	CATALOGUE
		.iter()
		.map(|(locale, native_name)| Translation {
			locale: (*locale).into(),
			native_name: (*native_name).into(),
		})
		.collect()
}

pub(crate) fn in_catalogue(locale: &str) -> bool {
	CATALOGUE.iter().any(|(l, _)| *l == locale)
}

/// Locales with a `.po` file in the languages directory, sorted
pub(crate) async fn installed(lang_dir: &Path) -> HxResult<Vec<Box<str>>> {
	let mut locales = Vec::new();

	let mut entries = match tokio::fs::read_dir(lang_dir).await {
		Ok(entries) => entries,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(locales),
		Err(err) => return Err(err.into()),
	};

	while let Some(entry) = entries.next_entry().await? {
		let path = entry.path();
		if path.extension().is_some_and(|ext| ext == "po") {
			if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
				locales.push(stem.into());
			}
		}
	}

	locales.sort_unstable();
	Ok(locales)
}

/// Download one file of a language pack into the languages directory.
/// Returns `false` if the mirror does not have it.
pub(crate) async fn download(
	client: &reqwest::Client,
	mirror: &str,
	lang_dir: &Path,
	file_name: &str,
) -> HxResult<bool> {
	let url = format!("{}/{}", mirror.trim_end_matches('/'), file_name);
	debug!("Downloading {}", url);

	let res = client
		.get(&url)
		.send()
		.await
		.map_err(|err| Error::NetworkError(format!("{}: {}", url, err)))?;
	if !res.status().is_success() {
		info!("Language pack file {} not available ({})", url, res.status());
		return Ok(false);
	}

	let data = res.bytes().await.map_err(|err| Error::NetworkError(format!("{}: {}", url, err)))?;

	// Write to a temporary file first so a partial download never looks installed
	let tmp_path = lang_dir.join(format!("{}.tmp", file_name));
	tokio::fs::write(&tmp_path, &data).await?;
	tokio::fs::rename(&tmp_path, lang_dir.join(file_name)).await?;

	Ok(true)
}

// vim: ts=4
