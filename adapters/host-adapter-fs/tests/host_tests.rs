//! Host adapter tests
//!
//! Tests installed language discovery, timezone tables and language pack
//! installation against a local mirror

use axum::{extract::Path, http::StatusCode, routing::get, Router};
use helix_host_adapter_fs::HostAdapterFs;
use helix_types::host_adapter::HostAdapter;
use tempfile::TempDir;

const ZONE_TABLE: &str = "# TZ\tcoordinates\tTZ\n\
	HU\t+4730+01905\tEurope/Budapest\n\
	IN\t+2232+08822\tAsia/Kolkata\n\
	US\t+404251-0740023\tAmerica/New_York\tEastern (most areas)\n";

async fn create_test_adapter(mirror: Option<&str>) -> (HostAdapterFs, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let lang_dir = temp_dir.path().join("languages");
	let zoneinfo_dir = temp_dir.path().join("zoneinfo");

	tokio::fs::create_dir_all(&zoneinfo_dir).await.unwrap();
	tokio::fs::write(zoneinfo_dir.join("zone1970.tab"), ZONE_TABLE).await.unwrap();

	let adapter = HostAdapterFs::new(lang_dir, zoneinfo_dir, mirror)
		.await
		.expect("Failed to create adapter");

	(adapter, temp_dir)
}

/// Serves fr_FR.po and fr_FR.mo, everything else is missing
async fn serve_mirror() -> String {
	let app = Router::new().route(
		"/{file}",
		get(|Path(file): Path<String>| async move {
			match file.as_str() {
				"fr_FR.po" | "fr_FR.mo" => (StatusCode::OK, "msgid \"\"\nmsgstr \"\"\n"),
				_ => (StatusCode::NOT_FOUND, ""),
			}
		}),
	);
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		let _ = axum::serve(listener, app).await;
	});
	format!("http://{}", addr)
}

#[tokio::test]
async fn test_installed_languages() {
	let (adapter, temp) = create_test_adapter(None).await;
	let lang_dir = temp.path().join("languages");
	tokio::fs::write(lang_dir.join("de_DE.po"), "").await.unwrap();
	tokio::fs::write(lang_dir.join("de_DE.mo"), "").await.unwrap();
	tokio::fs::write(lang_dir.join("hu_HU.po"), "").await.unwrap();

	let installed = adapter.installed_languages().await.unwrap();
	assert_eq!(installed, vec![Box::<str>::from("de_DE"), "hu_HU".into()]);

	assert!(adapter.is_language_installed("de_DE").await.unwrap());
	assert!(adapter.is_language_installed("").await.unwrap());
	assert!(!adapter.is_language_installed("fr_FR").await.unwrap());
}

#[tokio::test]
async fn test_available_translations() {
	let (adapter, _temp) = create_test_adapter(None).await;
	let translations = adapter.available_translations().await.unwrap();
	assert_eq!(translations.len(), 19);
	assert!(translations.iter().any(|t| &*t.locale == "de_DE" && &*t.native_name == "Deutsch"));
}

#[tokio::test]
async fn test_timezone_identifiers() {
	let (adapter, _temp) = create_test_adapter(None).await;
	let zones = adapter.timezone_identifiers().await.unwrap();
	assert_eq!(
		zones,
		vec![
			Box::<str>::from("America/New_York"),
			"Asia/Kolkata".into(),
			"Europe/Budapest".into(),
			"UTC".into(),
		]
	);
}

#[tokio::test]
async fn test_timezone_fallback_table() {
	let temp = TempDir::new().unwrap();
	let zoneinfo_dir = temp.path().join("zoneinfo");
	tokio::fs::create_dir_all(&zoneinfo_dir).await.unwrap();
	tokio::fs::write(zoneinfo_dir.join("zone.tab"), "HU\t+4730+01905\tEurope/Budapest\n")
		.await
		.unwrap();

	let adapter = HostAdapterFs::new(temp.path().join("languages"), zoneinfo_dir, None)
		.await
		.unwrap();
	let zones = adapter.timezone_identifiers().await.unwrap();
	assert_eq!(zones, vec![Box::<str>::from("Europe/Budapest"), "UTC".into()]);
}

#[tokio::test]
async fn test_install_without_mirror() {
	let (adapter, _temp) = create_test_adapter(None).await;
	assert!(!adapter.install_language_pack("fr_FR").await.unwrap());
}

#[tokio::test]
async fn test_install_rejects_unknown_locale() {
	let mirror = serve_mirror().await;
	let (adapter, _temp) = create_test_adapter(Some(&mirror)).await;
	assert!(!adapter.install_language_pack("../../etc/passwd").await.unwrap());
	assert!(!adapter.install_language_pack("xx_XX").await.unwrap());
}

#[tokio::test]
async fn test_install_from_mirror() {
	let mirror = serve_mirror().await;
	let (adapter, temp) = create_test_adapter(Some(&mirror)).await;

	assert!(adapter.install_language_pack("fr_FR").await.unwrap());
	assert!(adapter.is_language_installed("fr_FR").await.unwrap());
	assert!(temp.path().join("languages/fr_FR.mo").exists());

	// The mirror has nothing for es_ES
	assert!(!adapter.install_language_pack("es_ES").await.unwrap());
	assert!(!adapter.is_language_installed("es_ES").await.unwrap());
}

// vim: ts=4
