/// Application configuration
///
/// Loaded once at startup from a TOML file in the user's config
/// directory:
/// - Linux: ~/.config/piscopy/config.toml
/// - macOS: ~/Library/Application Support/piscopy/config.toml
/// - Windows: %APPDATA%\piscopy\config.toml
///
/// A missing or malformed file falls back to full defaults, so the app
/// always starts.
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base endpoint of the remote JSON document store
    pub store_url: String,
    /// Whether billing documents sync to the store on save/complete/
    /// delete. Photos always persist; this only governs documents.
    pub persist_documents: bool,
    /// Shop details shown in the header and on printed documents
    pub shop: ShopInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShopInfo {
    pub name: String,
    pub phone1: String,
    pub phone2: String,
    pub line_id: String,
    pub hours: String,
    pub location: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: "https://piscopy-store-default-rtdb.asia-southeast1.firebasedatabase.app"
                .to_string(),
            persist_documents: true,
            shop: ShopInfo::default(),
        }
    }
}

impl Default for ShopInfo {
    fn default() -> Self {
        Self {
            name: "ถ่ายเอกสารพิส".to_string(),
            phone1: "043771476".to_string(),
            phone2: "0639898917".to_string(),
            line_id: "0815921229".to_string(),
            hours: "8:00-17:00".to_string(),
            location: "ข้างธนาคารกสิกรไทย อำเภอบรบือ จังหวัดมหาสารคาม".to_string(),
        }
    }
}

/// Where the config file is expected to live
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("piscopy").join("config.toml"))
}

/// Load the configuration, falling back to defaults on any problem
pub fn load() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(raw) => match toml::from_str(&raw) {
            Ok(config) => config,
            Err(error) => {
                warn!(%error, path = %path.display(), "config file is malformed, using defaults");
                AppConfig::default()
            }
        },
        // Missing file is the normal first run
        Err(_) => AppConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.persist_documents);
        assert!(config.store_url.starts_with("https://"));
        assert_eq!(config.shop.name, "ถ่ายเอกสารพิส");
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            store_url = "http://localhost:9000"
            persist_documents = false

            [shop]
            name = "ร้านสาขาสอง"
            "#,
        )
        .unwrap();

        assert_eq!(config.store_url, "http://localhost:9000");
        assert!(!config.persist_documents);
        assert_eq!(config.shop.name, "ร้านสาขาสอง");
        // Unnamed shop fields keep their defaults
        assert_eq!(config.shop.hours, "8:00-17:00");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(toml::from_str::<AppConfig>("store_url = [").is_err());
    }
}
