//! Application configuration. Record store location, view and mutation settings.

use serde::Deserialize;

/// Default record store root (json-server default port).
pub const DEFAULT_STORE_URL: &str = "http://localhost:3000";

/// Number of upcoming showings shown on the home page.
pub const DEFAULT_UPCOMING_PREVIEW_LIMIT: usize = 5;

/// Which RecordStore adapter to wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Http,
    Memory,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Record store root URL. Read from CINEWEB_STORE_URL.
    #[serde(default)]
    pub store_url: Option<String>,

    /// `http` or `memory`. Read from CINEWEB_STORE_BACKEND.
    #[serde(default)]
    pub store_backend: Option<StoreBackend>,

    /// Re-read a collection from the store after each confirmed write
    /// (default true). Read from CINEWEB_REFRESH_AFTER_MUTATION.
    #[serde(default)]
    pub refresh_after_mutation: Option<bool>,

    /// Upcoming showings on the home page (default 5). Read from CINEWEB_UPCOMING_PREVIEW_LIMIT.
    #[serde(default)]
    pub upcoming_preview_limit: Option<usize>,

    /// Directory for CSV sales reports. Read from CINEWEB_EXPORT_DIR.
    #[serde(default)]
    pub export_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("CINEWEB_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix("CINEWEB").try_parsing(true));
        c.build()?.try_deserialize()
    }

    pub fn store_url_or_default(&self) -> String {
        self.store_url
            .clone()
            .unwrap_or_else(|| DEFAULT_STORE_URL.to_string())
    }

    pub fn store_backend_or_default(&self) -> StoreBackend {
        self.store_backend.unwrap_or_default()
    }

    pub fn refresh_after_mutation_or_default(&self) -> bool {
        self.refresh_after_mutation.unwrap_or(true)
    }

    /// Zero is treated as unset.
    pub fn upcoming_preview_limit_or_default(&self) -> usize {
        self.upcoming_preview_limit
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_UPCOMING_PREVIEW_LIMIT)
    }

    pub fn export_dir_or_default(&self) -> String {
        self.export_dir
            .clone()
            .unwrap_or_else(|| "./reports".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.store_url_or_default(), "http://localhost:3000");
        assert_eq!(cfg.store_backend_or_default(), StoreBackend::Http);
        assert!(cfg.refresh_after_mutation_or_default());
        assert_eq!(cfg.upcoming_preview_limit_or_default(), 5);
        assert_eq!(cfg.export_dir_or_default(), "./reports");
    }

    #[test]
    fn test_zero_preview_limit_falls_back() {
        let cfg = AppConfig {
            upcoming_preview_limit: Some(0),
            ..AppConfig::default()
        };
        assert_eq!(cfg.upcoming_preview_limit_or_default(), 5);
    }

    #[test]
    fn test_backend_from_config_source() {
        let cfg: AppConfig = config::Config::builder()
            .set_override("store_backend", "memory")
            .unwrap()
            .set_override("upcoming_preview_limit", 3_i64)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.store_backend_or_default(), StoreBackend::Memory);
        assert_eq!(cfg.upcoming_preview_limit_or_default(), 3);
    }
}
