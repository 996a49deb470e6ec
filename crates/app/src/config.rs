//! Configuration
//!
//! Settings come from command line flags, falling back to environment variables; a `.env`
//! file in the working directory is loaded first when present.

use clap::Args;

use crate::store::HttpStoreConfig;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Hosted backend settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Document store base URL
    #[arg(long, env = "STORE_URL")]
    pub store_url: Option<String>,

    /// Object storage base URL; defaults to the document store URL
    #[arg(long, env = "STORAGE_URL")]
    pub storage_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "STORE_API_KEY", hide_env_values = true, default_value = "")]
    pub store_api_key: String,

    /// Email of the administrator account
    #[arg(long, env = "ADMIN_EMAIL", default_value = "admin@123.com")]
    pub admin_email: String,
}

impl StoreConfig {
    /// Document store connection, if a URL is configured.
    pub fn documents(&self) -> Option<HttpStoreConfig> {
        self.store_url.as_ref().map(|base_url| HttpStoreConfig {
            base_url: base_url.clone(),
            api_key: self.store_api_key.clone(),
        })
    }

    /// Object storage connection, if a URL is configured.
    pub fn objects(&self) -> Option<HttpStoreConfig> {
        self.storage_url
            .as_ref()
            .or(self.store_url.as_ref())
            .map(|base_url| HttpStoreConfig {
                base_url: base_url.clone(),
                api_key: self.store_api_key.clone(),
            })
    }
}

/// Load `.env` into the process environment. A missing file is not an error.
pub fn load_dotenv() {
    _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(store_url: Option<&str>, storage_url: Option<&str>) -> StoreConfig {
        StoreConfig {
            store_url: store_url.map(ToString::to_string),
            storage_url: storage_url.map(ToString::to_string),
            store_api_key: "key".to_string(),
            admin_email: "admin@123.com".to_string(),
        }
    }

    #[test]
    fn storage_falls_back_to_store_url() {
        let objects = config(Some("https://store"), None).objects();

        assert_eq!(objects.map(|config| config.base_url), Some("https://store".to_string()));
    }

    #[test]
    fn storage_url_overrides() {
        let objects = config(Some("https://store"), Some("https://blobs")).objects();

        assert_eq!(objects.map(|config| config.base_url), Some("https://blobs".to_string()));
    }

    #[test]
    fn no_url_means_offline() {
        assert!(config(None, None).documents().is_none());
    }
}
