use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// How the labelled `<p>`/`<div>` fields are pulled out of a page
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStrategy {
    /// Pattern match over the raw markup
    #[default]
    Regex,
    /// Tree query by tag and class over the parsed document
    Dom,
}

/// Settings shared by both extractors
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Scheme and host every page and stream URL is built on
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Field scraping strategy
    #[serde(default)]
    pub scrape_strategy: ScrapeStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            scrape_strategy: ScrapeStrategy::default(),
        }
    }
}

impl Settings {
    /// Load settings from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables with DAMTOMO__ prefix
    /// 2. damtomo.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: DAMTOMO__SCRAPE_STRATEGY=dom
    pub fn load() -> Result<Self, ConfigError> {
        load_settings()
    }

    /// Base URL without a trailing slash
    pub(crate) fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn default_base_url() -> String {
    "https://www.clubdam.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

/// Load settings from an optional `damtomo.toml` and `DAMTOMO__*` variables
pub fn load_settings() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("damtomo").required(false))
        .add_source(
            Environment::with_prefix("DAMTOMO")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
