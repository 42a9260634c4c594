//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate, lowest precedence first:
//! 1. Built-in defaults (see [`defaults`])
//! 2. `config/autos_crawler.{toml,json,yaml}` in the working directory
//! 3. `<user config dir>/autos-crawler/config.{toml,json,yaml}`
//! 4. Environment variables, e.g. `AUTOS_CRAWLER__HTTP__TIMEOUT_SECONDS=20`

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::parsing::ParsingConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub http: HttpClientConfig,
    pub crawler: CrawlerConfig,
    pub logging: LoggingConfig,
    pub parsing: ParsingConfig,
}

/// Endpoint layout of the listing site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host, also used to resolve relative detail links
    pub base_url: String,

    /// Page carrying the brand selection control
    pub brand_index_path: String,

    /// Per-brand listing page; `{brand}` is replaced by the brand identifier
    pub brand_page_path: String,

    /// Per-brand JSON endpoint, queried once per year group
    pub model_api_path: String,
}

/// Which records a crawl produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// `CarModel` records with variants from every detail page
    Full,
    /// `Car` records from the listing snippets only
    Simple,
}

/// Uniform random delay bounds in milliseconds (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

/// Crawl loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    pub mode: CrawlMode,

    /// Pause after each year group in full mode
    pub full_year_delay: DelayRange,

    /// Pause after each year group in simple mode
    pub simple_year_delay: DelayRange,

    /// Pause after each brand
    pub brand_delay: DelayRange,

    /// Root of the per-brand `info.json` files
    pub data_dir: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    pub console_output: bool,

    pub file_output: bool,

    /// Directory for the run-scoped log files
    pub log_dir: PathBuf,

    /// Log file name prefix; the run timestamp is appended
    pub file_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: autos_site::BASE_URL.to_string(),
            brand_index_path: autos_site::BRAND_INDEX_PATH.to_string(),
            brand_page_path: autos_site::BRAND_PAGE_PATH.to_string(),
            model_api_path: autos_site::MODEL_API_PATH.to_string(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            mode: CrawlMode::Full,
            full_year_delay: DelayRange::new(defaults::FULL_YEAR_DELAY_MIN_MS, defaults::FULL_YEAR_DELAY_MAX_MS),
            simple_year_delay: DelayRange::new(defaults::SIMPLE_YEAR_DELAY_MIN_MS, defaults::SIMPLE_YEAR_DELAY_MAX_MS),
            brand_delay: DelayRange::new(defaults::BRAND_DELAY_MIN_MS, defaults::BRAND_DELAY_MAX_MS),
            data_dir: PathBuf::from(defaults::DATA_DIR),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            file_prefix: defaults::LOG_FILE_PREFIX.to_string(),
        }
    }
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    /// Draw a delay uniformly from the range
    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(fastrand::u64(self.min_ms..=self.max_ms))
    }
}

impl CrawlerConfig {
    /// Year-group pause for the configured mode
    pub const fn year_delay(&self) -> DelayRange {
        match self.mode {
            CrawlMode::Full => self.full_year_delay,
            CrawlMode::Simple => self.simple_year_delay,
        }
    }
}

impl SiteConfig {
    pub fn brand_index_url(&self) -> String {
        self.join(&self.brand_index_path)
    }

    pub fn brand_page_url(&self, brand: &str) -> String {
        self.join(&self.brand_page_path.replace("{brand}", brand))
    }

    /// JSON endpoint for one year group; the label is encoded as a query value
    pub fn model_api_url(&self, brand: &str, year_label: &str) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.join(&self.model_api_path.replace("{brand}", brand)))?;
        url.query_pairs_mut().append_pair("year", year_label);
        Ok(url.into())
    }

    fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl AppConfig {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, optionally adding one more file on top of the default locations
    pub fn load_from(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let built_in = config::Config::try_from(&Self::default())?;

        let mut builder = config::Config::builder()
            .add_source(built_in)
            .add_source(config::File::with_name(defaults::PROJECT_CONFIG_FILE).required(false));

        if let Some(user_file) = Self::user_config_file() {
            debug!("Looking for user configuration at {:?}", user_file);
            builder = builder.add_source(
                config::File::with_name(&user_file.to_string_lossy()).required(false),
            );
        }

        if let Some(path) = extra_file {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `<user config dir>/autos-crawler/config`, without extension
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(defaults::APP_DIR_NAME).join("config"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.site.base_url).is_err() {
            return Err(ConfigError::Validation {
                message: format!("site.base_url is not a valid URL: {}", self.site.base_url),
            });
        }

        if self.http.max_attempts == 0 {
            return Err(ConfigError::Validation {
                message: "http.max_attempts must be greater than 0".to_string(),
            });
        }

        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "http.timeout_seconds must be greater than 0".to_string(),
            });
        }

        for (name, range) in [
            ("crawler.full_year_delay", self.crawler.full_year_delay),
            ("crawler.simple_year_delay", self.crawler.simple_year_delay),
            ("crawler.brand_delay", self.crawler.brand_delay),
        ] {
            if range.min_ms > range.max_ms {
                return Err(ConfigError::Validation {
                    message: format!("{}: min_ms cannot be greater than max_ms", name),
                });
            }
        }

        Ok(())
    }
}

/// URLs and paths of the listing site
pub mod autos_site {
    /// Base URL for the listing site
    pub const BASE_URL: &str = "https://autos.yahoo.com.tw";

    /// Used-car landing page; carries the brand dropdown
    pub const BRAND_INDEX_PATH: &str = "/used-cars/";

    /// New-car page for one brand; lists year groups
    pub const BRAND_PAGE_PATH: &str = "/new-cars/make/{brand}";

    /// AJAX endpoint returning model snippets for one brand and year
    pub const MODEL_API_PATH: &str = "/ajax/api_car_make/{brand}";
}

/// Default configuration values
pub mod defaults {
    /// Desktop browser User-Agent sent with every request
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                  AppleWebKit/537.36 (KHTML, like Gecko) \
                                  Chrome/115.0.0.0 Safari/537.36";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;

    /// Total attempts per request, first one included
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Backoff before retry n is `BACKOFF_FACTOR_MS * 2^(n-1)`
    pub const BACKOFF_FACTOR_MS: u64 = 1000;

    pub const MAX_BACKOFF_MS: u64 = 120_000;

    pub const RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

    pub const FULL_YEAR_DELAY_MIN_MS: u64 = 1000;
    pub const FULL_YEAR_DELAY_MAX_MS: u64 = 3000;

    pub const SIMPLE_YEAR_DELAY_MIN_MS: u64 = 0;
    pub const SIMPLE_YEAR_DELAY_MAX_MS: u64 = 1000;

    pub const BRAND_DELAY_MIN_MS: u64 = 0;
    pub const BRAND_DELAY_MAX_MS: u64 = 2000;

    pub const DATA_DIR: &str = "./car_data";

    pub const LOG_DIR: &str = "./logs";
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = true;
    pub const LOG_FILE_PREFIX: &str = "scraper";

    /// Loader runs log to their own file, without console output
    pub const LOADER_LOG_FILE_PREFIX: &str = "loader";

    pub const PROJECT_CONFIG_FILE: &str = "config/autos_crawler";
    pub const APP_DIR_NAME: &str = "autos-crawler";
    pub const ENV_PREFIX: &str = "AUTOS_CRAWLER";
}
