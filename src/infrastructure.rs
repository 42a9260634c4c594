//! Infrastructure layer: configuration, logging, HTTP, HTML parsing and storage

pub mod brand_store;
pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod scrape_error;

pub use brand_store::BrandStore;
pub use config::{AppConfig, CrawlMode, DelayRange};
pub use http_client::{HttpClient, HttpClientConfig, PageFetcher, RetryPolicy};
pub use logging::{init_logging_with_config, log_system_info};
pub use scrape_error::{ScrapeError, ScrapeResult};
