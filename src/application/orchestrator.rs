//! Run loop over every brand
//!
//! One brand at a time, one request at a time, with a random pause after
//! each brand. Records are written only once a brand's walk has finished.

#![allow(clippy::uninlined_format_args)]

use scraper::Html;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

use super::courtesy_pause;
use super::listing_walker::ListingWalker;
use crate::domain::display_brand;
use crate::infrastructure::config::{AppConfig, CrawlMode};
use crate::infrastructure::parsing::{BrandListParser, HtmlParser};
use crate::infrastructure::{BrandStore, PageFetcher, ScrapeResult};

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub brands_found: usize,
    pub brands_saved: usize,
    pub records_saved: usize,
    pub saved_files: Vec<PathBuf>,
}

pub struct CrawlOrchestrator<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a AppConfig,
    brand_parser: BrandListParser,
    walker: ListingWalker<'a, F>,
    store: BrandStore,
}

impl<'a, F: PageFetcher + ?Sized> CrawlOrchestrator<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a AppConfig) -> ScrapeResult<Self> {
        Ok(Self {
            fetcher,
            config,
            brand_parser: BrandListParser::with_config(&config.parsing.brand_list)?,
            walker: ListingWalker::new(fetcher, config)?,
            store: BrandStore::new(&config.crawler.data_dir),
        })
    }

    /// Brand identifiers from the landing page dropdown; failures yield an empty list
    pub async fn fetch_brands(&self) -> Vec<String> {
        let url = self.config.site.brand_index_url();
        let body = match self.fetcher.fetch_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to fetch car brands: {}", e);
                return Vec::new();
            }
        };

        match self.brand_parser.parse(&Html::parse_document(&body)) {
            Ok(brands) => {
                info!("Retrieved car brands: {:?}", brands);
                brands
            }
            Err(e) => {
                error!("Could not read the brands dropdown: {}", e);
                Vec::new()
            }
        }
    }

    /// Crawl every brand and save each non-empty result. Never fails: problems are logged.
    pub async fn run(&self) -> RunSummary {
        info!("🚀 Starting the car scraper ({:?} mode)", self.config.crawler.mode);

        let brands = self.fetch_brands().await;
        let mut summary = RunSummary {
            brands_found: brands.len(),
            ..RunSummary::default()
        };

        if brands.is_empty() {
            error!("CRITICAL: No car brands found. Exiting.");
            return summary;
        }

        for brand in &brands {
            let brand_name = display_brand(brand);
            info!("Starting scraping for brand: {}", brand_name);

            match self.config.crawler.mode {
                CrawlMode::Full => {
                    let models = self.walker.walk_brand(brand).await;
                    self.persist(brand, &brand_name, &models, &mut summary);
                }
                CrawlMode::Simple => {
                    let cars = self.walker.collect_cars(brand).await;
                    self.persist(brand, &brand_name, &cars, &mut summary);
                }
            }

            courtesy_pause(self.config.crawler.brand_delay).await;
        }

        info!(
            "✅ Scraping completed: {} of {} brands saved, {} records",
            summary.brands_saved, summary.brands_found, summary.records_saved
        );
        summary
    }

    fn persist<T: Serialize>(&self, brand: &str, brand_name: &str, records: &[T], summary: &mut RunSummary) {
        if records.is_empty() {
            info!("No cars found for brand {}.", brand_name);
            return;
        }

        info!("Total cars found for {}: {}", brand_name, records.len());
        match self.store.save(brand, records) {
            Ok(Some(path)) => {
                summary.brands_saved += 1;
                summary.records_saved += records.len();
                summary.saved_files.push(path);
            }
            Ok(None) => {}
            Err(e) => error!("Failed to save data for brand {}: {}", brand_name, e),
        }
    }
}
