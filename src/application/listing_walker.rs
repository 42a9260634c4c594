//! Brand page -> year groups -> model snippets -> detail pages

#![allow(clippy::uninlined_format_args)]

use scraper::Html;
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

use super::courtesy_pause;
use crate::domain::{Car, CarModel, CarVariant, display_brand};
use crate::infrastructure::config::{AppConfig, DelayRange, SiteConfig};
use crate::infrastructure::parsing::{
    DetailParseContext, ListingEntry, ListingParseContext, ListingParser, VariantParser,
};
use crate::infrastructure::{PageFetcher, ScrapeError, ScrapeResult};

/// Collects the models of one brand at a time
pub struct ListingWalker<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    site: &'a SiteConfig,
    base_url: Url,
    listing_parser: ListingParser,
    variant_parser: VariantParser,
    year_delay: DelayRange,
}

impl<'a, F: PageFetcher + ?Sized> ListingWalker<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a AppConfig) -> ScrapeResult<Self> {
        let base_url = Url::parse(&config.site.base_url).map_err(|e| ScrapeError::UrlResolution {
            url: config.site.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            fetcher,
            site: &config.site,
            base_url,
            listing_parser: ListingParser::with_config(&config.parsing.listing)?,
            variant_parser: VariantParser::with_config(&config.parsing.variant)?,
            year_delay: config.crawler.year_delay(),
        })
    }

    /// Full crawl of a brand: every listed model with the variants of its detail page.
    /// Models without any variant are left out.
    pub async fn walk_brand(&self, brand: &str) -> Vec<CarModel> {
        let brand_name = display_brand(brand);
        let mut models = Vec::new();

        for label in self.collect_years(brand).await {
            info!("Processing year: {}", label);

            for entry in self.year_entries(brand, &label).await {
                let (year, model_name) = entry.split_title(&label);
                let mut model = CarModel::new(brand_name.as_str(), model_name, year, entry.price, entry.url);

                for variant in self.extract_variants(&model.url).await {
                    model.add_variant(variant);
                }

                if model.has_variants() {
                    info!("Added car model: {}", model);
                    models.push(model);
                } else {
                    info!("No variants found for {}, skipping", entry.title);
                }
            }

            courtesy_pause(self.year_delay).await;
        }

        models
    }

    /// Listing-only crawl of a brand: one `Car` per snippet, no detail pages
    pub async fn collect_cars(&self, brand: &str) -> Vec<Car> {
        let brand_name = display_brand(brand);
        let mut cars = Vec::new();

        for label in self.collect_years(brand).await {
            info!("Processing year: {}", label);

            for entry in self.year_entries(brand, &label).await {
                let car = Car::new(brand_name.clone(), entry.title, entry.price, entry.url);
                info!("Added car: {}", car);
                cars.push(car);
            }

            courtesy_pause(self.year_delay).await;
        }

        cars
    }

    /// Year-group labels listed on the brand page
    pub async fn collect_years(&self, brand: &str) -> Vec<String> {
        let url = self.site.brand_page_url(brand);
        let body = match self.fetcher.fetch_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to fetch brand page for {}: {}", brand, e);
                return Vec::new();
            }
        };

        let labels = self.listing_parser.year_labels(&Html::parse_document(&body));
        if labels.is_empty() {
            warn!("No year titles found for brand {}", brand);
        } else {
            info!("Found years for {}: {:?}", brand, labels);
        }
        labels
    }

    /// Variants on a model detail page; a failed fetch yields none
    pub async fn extract_variants(&self, url: &str) -> Vec<CarVariant> {
        let body = match self.fetcher.fetch_text(url).await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to fetch car details from {}: {}", url, e);
                return Vec::new();
            }
        };

        let html = Html::parse_document(&body);
        match self.variant_parser.variants(&html, &DetailParseContext::new(url)) {
            Ok(variants) => variants,
            Err(e) => {
                error!("Failed to parse car details from {}: {}", url, e);
                Vec::new()
            }
        }
    }

    /// Entries of one year group; request, decode and snippet failures are logged and skipped
    async fn year_entries(&self, brand: &str, label: &str) -> Vec<ListingEntry> {
        let url = match self.site.model_api_url(brand, label) {
            Ok(url) => url,
            Err(e) => {
                error!("Cannot build model API URL for {} / {}: {}", brand, label, e);
                return Vec::new();
            }
        };

        let snippets = match self.fetcher.fetch_text(&url).await {
            Ok(body) => decode_snippets(&url, &body),
            Err(e) => Err(e),
        };
        let snippets = match snippets {
            Ok(snippets) => snippets,
            Err(e) => {
                error!("Request failed for year {}: {}", label, e);
                return Vec::new();
            }
        };

        let context = ListingParseContext::new(brand, label, self.base_url.clone());
        snippets
            .iter()
            .filter_map(|raw| {
                self.listing_parser
                    .parse_snippet(raw, &context)
                    .map_err(|e| warn!("Incomplete car information, skipping: {}", e))
                    .ok()
            })
            .collect()
    }
}

/// The per-year endpoint answers with a JSON array of HTML strings
fn decode_snippets(url: &str, body: &str) -> ScrapeResult<Vec<String>> {
    let value: Value = serde_json::from_str(body).map_err(|e| ScrapeError::JsonDecode {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let Value::Array(items) = value else {
        return Err(ScrapeError::JsonDecode {
            url: url.to_string(),
            message: "expected a JSON array".to_string(),
        });
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::String(html) => Some(html),
            other => {
                warn!("Skipping non-string element {} from {}: {}", index, url, other);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippets_decode_from_string_array() {
        let snippets = decode_snippets("u", r#"["<a>1</a>", 5, null, "<a>2</a>"]"#).unwrap();
        assert_eq!(snippets, vec!["<a>1</a>", "<a>2</a>"]);
    }

    #[test]
    fn non_array_payload_is_a_decode_error() {
        assert!(matches!(
            decode_snippets("u", r#"{"cars": []}"#),
            Err(ScrapeError::JsonDecode { .. })
        ));
        assert!(matches!(
            decode_snippets("u", "<html>maintenance</html>"),
            Err(ScrapeError::JsonDecode { .. })
        ));
    }
}
