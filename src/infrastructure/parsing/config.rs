//! CSS selectors used by the parsers
//!
//! Every field is a list of fallbacks tried in order; the first selector that
//! matches wins.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingConfig {
    pub brand_list: BrandListSelectors,
    pub listing: ListingSelectors,
    pub variant: VariantSelectors,
}

/// Brand dropdown on the used-car landing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandListSelectors {
    /// The selection control itself
    pub control: Vec<String>,
    /// Options inside the control
    pub option: Vec<String>,
}

impl Default for BrandListSelectors {
    fn default() -> Self {
        Self {
            control: vec!["#usedcar_make_id".to_string()],
            option: vec!["option".to_string()],
        }
    }
}

/// Brand page year groups and the model snippets returned per year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    pub year_group: Vec<String>,
    pub title: Vec<String>,
    pub price: Vec<String>,
    pub link: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            year_group: vec!["div.year-title".to_string()],
            title: vec!["span.title".to_string()],
            price: vec!["span.price".to_string()],
            link: vec!["a[href]".to_string()],
        }
    }
}

/// Specification blocks on a model detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSelectors {
    pub spec_block: Vec<String>,
    pub trim_name: Vec<String>,
    pub spec_item: Vec<String>,
    /// Price elements of a block; the trim price is the second match
    pub price: Vec<String>,
}

impl Default for VariantSelectors {
    fn default() -> Self {
        Self {
            spec_block: vec!["div.spec-block".to_string()],
            trim_name: vec![".title".to_string()],
            spec_item: vec!["ul.spec-list > li".to_string(), ".spec-list li".to_string()],
            price: vec![".price".to_string()],
        }
    }
}

/// Compile selector strings, skipping invalid ones; fails only if none compile
pub fn compile_selectors(selector_strings: &[String]) -> ScrapeResult<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile selector '{}': {}", selector_str, e);
                errors.push(format!("'{}': {}", selector_str, e));
            }
        }
    }

    if selectors.is_empty() {
        return Err(ScrapeError::invalid_selector(
            &selector_strings.join(", "),
            if errors.is_empty() {
                "no selectors configured".to_string()
            } else {
                errors.join(", ")
            },
        ));
    }

    if !errors.is_empty() {
        debug!("Some selectors failed to compile: {}", errors.join(", "));
    }

    Ok(selectors)
}

/// All matches of the first selector that matches anything in the document
pub fn select_all_in_document<'a>(html: &'a Html, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .map(|selector| html.select(selector).collect::<Vec<_>>())
        .find(|matches| !matches.is_empty())
        .unwrap_or_default()
}

/// All matches of the first selector that matches anything under `element`
pub fn select_all_in<'a>(element: ElementRef<'a>, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .map(|selector| element.select(selector).collect::<Vec<_>>())
        .find(|matches| !matches.is_empty())
        .unwrap_or_default()
}

/// First match under `element`, trying selectors in order
pub fn select_first_in<'a>(element: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| element.select(selector).next())
}

/// Whitespace-trimmed text content of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
