//! Year groups on a brand page and the model snippets served per year
//!
//! The per-year endpoint returns a JSON array of HTML fragments with escaped
//! quotes and slashes. Fragments are unescaped with [`unescape_snippet`]
//! before parsing.

#![allow(clippy::uninlined_format_args)]

use scraper::{Html, Selector};
use tracing::debug;

use super::ContextualParser;
use super::config::{
    ListingSelectors, compile_selectors, element_text, select_all_in_document, select_first_in,
};
use super::context::ListingParseContext;
use crate::domain::ModelYear;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// One model snippet: the fields shown in the listing, before any detail fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    pub price: String,
    /// Absolute detail page URL
    pub url: String,
}

impl ListingEntry {
    /// Model year and model name, see [`split_title`]
    pub fn split_title(&self, year_label: &str) -> (ModelYear, String) {
        split_title(&self.title, year_label)
    }
}

/// Split a listing title into model year and model name.
///
/// "2024 Audi A3 Sportback" gives `Year(2024)` and "Audi A3 Sportback". A
/// title that does not start with a number followed by more text keeps the
/// whole title as model name and takes its year from the year-group label.
pub fn split_title(title: &str, year_label: &str) -> (ModelYear, String) {
    let title = title.trim();

    if let Some((first, rest)) = title.split_once(char::is_whitespace) {
        let rest = rest.trim();
        if let Ok(year) = first.parse::<i32>() {
            if !rest.is_empty() {
                return (ModelYear::Year(year), rest.to_string());
            }
        }
    }

    (ModelYear::from_label(year_label), title.to_string())
}

/// Drop the backslashes the endpoint puts in front of quotes and slashes
pub fn unescape_snippet(raw: &str) -> String {
    raw.replace('\\', "")
}

pub struct ListingParser {
    year_group_selectors: Vec<Selector>,
    title_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
}

impl ListingParser {
    pub fn with_config(selectors: &ListingSelectors) -> ScrapeResult<Self> {
        Ok(Self {
            year_group_selectors: compile_selectors(&selectors.year_group)?,
            title_selectors: compile_selectors(&selectors.title)?,
            price_selectors: compile_selectors(&selectors.price)?,
            link_selectors: compile_selectors(&selectors.link)?,
        })
    }

    /// Year-group labels of a brand page, trimmed, in page order
    pub fn year_labels(&self, html: &Html) -> Vec<String> {
        select_all_in_document(html, &self.year_group_selectors)
            .into_iter()
            .map(element_text)
            .collect()
    }

    /// Unescape and parse one raw fragment from the per-year endpoint
    pub fn parse_snippet(&self, raw: &str, context: &ListingParseContext) -> ScrapeResult<ListingEntry> {
        let fragment = Html::parse_fragment(&unescape_snippet(raw));
        self.parse_with_context(&fragment, context)
    }
}

impl ContextualParser for ListingParser {
    type Output = ListingEntry;
    type Context = ListingParseContext;

    fn parse_with_context(&self, html: &Html, context: &ListingParseContext) -> ScrapeResult<ListingEntry> {
        let root = html.root_element();
        let location = format!("{} / {}", context.brand, context.year_label);

        let title = select_first_in(root, &self.title_selectors)
            .map(element_text)
            .ok_or_else(|| ScrapeError::required_field_missing("title", Some(location.as_str())))?;
        let price = select_first_in(root, &self.price_selectors)
            .map(element_text)
            .ok_or_else(|| ScrapeError::required_field_missing("price", Some(location.as_str())))?;
        let href = select_first_in(root, &self.link_selectors)
            .and_then(|link| link.value().attr("href"))
            .map(str::trim)
            .ok_or_else(|| ScrapeError::required_field_missing("link", Some(location.as_str())))?;

        let url = context
            .base_url
            .join(href)
            .map_err(|e| ScrapeError::UrlResolution {
                url: href.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Listing entry '{}' -> {}", title, url);
        Ok(ListingEntry {
            title,
            price,
            url: url.into(),
        })
    }
}
