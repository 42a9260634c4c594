//! HTML parsing for the listing site
//!
//! Each page kind has its own parser, built from configurable CSS selectors
//! (see [`ParsingConfig`]). Parsers never fetch anything; they take an
//! already-parsed `scraper::Html` document.

pub mod brand_list_parser;
pub mod config;
pub mod context;
pub mod listing_parser;
pub mod spec_layout;
pub mod variant_parser;

pub use brand_list_parser::BrandListParser;
pub use config::ParsingConfig;
pub use context::{DetailParseContext, ListingParseContext};
pub use listing_parser::{ListingEntry, ListingParser, split_title, unescape_snippet};
pub use spec_layout::SpecLayout;
pub use variant_parser::{BlockOutcome, VariantParser};

use crate::infrastructure::scrape_error::ScrapeResult;
use scraper::Html;

/// Parser for a document that needs no outside information
pub trait HtmlParser {
    type Output;

    fn parse(&self, html: &Html) -> ScrapeResult<Self::Output>;
}

/// Parser for a document whose result depends on where it was found
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ScrapeResult<Self::Output>;
}
