//! Where a document came from, for parsers whose output depends on it

use url::Url;

/// A model snippet returned by the per-year endpoint
#[derive(Debug, Clone)]
pub struct ListingParseContext {
    /// Brand identifier as used in site URLs
    pub brand: String,

    /// Year-group label the snippet was requested for
    pub year_label: String,

    /// Base for resolving relative detail links
    pub base_url: Url,
}

impl ListingParseContext {
    pub fn new(brand: impl Into<String>, year_label: impl Into<String>, base_url: Url) -> Self {
        Self {
            brand: brand.into(),
            year_label: year_label.into(),
            base_url,
        }
    }
}

/// A model detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Detail page URL, used in log messages
    pub url: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
