use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient::lenient_text;

/// Listing entry collected by the simple crawl, which never opens detail pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: String,
}

impl Car {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        price: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            price: price.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {} - {}", self.brand, self.model, self.price, self.url)
    }
}
