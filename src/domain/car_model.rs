use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient::{lenient_list, lenient_text};
use super::model_year::ModelYear;

/// Horsepower text stored for electric trims, whose spec list carries no horsepower entry
pub const UNKNOWN_HORSEPOWER: &str = "Unknown Horsepower";

/// Price text stored when a specification block has no trim price element
pub const UNKNOWN_PRICE: &str = "Unknown Price";

/// One trim of a model, as listed in a specification block of the detail page.
///
/// Every field is the raw text from the page. Units and placeholders are kept
/// as they appear, since the site does not format them consistently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarVariant {
    #[serde(default, deserialize_with = "lenient_text")]
    pub trim_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub body_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub engine_cc: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub horsepower: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fuel_type: String,
}

/// A model listed under a brand, together with the trims found on its detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarModel {
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model_name: String,
    #[serde(default)]
    pub year: ModelYear,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price_range: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_list")]
    variants: Vec<CarVariant>,
}

impl CarModel {
    pub fn new(
        brand: impl Into<String>,
        model_name: impl Into<String>,
        year: ModelYear,
        price_range: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model_name: model_name.into(),
            year,
            price_range: price_range.into(),
            url: url.into(),
            variants: Vec::new(),
        }
    }

    pub fn add_variant(&mut self, variant: CarVariant) {
        self.variants.push(variant);
    }

    pub fn variants(&self) -> &[CarVariant] {
        &self.variants
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }
}

impl fmt::Display for CarVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}cc - {}hp - {}",
            self.trim_name, self.price, self.body_type, self.engine_cc, self.horsepower, self.fuel_type
        )
    }
}

impl fmt::Display for CarModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} with {} variants",
            self.year,
            self.brand,
            self.model_name,
            self.variants.len()
        )
    }
}
