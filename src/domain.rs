//! Domain module - listing entities
//!
//! Plain records built during a crawl and written to disk once per brand.

mod lenient;

pub mod car;
pub mod car_model;
pub mod model_year;

pub use car::Car;
pub use car_model::{CarModel, CarVariant, UNKNOWN_HORSEPOWER, UNKNOWN_PRICE};
pub use model_year::ModelYear;

/// Capitalize a brand identifier for display: first letter upper case, the rest lower case
pub fn display_brand(brand: &str) -> String {
    let mut chars = brand.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}
