//! Autos Crawler - brand, model and trim collection for a car listing site
//!
//! The crawler walks every brand of the site, collects the listed models per
//! year group, extracts the trims from each model's detail page and writes
//! one JSON file per brand. The loader reads those files back.

pub mod application;
pub mod domain;
pub mod infrastructure;
