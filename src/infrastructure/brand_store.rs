//! Per-brand JSON files on disk
//!
//! Layout: `<base_dir>/<brand_slug>/info.json`, one JSON array per brand,
//! rewritten in full on every save.

#![allow(clippy::uninlined_format_args)]

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Name of the data file inside each brand directory
pub const INFO_FILE: &str = "info.json";

#[derive(Debug, Clone)]
pub struct BrandStore {
    base_dir: PathBuf,
}

impl BrandStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Folder name for a brand: lower case, spaces as underscores
    pub fn brand_slug(brand: &str) -> String {
        brand.to_lowercase().replace(' ', "_")
    }

    /// Brand name shown for a folder: underscores as spaces, each word capitalized
    pub fn display_name(folder: &str) -> String {
        let mut name = String::with_capacity(folder.len());
        let mut word_start = true;
        for c in folder.replace('_', " ").chars() {
            if c.is_alphabetic() {
                if word_start {
                    name.extend(c.to_uppercase());
                } else {
                    name.extend(c.to_lowercase());
                }
                word_start = false;
            } else {
                name.push(c);
                word_start = true;
            }
        }
        name
    }

    pub fn info_path(&self, brand: &str) -> PathBuf {
        self.base_dir.join(Self::brand_slug(brand)).join(INFO_FILE)
    }

    /// Write `items` as the brand's complete snapshot.
    ///
    /// An empty list touches nothing on disk and returns `Ok(None)`.
    pub fn save<T: Serialize>(&self, brand: &str, items: &[T]) -> ScrapeResult<Option<PathBuf>> {
        if items.is_empty() {
            warn!("No car data to save for brand {}", brand);
            return Ok(None);
        }

        let path = self.info_path(brand);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| ScrapeError::io(dir, e))?;
        }

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        items.serialize(&mut serializer)?;

        fs::write(&path, buffer).map_err(|e| ScrapeError::io(&path, e))?;

        info!("Saved {} records for brand {} to {}", items.len(), brand, path.display());
        Ok(Some(path))
    }

    /// Records saved for `brand`; any read or decode failure is logged and yields an empty list
    pub fn load<T: DeserializeOwned>(&self, brand: &str) -> Vec<T> {
        let path = self.info_path(brand);
        if !path.is_file() {
            error!("No data found for brand '{}' at {}", brand, path.display());
            return Vec::new();
        }

        match read_records(&path) {
            Ok(records) => {
                info!("Loaded {} car models for brand '{}'", records.len(), brand);
                records
            }
            Err(e) => {
                error!("Error reading data for brand '{}': {}", brand, e);
                Vec::new()
            }
        }
    }

    /// Records of every brand directory, keyed and ordered by display name
    pub fn load_all<T: DeserializeOwned>(&self) -> BTreeMap<String, Vec<T>> {
        let mut all = BTreeMap::new();

        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Base directory '{}' is not readable: {}", self.base_dir.display(), e);
                return all;
            }
        };

        for entry in entries.flatten() {
            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }

            let folder = entry.file_name().to_string_lossy().into_owned();
            let brand = Self::display_name(&folder);
            let path = dir.join(INFO_FILE);

            if !path.is_file() {
                warn!("No '{}' found for brand directory '{}'", INFO_FILE, folder);
                continue;
            }

            match read_records(&path) {
                Ok(records) => {
                    info!("Loaded {} car models for brand '{}'", records.len(), brand);
                    all.insert(brand, records);
                }
                Err(e) => error!("Error reading data for brand '{}': {}", brand, e),
            }
        }

        all
    }
}

/// Parse a brand file as an array and rebuild each element, skipping the ones that do not fit
fn read_records<T: DeserializeOwned>(path: &Path) -> ScrapeResult<Vec<T>> {
    let text = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
    let values: Vec<Value> = serde_json::from_str(&text)?;

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            if !value.is_object() {
                warn!("Skipping record {} in {}: not an object", index, path.display());
                return None;
            }
            serde_json::from_value(value)
                .map_err(|e| warn!("Skipping record {} in {}: {}", index, path.display(), e))
                .ok()
        })
        .collect())
}
