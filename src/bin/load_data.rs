//! Load and display the per-brand data written by the scraper

use anyhow::{Context, Result};
use autos_crawler_lib::domain::{CarModel, display_brand};
use autos_crawler_lib::infrastructure::config::{AppConfig, defaults};
use autos_crawler_lib::infrastructure::{BrandStore, init_logging_with_config};
use clap::Parser;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "load_data", version, about = "Load and display car data.")]
struct Cli {
    /// Car brand to load data for. All brands are loaded when omitted.
    #[arg(long)]
    brand: Option<String>,

    /// Data directory, overriding `crawler.data_dir` from the configuration
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Each model on its own paragraph, its variants indented below it
fn render_models(models: &[CarModel]) -> String {
    let mut out = String::new();
    for model in models {
        let _ = writeln!(out, "\n{}", model);
        for variant in model.variants() {
            let _ = writeln!(out, "  - {}", variant);
        }
    }
    out
}

fn render(store: &BrandStore, brand: Option<&str>) -> String {
    let mut out = String::new();

    match brand {
        Some(brand) => {
            let models: Vec<CarModel> = store.load(brand);
            if models.is_empty() {
                let _ = writeln!(out, "No data available for brand '{}'.", brand);
            } else {
                let _ = writeln!(out, "\nCar Models for Brand: {}", display_brand(brand));
                out.push_str(&render_models(&models));
            }
        }
        None => {
            let all = store.load_all::<CarModel>();
            if all.is_empty() {
                let _ = writeln!(out, "No car data available.");
            }
            for (brand, models) in &all {
                let _ = writeln!(out, "\nCar Models for Brand: {}", brand);
                out.push_str(&render_models(models));
            }
        }
    }

    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    let mut logging = config.logging.clone();
    logging.console_output = false;
    logging.file_output = true;
    logging.file_prefix = defaults::LOADER_LOG_FILE_PREFIX.to_string();
    if let Err(e) = init_logging_with_config(&logging) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let data_dir = cli.data_dir.unwrap_or(config.crawler.data_dir);
    let store = BrandStore::new(data_dir);
    print!("{}", render(&store, cli.brand.as_deref()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autos_crawler_lib::domain::{CarVariant, ModelYear};

    #[test]
    fn missing_brand_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = BrandStore::new(dir.path());
        assert_eq!(render(&store, Some("audi")), "No data available for brand 'audi'.\n");
        assert_eq!(render(&store, None), "No car data available.\n");
    }

    #[test]
    fn models_are_listed_with_variants() {
        let dir = tempfile::tempdir().unwrap();
        let store = BrandStore::new(dir.path());
        let mut model = CarModel::new("Audi", "A3", ModelYear::Year(2024), "149萬", "https://x/a3");
        model.add_variant(CarVariant {
            trim_name: "35 TFSI".to_string(),
            price: "149萬".to_string(),
            body_type: "掀背車".to_string(),
            engine_cc: "1498".to_string(),
            horsepower: "150".to_string(),
            fuel_type: "汽油".to_string(),
        });
        store.save("land rover", &[model]).unwrap();

        let out = render(&store, None);
        assert!(out.contains("Car Models for Brand: Land Rover"));
        assert!(out.contains("2024 Audi A3 with 1 variants"));
        assert!(out.contains("  - 35 TFSI - 149萬 - 掀背車 - 1498cc - 150hp - 汽油"));

        let single = render(&store, Some("Land Rover"));
        assert!(single.starts_with("\nCar Models for Brand: Land rover"));
    }
}
