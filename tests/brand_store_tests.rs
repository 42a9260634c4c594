//! Brand files on disk

use autos_crawler_lib::domain::{Car, CarModel, CarVariant, ModelYear};
use autos_crawler_lib::infrastructure::BrandStore;
use std::fs;

fn variant(trim: &str) -> CarVariant {
    CarVariant {
        trim_name: trim.to_string(),
        price: "149.9萬".to_string(),
        body_type: "5門5人座掀背車".to_string(),
        engine_cc: "1498".to_string(),
        horsepower: "150".to_string(),
        fuel_type: "汽油".to_string(),
    }
}

fn models() -> Vec<CarModel> {
    let mut a3 = CarModel::new("Audi", "A3 Sportback", ModelYear::Year(2024), "149.9-179萬", "https://x/a3");
    a3.add_variant(variant("35 TFSI"));
    a3.add_variant(variant("40 TFSI"));
    let mut q4 = CarModel::new("Audi", "Q4 e-tron", ModelYear::Label("新款".to_string()), "", "https://x/q4");
    q4.add_variant(variant("45"));
    vec![a3, q4]
}

#[test]
fn save_then_load_reproduces_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = BrandStore::new(dir.path());

    store.save("Audi", &models()).unwrap();
    let loaded: Vec<CarModel> = store.load("audi");

    assert_eq!(loaded, models());
}

#[test]
fn save_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = BrandStore::new(dir.path());

    store.save("Audi", &models()).unwrap();
    store.save("Audi", &models()[..1]).unwrap();

    let loaded: Vec<CarModel> = store.load("Audi");
    assert_eq!(loaded.len(), 1);
}

#[test]
fn empty_save_leaves_existing_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = BrandStore::new(dir.path());
    let path = store.save("Audi", &models()).unwrap().unwrap();
    let before = fs::read(&path).unwrap();

    let result = store.save::<CarModel>("Audi", &[]).unwrap();

    assert!(result.is_none());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn empty_save_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = BrandStore::new(dir.path().join("car_data"));

    assert!(store.save::<Car>("Audi", &[]).unwrap().is_none());
    assert!(!dir.path().join("car_data").exists());
}

#[test]
fn load_all_keys_by_display_name() {
    let dir = tempfile::tempdir().unwrap();
    let store = BrandStore::new(dir.path());
    store.save("Land Rover", &models()).unwrap();
    store.save("audi", &models()[..1]).unwrap();
    fs::create_dir_all(dir.path().join("empty_brand")).unwrap();
    fs::create_dir_all(dir.path().join("broken")).unwrap();
    fs::write(dir.path().join("broken").join("info.json"), "[oops").unwrap();

    let all = store.load_all::<CarModel>();

    let brands: Vec<_> = all.keys().cloned().collect();
    assert_eq!(brands, vec!["Audi", "Land Rover"]);
    assert_eq!(all["Land Rover"].len(), 2);
    assert_eq!(all["Audi"].len(), 1);
}

#[test]
fn missing_base_dir_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = BrandStore::new(dir.path().join("absent"));

    assert!(store.load_all::<CarModel>().is_empty());
    assert!(store.load::<CarModel>("audi").is_empty());
}

#[test]
fn simple_mode_records_load_leniently_as_models() {
    let dir = tempfile::tempdir().unwrap();
    let store = BrandStore::new(dir.path());
    store
        .save("Toyota", &[Car::new("Toyota", "2024 Corolla Cross", "89.9萬", "https://x/cc")])
        .unwrap();

    let loaded: Vec<CarModel> = store.load("toyota");

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].brand, "Toyota");
    assert_eq!(loaded[0].url, "https://x/cc");
    assert!(loaded[0].variants().is_empty());
}

#[test]
fn records_with_mismatched_field_types_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let brand_dir = dir.path().join("audi");
    fs::create_dir_all(&brand_dir).unwrap();
    fs::write(
        brand_dir.join("info.json"),
        r#"[
            {"brand": "Audi", "model_name": "A3", "price_range": 149.9},
            {"brand": "Audi", "model_name": "A4", "year": 2024.0},
            {"brand": "Audi", "model_name": "A5", "variants": [{"trim_name": "40 TFSI", "engine_cc": 1984}]}
        ]"#,
    )
    .unwrap();

    let loaded: Vec<CarModel> = BrandStore::new(dir.path()).load("audi");

    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].price_range, "149.9");
    assert_eq!(loaded[1].year, ModelYear::Label("2024.0".to_string()));
    assert_eq!(loaded[2].variants()[0].engine_cc, "1984");
}
