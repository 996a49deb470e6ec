//! Integration tests loading catalogs from YAML files on disk.

use std::fs;

use rust_decimal::Decimal;
use rusty_money::iso;
use testresult::TestResult;

use catalog::prelude::*;

const LEGACY_CATALOG: &str = r#"
products:
  - id: legacy-1
    name: Hotel Bath Towel
    category: Towels
    productType: Bath Towel
    price: "$45.00"
  - id: legacy-2
    name: Dhoop Sticks
    productType: Spiritual Use
    productSubtype: Dhoop Sticks
    priceValue: "120"
    createdAt: 1700000000000
"#;

#[test]
fn legacy_documents_are_normalized_on_load() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("legacy.yml");
    fs::write(&path, LEGACY_CATALOG)?;

    let fixture = Fixture::from_path(&path, &Normalizer::default())?;

    let towel = fixture
        .product(&ProductId::new("legacy-1"))
        .ok_or("missing legacy-1")?;

    assert_eq!(towel.price, "₹45.00");
    assert_eq!(towel.price_value, Decimal::new(45, 0));
    assert_eq!(towel.category_slug, CategoryKey::Towels);
    assert_eq!(towel.created_at, 0);

    let dhoop = fixture
        .product(&ProductId::new("legacy-2"))
        .ok_or("missing legacy-2")?;

    assert_eq!(dhoop.category_slug, CategoryKey::CowDung);
    assert_eq!(dhoop.category, "Cow Dung Products");
    assert_eq!(dhoop.price, "₹120.00");
    assert_eq!(dhoop.image_url.as_deref(), Some("/hero/dungspritual.avif"));

    Ok(())
}

#[test]
fn normalizer_currency_is_used_for_display_prices() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("legacy.yml");
    fs::write(&path, LEGACY_CATALOG)?;

    let fixture = Fixture::from_path(&path, &Normalizer::new(iso::USD))?;
    let dhoop = fixture
        .product(&ProductId::new("legacy-2"))
        .ok_or("missing legacy-2")?;

    assert_eq!(dhoop.price, "$120.00");

    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;

    let result = Fixture::from_path(dir.path().join("absent.yml"), &Normalizer::default());

    assert!(matches!(result, Err(FixtureError::Io(_))));

    Ok(())
}
