//! Fixtures
//!
//! Catalogs of raw product records kept as YAML, used for the demonstration catalog and in
//! tests.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    normalize::{Normalizer, RawRecord},
    products::{Product, ProductId},
};

const DEMO_CATALOG: &str = include_str!("../fixtures/catalogs/demo.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two records share an identifier
    #[error("Duplicate product id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<RawRecord>,
}

/// A normalized catalog loaded from YAML.
#[derive(Debug, Clone)]
pub struct Fixture {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Fixture {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or repeats an identifier.
    pub fn from_path(path: impl AsRef<Path>, normalizer: &Normalizer) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents, normalizer)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a catalog or repeats an identifier.
    pub fn from_yaml(contents: &str, normalizer: &Normalizer) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;
        let products = normalizer.normalize_all(&fixture.products);

        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(FixtureError::DuplicateId(product.id.to_string()));
            }
        }

        Ok(Self { products, index })
    }

    /// Products in file order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by identifier.
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|position| self.products.get(*position))
    }

    /// Take ownership of the products.
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}

/// The compiled-in demonstration catalog, shown when the real catalog is empty or unreachable.
///
/// # Errors
///
/// Returns an error only if the bundled catalog is malformed.
pub fn demo_catalog(normalizer: &Normalizer) -> Result<Fixture, FixtureError> {
    Fixture::from_yaml(DEMO_CATALOG, normalizer)
}
