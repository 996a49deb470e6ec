//! Storefront
//!
//! The public product listing. The listing is fetched once per page load; when the store is
//! empty or unreachable the bundled demonstration catalog is shown instead so the page is
//! never blank.

use std::sync::Arc;

use catalog::{
    fixtures::{FixtureError, demo_catalog},
    normalize::Normalizer,
    products::{Product, ProductId},
    query::{CatalogQuery, query},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{DocumentStore, PRODUCTS};

/// Storefront errors.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The bundled demonstration catalog could not be loaded.
    #[error("demo catalog unavailable")]
    Demo(#[from] FixtureError),
}

/// Why the demonstration catalog is being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoReason {
    /// The store returned no products
    Empty,

    /// The store could not be reached; holds the error message
    Unavailable(String),
}

/// Where the listed products came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The document store
    Store,

    /// The bundled demonstration catalog
    Demo {
        /// Why the store listing was not used
        reason: DemoReason,
    },
}

/// Products available to the storefront.
#[derive(Debug, Clone)]
pub struct StorefrontCatalog {
    products: Vec<Product>,
    source: CatalogSource,
}

impl StorefrontCatalog {
    /// Every product, in store order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Where the products came from.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Look up a product for the detail view.
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == *id)
    }

    /// Filter and order the listing.
    pub fn query(&self, criteria: &CatalogQuery) -> Vec<&Product> {
        query(&self.products, criteria)
    }
}

/// Loads the storefront listing.
#[derive(Clone)]
pub struct StorefrontService {
    documents: Arc<dyn DocumentStore>,
    normalizer: Normalizer,
}

impl std::fmt::Debug for StorefrontService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontService")
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

impl StorefrontService {
    /// Create a service reading from `documents`.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, normalizer: Normalizer) -> Self {
        Self {
            documents,
            normalizer,
        }
    }

    /// Fetch and normalize the listing, falling back to the demonstration catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only if the fallback is needed and the bundled catalog is malformed.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<StorefrontCatalog, StorefrontError> {
        let reason = match self.documents.list_all(PRODUCTS).await {
            Ok(records) if !records.is_empty() => {
                info!(count = records.len(), "loaded storefront catalog");

                return Ok(StorefrontCatalog {
                    products: self.normalizer.normalize_all(&records),
                    source: CatalogSource::Store,
                });
            }
            Ok(_) => DemoReason::Empty,
            Err(error) => DemoReason::Unavailable(error.to_string()),
        };

        warn!(?reason, "showing demo catalog");

        Ok(StorefrontCatalog {
            products: demo_catalog(&self.normalizer)?.into_products(),
            source: CatalogSource::Demo { reason },
        })
    }
}

#[cfg(test)]
mod tests {
    use catalog::{query::SortBy, taxonomy::CategoryKey};
    use testresult::TestResult;

    use super::*;
    use crate::{
        store::{MockDocumentStore, StoreError},
        test::helpers::record,
    };

    fn service(documents: MockDocumentStore) -> StorefrontService {
        StorefrontService::new(Arc::new(documents), Normalizer::default())
    }

    #[tokio::test]
    async fn store_products_are_normalized() -> TestResult {
        let mut documents = MockDocumentStore::new();

        documents
            .expect_list_all()
            .once()
            .withf(|collection| collection == PRODUCTS)
            .return_once(|_| {
                Ok(vec![
                    record("a", "Hotel Towel", "Bath Towel", 10),
                    record("b", "Dhoop", "Spiritual Use", 20),
                ])
            });

        let catalog = service(documents).load().await?;

        assert_eq!(catalog.source(), &CatalogSource::Store);
        assert_eq!(catalog.products().len(), 2);

        let newest = catalog.query(&CatalogQuery::new());

        assert_eq!(newest.first().map(|product| product.name.as_str()), Some("Dhoop"));
        assert_eq!(
            newest.first().map(|product| product.category_slug),
            Some(CategoryKey::CowDung)
        );

        Ok(())
    }

    #[tokio::test]
    async fn empty_store_shows_demo_catalog() -> TestResult {
        let mut documents = MockDocumentStore::new();

        documents
            .expect_list_all()
            .once()
            .return_once(|_| Ok(Vec::new()));

        let catalog = service(documents).load().await?;

        assert_eq!(
            catalog.source(),
            &CatalogSource::Demo {
                reason: DemoReason::Empty
            }
        );
        assert_eq!(catalog.products().len(), 9);

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_store_shows_demo_catalog() -> TestResult {
        let mut documents = MockDocumentStore::new();

        documents
            .expect_list_all()
            .once()
            .return_once(|_| Err(StoreError::UnexpectedResponse("503".to_string())));

        let catalog = service(documents).load().await?;

        assert!(matches!(
            catalog.source(),
            CatalogSource::Demo {
                reason: DemoReason::Unavailable(message)
            } if message.contains("503")
        ));

        let by_name = catalog.query(&CatalogQuery::new().sorted_by(SortBy::Name));

        assert_eq!(
            by_name.first().map(|product| product.name.as_str()),
            Some("Cotton Napkins")
        );

        Ok(())
    }

    #[tokio::test]
    async fn detail_lookup_by_id() -> TestResult {
        let mut documents = MockDocumentStore::new();

        documents
            .expect_list_all()
            .return_once(|_| Ok(vec![record("a", "Hotel Towel", "Bath Towel", 10)]));

        let catalog = service(documents).load().await?;

        assert!(catalog.product(&ProductId::new("a")).is_some());
        assert!(catalog.product(&ProductId::new("z")).is_none());

        Ok(())
    }
}
