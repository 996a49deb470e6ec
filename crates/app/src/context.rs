//! App Context

use std::sync::Arc;

use catalog::normalize::Normalizer;
use thiserror::Error;

use crate::{
    admin::AdminCatalog,
    auth::{AdminPolicy, Identity},
    config::StoreConfig,
    profiles::ProfilesService,
    store::{DocumentStore, HttpDocumentStore, HttpObjectStorage, ObjectStorage},
    storefront::StorefrontService,
};

/// Errors building the application context.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No document store URL was configured.
    #[error("no store configured; set STORE_URL or pass --store-url")]
    MissingStoreUrl,
}

/// Shared collaborators for the services.
#[derive(Clone)]
pub struct AppContext {
    /// Document store
    pub documents: Arc<dyn DocumentStore>,

    /// Image storage
    pub objects: Arc<dyn ObjectStorage>,

    /// Who may administer the catalog
    pub policy: AdminPolicy,

    /// Record normalizer
    pub normalizer: Normalizer,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("policy", &self.policy)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build an application context backed by the hosted store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingStoreUrl`] when no store URL is configured.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let documents = config.documents().ok_or(ConfigError::MissingStoreUrl)?;
        let objects = config.objects().ok_or(ConfigError::MissingStoreUrl)?;

        Ok(Self {
            documents: Arc::new(HttpDocumentStore::new(documents)),
            objects: Arc::new(HttpObjectStorage::new(objects)),
            policy: AdminPolicy::new(config.admin_email.clone()),
            normalizer: Normalizer::default(),
        })
    }

    /// Storefront listing service.
    pub fn storefront(&self) -> StorefrontService {
        StorefrontService::new(Arc::clone(&self.documents), self.normalizer)
    }

    /// Admin catalog for `identity`.
    pub fn admin(&self, identity: Option<&Identity>) -> AdminCatalog {
        AdminCatalog::new(
            Arc::clone(&self.documents),
            Arc::clone(&self.objects),
            self.normalizer,
            &self.policy,
            identity,
        )
    }

    /// Profile service.
    pub fn profiles(&self) -> ProfilesService {
        ProfilesService::new(Arc::clone(&self.documents))
    }
}
