//! Admin Catalog
//!
//! The operator's working copy of the product list. Every write goes to the document store
//! first and is mirrored locally only once the store accepts it; a failed write leaves the
//! local list as it was and records a dismissable message.
//!
//! Writes are tracked per record: a second write to a record whose previous write has not
//! finished is refused with [`AdminError::Busy`], while writes to other records proceed.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use catalog::{
    drafts::ProductDraft,
    normalize::{Normalizer, RawRecord},
    products::{Product, ProductId},
};
use jiff::Timestamp;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{AdminPolicy, Identity},
    store::{DocumentStore, ObjectStorage, PRODUCTS, StoreError},
};

const IMAGE_FOLDER: &str = "product-images";

/// Admin operations, named for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    /// Listing products
    Load,
    /// Adding a product
    Create,
    /// Saving edits to a product
    Save,
    /// Deleting a product
    Delete,
    /// Uploading a product image
    Upload,
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AdminAction::Load => "Failed to load products",
            AdminAction::Create => "Failed to create product",
            AdminAction::Save => "Failed to save changes",
            AdminAction::Delete => "Failed to delete product",
            AdminAction::Upload => "Failed to upload image",
        })
    }
}

/// Admin errors.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The current user is not the administrator.
    #[error("you must be signed in as the administrator")]
    NotAuthorized,

    /// A write to the same record is still in flight.
    #[error("{0} is busy")]
    Busy(WriteTarget),

    /// The product is not in the local list.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The store rejected or failed the operation.
    #[error("{action}: {source}")]
    Store {
        /// Operation that failed
        action: AdminAction,
        /// Underlying failure
        #[source]
        source: StoreError,
    },
}

/// The record a write or upload is for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WriteTarget {
    /// The unsaved product in the "add product" form
    NewProduct,

    /// An existing product
    Product(ProductId),
}

impl WriteTarget {
    fn folder(&self) -> &str {
        match self {
            WriteTarget::NewProduct => "new",
            WriteTarget::Product(id) => id.as_str(),
        }
    }
}

impl fmt::Display for WriteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteTarget::NewProduct => f.write_str("new product"),
            WriteTarget::Product(id) => write!(f, "product {id}"),
        }
    }
}

/// The operator's answer to "are you sure you want to delete this product?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Go ahead
    Confirmed,
    /// Keep the product
    Declined,
}

/// Replaces every character other than ASCII letters, digits and `.` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

/// Storage path for an uploaded image.
pub fn image_path(target: &WriteTarget, uploaded_at: Timestamp, file_name: &str) -> String {
    format!(
        "{IMAGE_FOLDER}/{}/{}-{}",
        target.folder(),
        uploaded_at.as_millisecond(),
        sanitize_file_name(file_name)
    )
}

#[derive(Debug, Default)]
struct AdminState {
    products: Vec<Product>,
    error: Option<String>,
    in_flight: FxHashSet<WriteTarget>,
}

struct InFlight<'a> {
    state: &'a Mutex<AdminState>,
    target: WriteTarget,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight.remove(&self.target);
    }
}

fn lock(state: &Mutex<AdminState>) -> MutexGuard<'_, AdminState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Admin view of the catalog for one signed-in user.
pub struct AdminCatalog {
    documents: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStorage>,
    normalizer: Normalizer,
    authorized: bool,
    state: Mutex<AdminState>,
}

impl fmt::Debug for AdminCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCatalog")
            .field("authorized", &self.authorized)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl AdminCatalog {
    /// Create an admin catalog for `identity`. Only the identity `policy` accepts may use it.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStorage>,
        normalizer: Normalizer,
        policy: &AdminPolicy,
        identity: Option<&Identity>,
    ) -> Self {
        Self {
            documents,
            objects,
            normalizer,
            authorized: policy.is_admin(identity),
            state: Mutex::new(AdminState::default()),
        }
    }

    /// Products as last loaded, with local edits that were saved.
    pub fn products(&self) -> Vec<Product> {
        lock(&self.state).products.clone()
    }

    /// The last failure message, if not dismissed.
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    /// Clears the failure message.
    pub fn dismiss_error(&self) {
        lock(&self.state).error = None;
    }

    /// Whether a write for `target` is in flight; its controls should be disabled.
    pub fn is_busy(&self, target: &WriteTarget) -> bool {
        lock(&self.state).in_flight.contains(target)
    }

    /// Fetch the full product list, replacing the local one.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthorized`] for non-admins, or [`AdminError::Store`] when the
    /// listing fails; the local list is then unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, AdminError> {
        self.authorize()?;

        let products = self.fetch().await?;
        let count = products.len();

        let mut state = lock(&self.state);
        state.products = products;
        state.error = None;

        Ok(count)
    }

    /// Add a product, then reload the list so it includes the store-assigned identifier.
    ///
    /// If the reload fails the created record is added to the local list as written.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Busy`] while another create is in flight, or
    /// [`AdminError::Store`] when the write fails; the local list is then unchanged.
    #[tracing::instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: ProductDraft) -> Result<ProductId, AdminError> {
        self.authorize()?;

        let _in_flight = self.begin(WriteTarget::NewProduct)?;

        self.clear_error();

        let created_at = Timestamp::now().as_millisecond();
        let fields = draft.into_fields(created_at, self.normalizer.currency());

        let id = self
            .documents
            .create(PRODUCTS, fields.clone())
            .await
            .map_err(|source| self.fail(AdminAction::Create, source))?;

        info!(%id, "created product");

        match self.documents.list_all(PRODUCTS).await {
            Ok(records) => {
                lock(&self.state).products = self.normalizer.normalize_all(&records);
            }
            Err(error) => {
                warn!(%error, %id, "reload after create failed, keeping written record");

                let created = self.normalizer.normalize(&RawRecord::new(id.as_str(), fields));

                lock(&self.state).products.push(created);
            }
        }

        Ok(ProductId::new(id))
    }

    /// Overwrite the stored product's mutable fields with `product`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for products not in the local list,
    /// [`AdminError::Busy`] while the record has a write in flight, or [`AdminError::Store`]
    /// when the write fails; the local record is then unchanged.
    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    pub async fn save(&self, product: &Product) -> Result<(), AdminError> {
        self.authorize()?;

        if !self.contains(&product.id) {
            return Err(AdminError::NotFound(product.id.clone()));
        }

        let _in_flight = self.begin(WriteTarget::Product(product.id.clone()))?;

        self.clear_error();

        self.documents
            .update(PRODUCTS, product.id.as_str(), product.mutable_fields())
            .await
            .map_err(|source| self.fail(AdminAction::Save, source))?;

        let mut state = lock(&self.state);

        if let Some(local) = state.products.iter_mut().find(|local| local.id == product.id) {
            *local = Product {
                created_at: local.created_at,
                ..product.clone()
            };
        }

        Ok(())
    }

    /// Permanently delete a product. Nothing happens unless the operator confirmed.
    ///
    /// Returns whether the product was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Busy`] while the record has a write in flight, or
    /// [`AdminError::Store`] when the delete fails; the local list is then unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn delete(
        &self,
        id: &ProductId,
        confirmation: Confirmation,
    ) -> Result<bool, AdminError> {
        self.authorize()?;

        if confirmation == Confirmation::Declined {
            return Ok(false);
        }

        let _in_flight = self.begin(WriteTarget::Product(id.clone()))?;

        self.clear_error();

        self.documents
            .delete(PRODUCTS, id.as_str())
            .await
            .map_err(|source| self.fail(AdminAction::Delete, source))?;

        info!(%id, "deleted product");

        lock(&self.state).products.retain(|product| product.id != *id);

        Ok(true)
    }

    /// Upload an image for `target` and return its public URL.
    ///
    /// For an existing product the local record's image is replaced; it is persisted by the
    /// next [`AdminCatalog::save`]. For the new product form the caller sets the draft's image.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Busy`] while the target has a write in flight, or
    /// [`AdminError::Store`] when the upload fails; the image is then unchanged.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        target: WriteTarget,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AdminError> {
        self.authorize()?;

        let _in_flight = self.begin(target.clone())?;

        self.clear_error();

        let path = image_path(&target, Timestamp::now(), file_name);

        let url = self
            .objects
            .upload(&path, bytes, content_type)
            .await
            .map_err(|source| self.fail(AdminAction::Upload, source))?;

        if let WriteTarget::Product(id) = target {
            let mut state = lock(&self.state);

            if let Some(product) = state.products.iter_mut().find(|product| product.id == id) {
                product.image_url = Some(url.clone());
            }
        }

        Ok(url)
    }

    fn authorize(&self) -> Result<(), AdminError> {
        if self.authorized {
            Ok(())
        } else {
            Err(AdminError::NotAuthorized)
        }
    }

    fn contains(&self, id: &ProductId) -> bool {
        lock(&self.state)
            .products
            .iter()
            .any(|product| product.id == *id)
    }

    fn begin(&self, target: WriteTarget) -> Result<InFlight<'_>, AdminError> {
        let mut state = lock(&self.state);

        if !state.in_flight.insert(target.clone()) {
            return Err(AdminError::Busy(target));
        }

        Ok(InFlight {
            state: &self.state,
            target,
        })
    }

    async fn fetch(&self) -> Result<Vec<Product>, AdminError> {
        let records = self
            .documents
            .list_all(PRODUCTS)
            .await
            .map_err(|source| self.fail(AdminAction::Load, source))?;

        Ok(self.normalizer.normalize_all(&records))
    }

    fn clear_error(&self) {
        lock(&self.state).error = None;
    }

    fn fail(&self, action: AdminAction, source: StoreError) -> AdminError {
        let error = AdminError::Store { action, source };

        warn!(%error, "admin operation failed");

        lock(&self.state).error = Some(error.to_string());

        error
    }
}

#[cfg(test)]
mod tests {
    use catalog::taxonomy::CategoryKey;
    use serde_json::Value;
    use testresult::TestResult;

    use super::*;
    use crate::{
        store::{MockDocumentStore, MockObjectStorage},
        test::helpers::record,
    };

    const ADMIN: &str = "admin@123.com";

    fn listing() -> Vec<catalog::normalize::RawRecord> {
        vec![
            record("a", "Hotel Towel", "Bath Towel", 10),
            record("b", "Dhoop", "Spiritual Use", 20),
        ]
    }

    fn admin(documents: MockDocumentStore, objects: MockObjectStorage) -> AdminCatalog {
        AdminCatalog::new(
            Arc::new(documents),
            Arc::new(objects),
            Normalizer::default(),
            &AdminPolicy::new(ADMIN),
            Some(&Identity::new("admin-uid", ADMIN)),
        )
    }

    fn loaded_documents() -> MockDocumentStore {
        let mut documents = MockDocumentStore::new();

        documents
            .expect_list_all()
            .once()
            .return_once(|_| Ok(listing()));

        documents
    }

    #[tokio::test]
    async fn non_admins_cannot_load() {
        let mut documents = MockDocumentStore::new();
        documents.expect_list_all().never();

        let catalog = AdminCatalog::new(
            Arc::new(documents),
            Arc::new(MockObjectStorage::new()),
            Normalizer::default(),
            &AdminPolicy::new(ADMIN),
            Some(&Identity::new("u2", "buyer@example.com")),
        );

        assert!(matches!(catalog.load().await, Err(AdminError::NotAuthorized)));
    }

    #[tokio::test]
    async fn load_failure_records_message() {
        let mut documents = MockDocumentStore::new();

        documents
            .expect_list_all()
            .once()
            .return_once(|_| Err(StoreError::UnexpectedResponse("permission denied".to_string())));

        let catalog = admin(documents, MockObjectStorage::new());

        assert!(catalog.load().await.is_err());
        assert!(
            catalog
                .error()
                .is_some_and(|message| message.starts_with("Failed to load products"))
        );
        assert!(catalog.products().is_empty());

        catalog.dismiss_error();

        assert_eq!(catalog.error(), None);
    }

    #[tokio::test]
    async fn save_writes_mutable_fields_and_updates_local_copy() -> TestResult {
        let mut documents = loaded_documents();

        documents
            .expect_update()
            .once()
            .withf(|collection, id, fields| {
                collection == PRODUCTS
                    && id == "a"
                    && fields.get("name") == Some(&Value::from("Spa Towel"))
                    && !fields.contains_key("createdAt")
                    && !fields.contains_key("id")
            })
            .return_once(|_, _, _| Ok(()));

        let catalog = admin(documents, MockObjectStorage::new());
        catalog.load().await?;

        let mut edited = catalog
            .products()
            .into_iter()
            .find(|product| product.id.as_str() == "a")
            .ok_or("missing product a")?;

        edited.name = "Spa Towel".to_string();
        edited.created_at = 999;

        catalog.save(&edited).await?;

        let saved = catalog
            .products()
            .into_iter()
            .find(|product| product.id.as_str() == "a")
            .ok_or("missing product a")?;

        assert_eq!(saved.name, "Spa Towel");
        assert_eq!(saved.created_at, 10);
        assert!(!catalog.is_busy(&WriteTarget::Product(ProductId::new("a"))));

        Ok(())
    }

    #[tokio::test]
    async fn failed_save_leaves_local_copy() -> TestResult {
        let mut documents = loaded_documents();

        documents
            .expect_update()
            .once()
            .return_once(|_, _, _| Err(StoreError::UnexpectedResponse("offline".to_string())));

        let catalog = admin(documents, MockObjectStorage::new());
        catalog.load().await?;

        let mut edited = catalog.products().into_iter().next().ok_or("empty")?;
        let original = edited.clone();
        edited.set_category(CategoryKey::CowDung);

        let result = catalog.save(&edited).await;

        assert!(matches!(
            result,
            Err(AdminError::Store {
                action: AdminAction::Save,
                ..
            })
        ));
        assert_eq!(catalog.products().first(), Some(&original));
        assert!(
            catalog
                .error()
                .is_some_and(|message| message.starts_with("Failed to save changes"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn record_with_write_in_flight_is_busy() -> TestResult {
        let mut documents = loaded_documents();

        documents
            .expect_update()
            .once()
            .withf(|_, id, _| id == "b")
            .return_once(|_, _, _| Ok(()));

        let catalog = admin(documents, MockObjectStorage::new());
        catalog.load().await?;

        let products = catalog.products();
        let first = products.first().ok_or("empty")?;
        let second = products.get(1).ok_or("missing second")?;

        let held = catalog.begin(WriteTarget::Product(first.id.clone()))?;

        assert!(matches!(catalog.save(first).await, Err(AdminError::Busy(_))));

        catalog.save(second).await?;

        drop(held);

        assert!(!catalog.is_busy(&WriteTarget::Product(first.id.clone())));

        Ok(())
    }

    #[tokio::test]
    async fn declined_delete_does_nothing() -> TestResult {
        let mut documents = loaded_documents();
        documents.expect_delete().never();

        let catalog = admin(documents, MockObjectStorage::new());
        catalog.load().await?;

        let deleted = catalog
            .delete(&ProductId::new("a"), Confirmation::Declined)
            .await?;

        assert!(!deleted);
        assert_eq!(catalog.products().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn confirmed_delete_removes_locally_after_store() -> TestResult {
        let mut documents = loaded_documents();

        documents
            .expect_delete()
            .once()
            .withf(|collection, id| collection == PRODUCTS && id == "a")
            .return_once(|_, _| Ok(()));

        let catalog = admin(documents, MockObjectStorage::new());
        catalog.load().await?;

        assert!(
            catalog
                .delete(&ProductId::new("a"), Confirmation::Confirmed)
                .await?
        );

        let ids: Vec<String> = catalog
            .products()
            .iter()
            .map(|product| product.id.to_string())
            .collect();

        assert_eq!(ids, ["b"]);

        Ok(())
    }

    #[tokio::test]
    async fn create_stamps_time_and_reloads() -> TestResult {
        let mut documents = MockDocumentStore::new();

        documents
            .expect_create()
            .once()
            .withf(|collection, fields| {
                collection == PRODUCTS
                    && fields.get("createdAt").and_then(Value::as_i64).is_some_and(|ms| ms > 0)
                    && fields.get("categorySlug") == Some(&Value::from("towels"))
            })
            .return_once(|_, _| Ok("c".to_string()));

        documents.expect_list_all().once().return_once(|_| {
            let mut records = listing();
            records.push(record("c", "New Towel", "Bath Towel", 30));
            Ok(records)
        });

        let catalog = admin(documents, MockObjectStorage::new());

        let mut draft = ProductDraft::new();
        draft.name = "New Towel".to_string();

        let id = catalog.create(draft).await?;

        assert_eq!(id, ProductId::new("c"));
        assert_eq!(catalog.products().len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn created_record_is_kept_when_reload_fails() -> TestResult {
        let mut documents = MockDocumentStore::new();

        documents
            .expect_create()
            .once()
            .return_once(|_, _| Ok("c".to_string()));

        documents
            .expect_list_all()
            .once()
            .return_once(|_| Err(StoreError::UnexpectedResponse("503".to_string())));

        let catalog = admin(documents, MockObjectStorage::new());

        let mut draft = ProductDraft::new();
        draft.name = "New Towel".to_string();

        let id = catalog.create(draft).await?;
        let products = catalog.products();
        let created = products
            .iter()
            .find(|product| product.id == id)
            .ok_or("created product missing")?;

        assert_eq!(id, ProductId::new("c"));
        assert_eq!(created.name, "New Towel");
        assert!(created.created_at > 0);
        assert_eq!(catalog.error(), None);
        assert!(!catalog.is_busy(&WriteTarget::NewProduct));

        Ok(())
    }

    #[tokio::test]
    async fn upload_sets_local_image_on_success() -> TestResult {
        let mut objects = MockObjectStorage::new();

        objects
            .expect_upload()
            .once()
            .withf(|path, bytes, content_type| {
                path.starts_with("product-images/a/")
                    && path.ends_with("-my_photo__1_.jpg")
                    && bytes.len() == 3
                    && content_type == "image/jpeg"
            })
            .return_once(|_, _, _| Ok("https://cdn.example.com/a.jpg".to_string()));

        let catalog = admin(loaded_documents(), objects);
        catalog.load().await?;

        let url = catalog
            .upload_image(
                WriteTarget::Product(ProductId::new("a")),
                "my photo (1).jpg",
                vec![1, 2, 3],
                "image/jpeg",
            )
            .await?;

        assert_eq!(url, "https://cdn.example.com/a.jpg");
        assert_eq!(
            catalog.products().first().and_then(|product| product.image_url.clone()),
            Some(url)
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_upload_keeps_image() -> TestResult {
        let mut objects = MockObjectStorage::new();

        objects
            .expect_upload()
            .once()
            .return_once(|_, _, _| Err(StoreError::UnexpectedResponse("denied".to_string())));

        let catalog = admin(loaded_documents(), objects);
        catalog.load().await?;

        let before = catalog.products();

        let result = catalog
            .upload_image(
                WriteTarget::Product(ProductId::new("a")),
                "photo.png",
                Vec::new(),
                "image/png",
            )
            .await;

        assert!(result.is_err());
        assert_eq!(catalog.products(), before);
        assert!(
            catalog
                .error()
                .is_some_and(|message| message.starts_with("Failed to upload image"))
        );

        Ok(())
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("my photo (1).JPG"), "my_photo__1_.JPG");
        assert_eq!(sanitize_file_name("tôwel.png"), "t_wel.png");
    }

    #[test]
    fn new_product_images_go_to_new_folder() {
        let path = image_path(
            &WriteTarget::NewProduct,
            Timestamp::from_millisecond(1_700_000_000_000).unwrap_or(Timestamp::UNIX_EPOCH),
            "a.png",
        );

        assert_eq!(path, "product-images/new/1700000000000-a.png");
    }
}
