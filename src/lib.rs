//! Catalog
//!
//! Catalog is the product catalog engine behind a small import-export storefront: a static
//! taxonomy of categories, product types and subtypes, a normalizer that turns loosely typed
//! stored documents into canonical products, and the query engine that filters, searches and
//! sorts them for display.

pub mod drafts;
pub mod enquiry;
pub mod fixtures;
pub mod listing;
pub mod normalize;
pub mod prelude;
pub mod products;
pub mod query;
pub mod specifications;
pub mod taxonomy;
