//! Catalog prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    drafts::ProductDraft,
    enquiry::{ContactDetails, EmailClient, EnquiryError, GeneralEnquiry, ProductEnquiry},
    fixtures::{Fixture, FixtureError, demo_catalog},
    listing::write_table,
    normalize::{Normalizer, RawRecord, parse_legacy_price},
    products::{CONTACT_FOR_PRICE, Product, ProductError, ProductId, ProductImage, format_price},
    query::{CatalogQuery, CategoryFilter, SortBy, TypeFilter, query},
    specifications::{Specification, specifications_for},
    taxonomy::{
        CategoryDefinition, CategoryKey, TypeDefinition, UnknownCategory, categories,
        category_for_type, default_image_for, subtypes_for_type, types_for_category,
    },
};
