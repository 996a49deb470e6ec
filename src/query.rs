//! Catalog Query
//!
//! Filters and orders a product listing for the storefront. Stages run in a fixed order, each
//! narrowing the set the next one sees:
//!
//! 1. category slug
//! 2. towel product type (only while browsing towels)
//! 3. selected type, matched against the subtype when the product has one, else its type
//! 4. case-insensitive name search
//! 5. stable sort

use std::{cmp::Ordering, convert::Infallible, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    products::Product,
    taxonomy::{self, CategoryKey},
};

const ALL: &str = "all";

/// Category stage of a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,

    /// Only products whose category slug equals this one
    Slug(String),
}

impl CategoryFilter {
    fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Slug(slug) => product.category_slug.slug() == slug,
        }
    }

    /// Whether this filter selects exactly `category`.
    pub fn is(&self, category: CategoryKey) -> bool {
        matches!(self, CategoryFilter::Slug(slug) if slug == category.slug())
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Slug(s.to_string())
        })
    }
}

impl From<CategoryKey> for CategoryFilter {
    fn from(category: CategoryKey) -> Self {
        CategoryFilter::Slug(category.slug().to_string())
    }
}

/// Type stage of a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// No type restriction
    #[default]
    All,

    /// A subtype or type label
    Named(String),
}

impl TypeFilter {
    /// Products with a subtype are matched on the subtype alone; products without one are
    /// matched on their type. A product carrying both is therefore *not* found by its type.
    fn matches(&self, product: &Product) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Named(name) if product.has_subtype() => product.product_subtype == *name,
            TypeFilter::Named(name) => product.product_type == *name,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL {
            TypeFilter::All
        } else {
            TypeFilter::Named(s.to_string())
        })
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Most recently created first
    #[default]
    Newest,

    /// Name, ascending
    Name,

    /// Cheapest first
    PriceLow,

    /// Most expensive first
    PriceHigh,
}

impl SortBy {
    /// Wire name of the ordering.
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Name => "name",
            SortBy::PriceLow => "price-low",
            SortBy::PriceHigh => "price-high",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortBy::Newest => b.created_at.cmp(&a.created_at),
            SortBy::Name => compare_names(&a.name, &b.name),
            SortBy::PriceLow => a.price_value.cmp(&b.price_value),
            SortBy::PriceHigh => b.price_value.cmp(&a.price_value),
        }
    }
}

impl FromStr for SortBy {
    type Err = Infallible;

    /// Unrecognised names fall back to [`SortBy::Newest`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "name" => SortBy::Name,
            "price-low" => SortBy::PriceLow,
            "price-high" => SortBy::PriceHigh,
            _ => SortBy::Newest,
        })
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter and sort criteria for the storefront listing.
///
/// The default value is the storefront's reset state: every category, no type restrictions,
/// no search, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    /// Category stage
    pub category: CategoryFilter,

    /// Towel product type; ignored unless the category stage selects towels
    pub product_type: Option<String>,

    /// Subtype/type stage
    pub selected_type: TypeFilter,

    /// Name search
    pub search: String,

    /// Ordering
    pub sort_by: SortBy,
}

impl CatalogQuery {
    /// A query matching everything, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    /// Restrict towels to one product type. Empty strings clear the restriction.
    #[must_use]
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        let product_type = product_type.into();
        self.product_type = (!product_type.is_empty()).then_some(product_type);
        self
    }

    /// Restrict to a subtype or type label.
    #[must_use]
    pub fn with_selected_type(mut self, selected_type: TypeFilter) -> Self {
        self.selected_type = selected_type;
        self
    }

    /// Search product names.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Choose the ordering.
    #[must_use]
    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Return to the default query.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Options to offer for [`CatalogQuery::selected_type`] given the current category and
    /// towel type.
    pub fn selectable_types(&self) -> SmallVec<[&'static str; 8]> {
        if self.category.is(CategoryKey::Towels) {
            return self
                .product_type
                .as_deref()
                .map(|product_type| {
                    taxonomy::subtypes_for_type(product_type)
                        .iter()
                        .copied()
                        .collect()
                })
                .unwrap_or_default();
        }

        if self.category.is(CategoryKey::CowDung) {
            return taxonomy::types_for_category(CategoryKey::CowDung.slug());
        }

        SmallVec::new()
    }

    /// Runs the query. See [`query`].
    pub fn apply<'p>(&self, products: &'p [Product]) -> Vec<&'p Product> {
        query(products, self)
    }
}

/// Selects and orders the products matching `criteria`.
///
/// The input is never modified and every returned reference points into it. Products that
/// compare equal under the chosen ordering keep their input order.
pub fn query<'p>(products: &'p [Product], criteria: &CatalogQuery) -> Vec<&'p Product> {
    let towel_type = criteria
        .product_type
        .as_deref()
        .filter(|product_type| {
            !product_type.is_empty() && criteria.category.is(CategoryKey::Towels)
        });

    let search = criteria.search.trim().to_lowercase();

    let mut matched: Vec<&Product> = products
        .iter()
        .filter(|product| criteria.category.matches(product))
        .filter(|product| towel_type.is_none_or(|wanted| product.product_type == wanted))
        .filter(|product| criteria.selected_type.matches(product))
        .filter(|product| search.is_empty() || product.name.to_lowercase().contains(&search))
        .collect();

    matched.sort_by(|a, b| criteria.sort_by.compare(a, b));

    matched
}
