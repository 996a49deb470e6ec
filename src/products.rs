//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::taxonomy::{self, CategoryKey};

/// Display string used when a product has no price.
pub const CONTACT_FOR_PRICE: &str = "Contact for Price";

/// Opaque product identifier assigned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wraps an identifier handed out by the persistence layer.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Errors raised when editing a product against the taxonomy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// The subtype is not registered for the product's current type.
    #[error("subtype {subtype:?} is not registered for product type {product_type:?}")]
    UnknownSubtype {
        /// Product type the subtype was checked against
        product_type: String,
        /// Rejected subtype
        subtype: String,
    },

    /// Price values must be non-negative.
    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),
}

/// What a product card should show as its picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductImage<'p> {
    /// A directly fetchable image URL or path
    Url(&'p str),

    /// A single glyph used when no image resolves
    Emoji(&'p str),
}

/// Canonical catalog product.
///
/// Only [`crate::normalize::Normalizer`] builds these from persisted data, so every field is
/// populated and type-correct.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Persistence identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Category label (cosmetic)
    pub category: String,

    /// Category key (authoritative for filtering)
    pub category_slug: CategoryKey,

    /// Category-scoped product type, empty when unclassified
    pub product_type: String,

    /// Type-scoped subtype, empty when unset
    pub product_subtype: String,

    /// Free text description
    pub description: String,

    /// Display price
    pub price: String,

    /// Numeric price; zero means "contact for price"
    pub price_value: Decimal,

    /// Fallback glyph
    pub image_emoji: String,

    /// Representative image
    pub image_url: Option<String>,

    /// Short badge such as "Best Seller"
    pub highlight: Option<String>,

    /// Creation ordinal used for recency ordering
    pub created_at: i64,
}

impl Product {
    /// The image a product card should render: the image URL, else the emoji glyph.
    pub fn image(&self) -> ProductImage<'_> {
        match self.image_url.as_deref() {
            Some(url) if !url.is_empty() => ProductImage::Url(url),
            _ => ProductImage::Emoji(&self.image_emoji),
        }
    }

    /// Whether the product has a subtype.
    pub fn has_subtype(&self) -> bool {
        !self.product_subtype.is_empty()
    }

    /// Moves the product to another category, clearing its type and subtype.
    pub fn set_category(&mut self, category: CategoryKey) {
        if self.category_slug == category {
            return;
        }

        category.label().clone_into(&mut self.category);
        category.emoji().clone_into(&mut self.image_emoji);
        self.category_slug = category;
        self.product_type.clear();
        self.product_subtype.clear();
    }

    /// Changes the product type.
    ///
    /// The subtype belongs to the old type, so it is always cleared. When the taxonomy has an
    /// image for the new type it replaces the current one.
    pub fn set_product_type(&mut self, product_type: &str) {
        product_type.clone_into(&mut self.product_type);
        self.product_subtype.clear();

        if let Some(image) = taxonomy::default_image_for(product_type) {
            self.image_url = Some(image.to_string());
        }
    }

    /// Sets the subtype. An empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::UnknownSubtype`] when the subtype is not registered for the
    /// current product type.
    pub fn set_product_subtype(&mut self, subtype: &str) -> Result<(), ProductError> {
        if subtype.is_empty() {
            self.product_subtype.clear();

            return Ok(());
        }

        if !taxonomy::is_valid_subtype(&self.product_type, subtype) {
            return Err(ProductError::UnknownSubtype {
                product_type: self.product_type.clone(),
                subtype: subtype.to_string(),
            });
        }

        subtype.clone_into(&mut self.product_subtype);

        Ok(())
    }

    /// Sets the numeric price and re-derives the display price from it.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NegativePrice`] for negative values.
    pub fn set_price_value(
        &mut self,
        value: Decimal,
        currency: &Currency,
    ) -> Result<(), ProductError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ProductError::NegativePrice(value));
        }

        let value = to_stored_precision(value).unwrap_or(value);

        self.price_value = value;
        self.price = format_price(value, currency);

        Ok(())
    }

    /// Loosely typed fields written on save.
    ///
    /// Neither the identifier nor the creation time is included; both are fixed once the
    /// record exists.
    pub fn mutable_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();

        fields.insert("name".into(), Value::from(self.name.as_str()));
        fields.insert("category".into(), Value::from(self.category.as_str()));
        fields.insert("categorySlug".into(), Value::from(self.category_slug.slug()));
        fields.insert("productType".into(), Value::from(self.product_type.as_str()));
        fields.insert(
            "productSubtype".into(),
            Value::from(self.product_subtype.as_str()),
        );
        fields.insert("description".into(), Value::from(self.description.as_str()));
        fields.insert("price".into(), Value::from(self.price.as_str()));
        fields.insert("priceValue".into(), decimal_to_value(self.price_value));
        fields.insert("imageEmoji".into(), Value::from(self.image_emoji.as_str()));
        fields.insert(
            "highlight".into(),
            Value::from(self.highlight.as_deref().unwrap_or_default()),
        );

        fields.insert(
            "imageUrl".into(),
            Value::from(self.image_url.as_deref().unwrap_or_default()),
        );

        fields
    }

    /// Every persisted field, including the creation time.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = self.mutable_fields();

        fields.insert("createdAt".into(), Value::from(self.created_at));

        fields
    }
}

/// Formats a price as the currency symbol followed by two decimal places.
pub fn format_price(value: Decimal, currency: &Currency) -> String {
    format!("{}{:.2}", currency.symbol, value)
}

/// Writes an amount as a JSON number. Whole amounts are written as integers.
pub(crate) fn decimal_to_value(value: Decimal) -> Value {
    value
        .to_i64()
        .filter(|_| value.fract().is_zero())
        .map_or_else(
            || decimal_to_f64(value).map_or(Value::from(0), Value::from),
            Value::from,
        )
}

/// Rounds an amount to the nearest value a JSON number holds, so it reads back unchanged
/// after [`decimal_to_value`].
pub(crate) fn to_stored_precision(value: Decimal) -> Option<Decimal> {
    decimal_to_f64(value).and_then(decimal_from_f64)
}

/// Reads the shortest decimal that round-trips to `float`.
pub(crate) fn decimal_from_f64(float: f64) -> Option<Decimal> {
    if !float.is_finite() {
        return None;
    }

    let value: Decimal = float.to_string().parse().ok()?;

    Some(if value.is_zero() { Decimal::ZERO } else { value })
}

fn decimal_to_f64(value: Decimal) -> Option<f64> {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn bath_towel() -> Product {
        Product {
            id: ProductId::new("abc"),
            name: "Thick Terry Bath Towel".to_string(),
            category: "Towels".to_string(),
            category_slug: CategoryKey::Towels,
            product_type: "Bath Towel".to_string(),
            product_subtype: "Thick Terry Cotton".to_string(),
            description: String::new(),
            price: CONTACT_FOR_PRICE.to_string(),
            price_value: Decimal::ZERO,
            image_emoji: "🛁".to_string(),
            image_url: None,
            highlight: Some("Best Seller".to_string()),
            created_at: 2,
        }
    }

    #[test]
    fn image_falls_back_to_emoji() {
        let mut product = bath_towel();

        assert_eq!(product.image(), ProductImage::Emoji("🛁"));

        product.image_url = Some("/img.jpg".to_string());
        assert_eq!(product.image(), ProductImage::Url("/img.jpg"));

        product.image_url = Some(String::new());
        assert_eq!(product.image(), ProductImage::Emoji("🛁"));
    }

    #[test]
    fn changing_type_clears_subtype_and_picks_image() {
        let mut product = bath_towel();

        product.set_product_type("Beach Towel");

        assert_eq!(product.product_type, "Beach Towel");
        assert!(!product.has_subtype());
        assert_eq!(
            product.image_url.as_deref(),
            Some("/towel/beach towel/beach towel (1).jpg")
        );
    }

    #[test]
    fn changing_to_unmapped_type_keeps_image() {
        let mut product = bath_towel();
        product.image_url = Some("https://cdn.example/custom.jpg".to_string());

        product.set_product_type("Custom");

        assert_eq!(
            product.image_url.as_deref(),
            Some("https://cdn.example/custom.jpg")
        );
    }

    #[test]
    fn subtype_must_belong_to_type() -> TestResult {
        let mut product = bath_towel();

        let result = product.set_product_subtype("Waffle Bathrobe");
        assert_eq!(
            result,
            Err(ProductError::UnknownSubtype {
                product_type: "Bath Towel".to_string(),
                subtype: "Waffle Bathrobe".to_string(),
            })
        );
        assert_eq!(product.product_subtype, "Thick Terry Cotton");

        product.set_product_subtype("")?;
        assert!(!product.has_subtype());

        product.set_product_subtype("Thick Terry Cotton")?;
        assert_eq!(product.product_subtype, "Thick Terry Cotton");

        Ok(())
    }

    #[test]
    fn changing_category_resets_classification() {
        let mut product = bath_towel();

        product.set_category(CategoryKey::CowDung);

        assert_eq!(product.category, "Cow Dung Products");
        assert_eq!(product.image_emoji, "🌿");
        assert!(product.product_type.is_empty());
        assert!(product.product_subtype.is_empty());
    }

    #[test]
    fn price_value_drives_display_price() -> TestResult {
        let mut product = bath_towel();

        product.set_price_value(Decimal::new(4550, 2), INR)?;

        assert_eq!(product.price_value, Decimal::new(4550, 2));
        assert_eq!(product.price, "₹45.50");

        assert_eq!(
            product.set_price_value(Decimal::NEGATIVE_ONE, INR),
            Err(ProductError::NegativePrice(Decimal::NEGATIVE_ONE))
        );

        Ok(())
    }

    #[test]
    fn mutable_fields_exclude_identity_and_creation_time() {
        let fields = bath_towel().mutable_fields();

        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("createdAt"));
        assert_eq!(fields.get("categorySlug"), Some(&Value::from("towels")));
        assert_eq!(fields.get("highlight"), Some(&Value::from("Best Seller")));
    }

    #[test]
    fn cleared_image_is_written_as_empty() {
        let mut product = bath_towel();
        product.image_url = Some("https://cdn.example/old.jpg".to_string());

        product.image_url = None;

        assert_eq!(
            product.mutable_fields().get("imageUrl"),
            Some(&Value::from(""))
        );
    }

    #[test]
    fn whole_prices_are_written_as_integers() -> TestResult {
        let mut product = bath_towel();

        product.set_price_value(Decimal::new(4500, 2), INR)?;
        assert_eq!(product.fields().get("priceValue"), Some(&Value::from(45)));

        product.set_price_value(Decimal::new(1999, 2), INR)?;
        assert_eq!(product.fields().get("priceValue"), Some(&Value::from(19.99)));

        Ok(())
    }

    #[test]
    fn over_precise_prices_are_rounded_to_what_is_stored() -> TestResult {
        let mut product = bath_towel();
        let precise: Decimal = "1.23456789012345678".parse()?;

        product.set_price_value(precise, INR)?;

        let stored = product.fields().get("priceValue").and_then(Value::as_f64);

        assert_ne!(product.price_value, precise);
        assert_eq!(product.price_value.to_string().parse::<f64>().ok(), stored);

        Ok(())
    }

    #[test]
    fn fields_include_creation_time() {
        let fields = bath_towel().fields();

        assert_eq!(fields.get("createdAt"), Some(&Value::from(2)));
    }
}
