//! Product Drafts
//!
//! The state of the admin "add product" form before the persistence layer has assigned an
//! identifier.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde_json::{Map, Value};

use crate::{
    products::{
        CONTACT_FOR_PRICE, ProductError, decimal_to_value, format_price, to_stored_precision,
    },
    taxonomy::{self, CategoryKey},
};

const DEFAULT_TOWEL_TYPE: &str = "Bath Towel";

/// An unsaved product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Display name
    pub name: String,

    /// Free text description
    pub description: String,

    /// Short badge
    pub highlight: String,

    /// Explicit image; when empty the product type's image is used
    pub image_url: String,

    category: CategoryKey,
    product_type: String,
    product_subtype: String,
    price: String,
    price_value: Decimal,
    image_emoji: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            highlight: String::new(),
            image_url: taxonomy::default_image_for(DEFAULT_TOWEL_TYPE)
                .unwrap_or_default()
                .to_string(),
            category: CategoryKey::Towels,
            product_type: DEFAULT_TOWEL_TYPE.to_string(),
            product_subtype: String::new(),
            price: CONTACT_FOR_PRICE.to_string(),
            price_value: Decimal::ZERO,
            image_emoji: CategoryKey::Towels.emoji().to_string(),
        }
    }
}

impl ProductDraft {
    /// A blank towel draft, pre-set to the bath towel type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected category.
    pub fn category(&self) -> CategoryKey {
        self.category
    }

    /// Selected product type.
    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// Selected subtype; empty when none.
    pub fn product_subtype(&self) -> &str {
        &self.product_subtype
    }

    /// Numeric price.
    pub fn price_value(&self) -> Decimal {
        self.price_value
    }

    /// Types that may be chosen for the current category.
    pub fn available_types(&self) -> impl Iterator<Item = &'static str> {
        self.category
            .definition()
            .product_types
            .iter()
            .map(|definition| definition.label)
    }

    /// Subtypes that may be chosen for the current type.
    pub fn available_subtypes(&self) -> &'static [&'static str] {
        taxonomy::subtypes_for_type(&self.product_type)
    }

    /// Switch category. Towels start on the bath towel type; other categories start with no
    /// type so the operator picks one.
    pub fn set_category(&mut self, category: CategoryKey) {
        self.category = category;
        category.emoji().clone_into(&mut self.image_emoji);
        self.product_subtype.clear();

        if category == CategoryKey::Towels {
            self.set_product_type(DEFAULT_TOWEL_TYPE);
        } else {
            self.product_type.clear();
        }
    }

    /// Switch product type, clearing the subtype and picking the type's image when it has one.
    pub fn set_product_type(&mut self, product_type: &str) {
        product_type.clone_into(&mut self.product_type);
        self.product_subtype.clear();

        if let Some(image) = taxonomy::default_image_for(product_type) {
            image.clone_into(&mut self.image_url);
        }
    }

    /// Choose a subtype. An empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::UnknownSubtype`] when the subtype is not registered for the
    /// current type.
    pub fn set_subtype(&mut self, subtype: &str) -> Result<(), ProductError> {
        if !subtype.is_empty() && !taxonomy::is_valid_subtype(&self.product_type, subtype) {
            return Err(ProductError::UnknownSubtype {
                product_type: self.product_type.clone(),
                subtype: subtype.to_string(),
            });
        }

        subtype.clone_into(&mut self.product_subtype);

        Ok(())
    }

    /// Set the numeric price and the matching display price.
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

    /// The document body to create, stamped with its creation time.
    pub fn into_fields(self, created_at: i64, currency: &Currency) -> Map<String, Value> {
        let price = if self.price.is_empty() {
            format_price(self.price_value, currency)
        } else {
            self.price
        };

        let image_url = if self.image_url.is_empty() {
            taxonomy::default_image_for(&self.product_type).map(ToString::to_string)
        } else {
            Some(self.image_url)
        };

        let mut fields = Map::new();

        fields.insert("name".into(), Value::from(self.name));
        fields.insert("category".into(), Value::from(self.category.label()));
        fields.insert("categorySlug".into(), Value::from(self.category.slug()));
        fields.insert("productType".into(), Value::from(self.product_type));
        fields.insert("productSubtype".into(), Value::from(self.product_subtype));
        fields.insert("description".into(), Value::from(self.description));
        fields.insert("price".into(), Value::from(price));
        fields.insert("priceValue".into(), decimal_to_value(self.price_value));
        fields.insert("imageEmoji".into(), Value::from(self.image_emoji));
        fields.insert("highlight".into(), Value::from(self.highlight));
        fields.insert("createdAt".into(), Value::from(created_at));

        if let Some(image_url) = image_url {
            fields.insert("imageUrl".into(), Value::from(image_url));
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;
    use crate::normalize::{Normalizer, RawRecord};

    #[test]
    fn new_draft_is_a_bath_towel() {
        let draft = ProductDraft::new();

        assert_eq!(draft.category(), CategoryKey::Towels);
        assert_eq!(draft.product_type(), "Bath Towel");
        assert_eq!(draft.product_subtype(), "");
        assert_eq!(draft.image_url, "/towel/bathtowel/bathtowel (1).jpg");
        assert_eq!(draft.available_subtypes(), ["Thick Terry Cotton"]);
    }

    #[test]
    fn switching_to_cow_dung_clears_type() -> TestResult {
        let mut draft = ProductDraft::new();
        draft.set_subtype("Thick Terry Cotton")?;

        draft.set_category(CategoryKey::CowDung);

        assert_eq!(draft.product_type(), "");
        assert_eq!(draft.product_subtype(), "");
        assert_eq!(
            draft.available_types().collect::<Vec<_>>(),
            ["Fertilizer Use", "Spiritual Use"]
        );

        Ok(())
    }

    #[test]
    fn type_change_clears_subtype() -> TestResult {
        let mut draft = ProductDraft::new();
        draft.set_product_type("Napkin");
        draft.set_subtype("Cotton Napkin")?;

        draft.set_product_type("Bathrobe");

        assert_eq!(draft.product_subtype(), "");
        assert_eq!(draft.image_url, "/towel/bathrobe/bathrobe (1).jpg");

        Ok(())
    }

    #[test]
    fn foreign_subtype_is_rejected() {
        let mut draft = ProductDraft::new();

        assert!(matches!(
            draft.set_subtype("Dhoop Sticks"),
            Err(ProductError::UnknownSubtype { .. })
        ));
        assert_eq!(draft.product_subtype(), "");
    }

    #[test]
    fn fields_normalize_back_to_the_draft() -> TestResult {
        let mut draft = ProductDraft::new();
        draft.name = "Hotel Bath Towel".to_string();
        draft.set_subtype("Thick Terry Cotton")?;
        draft.set_price_value(Decimal::new(250, 0), INR)?;

        let fields = draft.into_fields(1_700_000_000_000, INR);
        let product = Normalizer::default().normalize(&RawRecord::new("new-id", fields));

        assert_eq!(product.name, "Hotel Bath Towel");
        assert_eq!(product.product_subtype, "Thick Terry Cotton");
        assert_eq!(product.price, "₹250.00");
        assert_eq!(product.price_value, Decimal::new(250, 0));
        assert_eq!(product.created_at, 1_700_000_000_000);

        Ok(())
    }

    #[test]
    fn empty_image_resolves_from_type() {
        let mut draft = ProductDraft::new();
        draft.set_category(CategoryKey::CowDung);
        draft.set_product_type("Spiritual Use");
        draft.image_url.clear();

        let fields = draft.into_fields(1, INR);

        assert_eq!(
            fields.get("imageUrl"),
            Some(&Value::from("/hero/dungspritual.avif"))
        );
    }
}
