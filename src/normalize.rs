//! Record Normalisation
//!
//! Persisted product documents are loosely typed: prices arrive as numbers, numeric strings or
//! free-text legacy strings, and optional fields may be missing entirely. Everything read from
//! the persistence layer passes through [`Normalizer::normalize`] before any other code sees
//! it.

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    products::{Product, ProductId, decimal_from_f64, format_price, to_stored_precision},
    taxonomy::{self, CategoryKey},
};

/// Prefix used by legacy display prices.
const LEGACY_CURRENCY_PREFIX: char = '$';

/// A product document as returned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Persistence identifier of the document
    pub id: String,

    /// Document body
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawRecord {
    /// Creates a record from a document identifier and body.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn non_empty_text(&self, key: &str) -> Option<&str> {
        self.text(key).filter(|value| !value.is_empty())
    }
}

impl From<&Product> for RawRecord {
    fn from(product: &Product) -> Self {
        Self::new(product.id.as_str(), product.fields())
    }
}

/// Converts raw records into canonical [`Product`]s.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    currency: &'static Currency,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(iso::INR)
    }
}

impl Normalizer {
    /// Creates a normalizer that displays prices in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self { currency }
    }

    /// Currency used for display prices.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Normalizes one record. Never fails: missing or malformed fields are replaced by
    /// defaults.
    pub fn normalize(&self, record: &RawRecord) -> Product {
        let legacy_price = record.non_empty_text("price");

        let price_value = record
            .fields
            .get("priceValue")
            .and_then(price_from_value)
            .or_else(|| legacy_price.and_then(parse_legacy_price))
            .and_then(to_stored_precision)
            .unwrap_or(Decimal::ZERO);

        let price = legacy_price.map_or_else(
            || format_price(price_value, self.currency),
            |legacy| self.localise_legacy_price(legacy),
        );

        let product_type = record.text("productType").unwrap_or_default().to_string();
        let category_slug = resolve_category(record, &product_type);

        let category = record
            .non_empty_text("category")
            .unwrap_or_else(|| category_slug.label())
            .to_string();

        let image_url = record
            .non_empty_text("imageUrl")
            .or_else(|| taxonomy::default_image_for(&product_type))
            .map(ToString::to_string);

        Product {
            id: ProductId::new(record.id.as_str()),
            name: record.text("name").unwrap_or_default().to_string(),
            category,
            category_slug,
            product_subtype: record
                .text("productSubtype")
                .unwrap_or_default()
                .to_string(),
            product_type,
            description: record.text("description").unwrap_or_default().to_string(),
            price,
            price_value,
            image_emoji: record
                .non_empty_text("imageEmoji")
                .unwrap_or_else(|| category_slug.emoji())
                .to_string(),
            image_url,
            highlight: record.non_empty_text("highlight").map(ToString::to_string),
            created_at: record
                .fields
                .get("createdAt")
                .and_then(timestamp_from_value)
                .unwrap_or_default(),
        }
    }

    /// Normalizes every record of a listing, preserving order.
    pub fn normalize_all<'r>(
        &self,
        records: impl IntoIterator<Item = &'r RawRecord>,
    ) -> Vec<Product> {
        records
            .into_iter()
            .map(|record| self.normalize(record))
            .collect()
    }

    fn localise_legacy_price(&self, legacy: &str) -> String {
        match legacy.strip_prefix(LEGACY_CURRENCY_PREFIX) {
            Some(amount) => format!("{}{amount}", self.currency.symbol),
            None => legacy.to_string(),
        }
    }
}

fn price_from_value(value: &Value) -> Option<Decimal> {
    let price = match value {
        Value::Number(number) => number
            .as_i64()
            .map(Decimal::from)
            .or_else(|| number.as_f64().and_then(decimal_from_f64)),
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        _ => None,
    }?;

    (!price.is_sign_negative() || price.is_zero()).then_some(price)
}

/// Parses the numeric part of a free-text price such as `"$45.00"` or `"₹ 1,200 / dozen"`.
///
/// Every character other than ASCII digits and `.` is discarded, then the longest leading
/// `digits[.digits]` run is read.
pub fn parse_legacy_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut seen_point = false;
    let numeric: String = cleaned
        .chars()
        .take_while(|c| {
            if *c == '.' {
                if seen_point {
                    return false;
                }
                seen_point = true;
            }
            true
        })
        .collect();

    let numeric = numeric.trim_end_matches('.');

    if !numeric.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    if numeric.starts_with('.') {
        Decimal::from_str(&format!("0{numeric}")).ok()
    } else {
        Decimal::from_str(numeric).ok()
    }
}

fn timestamp_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .and_then(|float| i64::from_f64(float.trunc()))
        }),
        _ => None,
    }
}

fn resolve_category(record: &RawRecord, product_type: &str) -> CategoryKey {
    record
        .text("categorySlug")
        .and_then(CategoryKey::from_slug)
        .or_else(|| record.text("category").and_then(CategoryKey::from_label))
        .or_else(|| category_for_type_label(product_type))
        .unwrap_or(CategoryKey::Towels)
}

/// Like [`taxonomy::category_for_type`] but ignoring case, matching
/// [`taxonomy::default_image_for`].
fn category_for_type_label(product_type: &str) -> Option<CategoryKey> {
    let product_type = product_type.trim();

    taxonomy::categories()
        .find(|category| {
            category
                .product_types
                .iter()
                .any(|definition| definition.label.eq_ignore_ascii_case(product_type))
        })
        .map(|category| category.key)
}
