//! Raw document builders.

use catalog::normalize::RawRecord;
use serde_json::{Map, Value, json};

/// A product document with only a name, type and creation time; everything else is left for
/// the normalizer to fill in.
pub fn record(id: &str, name: &str, product_type: &str, created_at: i64) -> RawRecord {
    let mut fields = Map::new();

    fields.insert("name".into(), Value::from(name));
    fields.insert("productType".into(), Value::from(product_type));
    fields.insert("createdAt".into(), json!(created_at));

    RawRecord::new(id, fields)
}
