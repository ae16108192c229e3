//! # Tolerant Collection Decoding
//!
//! Entity collections are decoded element by element. A record that
//! cannot be read (unknown `category` or `businessModel` tag, missing
//! fields) is fatal for that single record only: it is skipped with a
//! warning and the rest of the collection loads. A payload that is not a
//! JSON array at all is a [`StoreError::MalformedPayload`].
//!
//! Remote payloads occasionally wrap records in a nested array; one
//! level of nesting is flattened before decoding.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Decodes a JSON text into a collection of `T`, skipping unreadable
/// records. `context` names the payload source for errors and logs.
pub fn decode_collection_str<T: DeserializeOwned>(
    text: &str,
    context: &str,
) -> StoreResult<Vec<T>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| StoreError::malformed(context, e.to_string()))?;
    decode_collection(value, context)
}

/// Decodes an already-parsed JSON value into a collection of `T`,
/// skipping unreadable records.
pub fn decode_collection<T: DeserializeOwned>(value: Value, context: &str) -> StoreResult<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(StoreError::malformed(context, "payload is not a JSON array"));
    };

    // Flatten one level of nested arrays.
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => records.extend(inner),
            other => records.push(other),
        }
    }

    let mut entities = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<T>(record) {
            Ok(entity) => entities.push(entity),
            Err(err) => {
                warn!(context, index, error = %err, "skipping unreadable record");
            }
        }
    }
    Ok(entities)
}

/// Encodes a collection as pretty-printed JSON, the local document
/// format.
pub fn encode_collection<T: serde::Serialize>(entities: &[T], context: &str) -> StoreResult<String> {
    serde_json::to_string_pretty(entities).map_err(|e| StoreError::Serialize {
        context: context.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mercat_core::{Product, Shop};

    #[test]
    fn test_unknown_category_skips_only_that_record() {
        let text = r#"[
            {"name": "Bread", "brand": "El Molí", "mrp": 2.0, "category": "SUPER_REDUCED"},
            {"name": "Mystery", "brand": "Acme", "mrp": 5.0, "category": "EXEMPT"},
            {"name": "TV", "brand": "Acme", "mrp": 500.0, "category": "GENERAL"}
        ]"#;

        let products: Vec<Product> = decode_collection_str(text, "test").unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Bread");
        assert_eq!(products[1].name, "TV");
    }

    #[test]
    fn test_unknown_business_model_skips_only_that_record() {
        let text = r#"[
            {"name": "Can Petra", "description": "d", "since": 1987,
             "businessModel": "FRANCHISE", "earnings": 0.0, "catalogue": []},
            {"name": "Mercat Vell", "description": "d", "since": 1874,
             "businessModel": "MAX_PROFIT", "earnings": 0.0, "catalogue": []}
        ]"#;

        let shops: Vec<Shop> = decode_collection_str(text, "test").unwrap();
        assert_eq!(shops.len(), 1);
        assert_eq!(shops[0].name, "Mercat Vell");
    }

    #[test]
    fn test_nested_arrays_are_flattened() {
        let text = r#"[
            [{"name": "Bread", "brand": "El Molí", "mrp": 2.0, "category": "SUPER_REDUCED"}],
            {"name": "TV", "brand": "Acme", "mrp": 500.0, "category": "GENERAL"}
        ]"#;

        let products: Vec<Product> = decode_collection_str(text, "test").unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_non_array_payload_is_malformed() {
        let result: StoreResult<Vec<Product>> = decode_collection_str("{}", "test");
        assert!(matches!(result, Err(StoreError::MalformedPayload { .. })));

        let result: StoreResult<Vec<Product>> = decode_collection_str("not json", "test");
        assert!(matches!(result, Err(StoreError::MalformedPayload { .. })));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let products = vec![Product::new(
            "Bread",
            "El Molí",
            2.0,
            mercat_core::TaxCategory::SuperReduced,
        )];
        let text = encode_collection(&products, "test").unwrap();
        let back: Vec<Product> = decode_collection_str(&text, "test").unwrap();
        assert_eq!(back, products);
    }
}
