use mflix_models::{RawRecord, IDENTIFIER_FIELDS};
use serde_json::Value;
use tracing::debug;
use crate::error::SourceError;

/// Turn a collection response into records.
///
/// Accepts a JSON array of records or an object keyed by record id (the shape a
/// Firebase collection returns). In the keyed case a record without its own id
/// field takes the map key as `movie_id`. Non-object entries are skipped.
/// `null` (an empty collection) yields no records.
pub fn records_from_collection(payload: Value) -> Result<Vec<RawRecord>, SourceError> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            let total = items.len();
            let records: Vec<RawRecord> = items.into_iter().filter_map(RawRecord::from_value).collect();
            if records.len() < total {
                debug!("Skipped {} non-object entries in catalog array", total - records.len());
            }
            Ok(records)
        }
        Value::Object(entries) => {
            let total = entries.len();
            let records: Vec<RawRecord> = entries
                .into_iter()
                .filter_map(|(key, value)| RawRecord::from_value(value).map(|record| with_key_id(record, &key)))
                .collect();
            if records.len() < total {
                debug!("Skipped {} non-object entries in catalog map", total - records.len());
            }
            Ok(records)
        }
        other => Err(SourceError::Payload(format!(
            "expected an array or object of records, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Turn a single-item response into a record. `null` means not found.
pub fn record_from_item(payload: Value, id: &str) -> Result<Option<RawRecord>, SourceError> {
    match payload {
        Value::Null => Ok(None),
        Value::Object(fields) => Ok(Some(with_key_id(RawRecord::new(fields), id))),
        other => Err(SourceError::Payload(format!(
            "expected a record object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn with_key_id(mut record: RawRecord, key: &str) -> RawRecord {
    if record.identifier().is_none() && !key.is_empty() {
        record.insert(IDENTIFIER_FIELDS[0], Value::String(key.to_string()));
    }
    record
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_payload_keeps_order() {
        let records = records_from_collection(json!([
            {"movie_id": "b", "title": "Beta"},
            "garbage",
            {"movie_id": "a", "title": "Alpha"}
        ]))
        .unwrap();

        let ids: Vec<_> = records.iter().filter_map(|r| r.identifier()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_keyed_payload_inherits_key() {
        let records = records_from_collection(json!({
            "k1": {"title": "Alpha"},
            "k2": {"movie_id": "own", "title": "Beta"},
            "k3": 17
        }))
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier().as_deref(), Some("k1"));
        assert_eq!(records[1].identifier().as_deref(), Some("own"));
    }

    #[test]
    fn test_null_and_scalar_payloads() {
        assert!(records_from_collection(Value::Null).unwrap().is_empty());
        assert!(records_from_collection(json!("nope")).is_err());
    }

    #[test]
    fn test_item_payload() {
        assert!(record_from_item(Value::Null, "x").unwrap().is_none());

        let record = record_from_item(json!({"title": "Alpha"}), "x").unwrap().unwrap();
        assert_eq!(record.identifier().as_deref(), Some("x"));

        assert!(record_from_item(json!([1]), "x").is_err());
    }
}
