use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names that may carry a record's identifier, in priority order.
pub const IDENTIFIER_FIELDS: &[&str] = &["movie_id", "id"];

/// A single upstream catalog record as delivered by the data source.
///
/// Upstream records are loosely typed: any field may be missing, null, a
/// number where a string was expected, or a JSON document encoded as a string.
/// `RawRecord` keeps the object untouched and offers coercing accessors so the
/// normalizer can validate it field by field. Nothing past normalization should
/// look at a `RawRecord`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value; only objects are records.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Raw value of a field. `null` counts as absent.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Text form of a field.
    ///
    /// Strings are trimmed and empty strings are treated as absent. Numbers are
    /// rendered as text (`2021` -> `"2021"`). Every other JSON type is absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.value(key)? {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First field in `keys` that has a text value.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// First field in `keys` that is present at all.
    pub fn first_value(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.value(key))
    }

    /// Stable identifier of the record, if any field provides one.
    pub fn identifier(&self) -> Option<String> {
        self.first_text(IDENTIFIER_FIELDS)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_coerces_numbers_and_skips_blank() {
        let record = RawRecord::from_value(json!({
            "year": 2021,
            "title": "  Alpha  ",
            "genre": "   ",
            "flag": true,
            "poster": null
        }))
        .unwrap();

        assert_eq!(record.text("year").as_deref(), Some("2021"));
        assert_eq!(record.text("title").as_deref(), Some("Alpha"));
        assert_eq!(record.text("genre"), None);
        assert_eq!(record.text("flag"), None);
        assert_eq!(record.text("poster"), None);
        assert!(record.value("poster").is_none());
    }

    #[test]
    fn test_identifier_prefers_movie_id() {
        let record = RawRecord::default().with("id", "fallback").with("movie_id", "m-1");
        assert_eq!(record.identifier().as_deref(), Some("m-1"));

        let numeric = RawRecord::default().with("id", 42);
        assert_eq!(numeric.identifier().as_deref(), Some("42"));

        assert_eq!(RawRecord::default().identifier(), None);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(RawRecord::from_value(json!([1, 2])).is_none());
        assert!(RawRecord::from_value(json!("movie")).is_none());
    }
}
