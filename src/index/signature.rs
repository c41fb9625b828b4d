//! Row signatures: index key derivation
//!
//! A signature names the fields an index covers and turns a row's values for
//! those fields into index keys. Composite keys join the per-field strings
//! with [`FIELD_SEPARATOR`]. Case-insensitive signatures fold each derived
//! key to lowercase exactly once, at derivation time.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::errors::{IndexError, IndexResult};
use super::row::Row;

/// Separator placed between field strings in a composite key.
///
/// Field values are expected not to contain it.
pub const FIELD_SEPARATOR: &str = "|";

/// Index key derived from one row
pub type IndexKey = String;

/// How a row's field values become keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureType {
    /// One composite key per row, every field a scalar
    #[default]
    String,
    /// Fields may hold arrays of scalars; the row yields one key per
    /// combination of elements
    Array,
}

impl SignatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureType::String => "string",
            SignatureType::Array => "array",
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureType {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SignatureType::String),
            "array" => Ok(SignatureType::Array),
            other => Err(IndexError::invalid_configuration(format!(
                "Unknown signature type: '{}'. Must be 'string' or 'array'.",
                other
            ))),
        }
    }
}

/// Immutable key derivation rules for one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSignature {
    field_names: Vec<String>,
    signature_type: SignatureType,
    case_insensitive: bool,
}

impl RowSignature {
    /// Creates a signature over the given fields.
    ///
    /// Fails with `TIDX_INVALID_CONFIGURATION` when the list is empty, holds
    /// a blank name, or names the same field twice.
    pub fn new(
        field_names: Vec<String>,
        signature_type: SignatureType,
        case_insensitive: bool,
    ) -> IndexResult<Self> {
        if field_names.is_empty() {
            return Err(IndexError::invalid_configuration(
                "field_names must name at least one field",
            ));
        }

        let mut seen = HashSet::new();
        for name in &field_names {
            if name.trim().is_empty() {
                return Err(IndexError::invalid_configuration(
                    "field_names must not contain blank names",
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(IndexError::invalid_configuration(format!(
                    "Field '{}' listed more than once",
                    name
                )));
            }
        }

        Ok(Self {
            field_names,
            signature_type,
            case_insensitive,
        })
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Derives the index keys for a row.
    ///
    /// Empty when any indexed field is absent or holds a value the signature
    /// type cannot stringify. The `string` type yields at most one key.
    pub fn keys_for_row<R: Row + ?Sized>(&self, row: &R) -> Vec<IndexKey> {
        let keys = match self.signature_type {
            SignatureType::String => self.string_key(row).into_iter().collect(),
            SignatureType::Array => self.array_keys(row),
        };

        if self.case_insensitive {
            keys.into_iter().map(|k| k.to_lowercase()).collect()
        } else {
            keys
        }
    }

    /// Folds a query bound or prefix the same way keys were folded.
    pub fn normalize<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if self.case_insensitive {
            Cow::Owned(value.to_lowercase())
        } else {
            Cow::Borrowed(value)
        }
    }

    fn string_key<R: Row + ?Sized>(&self, row: &R) -> Option<IndexKey> {
        let mut parts = Vec::with_capacity(self.field_names.len());
        for name in &self.field_names {
            parts.push(scalar_to_string(row.field(name)?)?);
        }
        Some(parts.join(FIELD_SEPARATOR))
    }

    fn array_keys<R: Row + ?Sized>(&self, row: &R) -> Vec<IndexKey> {
        let mut columns: Vec<Vec<String>> = Vec::with_capacity(self.field_names.len());
        for name in &self.field_names {
            let Some(value) = row.field(name) else {
                return Vec::new();
            };
            let column = match value {
                Value::Array(items) => {
                    let strings: Option<Vec<String>> = items.iter().map(scalar_to_string).collect();
                    match strings {
                        Some(s) if !s.is_empty() => s,
                        _ => return Vec::new(),
                    }
                }
                other => match scalar_to_string(other) {
                    Some(s) => vec![s],
                    None => return Vec::new(),
                },
            };
            columns.push(column);
        }

        // Cartesian product, first field varying slowest
        let mut combos: Vec<Vec<&str>> = vec![Vec::new()];
        for column in &columns {
            let mut next = Vec::with_capacity(combos.len() * column.len());
            for combo in &combos {
                for item in column {
                    let mut extended = combo.clone();
                    extended.push(item.as_str());
                    next.push(extended);
                }
            }
            combos = next;
        }

        combos.iter().map(|parts| parts.join(FIELD_SEPARATOR)).collect()
    }
}

/// String form of a scalar field value; `None` for arrays and objects.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signature(fields: &[&str]) -> RowSignature {
        RowSignature::new(
            fields.iter().map(|f| f.to_string()).collect(),
            SignatureType::String,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_field_list_rejected() {
        let err = RowSignature::new(vec![], SignatureType::String, false).unwrap_err();
        assert_eq!(err.code().code(), "TIDX_INVALID_CONFIGURATION");
    }

    #[test]
    fn test_blank_and_duplicate_fields_rejected() {
        assert!(RowSignature::new(vec![" ".into()], SignatureType::String, false).is_err());
        assert!(
            RowSignature::new(vec!["a".into(), "a".into()], SignatureType::String, false).is_err()
        );
    }

    #[test]
    fn test_signature_type_parsing() {
        assert_eq!("string".parse::<SignatureType>().unwrap(), SignatureType::String);
        assert_eq!("array".parse::<SignatureType>().unwrap(), SignatureType::Array);
        assert!("fulltext".parse::<SignatureType>().is_err());
    }

    #[test]
    fn test_single_field_key() {
        let sig = signature(&["name"]);
        assert_eq!(sig.keys_for_row(&json!({"name": "alice", "age": 30})), vec!["alice"]);
    }

    #[test]
    fn test_composite_key_joined_in_field_order() {
        let sig = signature(&["last", "first", "age"]);
        let row = json!({"first": "Ada", "last": "Lovelace", "age": 36});
        assert_eq!(sig.keys_for_row(&row), vec!["Lovelace|Ada|36"]);
    }

    #[test]
    fn test_missing_field_yields_no_keys() {
        let sig = signature(&["a", "b"]);
        assert!(sig.keys_for_row(&json!({"a": "x"})).is_empty());
    }

    #[test]
    fn test_falsy_values_are_indexed() {
        let sig = signature(&["v"]);
        assert_eq!(sig.keys_for_row(&json!({"v": 0})), vec!["0"]);
        assert_eq!(sig.keys_for_row(&json!({"v": ""})), vec![""]);
        assert_eq!(sig.keys_for_row(&json!({"v": false})), vec!["false"]);
        assert_eq!(sig.keys_for_row(&json!({"v": null})), vec!["null"]);
    }

    #[test]
    fn test_string_signature_skips_array_values() {
        let sig = signature(&["tags"]);
        assert!(sig.keys_for_row(&json!({"tags": ["a", "b"]})).is_empty());
    }

    #[test]
    fn test_case_insensitive_keys_lowercased() {
        let sig = RowSignature::new(vec!["name".into()], SignatureType::String, true).unwrap();
        assert_eq!(sig.keys_for_row(&json!({"name": "BaNaNa"})), vec!["banana"]);
        assert_eq!(sig.normalize("ApPle"), "apple");
    }

    #[test]
    fn test_case_sensitive_normalize_borrows() {
        let sig = signature(&["name"]);
        assert!(matches!(sig.normalize("Apple"), Cow::Borrowed("Apple")));
    }

    #[test]
    fn test_array_signature_cartesian_product() {
        let sig = RowSignature::new(
            vec!["color".into(), "size".into()],
            SignatureType::Array,
            false,
        )
        .unwrap();

        let row = json!({"color": ["red", "blue"], "size": ["S", "M"]});
        assert_eq!(
            sig.keys_for_row(&row),
            vec!["red|S", "red|M", "blue|S", "blue|M"]
        );

        // scalars behave as single-element arrays
        assert_eq!(sig.keys_for_row(&json!({"color": "green", "size": ["L"]})), vec!["green|L"]);
    }

    #[test]
    fn test_array_signature_rejects_empty_and_nested() {
        let sig = RowSignature::new(vec!["tags".into()], SignatureType::Array, false).unwrap();
        assert!(sig.keys_for_row(&json!({"tags": []})).is_empty());
        assert!(sig.keys_for_row(&json!({"tags": ["a", ["b"]]})).is_empty());
        assert!(sig.keys_for_row(&json!({})).is_empty());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let sig = signature(&["a", "b"]);
        let row = json!({"a": 1, "b": "two"});
        assert_eq!(sig.keys_for_row(&row), sig.keys_for_row(&row));
    }
}
