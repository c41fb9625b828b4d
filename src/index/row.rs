//! Row and row id types
//!
//! Rows are owned by the caller. The index only reads field values through
//! the [`Row`] trait and never keeps a copy.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-assigned row identifier, opaque to the index.
///
/// Serializes untagged: a JSON number for `Int`, a JSON string for `Str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    /// Positional or numeric id
    Int(i64),
    /// Named id
    Str(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(v) => write!(f, "{}", v),
            RowId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RowId {
    fn from(v: i64) -> Self {
        RowId::Int(v)
    }
}

impl From<&str> for RowId {
    fn from(v: &str) -> Self {
        RowId::Str(v.to_string())
    }
}

impl From<String> for RowId {
    fn from(v: String) -> Self {
        RowId::Str(v)
    }
}

/// Read access to a row's field values.
///
/// `None` means the field is absent. A field that is present with a falsy
/// value (`0`, `""`, `false`, `null`) is still present.
pub trait Row {
    fn field(&self, name: &str) -> Option<&Value>;
}

impl Row for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(name))
    }
}

impl Row for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Row for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Row for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<R: Row + ?Sized> Row for &R {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_id_serializes_untagged() {
        assert_eq!(serde_json::to_string(&RowId::Int(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&RowId::from("a")).unwrap(), "\"a\"");

        let ids: Vec<RowId> = serde_json::from_str(r#"[1, "two", 3]"#).unwrap();
        assert_eq!(ids, vec![RowId::Int(1), RowId::from("two"), RowId::Int(3)]);
    }

    #[test]
    fn test_absent_field_distinct_from_falsy() {
        let row = json!({"zero": 0, "empty": "", "no": false, "nothing": null});

        assert_eq!(row.field("zero"), Some(&json!(0)));
        assert_eq!(row.field("empty"), Some(&json!("")));
        assert_eq!(row.field("no"), Some(&json!(false)));
        assert_eq!(row.field("nothing"), Some(&Value::Null));
        assert_eq!(row.field("missing"), None);
    }

    #[test]
    fn test_non_object_value_has_no_fields() {
        assert_eq!(json!([1, 2]).field("0"), None);
        assert_eq!(json!("text").field("len"), None);
    }

    #[test]
    fn test_map_rows() {
        let mut row = BTreeMap::new();
        row.insert("name".to_string(), json!("alice"));
        assert_eq!(row.field("name"), Some(&json!("alice")));
        assert_eq!((&row).field("age"), None);
    }
}
