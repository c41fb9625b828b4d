//! Index construction parameters
//!
//! Deserializable from JSON so an index can be described in a config file.
//! Type names stay strings until [`IndexConfig::validate`] parses them, so an
//! unknown name surfaces as `TIDX_INVALID_CONFIGURATION` rather than a JSON
//! error.

use serde::{Deserialize, Serialize};

use super::errors::IndexResult;
use super::ordered::OrderType;
use super::signature::{RowSignature, SignatureType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Indexed fields, in composite key order (required)
    pub field_names: Vec<String>,

    /// Signature type: "string" or "array" (default: "string")
    #[serde(default = "default_signature_type")]
    pub signature_type: String,

    /// Fold keys and query bounds to lowercase (default: false)
    #[serde(default)]
    pub case_insensitive: bool,

    /// Key order: "ascending" or "descending" (default: "ascending")
    #[serde(default = "default_order_type")]
    pub order_type: String,
}

fn default_signature_type() -> String {
    SignatureType::String.as_str().to_string()
}

fn default_order_type() -> String {
    OrderType::Ascending.as_str().to_string()
}

impl IndexConfig {
    /// Config over the given fields with every other parameter defaulted
    pub fn new<S: Into<String>>(field_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            field_names: field_names.into_iter().map(Into::into).collect(),
            signature_type: default_signature_type(),
            case_insensitive: false,
            order_type: default_order_type(),
        }
    }

    pub fn case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = value;
        self
    }

    pub fn with_order(mut self, order: OrderType) -> Self {
        self.order_type = order.as_str().to_string();
        self
    }

    pub fn with_signature_type(mut self, signature_type: SignatureType) -> Self {
        self.signature_type = signature_type.as_str().to_string();
        self
    }

    /// Parses and checks every parameter.
    pub fn validate(&self) -> IndexResult<(RowSignature, OrderType)> {
        let signature_type: SignatureType = self.signature_type.parse()?;
        let order_type: OrderType = self.order_type.parse()?;
        let signature = RowSignature::new(
            self.field_names.clone(),
            signature_type,
            self.case_insensitive,
        )?;
        Ok((signature, order_type))
    }
}
