//! Secondary index subsystem
//!
//! Indexes are derived, in-memory-only state over rows owned by the caller.
//!
//! # Components
//!
//! - [`RowSignature`]: field selection, composite key joining, case folding
//! - [`OrderedKeyMultiset`]: sorted keys with multiplicity, binary-search windows
//! - [`KeyToRowMultimap`]: key → row ids, duplicate-collapsing resolution
//! - [`Index`]: the façade owning all three
//!
//! # Invariants
//!
//! - The multiset is sorted under the configured order after every call
//! - Multiset and multimap hold the same number of entries per key
//! - Keys are folded once when derived; query bounds once when queried
//! - Maintenance is explicit: callers add and remove rows

mod config;
mod errors;
mod lookup;
mod ordered;
mod row;
mod signature;
mod table_index;

pub use config::IndexConfig;
pub use errors::{IndexError, IndexErrorCode, IndexResult, Severity};
pub use lookup::KeyToRowMultimap;
pub use ordered::{paginate, OrderType, OrderedKeyMultiset};
pub use row::{Row, RowId};
pub use signature::{IndexKey, RowSignature, SignatureType, FIELD_SEPARATOR};
pub use table_index::Index;
