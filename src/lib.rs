//! tableindex - In-memory secondary indexes over tabular rows
//!
//! Exact-match, prefix and bounded-range lookups over one or more fields,
//! returning row ids without scanning every row.

pub mod cli;
pub mod index;
pub mod observability;
