//! JSON materialization of Quiver column values.
//!
//! [`materialize`] turns one value of a column into a `serde_json::Value`
//! tree, recursing into list and struct values. [`RowIterator`] and
//! [`NdjsonWriter`] build on it to produce one JSON object per row.

pub mod materialize;
pub mod rows;
pub mod writer;

pub use materialize::{Decimal128Parts, materialize, materialize_row};
pub use rows::RowIterator;
pub use writer::{NdjsonWriter, columns_to_json, write_ndjson};
