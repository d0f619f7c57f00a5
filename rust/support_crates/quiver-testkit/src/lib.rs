//! Test utilities for the Quiver crates.
//!
//! - chunking of Arrow arrays into column chunks of fixed or random sizes
//! - sample (including nested) arrays
//! - a reference NDJSON rendering produced by `arrow-json`
//! - test logging setup
//!
//! Everything here works with plain Arrow types, so the helpers can be used
//! from the tests of any crate in the workspace.

pub mod chunking;
pub mod data_gen;
pub mod logging;
pub mod ndjson;
