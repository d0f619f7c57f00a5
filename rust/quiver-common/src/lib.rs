//! Core definitions (errors, results and reference counting) relied upon by all quiver-* crates.

pub mod error;
pub mod macros;
pub mod refcount;
pub mod result;

pub use result::Result;
