//! Null-aware value iteration over chunked Arrow columns.
//!
//! A [`Column`] is an ordered sequence of immutable Arrow arrays (chunks).
//! Value iterators present the column as one sequence of values, crossing
//! chunk boundaries transparently:
//!
//! * [`ValueIterator`] is the typed iterator, instantiated per element kind
//!   (see the aliases in [`value_iterator`]),
//! * [`ListValueIterator`] and [`StructValueIterator`] handle nested columns,
//! * [`AnyValueIterator`] is the type-erased variant over all of the above,
//! * [`StepIterator`] advances several columns in lockstep and yields one
//!   [`StepValue`] per row.

pub mod any_iterator;
pub mod chunk_cursor;
pub mod column;
pub mod generic_value;
pub mod kinds;
pub mod list_iterator;
mod scan;
pub mod step_iterator;
pub mod struct_iterator;
pub mod value_iterator;

pub use any_iterator::{AnyValueIterator, GenericValueIterator};
pub use column::Column;
pub use generic_value::GenericValue;
pub use list_iterator::ListValueIterator;
pub use step_iterator::{RaggedRows, StepIterator, StepOptions, StepValue};
pub use struct_iterator::StructValueIterator;
pub use value_iterator::{NullValueIterator, ValueIterator};
