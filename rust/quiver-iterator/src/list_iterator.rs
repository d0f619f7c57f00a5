//! Iteration over `List` and `LargeList` columns.

use std::{marker::PhantomData, ops::Range};

use arrow_array::{Array, ArrayRef, GenericListArray, OffsetSizeTrait};
use arrow_schema::{DataType, FieldRef};
use quiver_common::{Result, error::Error, refcount::RefCount};

use crate::{
    any_iterator::{AnyValueIterator, GenericValueIterator},
    column::Column,
    generic_value::GenericValue,
    scan::{Advance, ChunkScan},
};

/// Steps over the entries of a list column.
///
/// The current entry is never materialized eagerly: [`current_as_generic`]
/// hands out a new [`AnyValueIterator`] scoped to the entry's element range,
/// which shares the underlying values buffer with the column.
///
/// [`current_as_generic`]: GenericValueIterator::current_as_generic
pub struct ListValueIterator<O: OffsetSizeTrait> {
    scan: ChunkScan,
    field: FieldRef,
    item_field: FieldRef,
    refs: RefCount,
    _offset: PhantomData<fn() -> O>,
}

impl<O: OffsetSizeTrait> ListValueIterator<O> {
    /// Creates an iterator over a `List` (`i32` offsets) or `LargeList`
    /// (`i64` offsets) column.
    ///
    /// # Errors
    ///
    /// A type-mismatch error if the column is not a list of the matching
    /// offset width, or an unsupported-type error if the element type (at any
    /// nesting depth) cannot be iterated.
    pub fn try_new(column: &Column) -> Result<Self> {
        let item_field = match column.data_type() {
            DataType::List(item) if !O::IS_LARGE => item.clone(),
            DataType::LargeList(item) if O::IS_LARGE => item.clone(),
            other => {
                return Err(Error::type_mismatch(Self::type_name(), other.to_string()));
            }
        };
        AnyValueIterator::ensure_supported(item_field.data_type())?;
        log::debug!(
            "list iterator over '{}' ({} chunks, item {})",
            column.name(),
            column.num_chunks(),
            item_field.data_type()
        );
        Ok(ListValueIterator {
            scan: ChunkScan::new(column),
            field: column.field().clone(),
            item_field,
            refs: RefCount::new(),
            _offset: PhantomData,
        })
    }

    pub fn item_field(&self) -> &FieldRef {
        &self.item_field
    }

    pub fn is_null(&self) -> bool {
        self.position()
            .is_none_or(|(array, index)| array.is_null(index))
    }

    /// Element range of the current entry within the chunk's values array.
    ///
    /// `None` when the entry is null or the iterator is not positioned.
    pub fn value_range(&self) -> Option<Range<u64>> {
        let (array, index) = self.position()?;
        if array.is_null(index) {
            return None;
        }
        let offsets = array.value_offsets();
        let start = offsets[index].as_usize() as u64;
        let end = offsets[index + 1].as_usize() as u64;
        Some(start..end)
    }

    /// The elements of the current entry as a zero-copy slice of the chunk's
    /// values array. `None` for a null entry.
    pub fn current_values(&self) -> Option<ArrayRef> {
        let (array, index) = self.position()?;
        if array.is_null(index) {
            return None;
        }
        let offsets = array.value_offsets();
        let start = offsets[index].as_usize();
        let end = offsets[index + 1].as_usize();
        Some(array.values().slice(start, end - start))
    }

    pub fn is_exhausted(&self) -> bool {
        self.scan.is_exhausted()
    }

    fn position(&self) -> Option<(&GenericListArray<O>, usize)> {
        let (chunk, index) = self.scan.position()?;
        let array = chunk.as_any().downcast_ref::<GenericListArray<O>>()?;
        Some((array, index))
    }

    fn type_name() -> &'static str {
        if O::IS_LARGE { "LargeList" } else { "List" }
    }
}

impl<O: OffsetSizeTrait> GenericValueIterator for ListValueIterator<O> {
    fn advance(&mut self) -> bool {
        self.scan.advance() != Advance::Exhausted
    }

    fn current_as_generic(&self) -> Result<Option<GenericValue>> {
        let Some(values) = self.current_values() else {
            return Ok(None);
        };
        let items = Column::try_new(self.item_field.clone(), vec![values])?;
        let iterator = AnyValueIterator::try_new(&items)?;
        Ok(Some(GenericValue::List(Box::new(iterator))))
    }

    fn retain(&self) {
        self.refs.retain();
    }

    fn release(&mut self) -> bool {
        let last = self.refs.release();
        if last {
            self.scan.finish();
        }
        last
    }

    fn field(&self) -> &FieldRef {
        &self.field
    }
}
