//! Iteration over struct columns.

use arrow_array::{Array, StructArray};
use arrow_schema::{DataType, FieldRef, Fields};
use quiver_common::{Result, error::Error, refcount::RefCount};

use crate::{
    any_iterator::{AnyValueIterator, GenericValueIterator},
    column::Column,
    generic_value::GenericValue,
    scan::{Advance, ChunkScan},
};

/// Steps over a struct column, keeping one child iterator per field.
///
/// The struct's own validity is read from the outer chunk. Child iterators
/// are rebuilt from the field arrays of each new chunk and advanced in
/// lockstep with the outer position.
pub struct StructValueIterator {
    scan: ChunkScan,
    field: FieldRef,
    fields: Fields,
    children: Vec<AnyValueIterator>,
    refs: RefCount,
}

impl StructValueIterator {
    /// # Errors
    ///
    /// * type mismatch if the column is not a struct,
    /// * unsupported type if some field type cannot be iterated,
    /// * length mismatch if a field array of some chunk has a different
    ///   row count than the chunk itself.
    pub fn try_new(column: &Column) -> Result<Self> {
        let DataType::Struct(fields) = column.data_type() else {
            return Err(Error::type_mismatch(
                "Struct",
                column.data_type().to_string(),
            ));
        };
        for field in fields.iter() {
            AnyValueIterator::ensure_supported(field.data_type())?;
        }
        for (ordinal, chunk) in column.chunks().iter().enumerate() {
            let array = chunk
                .as_any()
                .downcast_ref::<StructArray>()
                .ok_or_else(|| {
                    Error::type_mismatch(
                        format!("StructArray for chunk {ordinal}"),
                        chunk.data_type().to_string(),
                    )
                })?;
            for (field, child) in fields.iter().zip(array.columns()) {
                if child.len() != array.len() {
                    return Err(Error::length_mismatch(
                        format!("{}.{}", column.name(), field.name()),
                        array.len() as u64,
                        child.len() as u64,
                    ));
                }
            }
        }
        log::debug!(
            "struct iterator over '{}' ({} fields, {} chunks)",
            column.name(),
            fields.len(),
            column.num_chunks()
        );
        Ok(StructValueIterator {
            scan: ChunkScan::new(column),
            field: column.field().clone(),
            fields: fields.clone(),
            children: Vec::with_capacity(fields.len()),
            refs: RefCount::new(),
        })
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Child iterators of the current chunk, in field order. Empty before the
    /// first advance and after exhaustion.
    pub fn field_iterators(&self) -> &[AnyValueIterator] {
        &self.children
    }

    pub fn is_null(&self) -> bool {
        self.scan
            .position()
            .is_none_or(|(chunk, index)| chunk.is_null(index))
    }

    pub fn is_exhausted(&self) -> bool {
        self.scan.is_exhausted()
    }

    fn rebuild_children(&mut self) -> Result<()> {
        let chunk = self
            .scan
            .chunk()
            .and_then(|chunk| chunk.as_any().downcast_ref::<StructArray>())
            .ok_or_else(|| Error::invalid_operation("struct chunk is not positioned"))?;
        self.children = self
            .fields
            .iter()
            .zip(chunk.columns())
            .map(|(field, array)| {
                let column = Column::try_new(field.clone(), vec![array.clone()])?;
                AnyValueIterator::try_new(&column)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    fn step_children(&mut self) {
        for (child, field) in self.children.iter_mut().zip(self.fields.iter()) {
            if !child.advance() {
                log::error!(
                    "struct field '{}' of '{}' ran out of rows before its parent",
                    field.name(),
                    self.field.name()
                );
                debug_assert!(false, "struct field ran out of rows");
            }
        }
    }

    fn finish(&mut self) {
        self.children.clear();
        self.scan.finish();
    }
}

impl GenericValueIterator for StructValueIterator {
    fn advance(&mut self) -> bool {
        match self.scan.advance() {
            Advance::Exhausted => {
                self.children.clear();
                false
            }
            Advance::NewChunk => {
                if let Err(e) = self.rebuild_children() {
                    log::error!("failed to open fields of struct '{}': {e}", self.field.name());
                    debug_assert!(false, "failed to open struct fields: {e}");
                    self.finish();
                    return false;
                }
                self.step_children();
                true
            }
            Advance::Row => {
                self.step_children();
                true
            }
        }
    }

    fn current_as_generic(&self) -> Result<Option<GenericValue>> {
        if self.is_null() {
            return Ok(None);
        }
        let values = self
            .children
            .iter()
            .map(|child| child.current_as_generic())
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(GenericValue::Struct(values)))
    }

    fn retain(&self) {
        self.refs.retain();
    }

    fn release(&mut self) -> bool {
        let last = self.refs.release();
        if last {
            self.finish();
        }
        last
    }

    fn field(&self) -> &FieldRef {
        &self.field
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use arrow_array::{ArrayRef, Int32Array, StringArray};
    use arrow_buffer::NullBuffer;
    use arrow_schema::Field;

    fn sample(ids: Vec<i32>, names: Vec<Option<&str>>, valid: Option<Vec<bool>>) -> StructArray {
        let fields = Fields::from(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, true),
        ]);
        StructArray::new(
            fields,
            vec![
                Arc::new(Int32Array::from(ids)) as ArrayRef,
                Arc::new(StringArray::from(names)) as ArrayRef,
            ],
            valid.map(NullBuffer::from),
        )
    }

    fn collect(column: &Column) -> Vec<Option<(i32, Option<String>)>> {
        let mut it = StructValueIterator::try_new(column).unwrap();
        let mut out = Vec::new();
        while it.advance() {
            let row = it.current_as_generic().unwrap().map(|value| {
                let mut fields = value.into_struct().unwrap().into_iter();
                let id = fields.next().unwrap().unwrap().as_i32().unwrap();
                let name = fields
                    .next()
                    .unwrap()
                    .map(|v| v.as_str().unwrap().to_string());
                (id, name)
            });
            out.push(row);
        }
        out
    }

    #[test]
    fn test_struct_rows_across_chunks() {
        let column = Column::from_chunks(
            "s",
            vec![
                Arc::new(sample(vec![1, 2], vec![Some("a"), None], None)) as ArrayRef,
                Arc::new(sample(vec![], vec![], None)) as ArrayRef,
                Arc::new(sample(vec![3, 4], vec![Some("c"), Some("d")], Some(vec![false, true])))
                    as ArrayRef,
            ],
        )
        .unwrap();
        assert_eq!(
            collect(&column),
            vec![
                Some((1, Some("a".to_string()))),
                Some((2, None)),
                None,
                Some((4, Some("d".to_string()))),
            ]
        );
    }

    #[test]
    fn test_children_follow_chunks() {
        let column = Column::from_chunks(
            "s",
            vec![
                Arc::new(sample(vec![1], vec![Some("a")], None)) as ArrayRef,
                Arc::new(sample(vec![2], vec![Some("b")], None)) as ArrayRef,
            ],
        )
        .unwrap();
        let mut it = StructValueIterator::try_new(&column).unwrap();
        assert!(it.field_iterators().is_empty());
        assert!(it.advance());
        assert_eq!(it.field_iterators().len(), 2);
        assert_eq!(it.fields()[1].name(), "name");
        assert!(it.advance());
        let first = it.field_iterators()[0].current_as_generic().unwrap().unwrap();
        assert_eq!(first.as_i32().unwrap(), 2);
        assert!(!it.advance());
        assert!(it.field_iterators().is_empty());
        assert!(!it.advance());
    }

    #[test]
    fn test_release_clears_children() {
        let array = sample(vec![1, 2], vec![Some("a"), Some("b")], None);
        let ids = array.column(0).clone();
        let base = Arc::strong_count(&ids);
        let column = Column::from_array("s", Arc::new(array));

        let mut it = StructValueIterator::try_new(&column).unwrap();
        assert!(it.advance());
        assert!(Arc::strong_count(&ids) > base);
        it.retain();
        assert!(!it.release());
        assert!(it.release());
        assert!(it.field_iterators().is_empty());
        assert!(!it.advance());
        drop(it);
        drop(column);
        assert_eq!(Arc::strong_count(&ids), base - 1);
    }

    #[test]
    fn test_not_a_struct() {
        let column = Column::from_array("i", Arc::new(Int32Array::from(vec![1])));
        let err = StructValueIterator::try_new(&column).err().unwrap();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_unsupported_field_type() {
        let values = arrow_array::Decimal256Array::from(vec![arrow_buffer::i256::from(1)]);
        let fields = Fields::from(vec![Field::new(
            "d",
            values.data_type().clone(),
            false,
        )]);
        let array = StructArray::new(fields, vec![Arc::new(values) as ArrayRef], None);
        let column = Column::from_array("s", Arc::new(array));
        let err = StructValueIterator::try_new(&column).err().unwrap();
        assert!(err.is_unsupported_type());
    }
}
