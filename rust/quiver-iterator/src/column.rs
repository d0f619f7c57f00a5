//! Chunked columns: a field descriptor plus an ordered sequence of immutable
//! Arrow arrays (chunks) of one logical type.

use std::sync::Arc;

use arrow_array::{Array, ArrayRef, RecordBatch};
use arrow_schema::{DataType, Field, FieldRef, Schema};
use quiver_common::{Result, error::Error, verify_arg};

/// A named, typed column whose values are split across any number of chunks.
///
/// Chunks are shared (`Arc`) and never mutated. Cloning a `Column` is cheap:
/// it clones the field and the shared chunk list, not the chunks themselves.
#[derive(Debug, Clone)]
pub struct Column {
    field: FieldRef,
    chunks: Arc<[ArrayRef]>,
}

impl Column {
    /// Creates a column from a field and its chunks.
    ///
    /// Every chunk must have the field's data type (nested field names are not
    /// compared).
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error for the first chunk with a different type.
    pub fn try_new(field: impl Into<FieldRef>, chunks: Vec<ArrayRef>) -> Result<Column> {
        let field = field.into();
        for (i, chunk) in chunks.iter().enumerate() {
            if !chunk.data_type().equals_datatype(field.data_type()) {
                return Err(Error::type_mismatch(
                    format!(
                        "{} for chunk {i} of column '{}'",
                        field.data_type(),
                        field.name()
                    ),
                    chunk.data_type().to_string(),
                ));
            }
        }
        Ok(Column {
            field,
            chunks: chunks.into(),
        })
    }

    /// Creates a single-chunk column; the field type is taken from the array.
    pub fn from_array(name: impl Into<String>, array: ArrayRef) -> Column {
        let nullable = logical_null_count(array.as_ref()) > 0;
        let field = Field::new(name, array.data_type().clone(), nullable);
        Column {
            field: Arc::new(field),
            chunks: Arc::from(vec![array]),
        }
    }

    /// Creates a column from a non-empty list of chunks; the field type is
    /// taken from the first chunk.
    pub fn from_chunks(name: impl Into<String>, chunks: Vec<ArrayRef>) -> Result<Column> {
        verify_arg!(chunks, !chunks.is_empty());
        let data_type = chunks[0].data_type().clone();
        let nullable = chunks
            .iter()
            .any(|chunk| logical_null_count(chunk.as_ref()) > 0);
        Column::try_new(Field::new(name, data_type, nullable), chunks)
    }

    /// Splits a sequence of record batches into columns, one per schema
    /// field, with one chunk per batch.
    pub fn from_record_batches(schema: &Schema, batches: &[RecordBatch]) -> Result<Vec<Column>> {
        for batch in batches {
            verify_arg!(batches, batch.num_columns() == schema.fields().len());
        }
        schema
            .fields()
            .iter()
            .enumerate()
            .map(|(ordinal, field)| {
                let chunks = batches
                    .iter()
                    .map(|batch| batch.column(ordinal).clone())
                    .collect();
                Column::try_new(field.clone(), chunks)
            })
            .collect()
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn name(&self) -> &str {
        self.field.name()
    }

    pub fn data_type(&self) -> &DataType {
        self.field.data_type()
    }

    pub fn chunks(&self) -> &[ArrayRef] {
        &self.chunks
    }

    pub(crate) fn shared_chunks(&self) -> Arc<[ArrayRef]> {
        Arc::clone(&self.chunks)
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Total number of value slots across all chunks.
    pub fn len(&self) -> u64 {
        self.chunks.iter().map(|chunk| chunk.len() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of null slots across all chunks.
    pub fn null_count(&self) -> u64 {
        self.chunks
            .iter()
            .map(|chunk| logical_null_count(chunk.as_ref()) as u64)
            .sum()
    }
}

/// `NullArray` has no validity buffer but every slot is null.
fn logical_null_count(array: &dyn Array) -> usize {
    array
        .logical_nulls()
        .map(|nulls| nulls.null_count())
        .unwrap_or(0)
}
