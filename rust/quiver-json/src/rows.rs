//! Row-by-row JSON objects over a set of columns.

use arrow_schema::{Field, Fields};
use quiver_common::{Result, error::Error, try_or_ret_some_err};
use quiver_iterator::{Column, StepIterator, StepOptions};
use serde_json::{Map, Value};

use crate::materialize::materialize_row;

/// Yields one JSON object per row, keyed by column name.
pub struct RowIterator {
    step: StepIterator,
    fields: Fields,
}

impl RowIterator {
    pub fn new(columns: &[Column]) -> Result<RowIterator> {
        Self::with_options(columns, StepOptions::default())
    }

    pub fn with_options(columns: &[Column], options: StepOptions) -> Result<RowIterator> {
        let fields = columns
            .iter()
            .map(|column| column.field().clone())
            .collect::<Fields>();
        let step = StepIterator::with_options(columns, options)?;
        Ok(RowIterator { step, fields })
    }

    /// Wraps an existing step iterator; `fields` names its columns in order.
    pub fn from_step(step: StepIterator, fields: Fields) -> Result<RowIterator> {
        if step.num_columns() != fields.len() {
            return Err(Error::length_mismatch(
                "row fields",
                step.num_columns() as u64,
                fields.len() as u64,
            ));
        }
        for (field, data_type) in fields.iter().zip(step.data_types()) {
            if !field.data_type().equals_datatype(data_type) {
                return Err(Error::type_mismatch(
                    format!("{} for field '{}'", field.data_type(), field.name()),
                    data_type.to_string(),
                ));
            }
        }
        Ok(RowIterator { step, fields })
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn field(&self, i: usize) -> &Field {
        &self.fields[i]
    }

    /// Index of the row returned by the last call to `next`.
    pub fn row_index(&self) -> Option<u64> {
        self.step.row_index()
    }
}

impl Iterator for RowIterator {
    type Item = Result<Map<String, Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if !try_or_ret_some_err!(self.step.advance()) {
            return None;
        }
        let row = self.step.take_values()?;
        Some(materialize_row(&self.fields, row))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use arrow_array::{ArrayRef, Int32Array, StringArray};
    use arrow_schema::DataType;
    use serde_json::json;

    fn columns() -> Vec<Column> {
        vec![
            Column::from_chunks(
                "n",
                vec![
                    Arc::new(Int32Array::from(vec![Some(1), Some(2)])) as ArrayRef,
                    Arc::new(Int32Array::from(vec![None, Some(4)])) as ArrayRef,
                ],
            )
            .unwrap(),
            Column::from_chunks(
                "s",
                vec![
                    Arc::new(StringArray::from(vec![Some("a"), None])) as ArrayRef,
                    Arc::new(StringArray::from(vec![Some("c"), Some("d")])) as ArrayRef,
                ],
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_rows() {
        let rows = RowIterator::new(&columns())
            .unwrap()
            .map(|row| Value::Object(row.unwrap()))
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                json!({"n": 1, "s": "a"}),
                json!({"n": 2, "s": null}),
                json!({"n": null, "s": "c"}),
                json!({"n": 4, "s": "d"}),
            ]
        );
    }

    #[test]
    fn test_from_step_checks_fields() {
        let columns = columns();
        let step = StepIterator::for_columns(&columns).unwrap();
        let fields = Fields::from(vec![Field::new("n", DataType::Int32, true)]);
        assert!(RowIterator::from_step(step, fields).is_err());

        let step = StepIterator::for_columns(&columns).unwrap();
        let fields = Fields::from(vec![
            Field::new("n", DataType::Int64, true),
            Field::new("s", DataType::Utf8, true),
        ]);
        let err = RowIterator::from_step(step, fields).err().unwrap();
        assert!(err.is_type_mismatch());

        let step = StepIterator::for_columns(&columns).unwrap();
        let fields = Fields::from(vec![
            Field::new("number", DataType::Int32, true),
            Field::new("text", DataType::Utf8, true),
        ]);
        let mut rows = RowIterator::from_step(step, fields).unwrap();
        let first = rows.next().unwrap().unwrap();
        assert_eq!(rows.row_index(), Some(0));
        assert_eq!(Value::Object(first), json!({"number": 1, "text": "a"}));
    }

    #[test]
    fn test_duplicate_column_names() {
        let mut columns = columns();
        columns[1] = Column::from_array(
            "n",
            Arc::new(StringArray::from(vec!["a", "b", "c", "d"])) as ArrayRef,
        );
        let mut rows = RowIterator::new(&columns).unwrap();
        let err = rows.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("duplicate field name"));
    }
}
