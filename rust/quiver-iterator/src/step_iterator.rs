//! Row-aligned iteration over several columns.

use std::sync::Arc;

use arrow_schema::DataType;
use quiver_common::{Result, error::Error, refcount::RefCount};

use crate::{
    any_iterator::{AnyValueIterator, GenericValueIterator},
    column::Column,
    generic_value::GenericValue,
};

/// How a [`StepIterator`] treats columns of different lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RaggedRows {
    /// Rows continue while any column has values. Exhausted columns report
    /// `exists == false` and a null value.
    #[default]
    Permissive,
    /// The first row where some columns are exhausted and others are not
    /// fails with a length-mismatch error.
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct StepOptions {
    pub ragged_rows: RaggedRows,
}

impl StepOptions {
    pub fn with_ragged_rows(mut self, ragged_rows: RaggedRows) -> Self {
        self.ragged_rows = ragged_rows;
        self
    }
}

/// One row: the current value of every column, in column order.
///
/// List and struct values are live iterators bound to the chunks of the row
/// they were read from; consume them before they are dropped together with
/// the step value.
#[derive(Debug)]
pub struct StepValue {
    values: Vec<Option<GenericValue>>,
    exists: Vec<bool>,
    data_types: Arc<[DataType]>,
}

impl StepValue {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value of column `i` (`None` for null) and the column's data type.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a valid column index.
    pub fn value(&self, i: usize) -> (Option<&GenericValue>, &DataType) {
        (self.values[i].as_ref(), &self.data_types[i])
    }

    /// Whether column `i` still had a row at this step.
    pub fn exists(&self, i: usize) -> bool {
        self.exists[i]
    }

    /// Whether every column had a row at this step.
    pub fn is_complete(&self) -> bool {
        self.exists.iter().all(|&e| e)
    }

    pub fn data_types(&self) -> &[DataType] {
        &self.data_types
    }

    pub fn into_parts(self) -> (Vec<Option<GenericValue>>, Vec<bool>, Arc<[DataType]>) {
        (self.values, self.exists, self.data_types)
    }
}

/// Advances one iterator per column in lockstep and snapshots each row as a
/// [`StepValue`].
pub struct StepIterator {
    columns: Vec<AnyValueIterator>,
    data_types: Arc<[DataType]>,
    options: StepOptions,
    current: Option<StepValue>,
    row_index: Option<u64>,
    rows: u64,
    done: bool,
    warned_partial: bool,
    refs: RefCount,
}

impl StepIterator {
    /// Opens an iterator for every column, in the given order.
    pub fn for_columns(columns: &[Column]) -> Result<StepIterator> {
        Self::with_options(columns, StepOptions::default())
    }

    pub fn with_options(columns: &[Column], options: StepOptions) -> Result<StepIterator> {
        let iterators = columns
            .iter()
            .map(AnyValueIterator::try_new)
            .collect::<Result<Vec<_>>>()?;
        let mut it = StepIterator::new(iterators);
        it.options = options;
        Ok(it)
    }

    /// Steps over already constructed column iterators. They must all be
    /// positioned before their first value.
    pub fn new(columns: Vec<AnyValueIterator>) -> StepIterator {
        let data_types = columns
            .iter()
            .map(|it| it.data_type().clone())
            .collect::<Vec<_>>()
            .into();
        log::debug!("step iterator over {} columns", columns.len());
        StepIterator {
            columns,
            data_types,
            options: StepOptions::default(),
            current: None,
            row_index: None,
            rows: 0,
            done: false,
            warned_partial: false,
            refs: RefCount::new(),
        }
    }

    /// Moves to the next row.
    ///
    /// Every column iterator is advanced, including the ones that are
    /// already exhausted. Returns `true` while at least one column produced a
    /// value.
    ///
    /// # Errors
    ///
    /// A length-mismatch error under [`RaggedRows::Strict`] when the columns
    /// disagree on whether the row exists, or any error raised while reading
    /// a column's current value. The iterator is finished after any error.
    pub fn advance(&mut self) -> Result<bool> {
        self.advance_with(|column| column.current_as_generic())
    }

    fn advance_with<F>(&mut self, read: F) -> Result<bool>
    where
        F: Fn(&AnyValueIterator) -> Result<Option<GenericValue>>,
    {
        self.current = None;
        if self.done {
            return Ok(false);
        }

        // All columns move before any value is read.
        let exists = self
            .columns
            .iter_mut()
            .map(|column| column.advance())
            .collect::<Vec<_>>();

        let values = self
            .columns
            .iter()
            .zip(&exists)
            .map(|(column, &has_row)| if has_row { read(column) } else { Ok(None) })
            .collect::<Result<Vec<_>>>();
        let values = match values {
            Ok(values) => values,
            Err(err) => {
                log::debug!("step iterator failed at row {}: {err}", self.rows);
                self.finish();
                return Err(err);
            }
        };

        if !exists.iter().any(|&e| e) {
            log::debug!("step iterator finished after {} rows", self.rows);
            self.finish();
            return Ok(false);
        }

        if !exists.iter().all(|&e| e) {
            self.on_partial_row(&exists)?;
        }

        self.row_index = Some(self.rows);
        self.rows += 1;
        self.current = Some(StepValue {
            values,
            exists,
            data_types: self.data_types.clone(),
        });
        Ok(true)
    }

    /// The row produced by the last successful [`advance`](Self::advance).
    pub fn values(&self) -> Option<&StepValue> {
        self.current.as_ref()
    }

    /// Takes ownership of the current row, e.g. to drain its list values.
    pub fn take_values(&mut self) -> Option<StepValue> {
        self.current.take()
    }

    /// Zero-based index of the current row.
    pub fn row_index(&self) -> Option<u64> {
        self.row_index
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn data_types(&self) -> &[DataType] {
        &self.data_types
    }

    pub fn is_exhausted(&self) -> bool {
        self.done
    }

    pub fn retain(&self) {
        self.refs.retain();
    }

    /// Drops one reference; the last one releases every column iterator.
    pub fn release(&mut self) -> bool {
        let last = self.refs.release();
        if last {
            self.finish();
        }
        last
    }

    fn on_partial_row(&mut self, exists: &[bool]) -> Result<()> {
        let exhausted = self
            .columns
            .iter()
            .zip(exists)
            .filter(|(_, e)| !**e)
            .map(|(column, _)| column.field().name().as_str())
            .collect::<Vec<_>>();

        match self.options.ragged_rows {
            RaggedRows::Strict => {
                let err = Error::length_mismatch(
                    format!("column '{}'", exhausted.join("', '")),
                    self.rows + 1,
                    self.rows,
                );
                self.finish();
                Err(err)
            }
            RaggedRows::Permissive => {
                if !self.warned_partial {
                    log::warn!(
                        "row {}: columns [{}] are exhausted, emitting partial rows",
                        self.rows,
                        exhausted.join(", ")
                    );
                    self.warned_partial = true;
                }
                Ok(())
            }
        }
    }

    fn finish(&mut self) {
        self.done = true;
        self.current = None;
        for column in self.columns.iter_mut() {
            column.release();
        }
        self.columns.clear();
    }
}
