//! Reference NDJSON output rendered by `arrow-json`.
//!
//! Used to cross-check the row writer on types where both encodings agree
//! (integers, strings, booleans, lists and structs).

use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch};
use arrow_json::{LineDelimitedWriter, WriterBuilder, writer::LineDelimited};
use arrow_schema::Schema;
use serde_json::Value;

/// Renders a batch as NDJSON, writing nulls explicitly.
pub fn record_batch_to_ndjson(batch: &RecordBatch) -> anyhow::Result<String> {
    let mut writer: LineDelimitedWriter<Vec<u8>> = WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, LineDelimited>(Vec::new());
    writer.write_batches(&[batch])?;
    writer.finish()?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Renders a set of named single-chunk columns as NDJSON.
pub fn columns_to_ndjson(columns: &[(&str, ArrayRef)]) -> anyhow::Result<String> {
    let fields = columns
        .iter()
        .map(|(name, array)| {
            arrow_schema::Field::new(*name, array.data_type().clone(), true)
        })
        .collect::<Vec<_>>();
    let batch = RecordBatch::try_new(
        Arc::new(Schema::new(fields)),
        columns.iter().map(|(_, array)| array.clone()).collect(),
    )?;
    record_batch_to_ndjson(&batch)
}

/// Parses NDJSON text into one JSON value per non-empty line.
pub fn parse_ndjson(text: &str) -> anyhow::Result<Vec<Value>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_gen::two_column_batch;

    #[test]
    fn test_reference_rendering() {
        let text = record_batch_to_ndjson(&two_column_batch()).unwrap();
        let rows = parse_ndjson(&text).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], serde_json::json!({"n": 2, "s": null}));
    }
}
