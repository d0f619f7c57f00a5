//! Line-delimited JSON output.

use std::io::Write;

use quiver_common::{Result, error::Error};
use quiver_iterator::Column;
use serde_json::{Map, Value};

use crate::rows::RowIterator;

/// Writes one JSON object per line to a byte sink.
pub struct NdjsonWriter<W: Write> {
    sink: W,
    rows: u64,
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(sink: W) -> Self {
        NdjsonWriter { sink, rows: 0 }
    }

    pub fn write_row(&mut self, row: &Map<String, Value>) -> Result<()> {
        serde_json::to_writer(&mut self.sink, row)
            .map_err(|e| Error::json(format!("row {}", self.rows), e))?;
        self.sink
            .write_all(b"\n")
            .map_err(|e| Error::io(format!("row {}", self.rows), e))?;
        self.rows += 1;
        Ok(())
    }

    /// Drains `rows` into the sink, stopping at the first error. Returns the
    /// number of rows written by this call.
    pub fn write_rows(&mut self, rows: RowIterator) -> Result<u64> {
        let start = self.rows;
        for row in rows {
            self.write_row(&row?)?;
        }
        Ok(self.rows - start)
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flushes the sink and returns it.
    pub fn finish(mut self) -> Result<W> {
        self.sink
            .flush()
            .map_err(|e| Error::io("flush ndjson sink", e))?;
        Ok(self.sink)
    }
}

/// Writes the rows of `columns` as NDJSON and returns the number of rows.
pub fn write_ndjson<W: Write>(columns: &[Column], sink: W) -> Result<u64> {
    let mut writer = NdjsonWriter::new(sink);
    let rows = writer.write_rows(RowIterator::new(columns)?)?;
    writer.finish()?;
    log::debug!("wrote {rows} ndjson rows from {} columns", columns.len());
    Ok(rows)
}

/// Materializes the rows of `columns` as JSON objects.
pub fn columns_to_json(columns: &[Column]) -> Result<Vec<Value>> {
    RowIterator::new(columns)?
        .map(|row| row.map(Value::Object))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use arrow_array::{BooleanArray, Int64Array};
    use serde_json::json;

    #[test]
    fn test_write_ndjson() {
        let columns = [
            Column::from_array("id", Arc::new(Int64Array::from(vec![7, 8]))),
            Column::from_array(
                "ok",
                Arc::new(BooleanArray::from(vec![Some(true), None])),
            ),
        ];
        let mut out = Vec::new();
        let rows = write_ndjson(&columns, &mut out).unwrap();
        assert_eq!(rows, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\"id\":7,\"ok\":true}\n{\"id\":8,\"ok\":null}\n");
    }

    #[test]
    fn test_no_columns() {
        let mut out = Vec::new();
        assert_eq!(write_ndjson(&[], &mut out).unwrap(), 0);
        assert!(out.is_empty());
        assert!(columns_to_json(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_writer_counts_rows() {
        let mut writer = NdjsonWriter::new(Vec::new());
        writer.write_row(&Map::new()).unwrap();
        let row = json!({"a": [1, 2]});
        writer.write_row(row.as_object().unwrap()).unwrap();
        assert_eq!(writer.rows_written(), 2);
        let out = writer.finish().unwrap();
        assert_eq!(out, b"{}\n{\"a\":[1,2]}\n");
    }

    #[test]
    fn test_sink_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("broken"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut writer = NdjsonWriter::new(Broken);
        assert!(writer.write_row(&Map::new()).is_err());
        assert_eq!(writer.rows_written(), 0);
    }
}
