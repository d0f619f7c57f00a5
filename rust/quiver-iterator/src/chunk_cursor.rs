//! Cursor over the chunks of a single column.

use std::sync::Arc;

use arrow_array::{Array, ArrayRef};

use crate::column::Column;

/// Moves across the ordered chunks of a column, holding at most one chunk
/// reference at a time.
///
/// A chunk is retained (its `Arc` cloned) when the cursor moves onto it and
/// released when the cursor moves past it, is released, or is dropped.
pub struct ChunkCursor {
    chunks: Arc<[ArrayRef]>,
    next: usize,
    current: Option<ArrayRef>,
}

impl ChunkCursor {
    /// Creates a cursor positioned before the first chunk.
    pub fn new(column: &Column) -> ChunkCursor {
        ChunkCursor {
            chunks: column.shared_chunks(),
            next: 0,
            current: None,
        }
    }

    /// Moves to the next chunk. Returns `false`, and releases everything the
    /// cursor holds, once there are no more chunks.
    pub fn advance(&mut self) -> bool {
        match self.chunks.get(self.next) {
            Some(chunk) => {
                // The new chunk is retained before the previous one is dropped.
                let chunk = Arc::clone(chunk);
                self.current = Some(chunk);
                self.next += 1;
                true
            }
            None => {
                self.release();
                false
            }
        }
    }

    /// The chunk the cursor is on, if any.
    pub fn current(&self) -> Option<&ArrayRef> {
        self.current.as_ref()
    }

    /// The current chunk downcast to a concrete array type.
    pub fn current_as<A: Array + 'static>(&self) -> Option<&A> {
        self.current.as_ref()?.as_any().downcast_ref::<A>()
    }

    /// Ordinal of the current chunk within the column.
    pub fn chunk_ordinal(&self) -> Option<usize> {
        self.current.as_ref().map(|_| self.next - 1)
    }

    /// Drops the current chunk and the cursor's share of the chunk list.
    /// Subsequent calls to [`advance`](Self::advance) return `false`.
    pub fn release(&mut self) {
        self.current = None;
        self.next = 0;
        self.chunks = Arc::from(Vec::new());
    }

    pub fn is_exhausted(&self) -> bool {
        self.current.is_none() && self.next >= self.chunks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::Int32Array;

    fn column() -> Column {
        Column::from_chunks(
            "a",
            vec![
                Arc::new(Int32Array::from(vec![1, 2])) as ArrayRef,
                Arc::new(Int32Array::from(Vec::<i32>::new())) as ArrayRef,
                Arc::new(Int32Array::from(vec![3])) as ArrayRef,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_advance_over_chunks() {
        let column = column();
        let mut cursor = ChunkCursor::new(&column);
        assert!(cursor.current().is_none());

        let mut lens = Vec::new();
        while cursor.advance() {
            lens.push(cursor.current().unwrap().len());
        }
        assert_eq!(lens, vec![2, 0, 1]);
        assert!(cursor.current().is_none());
        assert!(cursor.is_exhausted());
        assert!(!cursor.advance());
    }

    #[test]
    fn test_holds_one_chunk_reference() {
        let column = column();
        let chunks = column.chunks();
        let base = Arc::strong_count(&chunks[0]);

        let mut cursor = ChunkCursor::new(&column);
        assert!(cursor.advance());
        assert_eq!(cursor.chunk_ordinal(), Some(0));
        assert_eq!(Arc::strong_count(&chunks[0]), base + 1);

        assert!(cursor.advance());
        assert_eq!(Arc::strong_count(&chunks[0]), base);
        assert_eq!(Arc::strong_count(&chunks[1]), base + 1);

        cursor.release();
        assert_eq!(Arc::strong_count(&chunks[1]), base);
        assert!(!cursor.advance());
    }

    #[test]
    fn test_current_as() {
        let column = column();
        let mut cursor = ChunkCursor::new(&column);
        assert!(cursor.advance());
        let chunk = cursor.current_as::<Int32Array>().unwrap();
        assert_eq!(chunk.value(1), 2);
        assert!(cursor.current_as::<arrow_array::StringArray>().is_none());
    }
}
