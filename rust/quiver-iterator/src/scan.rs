//! The positional traversal shared by every value iterator.

use arrow_array::{Array, ArrayRef};

use crate::{chunk_cursor::ChunkCursor, column::Column};

/// Outcome of a single [`ChunkScan::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Moved to the next slot of the same chunk.
    Row,
    /// Moved to the first slot of a newly acquired chunk.
    NewChunk,
    /// No more slots; the scan holds no chunk anymore.
    Exhausted,
}

/// Slot-by-slot traversal over the chunks of a column, skipping empty chunks.
///
/// Invariant: while not exhausted and after the first successful advance,
/// `index < current chunk length`.
pub(crate) struct ChunkScan {
    cursor: ChunkCursor,
    index: usize,
    done: bool,
}

impl ChunkScan {
    pub fn new(column: &Column) -> ChunkScan {
        ChunkScan {
            cursor: ChunkCursor::new(column),
            index: 0,
            done: false,
        }
    }

    pub fn advance(&mut self) -> Advance {
        if self.done {
            return Advance::Exhausted;
        }

        if self.cursor.current().is_some() {
            self.index += 1;
        }

        let mut new_chunk = false;
        while !self.has_slot() {
            if !self.cursor.advance() {
                self.finish();
                return Advance::Exhausted;
            }
            self.index = 0;
            new_chunk = true;
            log::trace!("moved to chunk {:?}", self.cursor.chunk_ordinal());
        }

        if new_chunk {
            Advance::NewChunk
        } else {
            Advance::Row
        }
    }

    /// The current chunk and slot index, when positioned on a slot.
    pub fn position(&self) -> Option<(&ArrayRef, usize)> {
        let chunk = self.cursor.current()?;
        (self.index < chunk.len()).then_some((chunk, self.index))
    }

    pub fn chunk(&self) -> Option<&ArrayRef> {
        self.cursor.current()
    }

    /// Ends the scan and drops every chunk reference it holds.
    pub fn finish(&mut self) {
        self.done = true;
        self.index = 0;
        self.cursor.release();
    }

    pub fn is_exhausted(&self) -> bool {
        self.done
    }

    fn has_slot(&self) -> bool {
        self.cursor
            .current()
            .is_some_and(|chunk| self.index < chunk.len())
    }
}
