//! Typed, null-aware value iterators over chunked columns.

use std::marker::PhantomData;

use arrow_array::{
    Array,
    types::{
        BinaryType, Date32Type, Date64Type, Decimal128Type, DurationMicrosecondType,
        DurationMillisecondType, DurationNanosecondType, DurationSecondType, Float16Type,
        Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type,
        IntervalDayTimeType, IntervalMonthDayNanoType, IntervalYearMonthType, LargeBinaryType,
        LargeUtf8Type, Time32MillisecondType, Time32SecondType, Time64MicrosecondType,
        Time64NanosecondType, TimestampMicrosecondType, TimestampMillisecondType,
        TimestampNanosecondType, TimestampSecondType, UInt8Type, UInt16Type, UInt32Type,
        UInt64Type, Utf8Type,
    },
};
use arrow_schema::{DataType, FieldRef};
use quiver_common::{Result, error::Error, refcount::RefCount};

use crate::{
    any_iterator::GenericValueIterator,
    column::Column,
    generic_value::GenericValue,
    kinds::{BooleanKind, ByteKind, FixedSizeBinaryKind, PrimitiveKind, ValueKind},
    scan::{Advance, ChunkScan},
};

/// Reads a column value by value, transparently crossing chunk boundaries.
///
/// The iterator starts before the first value; call [`advance`](GenericValueIterator::advance)
/// before reading. Once `advance` returns `false` it keeps returning `false`
/// and the iterator holds no chunk references anymore.
pub struct ValueIterator<K: ValueKind> {
    scan: ChunkScan,
    field: FieldRef,
    refs: RefCount,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ValueKind> ValueIterator<K> {
    /// Creates an iterator over `column`.
    ///
    /// # Errors
    ///
    /// Returns a type-mismatch error if the column's type cannot be read as `K`.
    pub fn try_new(column: &Column) -> Result<Self> {
        if !K::accepts(column.data_type()) {
            return Err(Error::type_mismatch(
                K::type_name(),
                column.data_type().to_string(),
            ));
        }
        log::debug!(
            "value iterator over '{}' ({}, {} chunks)",
            column.name(),
            column.data_type(),
            column.num_chunks()
        );
        Ok(ValueIterator {
            scan: ChunkScan::new(column),
            field: column.field().clone(),
            refs: RefCount::new(),
            _kind: PhantomData,
        })
    }

    /// The chunk the iterator is currently reading.
    pub fn chunk(&self) -> Option<&K::Array> {
        self.scan.chunk()?.as_any().downcast_ref::<K::Array>()
    }

    /// The value at the current position and whether it is null.
    ///
    /// Returns `None` before the first `advance` and after exhaustion. For a
    /// null slot the value is whatever the buffer holds at that position.
    pub fn value(&self) -> Option<(K::Value<'_>, bool)> {
        let (array, index) = self.position()?;
        Some((K::value(array, index), array.is_null(index)))
    }

    /// The value at the current position, or `None` if it is null (or the
    /// iterator is not positioned on a value).
    pub fn current(&self) -> Option<K::Value<'_>> {
        let (array, index) = self.position()?;
        if array.is_null(index) {
            None
        } else {
            Some(K::value(array, index))
        }
    }

    pub fn is_null(&self) -> bool {
        self.position()
            .is_none_or(|(array, index)| array.is_null(index))
    }

    pub fn is_exhausted(&self) -> bool {
        self.scan.is_exhausted()
    }

    pub fn ref_count(&self) -> usize {
        self.refs.count()
    }

    fn position(&self) -> Option<(&K::Array, usize)> {
        let (chunk, index) = self.scan.position()?;
        let array = chunk.as_any().downcast_ref::<K::Array>()?;
        Some((array, index))
    }
}

impl<K: ValueKind> GenericValueIterator for ValueIterator<K> {
    fn advance(&mut self) -> bool {
        self.scan.advance() != Advance::Exhausted
    }

    fn current_as_generic(&self) -> Result<Option<GenericValue>> {
        Ok(self.current().map(|value| K::to_generic(value)))
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

/// Iterator over a column of the `Null` type: every slot is null.
pub struct NullValueIterator {
    scan: ChunkScan,
    field: FieldRef,
    refs: RefCount,
}

impl NullValueIterator {
    pub fn try_new(column: &Column) -> Result<Self> {
        if column.data_type() != &DataType::Null {
            return Err(Error::type_mismatch(
                DataType::Null.to_string(),
                column.data_type().to_string(),
            ));
        }
        Ok(NullValueIterator {
            scan: ChunkScan::new(column),
            field: column.field().clone(),
            refs: RefCount::new(),
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.scan.is_exhausted()
    }
}

impl GenericValueIterator for NullValueIterator {
    fn advance(&mut self) -> bool {
        self.scan.advance() != Advance::Exhausted
    }

    fn current_as_generic(&self) -> Result<Option<GenericValue>> {
        Ok(None)
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

pub type BooleanValueIterator = ValueIterator<BooleanKind>;
pub type Int8ValueIterator = ValueIterator<PrimitiveKind<Int8Type>>;
pub type Int16ValueIterator = ValueIterator<PrimitiveKind<Int16Type>>;
pub type Int32ValueIterator = ValueIterator<PrimitiveKind<Int32Type>>;
pub type Int64ValueIterator = ValueIterator<PrimitiveKind<Int64Type>>;
pub type UInt8ValueIterator = ValueIterator<PrimitiveKind<UInt8Type>>;
pub type UInt16ValueIterator = ValueIterator<PrimitiveKind<UInt16Type>>;
pub type UInt32ValueIterator = ValueIterator<PrimitiveKind<UInt32Type>>;
pub type UInt64ValueIterator = ValueIterator<PrimitiveKind<UInt64Type>>;
pub type Float16ValueIterator = ValueIterator<PrimitiveKind<Float16Type>>;
pub type Float32ValueIterator = ValueIterator<PrimitiveKind<Float32Type>>;
pub type Float64ValueIterator = ValueIterator<PrimitiveKind<Float64Type>>;
pub type StringValueIterator = ValueIterator<ByteKind<Utf8Type>>;
pub type LargeStringValueIterator = ValueIterator<ByteKind<LargeUtf8Type>>;
pub type BinaryValueIterator = ValueIterator<ByteKind<BinaryType>>;
pub type LargeBinaryValueIterator = ValueIterator<ByteKind<LargeBinaryType>>;
pub type FixedSizeBinaryValueIterator = ValueIterator<FixedSizeBinaryKind>;
pub type Date32ValueIterator = ValueIterator<PrimitiveKind<Date32Type>>;
pub type Date64ValueIterator = ValueIterator<PrimitiveKind<Date64Type>>;
pub type Time32SecondValueIterator = ValueIterator<PrimitiveKind<Time32SecondType>>;
pub type Time32MillisecondValueIterator = ValueIterator<PrimitiveKind<Time32MillisecondType>>;
pub type Time64MicrosecondValueIterator = ValueIterator<PrimitiveKind<Time64MicrosecondType>>;
pub type Time64NanosecondValueIterator = ValueIterator<PrimitiveKind<Time64NanosecondType>>;
pub type TimestampSecondValueIterator = ValueIterator<PrimitiveKind<TimestampSecondType>>;
pub type TimestampMillisecondValueIterator =
    ValueIterator<PrimitiveKind<TimestampMillisecondType>>;
pub type TimestampMicrosecondValueIterator =
    ValueIterator<PrimitiveKind<TimestampMicrosecondType>>;
pub type TimestampNanosecondValueIterator = ValueIterator<PrimitiveKind<TimestampNanosecondType>>;
pub type DurationSecondValueIterator = ValueIterator<PrimitiveKind<DurationSecondType>>;
pub type DurationMillisecondValueIterator = ValueIterator<PrimitiveKind<DurationMillisecondType>>;
pub type DurationMicrosecondValueIterator = ValueIterator<PrimitiveKind<DurationMicrosecondType>>;
pub type DurationNanosecondValueIterator = ValueIterator<PrimitiveKind<DurationNanosecondType>>;
pub type IntervalYearMonthValueIterator = ValueIterator<PrimitiveKind<IntervalYearMonthType>>;
pub type IntervalDayTimeValueIterator = ValueIterator<PrimitiveKind<IntervalDayTimeType>>;
pub type IntervalMonthDayNanoValueIterator =
    ValueIterator<PrimitiveKind<IntervalMonthDayNanoType>>;
pub type Decimal128ValueIterator = ValueIterator<PrimitiveKind<Decimal128Type>>;
