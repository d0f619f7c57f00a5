//! Element kinds: how a value iterator reads one slot of a concrete Arrow
//! array and how that slot becomes a [`GenericValue`].
//!
//! The traversal logic lives once in [`ValueIterator`](crate::value_iterator::ValueIterator);
//! a kind only describes the array type, the element accessor and the
//! conversion. Primitive types share [`PrimitiveKind`], byte arrays share
//! [`ByteKind`].

use std::marker::PhantomData;

use arrow_array::{
    Array, BooleanArray, FixedSizeBinaryArray, GenericByteArray, OffsetSizeTrait, PrimitiveArray,
    types::{
        ArrowPrimitiveType, ByteArrayType, Date32Type, Date64Type, Decimal128Type,
        DurationMicrosecondType, DurationMillisecondType, DurationNanosecondType,
        DurationSecondType, Float16Type, Float32Type, Float64Type, GenericBinaryType,
        GenericStringType, Int8Type, Int16Type, Int32Type, Int64Type, IntervalDayTimeType,
        IntervalMonthDayNanoType, IntervalYearMonthType, Time32MillisecondType,
        Time32SecondType, Time64MicrosecondType, Time64NanosecondType,
        TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
        TimestampSecondType, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
    },
};
use arrow_schema::DataType;

use crate::generic_value::GenericValue;

/// Describes how to read the elements of one concrete Arrow array type.
pub trait ValueKind: Send + Sync + 'static {
    /// The concrete array type of every chunk.
    type Array: Array + 'static;

    /// The element type as read from the array (borrowed for byte arrays).
    type Value<'a>
    where
        Self: 'a;

    /// Human readable name of the accepted type, used in error messages.
    fn type_name() -> String;

    /// Whether a column of `data_type` can be read with this kind.
    fn accepts(data_type: &DataType) -> bool;

    /// Reads the (possibly garbage, if null) value at `index`.
    fn value(array: &Self::Array, index: usize) -> Self::Value<'_>;

    fn to_generic(value: Self::Value<'_>) -> GenericValue;
}

pub struct BooleanKind;

impl ValueKind for BooleanKind {
    type Array = BooleanArray;
    type Value<'a> = bool;

    fn type_name() -> String {
        DataType::Boolean.to_string()
    }

    fn accepts(data_type: &DataType) -> bool {
        matches!(data_type, DataType::Boolean)
    }

    fn value(array: &BooleanArray, index: usize) -> bool {
        array.value(index)
    }

    fn to_generic(value: bool) -> GenericValue {
        GenericValue::Boolean(value)
    }
}

/// Primitive types that map onto a [`GenericValue`] variant.
pub trait PrimitiveValue: ArrowPrimitiveType {
    fn into_generic(value: Self::Native) -> GenericValue;
}

macro_rules! primitive_values {
    ($($arrow_type:ty => $variant:ident),* $(,)?) => {
        $(
            impl PrimitiveValue for $arrow_type {
                #[inline]
                fn into_generic(value: Self::Native) -> GenericValue {
                    GenericValue::$variant(value)
                }
            }
        )*
    };
}

primitive_values! {
    Int8Type => Int8,
    Int16Type => Int16,
    Int32Type => Int32,
    Int64Type => Int64,
    UInt8Type => UInt8,
    UInt16Type => UInt16,
    UInt32Type => UInt32,
    UInt64Type => UInt64,
    Float16Type => Float16,
    Float32Type => Float32,
    Float64Type => Float64,
    Date32Type => Date32,
    Date64Type => Date64,
    Time32SecondType => Time32,
    Time32MillisecondType => Time32,
    Time64MicrosecondType => Time64,
    Time64NanosecondType => Time64,
    TimestampSecondType => Timestamp,
    TimestampMillisecondType => Timestamp,
    TimestampMicrosecondType => Timestamp,
    TimestampNanosecondType => Timestamp,
    DurationSecondType => Duration,
    DurationMillisecondType => Duration,
    DurationMicrosecondType => Duration,
    DurationNanosecondType => Duration,
    IntervalYearMonthType => IntervalYearMonth,
    IntervalDayTimeType => IntervalDayTime,
    IntervalMonthDayNanoType => IntervalMonthDayNano,
    Decimal128Type => Decimal128,
}

pub struct PrimitiveKind<T>(PhantomData<fn() -> T>);

impl<T: PrimitiveValue> ValueKind for PrimitiveKind<T> {
    type Array = PrimitiveArray<T>;
    type Value<'a> = T::Native;

    fn type_name() -> String {
        T::DATA_TYPE.to_string()
    }

    fn accepts(data_type: &DataType) -> bool {
        // Matches timestamps regardless of time zone and decimals regardless
        // of precision/scale.
        PrimitiveArray::<T>::is_compatible(data_type)
    }

    #[inline]
    fn value(array: &PrimitiveArray<T>, index: usize) -> T::Native {
        array.value(index)
    }

    #[inline]
    fn to_generic(value: T::Native) -> GenericValue {
        T::into_generic(value)
    }
}

/// Variable-length byte array types that map onto a [`GenericValue`] variant.
pub trait ByteValue: ByteArrayType {
    fn into_generic(value: &Self::Native) -> GenericValue;
}

impl<O: OffsetSizeTrait> ByteValue for GenericStringType<O> {
    fn into_generic(value: &str) -> GenericValue {
        GenericValue::String(value.to_owned())
    }
}

impl<O: OffsetSizeTrait> ByteValue for GenericBinaryType<O> {
    fn into_generic(value: &[u8]) -> GenericValue {
        GenericValue::Binary(value.to_vec())
    }
}

pub struct ByteKind<T>(PhantomData<fn() -> T>);

impl<T: ByteValue> ValueKind for ByteKind<T> {
    type Array = GenericByteArray<T>;
    type Value<'a> = &'a T::Native;

    fn type_name() -> String {
        T::DATA_TYPE.to_string()
    }

    fn accepts(data_type: &DataType) -> bool {
        data_type == &T::DATA_TYPE
    }

    #[inline]
    fn value(array: &GenericByteArray<T>, index: usize) -> &T::Native {
        array.value(index)
    }

    fn to_generic(value: &T::Native) -> GenericValue {
        T::into_generic(value)
    }
}

pub struct FixedSizeBinaryKind;

impl ValueKind for FixedSizeBinaryKind {
    type Array = FixedSizeBinaryArray;
    type Value<'a> = &'a [u8];

    fn type_name() -> String {
        "FixedSizeBinary".to_string()
    }

    fn accepts(data_type: &DataType) -> bool {
        matches!(data_type, DataType::FixedSizeBinary(_))
    }

    fn value(array: &FixedSizeBinaryArray, index: usize) -> &[u8] {
        array.value(index)
    }

    fn to_generic(value: &[u8]) -> GenericValue {
        GenericValue::FixedSizeBinary(value.to_vec())
    }
}
