//! The type-erased value iterator.
//!
//! [`GenericValueIterator`] is the capability set every iterator provides.
//! [`AnyValueIterator`] is a closed enum over all supported iterator kinds;
//! adding a kind means adding a variant, and every `match` over the enum
//! is checked for exhaustiveness.

use std::fmt;

use arrow_schema::{DataType, FieldRef, IntervalUnit, TimeUnit};
use quiver_common::{Result, error::Error};

use crate::{
    column::Column,
    generic_value::GenericValue,
    list_iterator::ListValueIterator,
    struct_iterator::StructValueIterator,
    value_iterator::{
        BinaryValueIterator, BooleanValueIterator, Date32ValueIterator, Date64ValueIterator,
        Decimal128ValueIterator, DurationMicrosecondValueIterator,
        DurationMillisecondValueIterator, DurationNanosecondValueIterator,
        DurationSecondValueIterator, FixedSizeBinaryValueIterator, Float16ValueIterator,
        Float32ValueIterator, Float64ValueIterator, Int8ValueIterator, Int16ValueIterator,
        Int32ValueIterator, Int64ValueIterator, IntervalDayTimeValueIterator,
        IntervalMonthDayNanoValueIterator, IntervalYearMonthValueIterator,
        LargeBinaryValueIterator, LargeStringValueIterator, NullValueIterator,
        StringValueIterator, Time32MillisecondValueIterator, Time32SecondValueIterator,
        Time64MicrosecondValueIterator, Time64NanosecondValueIterator,
        TimestampMicrosecondValueIterator, TimestampMillisecondValueIterator,
        TimestampNanosecondValueIterator, TimestampSecondValueIterator, UInt8ValueIterator,
        UInt16ValueIterator, UInt32ValueIterator, UInt64ValueIterator, ValueIterator,
    },
};

/// Positional, null-aware access to the values of one column.
///
/// An iterator starts before its first value. `advance` moves to the next
/// value and returns `false` once the column is exhausted, and keeps
/// returning `false` afterwards.
///
/// `retain`/`release` implement an explicit reference count on top of the
/// iterator's scoped ownership: the count starts at one, and the release
/// that brings it to zero drops every chunk the iterator holds. Dropping the
/// iterator releases everything as well.
pub trait GenericValueIterator {
    fn advance(&mut self) -> bool;

    /// The current value, or `None` if it is null or the iterator is not
    /// positioned on a value.
    fn current_as_generic(&self) -> Result<Option<GenericValue>>;

    fn retain(&self);

    /// Returns `true` if this call released the last reference.
    fn release(&mut self) -> bool;

    fn field(&self) -> &FieldRef;

    fn data_type(&self) -> &DataType {
        self.field().data_type()
    }
}

macro_rules! any_value_iterator {
    ($($variant:ident($iter:ty) => $as_ref:ident, $as_mut:ident;)*) => {
        /// An iterator over a column of any supported type.
        pub enum AnyValueIterator {
            $($variant($iter),)*
        }

        impl GenericValueIterator for AnyValueIterator {
            fn advance(&mut self) -> bool {
                match self {
                    $(AnyValueIterator::$variant(it) => it.advance(),)*
                }
            }

            fn current_as_generic(&self) -> Result<Option<GenericValue>> {
                match self {
                    $(AnyValueIterator::$variant(it) => it.current_as_generic(),)*
                }
            }

            fn retain(&self) {
                match self {
                    $(AnyValueIterator::$variant(it) => it.retain(),)*
                }
            }

            fn release(&mut self) -> bool {
                match self {
                    $(AnyValueIterator::$variant(it) => it.release(),)*
                }
            }

            fn field(&self) -> &FieldRef {
                match self {
                    $(AnyValueIterator::$variant(it) => it.field(),)*
                }
            }
        }

        impl AnyValueIterator {
            /// Name of the iterator variant.
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(AnyValueIterator::$variant(_) => stringify!($variant),)*
                }
            }

            $(
                #[doc = concat!("The `", stringify!($variant), "` iterator, or a type-mismatch error.")]
                pub fn $as_ref(&self) -> Result<&$iter> {
                    match self {
                        AnyValueIterator::$variant(it) => Ok(it),
                        other => Err(other.mismatch(stringify!($variant))),
                    }
                }

                pub fn $as_mut(&mut self) -> Result<&mut $iter> {
                    match self {
                        AnyValueIterator::$variant(it) => Ok(it),
                        other => Err(other.mismatch(stringify!($variant))),
                    }
                }
            )*
        }
    };
}

any_value_iterator! {
    Null(NullValueIterator) => as_null, as_null_mut;
    Boolean(BooleanValueIterator) => as_boolean, as_boolean_mut;
    Int8(Int8ValueIterator) => as_int8, as_int8_mut;
    Int16(Int16ValueIterator) => as_int16, as_int16_mut;
    Int32(Int32ValueIterator) => as_int32, as_int32_mut;
    Int64(Int64ValueIterator) => as_int64, as_int64_mut;
    UInt8(UInt8ValueIterator) => as_uint8, as_uint8_mut;
    UInt16(UInt16ValueIterator) => as_uint16, as_uint16_mut;
    UInt32(UInt32ValueIterator) => as_uint32, as_uint32_mut;
    UInt64(UInt64ValueIterator) => as_uint64, as_uint64_mut;
    Float16(Float16ValueIterator) => as_float16, as_float16_mut;
    Float32(Float32ValueIterator) => as_float32, as_float32_mut;
    Float64(Float64ValueIterator) => as_float64, as_float64_mut;
    Utf8(StringValueIterator) => as_utf8, as_utf8_mut;
    LargeUtf8(LargeStringValueIterator) => as_large_utf8, as_large_utf8_mut;
    Binary(BinaryValueIterator) => as_binary, as_binary_mut;
    LargeBinary(LargeBinaryValueIterator) => as_large_binary, as_large_binary_mut;
    FixedSizeBinary(FixedSizeBinaryValueIterator) => as_fixed_size_binary, as_fixed_size_binary_mut;
    Date32(Date32ValueIterator) => as_date32, as_date32_mut;
    Date64(Date64ValueIterator) => as_date64, as_date64_mut;
    Time32Second(Time32SecondValueIterator) => as_time32_second, as_time32_second_mut;
    Time32Millisecond(Time32MillisecondValueIterator) => as_time32_millisecond, as_time32_millisecond_mut;
    Time64Microsecond(Time64MicrosecondValueIterator) => as_time64_microsecond, as_time64_microsecond_mut;
    Time64Nanosecond(Time64NanosecondValueIterator) => as_time64_nanosecond, as_time64_nanosecond_mut;
    TimestampSecond(TimestampSecondValueIterator) => as_timestamp_second, as_timestamp_second_mut;
    TimestampMillisecond(TimestampMillisecondValueIterator) => as_timestamp_millisecond, as_timestamp_millisecond_mut;
    TimestampMicrosecond(TimestampMicrosecondValueIterator) => as_timestamp_microsecond, as_timestamp_microsecond_mut;
    TimestampNanosecond(TimestampNanosecondValueIterator) => as_timestamp_nanosecond, as_timestamp_nanosecond_mut;
    DurationSecond(DurationSecondValueIterator) => as_duration_second, as_duration_second_mut;
    DurationMillisecond(DurationMillisecondValueIterator) => as_duration_millisecond, as_duration_millisecond_mut;
    DurationMicrosecond(DurationMicrosecondValueIterator) => as_duration_microsecond, as_duration_microsecond_mut;
    DurationNanosecond(DurationNanosecondValueIterator) => as_duration_nanosecond, as_duration_nanosecond_mut;
    IntervalYearMonth(IntervalYearMonthValueIterator) => as_interval_year_month, as_interval_year_month_mut;
    IntervalDayTime(IntervalDayTimeValueIterator) => as_interval_day_time, as_interval_day_time_mut;
    IntervalMonthDayNano(IntervalMonthDayNanoValueIterator) => as_interval_month_day_nano, as_interval_month_day_nano_mut;
    Decimal128(Decimal128ValueIterator) => as_decimal128, as_decimal128_mut;
    List(ListValueIterator<i32>) => as_list, as_list_mut;
    LargeList(ListValueIterator<i64>) => as_large_list, as_large_list_mut;
    Struct(StructValueIterator) => as_struct, as_struct_mut;
}

impl AnyValueIterator {
    /// Creates an iterator matching the column's data type.
    ///
    /// # Errors
    ///
    /// An unsupported-type error if the column's type, or the element or
    /// field type of a nested column at any depth, cannot be iterated.
    pub fn try_new(column: &Column) -> Result<AnyValueIterator> {
        let it = match column.data_type() {
            DataType::Null => AnyValueIterator::Null(NullValueIterator::try_new(column)?),
            DataType::Boolean => AnyValueIterator::Boolean(ValueIterator::try_new(column)?),
            DataType::Int8 => AnyValueIterator::Int8(ValueIterator::try_new(column)?),
            DataType::Int16 => AnyValueIterator::Int16(ValueIterator::try_new(column)?),
            DataType::Int32 => AnyValueIterator::Int32(ValueIterator::try_new(column)?),
            DataType::Int64 => AnyValueIterator::Int64(ValueIterator::try_new(column)?),
            DataType::UInt8 => AnyValueIterator::UInt8(ValueIterator::try_new(column)?),
            DataType::UInt16 => AnyValueIterator::UInt16(ValueIterator::try_new(column)?),
            DataType::UInt32 => AnyValueIterator::UInt32(ValueIterator::try_new(column)?),
            DataType::UInt64 => AnyValueIterator::UInt64(ValueIterator::try_new(column)?),
            DataType::Float16 => AnyValueIterator::Float16(ValueIterator::try_new(column)?),
            DataType::Float32 => AnyValueIterator::Float32(ValueIterator::try_new(column)?),
            DataType::Float64 => AnyValueIterator::Float64(ValueIterator::try_new(column)?),
            DataType::Utf8 => AnyValueIterator::Utf8(ValueIterator::try_new(column)?),
            DataType::LargeUtf8 => AnyValueIterator::LargeUtf8(ValueIterator::try_new(column)?),
            DataType::Binary => AnyValueIterator::Binary(ValueIterator::try_new(column)?),
            DataType::LargeBinary => {
                AnyValueIterator::LargeBinary(ValueIterator::try_new(column)?)
            }
            DataType::FixedSizeBinary(_) => {
                AnyValueIterator::FixedSizeBinary(ValueIterator::try_new(column)?)
            }
            DataType::Date32 => AnyValueIterator::Date32(ValueIterator::try_new(column)?),
            DataType::Date64 => AnyValueIterator::Date64(ValueIterator::try_new(column)?),
            DataType::Time32(TimeUnit::Second) => {
                AnyValueIterator::Time32Second(ValueIterator::try_new(column)?)
            }
            DataType::Time32(TimeUnit::Millisecond) => {
                AnyValueIterator::Time32Millisecond(ValueIterator::try_new(column)?)
            }
            DataType::Time64(TimeUnit::Microsecond) => {
                AnyValueIterator::Time64Microsecond(ValueIterator::try_new(column)?)
            }
            DataType::Time64(TimeUnit::Nanosecond) => {
                AnyValueIterator::Time64Nanosecond(ValueIterator::try_new(column)?)
            }
            DataType::Timestamp(unit, _) => match unit {
                TimeUnit::Second => {
                    AnyValueIterator::TimestampSecond(ValueIterator::try_new(column)?)
                }
                TimeUnit::Millisecond => {
                    AnyValueIterator::TimestampMillisecond(ValueIterator::try_new(column)?)
                }
                TimeUnit::Microsecond => {
                    AnyValueIterator::TimestampMicrosecond(ValueIterator::try_new(column)?)
                }
                TimeUnit::Nanosecond => {
                    AnyValueIterator::TimestampNanosecond(ValueIterator::try_new(column)?)
                }
            },
            DataType::Duration(unit) => match unit {
                TimeUnit::Second => {
                    AnyValueIterator::DurationSecond(ValueIterator::try_new(column)?)
                }
                TimeUnit::Millisecond => {
                    AnyValueIterator::DurationMillisecond(ValueIterator::try_new(column)?)
                }
                TimeUnit::Microsecond => {
                    AnyValueIterator::DurationMicrosecond(ValueIterator::try_new(column)?)
                }
                TimeUnit::Nanosecond => {
                    AnyValueIterator::DurationNanosecond(ValueIterator::try_new(column)?)
                }
            },
            DataType::Interval(IntervalUnit::YearMonth) => {
                AnyValueIterator::IntervalYearMonth(ValueIterator::try_new(column)?)
            }
            DataType::Interval(IntervalUnit::DayTime) => {
                AnyValueIterator::IntervalDayTime(ValueIterator::try_new(column)?)
            }
            DataType::Interval(IntervalUnit::MonthDayNano) => {
                AnyValueIterator::IntervalMonthDayNano(ValueIterator::try_new(column)?)
            }
            DataType::Decimal128(_, _) => {
                AnyValueIterator::Decimal128(ValueIterator::try_new(column)?)
            }
            DataType::List(_) => AnyValueIterator::List(ListValueIterator::try_new(column)?),
            DataType::LargeList(_) => {
                AnyValueIterator::LargeList(ListValueIterator::try_new(column)?)
            }
            DataType::Struct(_) => AnyValueIterator::Struct(StructValueIterator::try_new(column)?),
            other => return Err(Error::unsupported_type(other)),
        };
        Ok(it)
    }

    /// Whether a column of `data_type` can be iterated.
    pub fn supports(data_type: &DataType) -> bool {
        Self::ensure_supported(data_type).is_ok()
    }

    /// Checks that `data_type`, including every nested element and field
    /// type, has an iterator.
    pub fn ensure_supported(data_type: &DataType) -> Result<()> {
        match data_type {
            DataType::List(item) | DataType::LargeList(item) => {
                Self::ensure_supported(item.data_type())
            }
            DataType::Struct(fields) => fields
                .iter()
                .try_for_each(|field| Self::ensure_supported(field.data_type())),
            DataType::Null
            | DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Binary
            | DataType::LargeBinary
            | DataType::FixedSizeBinary(_)
            | DataType::Date32
            | DataType::Date64
            | DataType::Time32(TimeUnit::Second | TimeUnit::Millisecond)
            | DataType::Time64(TimeUnit::Microsecond | TimeUnit::Nanosecond)
            | DataType::Timestamp(_, _)
            | DataType::Duration(_)
            | DataType::Interval(_)
            | DataType::Decimal128(_, _) => Ok(()),
            other => Err(Error::unsupported_type(other)),
        }
    }

    #[cold]
    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.kind_name())
    }
}

impl fmt::Debug for AnyValueIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyValueIterator")
            .field("kind", &self.kind_name())
            .field("field", self.field().name())
            .field("data_type", self.data_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use arrow_array::{
        Array, ArrayRef, Decimal256Array, Int32Array, ListArray, StringArray,
        TimestampMillisecondArray, types::Int32Type,
    };
    use arrow_buffer::i256;
    use arrow_schema::Field;

    #[test]
    fn test_dispatch_by_type() {
        let column = Column::from_array("i", Arc::new(Int32Array::from(vec![Some(5), None])));
        let mut it = AnyValueIterator::try_new(&column).unwrap();
        assert_eq!(it.kind_name(), "Int32");
        assert_eq!(it.data_type(), &DataType::Int32);
        assert!(it.advance());
        assert_eq!(it.as_int32().unwrap().current(), Some(5));
        assert!(it.advance());
        assert!(it.current_as_generic().unwrap().is_none());
        assert!(!it.advance());
        assert!(!it.advance());
    }

    #[test]
    fn test_timestamp_with_time_zone() {
        let array = TimestampMillisecondArray::from(vec![1_000]).with_timezone("+02:00");
        let column = Column::from_array("ts", Arc::new(array));
        let mut it = AnyValueIterator::try_new(&column).unwrap();
        assert_eq!(it.kind_name(), "TimestampMillisecond");
        assert!(it.advance());
        let value = it.current_as_generic().unwrap().unwrap();
        assert_eq!(value.as_timestamp().unwrap(), 1_000);
    }

    #[test]
    fn test_typed_accessor_mismatch() {
        let column = Column::from_array("s", Arc::new(StringArray::from(vec!["a"])));
        let mut it = AnyValueIterator::try_new(&column).unwrap();
        let err = it.as_int32().err().unwrap();
        assert!(err.is_type_mismatch());
        assert_eq!(err.to_string(), "type mismatch: expected Int32, got Utf8");
        assert!(it.as_utf8_mut().is_ok());
    }

    #[test]
    fn test_unsupported_types() {
        let column = Column::from_array(
            "d",
            Arc::new(Decimal256Array::from(vec![i256::from(1)])) as ArrayRef,
        );
        let err = AnyValueIterator::try_new(&column).err().unwrap();
        assert!(err.is_unsupported_type());

        let nested = DataType::List(Arc::new(Field::new_list_field(
            DataType::Decimal256(40, 2),
            true,
        )));
        assert!(!AnyValueIterator::supports(&nested));
        assert!(AnyValueIterator::supports(&DataType::List(Arc::new(
            Field::new_list_field(DataType::Utf8, true)
        ))));
        assert!(!AnyValueIterator::supports(&DataType::Time32(
            TimeUnit::Nanosecond
        )));
    }

    #[test]
    fn test_nested_list_of_lists() {
        let inner = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(1), Some(2)]),
            Some(vec![Some(3)]),
        ]);
        let outer = ListArray::new(
            Arc::new(Field::new_list_field(inner.data_type().clone(), true)),
            arrow_buffer::OffsetBuffer::new(vec![0, 2].into()),
            Arc::new(inner),
            None,
        );
        let column = Column::from_array("ll", Arc::new(outer));
        let mut it = AnyValueIterator::try_new(&column).unwrap();
        assert!(it.advance());

        let mut lists = it.current_as_generic().unwrap().unwrap().into_list().unwrap();
        let mut sums = Vec::new();
        while lists.advance() {
            let mut items = lists.current_as_generic().unwrap().unwrap().into_list().unwrap();
            let mut sum = 0;
            while items.advance() {
                sum += items.current_as_generic().unwrap().unwrap().as_i32().unwrap();
            }
            sums.push(sum);
        }
        assert_eq!(sums, vec![3, 3]);
    }

    #[test]
    fn test_debug() {
        let column = Column::from_array("i", Arc::new(Int32Array::from(vec![1])));
        let it = AnyValueIterator::try_new(&column).unwrap();
        let text = format!("{it:?}");
        assert!(text.contains("Int32"));
        assert!(text.contains("\"i\""));
    }
}
