//! Type-erased values produced by value iterators.

use arrow_buffer::{IntervalDayTime, IntervalMonthDayNano};
use half::f16;
use quiver_common::{Result, error::Error};

use crate::any_iterator::AnyValueIterator;

/// A single non-null value read from a column.
///
/// Nulls are represented by `Option::<GenericValue>::None`, never by a
/// variant. Temporal variants carry the raw tick count of the column's unit.
///
/// List values are live iterators over the list's elements, and struct values
/// carry the current value of every field (in field order, unnamed); both are
/// turned into named/ordered trees by the materializer.
#[derive(Debug)]
pub enum GenericValue {
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float16(f16),
    Float32(f32),
    Float64(f64),
    String(String),
    Binary(Vec<u8>),
    FixedSizeBinary(Vec<u8>),
    Date32(i32),
    Date64(i64),
    Time32(i32),
    Time64(i64),
    Timestamp(i64),
    Duration(i64),
    IntervalYearMonth(i32),
    IntervalDayTime(IntervalDayTime),
    IntervalMonthDayNano(IntervalMonthDayNano),
    Decimal128(i128),
    List(Box<AnyValueIterator>),
    Struct(Vec<Option<GenericValue>>),
}

macro_rules! copy_accessors {
    ($($name:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            #[doc = concat!("Returns the value of a `", stringify!($variant), "` variant.")]
            pub fn $name(&self) -> Result<$ty> {
                match self {
                    GenericValue::$variant(value) => Ok(*value),
                    other => Err(other.mismatch(stringify!($variant))),
                }
            }
        )*
    };
}

impl GenericValue {
    copy_accessors! {
        as_bool => Boolean(bool),
        as_i8 => Int8(i8),
        as_i16 => Int16(i16),
        as_i32 => Int32(i32),
        as_i64 => Int64(i64),
        as_u8 => UInt8(u8),
        as_u16 => UInt16(u16),
        as_u32 => UInt32(u32),
        as_u64 => UInt64(u64),
        as_f16 => Float16(f16),
        as_f32 => Float32(f32),
        as_f64 => Float64(f64),
        as_date32 => Date32(i32),
        as_date64 => Date64(i64),
        as_time32 => Time32(i32),
        as_time64 => Time64(i64),
        as_timestamp => Timestamp(i64),
        as_duration => Duration(i64),
        as_interval_year_month => IntervalYearMonth(i32),
        as_interval_day_time => IntervalDayTime(IntervalDayTime),
        as_interval_month_day_nano => IntervalMonthDayNano(IntervalMonthDayNano),
        as_decimal128 => Decimal128(i128),
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            GenericValue::String(value) => Ok(value),
            other => Err(other.mismatch("String")),
        }
    }

    /// Bytes of a `Binary` or `FixedSizeBinary` value.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            GenericValue::Binary(value) | GenericValue::FixedSizeBinary(value) => Ok(value),
            other => Err(other.mismatch("Binary")),
        }
    }

    pub fn into_list(self) -> Result<Box<AnyValueIterator>> {
        match self {
            GenericValue::List(items) => Ok(items),
            other => Err(other.mismatch("List")),
        }
    }

    pub fn into_struct(self) -> Result<Vec<Option<GenericValue>>> {
        match self {
            GenericValue::Struct(fields) => Ok(fields),
            other => Err(other.mismatch("Struct")),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, GenericValue::List(_) | GenericValue::Struct(_))
    }

    /// Name of the variant, used in error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            GenericValue::Boolean(_) => "Boolean",
            GenericValue::Int8(_) => "Int8",
            GenericValue::Int16(_) => "Int16",
            GenericValue::Int32(_) => "Int32",
            GenericValue::Int64(_) => "Int64",
            GenericValue::UInt8(_) => "UInt8",
            GenericValue::UInt16(_) => "UInt16",
            GenericValue::UInt32(_) => "UInt32",
            GenericValue::UInt64(_) => "UInt64",
            GenericValue::Float16(_) => "Float16",
            GenericValue::Float32(_) => "Float32",
            GenericValue::Float64(_) => "Float64",
            GenericValue::String(_) => "String",
            GenericValue::Binary(_) => "Binary",
            GenericValue::FixedSizeBinary(_) => "FixedSizeBinary",
            GenericValue::Date32(_) => "Date32",
            GenericValue::Date64(_) => "Date64",
            GenericValue::Time32(_) => "Time32",
            GenericValue::Time64(_) => "Time64",
            GenericValue::Timestamp(_) => "Timestamp",
            GenericValue::Duration(_) => "Duration",
            GenericValue::IntervalYearMonth(_) => "IntervalYearMonth",
            GenericValue::IntervalDayTime(_) => "IntervalDayTime",
            GenericValue::IntervalMonthDayNano(_) => "IntervalMonthDayNano",
            GenericValue::Decimal128(_) => "Decimal128",
            GenericValue::List(_) => "List",
            GenericValue::Struct(_) => "Struct",
        }
    }

    #[cold]
    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.variant_name())
    }
}
