//! Conversion of generic values into JSON trees.

use arrow_schema::{DataType, Fields, IntervalUnit};
use quiver_common::{Result, error::Error};
use quiver_iterator::{AnyValueIterator, GenericValue, GenericValueIterator, StepValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Two's-complement halves of a 128-bit decimal: `value == hi * 2^64 + lo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decimal128Parts {
    pub lo: u64,
    pub hi: i64,
}

impl Decimal128Parts {
    pub fn value(&self) -> i128 {
        ((self.hi as i128) << 64) | self.lo as i128
    }
}

impl From<i128> for Decimal128Parts {
    fn from(value: i128) -> Self {
        Decimal128Parts {
            lo: value as u64,
            hi: (value >> 64) as i64,
        }
    }
}

#[derive(Serialize)]
struct DayTime {
    days: i32,
    milliseconds: i32,
}

#[derive(Serialize)]
struct MonthDayNano {
    months: i32,
    days: i32,
    nanoseconds: i64,
}

/// Converts one value of a column of `data_type` into JSON.
///
/// * `None` (null) becomes `Null` regardless of the type.
/// * Booleans, integers, floats and strings pass through. `Float32` values
///   keep their shortest 32-bit decimal form (`0.1f32` is written as `0.1`).
///   Half floats are widened to `f32`. Non-finite floats become `Null`.
/// * `Decimal128` becomes `{"hi": i64, "lo": u64}` (see [`Decimal128Parts`]).
/// * Binary and fixed-size binary values become upper-case hex strings.
/// * Dates, times, timestamps and durations become their raw tick count,
///   year-month intervals a month count; day-time and month-day-nano
///   intervals become objects of their components.
/// * Lists become arrays (the list iterator is drained), structs become
///   objects keyed by the field names of `data_type`. Field names must be
///   unique.
///
/// # Errors
///
/// * type mismatch if the value does not belong to `data_type`,
/// * unsupported type if `data_type` has no JSON rendering,
/// * length mismatch for a fixed-size binary value of the wrong width or a
///   struct value whose field count differs from the type's,
/// * invalid argument for a struct with duplicate field names.
pub fn materialize(data_type: &DataType, value: Option<GenericValue>) -> Result<Value> {
    let Some(value) = value else {
        return Ok(Value::Null);
    };

    let json = match (data_type, value) {
        (DataType::Boolean, GenericValue::Boolean(v)) => Value::Bool(v),
        (DataType::Int8, GenericValue::Int8(v)) => v.into(),
        (DataType::Int16, GenericValue::Int16(v)) => v.into(),
        (DataType::Int32, GenericValue::Int32(v)) => v.into(),
        (DataType::Int64, GenericValue::Int64(v)) => v.into(),
        (DataType::UInt8, GenericValue::UInt8(v)) => v.into(),
        (DataType::UInt16, GenericValue::UInt16(v)) => v.into(),
        (DataType::UInt32, GenericValue::UInt32(v)) => v.into(),
        (DataType::UInt64, GenericValue::UInt64(v)) => v.into(),
        (DataType::Float16, GenericValue::Float16(v)) => float32(v.to_f32()),
        (DataType::Float32, GenericValue::Float32(v)) => float32(v),
        (DataType::Float64, GenericValue::Float64(v)) => v.into(),
        (DataType::Utf8 | DataType::LargeUtf8, GenericValue::String(v)) => Value::String(v),
        (DataType::Binary | DataType::LargeBinary, GenericValue::Binary(v)) => {
            Value::String(hex::encode_upper(v))
        }
        (DataType::FixedSizeBinary(width), GenericValue::FixedSizeBinary(v)) => {
            fixed_size_hex(*width, &v)?
        }
        (DataType::Date32, GenericValue::Date32(v)) => v.into(),
        (DataType::Date64, GenericValue::Date64(v)) => v.into(),
        (DataType::Time32(_), GenericValue::Time32(v)) => v.into(),
        (DataType::Time64(_), GenericValue::Time64(v)) => v.into(),
        (DataType::Timestamp(_, _), GenericValue::Timestamp(v)) => v.into(),
        (DataType::Duration(_), GenericValue::Duration(v)) => v.into(),
        (DataType::Interval(IntervalUnit::YearMonth), GenericValue::IntervalYearMonth(v)) => {
            v.into()
        }
        (DataType::Interval(IntervalUnit::DayTime), GenericValue::IntervalDayTime(v)) => {
            serde_json::to_value(DayTime {
                days: v.days,
                milliseconds: v.milliseconds,
            })?
        }
        (
            DataType::Interval(IntervalUnit::MonthDayNano),
            GenericValue::IntervalMonthDayNano(v),
        ) => serde_json::to_value(MonthDayNano {
            months: v.months,
            days: v.days,
            nanoseconds: v.nanoseconds,
        })?,
        (DataType::Decimal128(_, _), GenericValue::Decimal128(v)) => {
            serde_json::to_value(Decimal128Parts::from(v))?
        }
        (DataType::List(item) | DataType::LargeList(item), GenericValue::List(items)) => {
            materialize_list(item.data_type(), items)?
        }
        (DataType::Struct(fields), GenericValue::Struct(values)) => {
            Value::Object(materialize_struct(fields, values)?)
        }
        (data_type, value) => {
            return Err(if AnyValueIterator::supports(data_type) {
                Error::type_mismatch(data_type.to_string(), value.variant_name())
            } else {
                Error::unsupported_type(data_type)
            });
        }
    };
    Ok(json)
}

/// Builds the JSON object of one row, keyed by the names of `fields`.
///
/// Columns that had no row at this step are written as `null`. Duplicate
/// column names are rejected with an invalid-argument error.
pub fn materialize_row(fields: &Fields, row: StepValue) -> Result<Map<String, Value>> {
    if fields.len() != row.len() {
        return Err(Error::length_mismatch(
            "row columns",
            fields.len() as u64,
            row.len() as u64,
        ));
    }
    let (values, _, _) = row.into_parts();
    materialize_struct(fields, values)
}

fn materialize_list(item_type: &DataType, mut items: Box<AnyValueIterator>) -> Result<Value> {
    let mut elements = Vec::new();
    while items.advance() {
        elements.push(materialize(item_type, items.current_as_generic()?)?);
    }
    Ok(Value::Array(elements))
}

fn materialize_struct(fields: &Fields, values: Vec<Option<GenericValue>>) -> Result<Map<String, Value>> {
    if fields.len() != values.len() {
        return Err(Error::length_mismatch(
            "struct fields",
            fields.len() as u64,
            values.len() as u64,
        ));
    }
    let mut object = Map::with_capacity(fields.len());
    for (field, value) in fields.iter().zip(values) {
        let json = materialize(field.data_type(), value)?;
        if object.insert(field.name().clone(), json).is_some() {
            return Err(Error::invalid_arg(field.name(), "duplicate field name"));
        }
    }
    Ok(object)
}

/// The shortest `f32` decimal form as a JSON number.
fn float32(v: f32) -> Value {
    if !v.is_finite() {
        return Value::Null;
    }
    v.to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

fn fixed_size_hex(width: i32, bytes: &[u8]) -> Result<Value> {
    let text = hex::encode_upper(bytes);
    let expected = 2 * width.max(0) as u64;
    if text.len() as u64 != expected {
        return Err(Error::length_mismatch(
            "FixedSizeBinary hex",
            expected,
            text.len() as u64,
        ));
    }
    Ok(Value::String(text))
}
