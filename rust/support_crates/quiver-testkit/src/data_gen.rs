//! Sample and random Arrow arrays for tests.

use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, BooleanArray, Float32Array, Int32Array, Int64Array, ListArray, RecordBatch,
    StringArray, StructArray,
    builder::{ListBuilder, StringBuilder},
};
use arrow_buffer::NullBuffer;
use arrow_schema::{DataType, Field, Fields, Schema};

/// `[["a", "b"], null, ["c"], []]`
pub fn sample_string_list() -> ListArray {
    string_list(&[Some(&["a", "b"]), None, Some(&["c"]), Some(&[])])
}

/// A list of strings array built from optional rows of non-null items.
pub fn string_list(rows: &[Option<&[&str]>]) -> ListArray {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for row in rows {
        match row {
            Some(items) => {
                for item in items.iter() {
                    builder.values().append_value(item);
                }
                builder.append(true);
            }
            None => builder.append(false),
        }
    }
    builder.finish()
}

/// A struct array with fields `id: Int32`, `name: Utf8`, `tags: List<Utf8>`
/// and `active: Boolean`:
///
/// ```text
/// {id: 1, name: "one", tags: ["x"], active: true}
/// {id: 2, name: null, tags: [], active: false}
/// null
/// {id: 4, name: "four", tags: null, active: null}
/// ```
pub fn sample_struct() -> StructArray {
    let tags = string_list(&[Some(&["x"]), Some(&[]), Some(&["hidden"]), None]);
    let fields = Fields::from(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("tags", tags.data_type().clone(), true),
        Field::new("active", DataType::Boolean, true),
    ]);
    StructArray::new(
        fields,
        vec![
            Arc::new(Int32Array::from(vec![1, 2, 3, 4])) as ArrayRef,
            Arc::new(StringArray::from(vec![Some("one"), None, Some("three"), Some("four")])),
            Arc::new(tags),
            Arc::new(BooleanArray::from(vec![Some(true), Some(false), Some(true), None])),
        ],
        Some(NullBuffer::from(vec![true, true, false, true])),
    )
}

/// The two-column table `n: [1, 2, null, 4]`, `s: ["a", null, "c", "d"]`.
pub fn two_column_batch() -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("n", DataType::Int32, true),
        Field::new("s", DataType::Utf8, true),
    ]);
    let result = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int32Array::from(vec![Some(1), Some(2), None, Some(4)])) as ArrayRef,
            Arc::new(StringArray::from(vec![Some("a"), None, Some("c"), Some("d")])) as ArrayRef,
        ],
    );
    result.expect("valid batch")
}

/// Random nullable `Int64` values; roughly one in `null_every` slots is null.
pub fn random_int64(len: usize, null_every: usize) -> Int64Array {
    (0..len)
        .map(|_| {
            if null_every > 0 && fastrand::usize(0..null_every) == 0 {
                None
            } else {
                Some(fastrand::i64(-1_000_000..1_000_000))
            }
        })
        .collect()
}

/// Random nullable `Float32` values with two decimal places, e.g. `-12.34`.
pub fn random_float32(len: usize, null_every: usize) -> Float32Array {
    (0..len)
        .map(|_| {
            if null_every > 0 && fastrand::usize(0..null_every) == 0 {
                None
            } else {
                Some(fastrand::i32(-100_000..100_000) as f32 / 100.0)
            }
        })
        .collect()
}

/// Random nullable short ASCII strings.
pub fn random_strings(len: usize, null_every: usize) -> StringArray {
    (0..len)
        .map(|_| {
            if null_every > 0 && fastrand::usize(0..null_every) == 0 {
                None
            } else {
                let len = fastrand::usize(0..12);
                Some((0..len).map(|_| fastrand::alphanumeric()).collect::<String>())
            }
        })
        .collect()
}

/// Random lists of random strings; some lists are null, some are empty.
pub fn random_string_lists(len: usize, null_every: usize) -> ListArray {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for _ in 0..len {
        if null_every > 0 && fastrand::usize(0..null_every) == 0 {
            builder.append(false);
            continue;
        }
        for _ in 0..fastrand::usize(0..4) {
            let len = fastrand::usize(1..6);
            let item = (0..len).map(|_| fastrand::lowercase()).collect::<String>();
            builder.values().append_value(item);
        }
        builder.append(true);
    }
    builder.finish()
}
