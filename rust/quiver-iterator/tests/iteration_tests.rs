use std::sync::Arc;

use arrow_array::{Array, ArrayRef, Int64Array};
use quiver_iterator::{
    AnyValueIterator, Column, GenericValue, GenericValueIterator, StepIterator,
    value_iterator::{Int64ValueIterator, StringValueIterator},
};
use quiver_testkit::{
    chunking::{random_split, split_array},
    data_gen::{random_int64, random_string_lists, random_strings, sample_string_list,
        two_column_batch},
    logging::init_logging,
};

fn collect_i64(column: &Column) -> Vec<Option<i64>> {
    let mut it = Int64ValueIterator::try_new(column).unwrap();
    let mut out = Vec::new();
    while it.advance() {
        out.push(it.current());
    }
    assert!(!it.advance());
    out
}

fn collect_generic(column: &Column) -> Vec<Option<String>> {
    let mut it = AnyValueIterator::try_new(column).unwrap();
    let mut out = Vec::new();
    while it.advance() {
        out.push(it.current_as_generic().unwrap().map(|v| render(v)));
    }
    out
}

/// Flattens a value into a compact string so nested values can be compared.
fn render(value: GenericValue) -> String {
    match value {
        GenericValue::List(mut items) => {
            let mut parts = Vec::new();
            while items.advance() {
                parts.push(
                    items
                        .current_as_generic()
                        .unwrap()
                        .map(render)
                        .unwrap_or_else(|| "null".to_string()),
                );
            }
            format!("[{}]", parts.join(","))
        }
        GenericValue::String(s) => s,
        GenericValue::Int64(v) => v.to_string(),
        other => format!("{other:?}"),
    }
}

#[test]
fn test_random_chunking_is_transparent() {
    init_logging();
    fastrand::seed(42);
    let array: ArrayRef = Arc::new(random_int64(2_000, 7));
    let expected = collect_i64(&Column::from_array("v", array.clone()));
    assert_eq!(expected.len(), 2_000);

    for _ in 0..20 {
        let chunks = random_split(&array, 0, 97);
        let refs = chunks.iter().map(|c| c.as_ref()).collect::<Vec<_>>();
        let rejoined = arrow_select::concat::concat(&refs).unwrap();
        assert_eq!(rejoined.len(), array.len());

        let column = Column::from_chunks("v", chunks).unwrap();
        assert_eq!(collect_i64(&column), expected);
    }
}

#[test]
fn test_nested_lists_across_chunks() {
    init_logging();
    fastrand::seed(5);
    let array: ArrayRef = Arc::new(random_string_lists(300, 4));
    let expected = collect_generic(&Column::from_array("l", array.clone()));
    for _ in 0..10 {
        let column = Column::from_chunks("l", random_split(&array, 1, 40)).unwrap();
        assert_eq!(collect_generic(&column), expected);
    }
}

#[test]
fn test_list_nesting_fidelity() {
    let array: ArrayRef = Arc::new(sample_string_list());
    let column = Column::from_chunks("l", split_array(&array, &[1, 0, 2, 1])).unwrap();
    assert_eq!(
        collect_generic(&column),
        vec![
            Some("[a,b]".to_string()),
            None,
            Some("[c]".to_string()),
            Some("[]".to_string()),
        ]
    );
}

#[test]
fn test_step_rows_match_columns() {
    init_logging();
    fastrand::seed(99);
    let ints: ArrayRef = Arc::new(random_int64(700, 5));
    let strings: ArrayRef = Arc::new(random_strings(700, 3));
    let columns = [
        Column::from_chunks("i", random_split(&ints, 0, 64)).unwrap(),
        Column::from_chunks("s", random_split(&strings, 0, 31)).unwrap(),
    ];

    let expected_ints = collect_i64(&columns[0]);
    let mut expected_strings = Vec::new();
    let mut it = StringValueIterator::try_new(&columns[1]).unwrap();
    while it.advance() {
        expected_strings.push(it.current().map(str::to_string));
    }

    let mut step = StepIterator::for_columns(&columns).unwrap();
    let mut rows = 0;
    while step.advance().unwrap() {
        let values = step.values().unwrap();
        assert!(values.is_complete());
        let i = values.value(0).0.map(|v| v.as_i64().unwrap());
        let s = values.value(1).0.map(|v| v.as_str().unwrap().to_string());
        assert_eq!(i, expected_ints[rows]);
        assert_eq!(s, expected_strings[rows]);
        rows += 1;
    }
    assert_eq!(rows, 700);
    assert!(!step.advance().unwrap());
}

#[test]
fn test_two_column_scenario_from_batches() {
    let batch = two_column_batch();
    let batches = [batch.slice(0, 2), batch.slice(2, 2)];
    let columns = Column::from_record_batches(batch.schema_ref(), &batches).unwrap();
    assert_eq!(columns[0].num_chunks(), 2);

    let mut step = StepIterator::for_columns(&columns).unwrap();
    let mut rows = Vec::new();
    while step.advance().unwrap() {
        let values = step.take_values().unwrap();
        let (values, exists, _) = values.into_parts();
        assert_eq!(exists, vec![true, true]);
        let mut values = values.into_iter();
        let n = values.next().unwrap().map(|v| v.as_i32().unwrap());
        let s = values.next().unwrap().map(|v| v.as_str().unwrap().to_string());
        rows.push((n, s));
    }
    assert_eq!(
        rows,
        vec![
            (Some(1), Some("a".to_string())),
            (Some(2), None),
            (None, Some("c".to_string())),
            (Some(4), Some("d".to_string())),
        ]
    );
}

#[test]
fn test_reference_count_conservation() {
    let array: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3]));
    let base = Arc::strong_count(&array);
    let column = Column::from_array("v", array.clone());
    let mut it = AnyValueIterator::try_new(&column).unwrap();
    assert!(it.advance());
    let held = Arc::strong_count(&array);
    assert_eq!(held, base + 2);

    const N: usize = 8;
    for _ in 0..N {
        it.retain();
    }
    for _ in 0..N {
        assert!(!it.release());
        assert_eq!(Arc::strong_count(&array), held);
    }
    assert!(it.release());
    assert_eq!(Arc::strong_count(&array), base + 1);
    drop(it);
    drop(column);
    assert_eq!(Arc::strong_count(&array), base);
}

#[test]
fn test_list_value_outlives_parent_iterator() {
    let array: ArrayRef = Arc::new(sample_string_list());
    let column = Column::from_array("l", array);
    let mut it = AnyValueIterator::try_new(&column).unwrap();
    assert!(it.advance());
    let child = it.current_as_generic().unwrap().unwrap();
    while it.advance() {}
    drop(it);
    drop(column);
    assert_eq!(render(child), "[a,b]");
}
