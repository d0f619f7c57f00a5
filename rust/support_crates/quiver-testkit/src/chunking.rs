//! Splitting one array into a list of chunks.

use arrow_array::{Array, ArrayRef};

/// Splits `array` into consecutive zero-copy slices of the given sizes.
///
/// Zero sizes produce empty chunks.
///
/// # Panics
///
/// If the sizes do not add up to the array length.
pub fn split_array(array: &ArrayRef, sizes: &[usize]) -> Vec<ArrayRef> {
    assert_eq!(
        sizes.iter().sum::<usize>(),
        array.len(),
        "chunk sizes must cover the array"
    );
    let mut offset = 0;
    sizes
        .iter()
        .map(|&size| {
            let chunk = array.slice(offset, size);
            offset += size;
            chunk
        })
        .collect()
}

/// Random chunk sizes in `min_size..=max_size` that add up to `total`.
///
/// The last size may be smaller than `min_size`. With `min_size == 0` some
/// chunks are empty.
pub fn random_sizes(total: usize, min_size: usize, max_size: usize) -> Vec<usize> {
    assert!(max_size > 0 && min_size <= max_size);
    let mut sizes = Vec::new();
    let mut remaining = total;
    while remaining > 0 {
        let size = fastrand::usize(min_size..=max_size).min(remaining);
        sizes.push(size);
        remaining -= size;
    }
    sizes
}

/// Splits `array` into chunks of random sizes (see [`random_sizes`]).
pub fn random_split(array: &ArrayRef, min_size: usize, max_size: usize) -> Vec<ArrayRef> {
    let sizes = random_sizes(array.len(), min_size, max_size);
    log::trace!("splitting {} values into chunks {sizes:?}", array.len());
    split_array(array, &sizes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use arrow_array::Int32Array;

    #[test]
    fn test_split_array() {
        let array: ArrayRef = Arc::new(Int32Array::from((0..10).collect::<Vec<_>>()));
        let chunks = split_array(&array, &[3, 0, 7]);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].len(), 0);
        let last = chunks[2].as_any().downcast_ref::<Int32Array>().unwrap();
        assert_eq!(last.value(0), 3);
    }

    #[test]
    fn test_random_split_covers_array() {
        fastrand::seed(7);
        let array: ArrayRef = Arc::new(Int32Array::from((0..1000).collect::<Vec<_>>()));
        for _ in 0..10 {
            let chunks = random_split(&array, 0, 50);
            assert_eq!(chunks.iter().map(|c| c.len()).sum::<usize>(), 1000);
        }
    }
}
