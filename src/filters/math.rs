//! Numeric helpers shared by the color model, convolution and pixel sort.

/// A sort value paired with the column it was read from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortKey {
    pub value: f64,
    pub index: usize,
}

impl SortKey {
    pub fn new(value: f64, index: usize) -> Self {
        SortKey { value, index }
    }
}

/// Smallest value, seeded by the first element. `None` for an empty slice.
pub fn min(values: &[f64]) -> Option<f64> {
    let (&first, rest) = values.split_first()?;
    let mut minimum = first;
    for &v in rest {
        if v < minimum {
            minimum = v;
        }
    }
    Some(minimum)
}

/// Largest value, seeded by the first element. `None` for an empty slice.
pub fn max(values: &[f64]) -> Option<f64> {
    let (&first, rest) = values.split_first()?;
    let mut maximum = first;
    for &v in rest {
        if v > maximum {
            maximum = v;
        }
    }
    Some(maximum)
}

/// Bound `value` to `[lo, hi]`.
///
/// The comparisons run in order (`< lo` first, then `> hi`), so with
/// `lo > hi` the result is `lo` for anything below `lo` and `hi` otherwise.
#[inline]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        return lo;
    }
    if value > hi {
        return hi;
    }
    value
}

/// Sort keys ascending by value with Lomuto-partition quicksort.
///
/// The last element of each range is the pivot. Equal keys may be
/// reordered. Already-sorted input hits the O(n²) worst case.
pub fn sort_by_key(list: &mut [SortKey]) {
    if list.len() < 2 {
        return;
    }
    // Pending inclusive ranges; replaces recursion.
    let mut stack: Vec<(usize, usize)> = vec![(0, list.len() - 1)];
    while let Some((lo, hi)) = stack.pop() {
        if lo >= hi {
            continue;
        }
        let p = partition(list, lo, hi);
        if p > lo {
            stack.push((lo, p - 1));
        }
        stack.push((p + 1, hi));
    }
}

fn partition(list: &mut [SortKey], lo: usize, hi: usize) -> usize {
    let pivot = list[hi].value;
    let mut i = lo;
    for j in lo..hi {
        if list[j].value < pivot {
            list.swap(i, j);
            i += 1;
        }
    }
    list.swap(i, hi);
    i
}
