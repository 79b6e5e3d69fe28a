//! Multi-key sort engine.
//!
//! Rows are compared key by key: the first key that orders two rows decides,
//! equal or incomparable values fall through to the next key, and running out
//! of keys leaves the pair in source order (the sort is stable).
//!
//! "Incomparable counts as equal" is not transitive once a key mixes value
//! kinds, so rows are ordered with a merge sort that accepts any comparator
//! rather than `slice::sort_by`, which may panic on such input.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::types::{CellValue, Column, Record, SortDirection, SortSpec};

/// A sort key resolved against the column set.
#[derive(Debug, Clone, Copy)]
struct ResolvedKey<'a> {
    col_index: usize,
    column: &'a Column,
    direction: SortDirection,
}

/// Resolve keys to columns, dropping keys without a direction and keys whose
/// field is not a column.
fn resolve_keys<'a>(spec: &SortSpec, columns: &'a [Column]) -> Vec<ResolvedKey<'a>> {
    spec.keys()
        .iter()
        .filter_map(|key| {
            let direction = key.direction?;
            let Some(col_index) = columns.iter().position(|c| c.field == key.field) else {
                log::warn!(target: "vsheet::sort", "sort field {:?} is not a column; key skipped", key.field);
                return None;
            };
            let column = columns.get(col_index)?;
            Some(ResolvedKey {
                col_index,
                column,
                direction,
            })
        })
        .collect()
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Compare two rows of `data` starting at sort key `key_index`.
///
/// Keys that cannot decide (equal values, mismatched value kinds, unknown
/// field, no direction) hand over to the next key; with no keys left the
/// rows are equal.
pub fn compare_rows(
    data: &[Rc<Record>],
    prev: usize,
    next: usize,
    spec: &SortSpec,
    columns: &[Column],
    key_index: usize,
) -> Ordering {
    let Some(key) = spec.keys().get(key_index) else {
        return Ordering::Equal;
    };
    let decided = key.direction.and_then(|direction| {
        let col_index = columns.iter().position(|c| c.field == key.field)?;
        let column = columns.get(col_index)?;
        let a = column.value_at(data, prev, col_index);
        let b = column.value_at(data, next, col_index);
        a.compare(&b)
            .filter(|o| o.is_ne())
            .map(|o| directed(o, direction))
    });
    decided.unwrap_or_else(|| compare_rows(data, prev, next, spec, columns, key_index + 1))
}

/// Return the rows of `data` ordered by `spec`.
///
/// Sort values are extracted once per row and key before sorting. Value
/// extractors see each row's index in `data`.
pub fn sort_rows(data: &[Rc<Record>], spec: &SortSpec, columns: &[Column]) -> Vec<Rc<Record>> {
    let keys = resolve_keys(spec, columns);
    if keys.is_empty() {
        return data.to_vec();
    }

    let extracted: Vec<Vec<CellValue>> = (0..data.len())
        .map(|row| {
            keys.iter()
                .map(|k| k.column.value_at(data, row, k.col_index))
                .collect()
        })
        .collect();

    let order = merge_sort((0..data.len()).collect(), &mut |a: usize, b: usize| {
        match (extracted.get(a), extracted.get(b)) {
            (Some(va), Some(vb)) => compare_extracted(va, vb, &keys),
            _ => Ordering::Equal,
        }
    });
    log::debug!(target: "vsheet::sort", "sorted {} rows by {} keys", data.len(), keys.len());

    order
        .into_iter()
        .filter_map(|i| data.get(i).map(Rc::clone))
        .collect()
}

fn compare_extracted(a: &[CellValue], b: &[CellValue], keys: &[ResolvedKey<'_>]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(keys)
        .find_map(|((va, vb), key)| {
            va.compare(vb)
                .filter(|o| o.is_ne())
                .map(|o| directed(o, key.direction))
        })
        .unwrap_or(Ordering::Equal)
}

/// Stable top-down merge sort of row indices.
///
/// Each merge takes from the right run only when it is strictly less, so
/// equal rows keep their order. The comparator need not be a total order.
fn merge_sort<F>(mut items: Vec<usize>, cmp: &mut F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(&a), Some(&b)) => cmp(b, a).is_lt(),
            (Some(_), None) => false,
            (None, _) => true,
        };
        let next = if take_right { right.next() } else { left.next() };
        match next {
            Some(i) => merged.push(i),
            None => break,
        }
    }
    merged
}
