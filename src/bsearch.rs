// Copyright 2025 Lars Brubaker
// License: MIT
//
// Bounded binary searches over sorted slices.
//
// The comparator receives an element and the search key and returns how the
// element orders relative to the key. Elements must be sorted so that the
// comparator is monotone over the slice; the searches then return the same
// boundaries as a linear scan would.

use std::cmp::Ordering;

/// Index of the last element that orders `Less` than `key`, if any.
pub fn lt<T, K, F>(items: &[T], key: &K, cmp: F) -> Option<usize>
where
    F: Fn(&T, &K) -> Ordering,
{
    items
        .partition_point(|item| cmp(item, key) == Ordering::Less)
        .checked_sub(1)
}

/// Index of the last element that does not order `Greater` than `key`, if any.
pub fn le<T, K, F>(items: &[T], key: &K, cmp: F) -> Option<usize>
where
    F: Fn(&T, &K) -> Ordering,
{
    items
        .partition_point(|item| cmp(item, key) != Ordering::Greater)
        .checked_sub(1)
}

/// Index of the first element that orders `Greater` than `key`, or `items.len()`.
pub fn gt<T, K, F>(items: &[T], key: &K, cmp: F) -> usize
where
    F: Fn(&T, &K) -> Ordering,
{
    items.partition_point(|item| cmp(item, key) != Ordering::Greater)
}

/// Index of the first element that does not order `Less` than `key`, or `items.len()`.
pub fn ge<T, K, F>(items: &[T], key: &K, cmp: F) -> usize
where
    F: Fn(&T, &K) -> Ordering,
{
    items.partition_point(|item| cmp(item, key) == Ordering::Less)
}

/// Index of some element comparing `Equal` to `key`.
pub fn eq<T, K, F>(items: &[T], key: &K, cmp: F) -> Option<usize>
where
    F: Fn(&T, &K) -> Ordering,
{
    items.binary_search_by(|item| cmp(item, key)).ok()
}
