//! Filter and derive operations
//!
//! Pure, synchronous helpers over an already-fetched collection. Filters keep
//! the original order and never fail: an unknown key just matches nothing.
//! Derived values (counts, distinct sets) are the only place where
//! duplicates collapse; the raw items are never de-duplicated.

use std::collections::{BTreeSet, HashMap};

/// Items whose key equals `value`, in original order
///
/// # Examples
/// ```
/// use app_core::filters::filter_by;
///
/// let words = vec!["apple", "avocado", "banana"];
/// let a_words = filter_by(&words, |w| &w[..1], "a");
/// assert_eq!(a_words, vec!["apple", "avocado"]);
///
/// assert!(filter_by(&words, |w| &w[..1], "z").is_empty());
/// ```
pub fn filter_by<T, K, F>(items: &[T], key: F, value: &K) -> Vec<T>
where
    T: Clone,
    K: PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    items
        .iter()
        .filter(|item| key(item) == value)
        .cloned()
        .collect()
}

/// Items accepted by `predicate`, in original order
pub fn filter_where<T, F>(items: &[T], predicate: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

/// Number of items per distinct key
pub fn count_by<T, F>(items: &[T], key: F) -> HashMap<String, usize>
where
    F: Fn(&T) -> &str,
{
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(key(item).to_string()).or_insert(0) += 1;
    }
    counts
}

/// Set of distinct key values
pub fn distinct<T, F>(items: &[T], key: F) -> BTreeSet<String>
where
    F: Fn(&T) -> &str,
{
    items.iter().map(|item| key(item).to_string()).collect()
}
