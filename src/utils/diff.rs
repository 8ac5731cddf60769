//! Set reconciliation helper used when replacing contest configuration

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// What changes turn the current set into the desired one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<T> {
    /// Desired items whose key is not present yet
    pub added: Vec<T>,
    /// Keys present now but absent from the desired set
    pub removed: Vec<T>,
    /// Desired items whose key exists but whose content differs
    pub updated: Vec<T>,
}

impl<T> Diff<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Compare `current` against `desired` by key.
///
/// Output keeps the order of the input slices.
pub fn diff_by_key<T, K, F>(current: &[T], desired: &[T], key: F) -> Diff<T>
where
    T: Clone + PartialEq,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let current_by_key: HashMap<K, &T> = current.iter().map(|item| (key(item), item)).collect();
    let desired_keys: HashSet<K> = desired.iter().map(&key).collect();

    let mut added = Vec::new();
    let mut updated = Vec::new();
    for item in desired {
        match current_by_key.get(&key(item)) {
            None => added.push(item.clone()),
            Some(existing) if *existing != item => updated.push(item.clone()),
            Some(_) => {}
        }
    }

    let removed = current
        .iter()
        .filter(|item| !desired_keys.contains(&key(*item)))
        .cloned()
        .collect();

    Diff {
        added,
        removed,
        updated,
    }
}
