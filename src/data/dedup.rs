use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use super::model::{ClaimKey, RawRecord};

// ---------------------------------------------------------------------------
// Duplicate resolution: keep the last occurrence of each key
// ---------------------------------------------------------------------------

/// Claim identifiers that collided in the filtered set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DuplicateReport {
    /// Colliding identifiers in order of first appearance.
    pub keys: Vec<ClaimKey>,
    /// Rows dropped because a later row shared their identifier.
    pub superseded_rows: usize,
}

impl DuplicateReport {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Keys occurring more than once, in order of first appearance.
pub fn find_duplicates<T, K, F>(items: &[T], key: F) -> Vec<K>
where
    K: Hash + Eq + Clone,
    F: Fn(&T) -> K,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    let mut order: Vec<K> = Vec::new();
    for item in items {
        let k = key(item);
        let count = counts.entry(k.clone()).or_insert(0);
        if *count == 0 {
            order.push(k);
        }
        *count += 1;
    }
    order.retain(|k| counts.get(k).copied().unwrap_or(0) > 1);
    order
}

/// For each key keep only the item with the greatest input index.
/// Survivors keep their relative input order.
pub fn keep_last<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let keys: Vec<K> = items.iter().map(&key).collect();
    let mut last: HashMap<&K, usize> = HashMap::with_capacity(keys.len());
    for (idx, k) in keys.iter().enumerate() {
        last.insert(k, idx);
    }
    let survivors: Vec<bool> = keys
        .iter()
        .enumerate()
        .map(|(idx, k)| last.get(k) == Some(&idx))
        .collect();
    items
        .into_iter()
        .zip(survivors)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

/// Report and collapse duplicate claim identifiers found in `claim_field`.
pub fn resolve<'a>(
    records: Vec<&'a RawRecord>,
    claim_field: &str,
) -> (DuplicateReport, Vec<&'a RawRecord>) {
    let key = |rec: &&RawRecord| ClaimKey::from(rec.value(claim_field));
    let keys = find_duplicates(&records, key);
    let before = records.len();
    let resolved = keep_last(records, key);
    let report = DuplicateReport {
        keys,
        superseded_rows: before - resolved.len(),
    };
    (report, resolved)
}
