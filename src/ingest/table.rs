//! Wide-table construction: union the column universe, drop all-empty
//! columns, deduplicate value-identical columns (first occurrence wins),
//! and project every row onto the retained columns.
//!
//! Dedup hashes each column's full value vector (xxh64) and only falls back
//! to a full comparison on hash collision, keeping the pass linear in
//! columns for the common case.

use crate::core::{RawRecord, Value, WideTable};
use std::collections::HashMap;
use xxhash_rust::xxh64::Xxh64;

/// Build one pruned table from a homogeneous batch of records.
pub fn build_wide_table(records: &[RawRecord]) -> WideTable {
    if records.is_empty() {
        return WideTable::empty();
    }

    // Column universe in first-appearance order.
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for name in record.columns() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }

    // Materialize each column's per-row value vector.
    let column_values: Vec<Vec<Value>> = columns
        .iter()
        .map(|name| {
            records
                .iter()
                .map(|r| r.get(name).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    let mut retained: Vec<usize> = Vec::new();
    let mut seen: HashMap<u64, Vec<usize>> = HashMap::new();
    for (idx, values) in column_values.iter().enumerate() {
        if values.iter().all(Value::is_empty) {
            continue;
        }
        let hash = hash_column(values);
        let bucket = seen.entry(hash).or_default();
        let duplicate = bucket
            .iter()
            .any(|&earlier| column_values[earlier] == *values);
        if duplicate {
            continue;
        }
        bucket.push(idx);
        retained.push(idx);
    }

    let rows = (0..records.len())
        .map(|row| {
            retained
                .iter()
                .map(|&col| column_values[col][row].clone())
                .collect()
        })
        .collect();

    WideTable {
        columns: retained.iter().map(|&i| columns[i].clone()).collect(),
        rows,
    }
}

fn hash_column(values: &[Value]) -> u64 {
    let mut hasher = Xxh64::new(0);
    for value in values {
        match value {
            Value::Null => hasher.update(&[0]),
            Value::Num(n) => {
                hasher.update(&[1]);
                hasher.update(&n.to_bits().to_le_bytes());
            }
            Value::Str(s) => {
                hasher.update(&[2]);
                hasher.update(&(s.len() as u64).to_le_bytes());
                hasher.update(s.as_bytes());
            }
        }
    }
    hasher.digest()
}
