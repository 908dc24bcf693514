use crate::model::{DirectoryStats, YearWindow, ACC_COLUMNS};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Bucket a directory's commit dates by calendar year and fold them into the
/// report columns.
///
/// `total` counts every date regardless of the window; years outside the
/// window contribute nowhere else. `Acc_k` sums the `k` most recent window
/// years, clamped to the window length, so the accumulators are monotonic
/// non-decreasing in `k`.
pub fn aggregate(dates: &[NaiveDate], window: &YearWindow) -> DirectoryStats {
    let mut buckets: HashMap<i32, u64> = HashMap::new();
    for date in dates {
        *buckets.entry(date.year()).or_insert(0) += 1;
    }

    let year_counts: Vec<u64> = window
        .years()
        .map(|year| buckets.get(&year).copied().unwrap_or(0))
        .collect();

    let mut acc = [0u64; ACC_COLUMNS];
    let mut running = 0u64;
    for k in 0..ACC_COLUMNS {
        if let Some(count) = year_counts.get(k) {
            running += count;
        }
        acc[k] = running;
    }

    DirectoryStats {
        total: dates.len() as u64,
        year_counts,
        acc,
    }
}
