//! Fixed-width age groups.

use crate::record::Record;

const BUCKET_COUNT: i64 = 5;

/// Right-closed age intervals of equal width starting at 0. The first
/// interval also includes 0 itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeBuckets {
    width: i64,
    boundaries: Vec<i64>,
}

impl AgeBuckets {
    /// Builds the intervals covering `0..=max`. Returns `None` when `max` is
    /// too small to give a non-zero width.
    pub fn for_max(max: i64) -> Option<Self> {
        let width = max / BUCKET_COUNT;
        if width <= 0 {
            return None;
        }

        // One boundary per label; the label anchored at the last boundary is
        // never used because no interval starts there. Boundaries saturate so
        // an absurd maximum still ends at a boundary covering it.
        let mut boundaries = vec![0];
        let mut last = 0i64;
        while last < max {
            last = last.saturating_add(width);
            boundaries.push(last);
        }

        Some(Self { width, boundaries })
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn label(&self, age: i64) -> Option<String> {
        self.boundaries
            .windows(2)
            .enumerate()
            .find(|(j, pair)| {
                let (lo, hi) = (pair[0], pair[1]);
                age <= hi && (age > lo || (*j == 0 && age == lo))
            })
            .map(|(_, pair)| format!("{} - {}", pair[0], pair[0].saturating_add(self.width)))
    }
}

/// Labels every record's recalculated age. Needs `annuli` to be filled.
pub fn assign_age_groups(records: &mut [Record]) {
    let Some(max) = records.iter().map(|r| r.features.annuli).max() else {
        return;
    };
    let Some(buckets) = AgeBuckets::for_max(max) else {
        tracing::debug!(max, "Maximum age too small for age groups");
        return;
    };

    for record in records.iter_mut() {
        record.features.annuli_group = buckets.label(record.features.annuli);
    }
}
