use serde::{Deserialize, Serialize};

use crate::values::BucketTime;

/// Ordered bucket labels shared by every stock-day of a batch
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionGrid {
    times: Vec<BucketTime>,
}

impl SessionGrid {
    /// Build from arbitrary labels (sorted and de-duplicated)
    pub fn new(times: impl IntoIterator<Item = BucketTime>) -> Self {
        let mut times: Vec<BucketTime> = times.into_iter().collect();
        times.sort_unstable();
        times.dedup();
        Self { times }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[BucketTime] {
        &self.times
    }

    pub fn time(&self, index: usize) -> Option<BucketTime> {
        self.times.get(index).copied()
    }

    /// Column index of a bucket label
    pub fn index_of(&self, time: BucketTime) -> Option<usize> {
        self.times.binary_search(&time).ok()
    }

    /// Index of the first bucket at or after `cutoff` (== len() if none)
    pub fn cutoff_index(&self, cutoff: BucketTime) -> usize {
        self.times.partition_point(|t| *t < cutoff)
    }
}
