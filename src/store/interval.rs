//! Minute-granularity comment density index.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use log::warn;

use crate::backend::{CommentBackend, IntervalsResponse};
use crate::time::{DurationMs, Timestamp};

/// One histogram bucket covering a single calendar minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Bucket start time.
    pub start: Timestamp,
    /// Number of comments posted within the bucket.
    pub bucket_hits: u64,
    /// Whether the bucket's comments have been fetched. Only transitions
    /// `false -> true`; a full re-init replaces the index wholesale.
    pub fetched: bool,
}

/// Histogram of comment density for the active channel and time range.
///
/// Built in bulk on [`IntervalIndex::init`], mutated in place as buckets are
/// fetched, replaced wholesale on re-init.
#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    buckets: BTreeMap<Timestamp, Interval>,
}

impl IntervalIndex {
    /// An index with no buckets. The overlay shows nothing against it.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute the aligned query range: floor to the minute below
    /// `start + delay`, ceil to the minute above `end + delay`.
    #[must_use]
    pub fn aligned_range(
        start: Timestamp,
        end: Timestamp,
        delay: DurationMs,
    ) -> (Timestamp, Timestamp) {
        (
            (start + delay).floor_to_minute(),
            (end + delay).ceil_to_minute(),
        )
    }

    /// Request a zero-filled histogram for the aligned range and build the
    /// index, every bucket unfetched.
    ///
    /// On request failure the result is an empty index; the caller shows no
    /// comments until the user retries.
    pub async fn init<B: CommentBackend>(
        backend: &B,
        queries: &[String],
        start: Timestamp,
        end: Timestamp,
        delay: DurationMs,
    ) -> Self {
        let (aligned_start, aligned_end) = Self::aligned_range(start, end, delay);
        match backend.intervals(queries, aligned_start, aligned_end).await {
            Ok(response) => Self::from_response(&response),
            Err(err) => {
                warn!("interval fetch failed, overlay will stay empty: {err}");
                Self::empty()
            }
        }
    }

    /// Build an index from a histogram response, every bucket unfetched.
    #[must_use]
    pub fn from_response(response: &IntervalsResponse) -> Self {
        let buckets = response
            .intervals
            .iter()
            .map(|bucket| {
                let start = Timestamp(bucket.start);
                (
                    start,
                    Interval {
                        start,
                        bucket_hits: bucket.n_hits,
                        fetched: false,
                    },
                )
            })
            .collect();
        Self { buckets }
    }

    /// Number of buckets in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the index holds no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Look up the bucket starting exactly at `start`.
    #[must_use]
    pub fn get(&self, start: Timestamp) -> Option<&Interval> {
        self.buckets.get(&start)
    }

    /// Iterate over all buckets in time order.
    pub fn buckets(&self) -> impl Iterator<Item = &Interval> {
        self.buckets.values()
    }

    /// Bucket start times that are unfetched, have non-zero density, and
    /// fall inside the window.
    #[must_use]
    pub fn unfetched_in_window(&self, window: RangeInclusive<Timestamp>) -> Vec<Timestamp> {
        self.buckets
            .range(window)
            .filter(|(_, interval)| !interval.fetched && interval.bucket_hits > 0)
            .map(|(start, _)| *start)
            .collect()
    }

    /// Mark the given buckets fetched.
    pub fn mark_fetched(&mut self, starts: &[Timestamp]) {
        for start in starts {
            if let Some(interval) = self.buckets.get_mut(start) {
                interval.fetched = true;
            }
        }
    }
}
