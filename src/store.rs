//! Comment store: windowed, coalesced fetching over the interval index.
//!
//! The store owns the time-ordered comment sequence, the thread catalog and
//! the interval index. [`CommentStore::windowed_fetch`] is expected to be
//! invoked once per second of playback; it issues a backend request only
//! when unfetched, non-empty buckets fall inside the +-60 second window
//! around the current position, and marks those buckets fetched before the
//! request resolves so overlapping invocations cannot issue duplicates.

pub mod catalog;
pub mod interval;

pub use catalog::ThreadCatalog;
pub use interval::{Interval, IntervalIndex};

use itertools::Itertools;
use log::{debug, info, warn};

use crate::backend::{ChannelQueryMap, CommentBackend, CommentsResponse};
use crate::comment::CommentRecord;
use crate::time::{DurationMs, PlaybackTime, Timestamp};

/// Half-width of the fetch window around the current playback position.
pub const FETCH_WINDOW: DurationMs = DurationMs(60_000);

/// Minimum spacing between consecutive request-issuing fetch invocations.
pub const FETCH_THROTTLE: DurationMs = DurationMs(500);

/// A batched comments request the store has committed to.
///
/// The qualifying buckets are already marked fetched when the plan is
/// created; apply the backend's response with [`CommentStore::apply_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Inclusive start of the batched request range.
    pub start: Timestamp,
    /// Exclusive end of the batched request range.
    pub end: Timestamp,
    generation: u64,
}

/// Ordered comment records plus fetch bookkeeping for one channel session.
#[derive(Debug, Default)]
pub struct CommentStore {
    index: IntervalIndex,
    records: Vec<CommentRecord>,
    catalog: ThreadCatalog,
    queries: Vec<String>,
    channel_start: Timestamp,
    delay: DurationMs,
    generation: u64,
    last_issued_at: Option<PlaybackTime>,
}

impl CommentStore {
    /// Create an empty store. Nothing is fetched until [`Self::init`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize for a channel and time range, replacing all prior state.
    ///
    /// Builds a fresh interval index for `[start, end)`, clears the comment
    /// sequence and the catalog, and invalidates any fetch still in flight:
    /// a [`FetchPlan`] created before this call is rejected by
    /// [`Self::apply_fetch`].
    pub async fn init<B: CommentBackend>(
        &mut self,
        backend: &B,
        channels: &ChannelQueryMap,
        channel: &str,
        start: Timestamp,
        end: Timestamp,
        delay: DurationMs,
    ) {
        self.generation += 1;
        self.queries = channels.queries_for(channel);
        self.channel_start = start;
        self.delay = delay;
        self.records.clear();
        self.catalog.clear();
        self.last_issued_at = None;
        info!(
            "comment store init: channel {channel:?} -> {:?}, range [{}, {})",
            self.queries,
            start.value(),
            end.value()
        );
        self.index = IntervalIndex::init(backend, &self.queries, start, end, delay).await;
    }

    /// Change the comment/video offset without re-initializing.
    pub const fn set_delay(&mut self, delay: DurationMs) {
        self.delay = delay;
    }

    /// The configured comment/video offset.
    #[must_use]
    pub const fn delay(&self) -> DurationMs {
        self.delay
    }

    /// Program start time of the active channel range.
    #[must_use]
    pub const fn channel_start(&self) -> Timestamp {
        self.channel_start
    }

    /// The comment sequence fetched so far, ascending by `occurred_at`.
    #[must_use]
    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    /// The thread title catalog and filter set.
    #[must_use]
    pub const fn catalog(&self) -> &ThreadCatalog {
        &self.catalog
    }

    /// Mutable access to the catalog, for filter toggling by the host UI.
    pub const fn catalog_mut(&mut self) -> &mut ThreadCatalog {
        &mut self.catalog
    }

    /// The interval index of the active range.
    #[must_use]
    pub const fn index(&self) -> &IntervalIndex {
        &self.index
    }

    /// Decide whether a fetch is due at the given playback position.
    ///
    /// Scans the interval index for unfetched, non-empty buckets inside the
    /// +-60 second window around `channel_start + playback_time + delay`.
    /// Returns `None` without side effects when no bucket qualifies or when
    /// a request was issued less than [`FETCH_THROTTLE`] ago. Otherwise the
    /// qualifying buckets are marked fetched immediately and the returned
    /// plan spans from the earliest to the latest of them.
    pub fn plan_fetch(&mut self, playback_time: PlaybackTime) -> Option<FetchPlan> {
        let center = self.channel_start + playback_time + self.delay;
        let window = (center - FETCH_WINDOW)..=(center + FETCH_WINDOW);
        let qualifying = self.index.unfetched_in_window(window);
        let (first, last) = match (qualifying.first(), qualifying.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return None,
        };
        if let Some(last_issued) = self.last_issued_at
            && (playback_time - last_issued).abs() < FETCH_THROTTLE
        {
            debug!("window fetch throttled at {}", playback_time.value());
            return None;
        }
        self.index.mark_fetched(&qualifying);
        self.last_issued_at = Some(playback_time);
        Some(FetchPlan {
            start: first,
            end: last + DurationMs::MINUTE,
            generation: self.generation,
        })
    }

    /// Merge a batch of fetched comments into the sequence.
    ///
    /// Responses planned before the most recent [`Self::init`] are stale and
    /// discarded. The batch is applied atomically: sorted, merged into the
    /// time-ordered sequence, and its thread titles registered (enabled by
    /// default). Duplicate records across overlapping windows are kept.
    pub fn apply_fetch(&mut self, plan: FetchPlan, response: CommentsResponse) {
        if plan.generation != self.generation {
            debug!(
                "discarding stale fetch for [{}, {})",
                plan.start.value(),
                plan.end.value()
            );
            return;
        }
        let mut batch: Vec<CommentRecord> = response
            .comments
            .into_iter()
            .map(CommentRecord::from)
            .collect();
        batch.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));
        for record in &batch {
            self.catalog.register(&record.thread_title);
        }
        let merged = std::mem::take(&mut self.records)
            .into_iter()
            .merge_by(batch, |a, b| a.occurred_at <= b.occurred_at)
            .collect();
        self.records = merged;
    }

    /// Fetch the comment payload for the window around `playback_time`, if
    /// due, and merge it in.
    ///
    /// Failures are swallowed: the affected buckets stay marked fetched and
    /// that window is not retried for the session.
    pub async fn windowed_fetch<B: CommentBackend>(
        &mut self,
        backend: &B,
        playback_time: PlaybackTime,
    ) {
        let Some(plan) = self.plan_fetch(playback_time) else {
            return;
        };
        debug!(
            "window fetch [{}, {}) at playback {}",
            plan.start.value(),
            plan.end.value(),
            playback_time.value()
        );
        let result = backend.comments(&self.queries, plan.start, plan.end).await;
        match result {
            Ok(response) => self.apply_fetch(plan, response),
            Err(err) => {
                warn!(
                    "window fetch [{}, {}) failed, dropping: {err}",
                    plan.start.value(),
                    plan.end.value()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::WireComment;
    use pretty_assertions::assert_eq;

    fn wire(id: &str, occurred_at: i64) -> WireComment {
        WireComment {
            thread: "t".to_owned(),
            name: String::new(),
            contact: String::new(),
            text: "hi".to_owned(),
            id: id.to_owned(),
            occurred_at,
        }
    }

    fn store_with_buckets(buckets: &[(i64, u64)]) -> CommentStore {
        let mut store = CommentStore::new();
        store.index = IntervalIndex::from_response(&crate::backend::IntervalsResponse {
            status: "ok".to_owned(),
            n_hits: buckets.iter().map(|&(_, hits)| hits).sum(),
            intervals: buckets
                .iter()
                .map(|&(start, n_hits)| crate::backend::IntervalBucket { start, n_hits })
                .collect(),
        });
        store
    }

    #[test]
    fn plan_spans_earliest_to_latest_qualifying_bucket() {
        let mut store = store_with_buckets(&[(0, 0), (60_000, 5)]);
        let plan = store.plan_fetch(PlaybackTime(60_000)).expect("plan");
        assert_eq!(plan.start, Timestamp(60_000));
        assert_eq!(plan.end, Timestamp(120_000));
    }

    #[test]
    fn no_plan_when_everything_is_fetched() {
        let mut store = store_with_buckets(&[(0, 5), (60_000, 5)]);
        assert!(store.plan_fetch(PlaybackTime(0)).is_some());
        assert!(store.plan_fetch(PlaybackTime(60_000)).is_none());
    }

    #[test]
    fn throttle_skips_without_marking() {
        let mut store = store_with_buckets(&[(0, 5), (120_000, 5)]);
        assert!(store.plan_fetch(PlaybackTime(0)).is_some());
        // A delay change brings the second bucket into the window, but the
        // previous request was issued less than the throttle interval ago.
        store.set_delay(DurationMs(60_000));
        assert!(store.plan_fetch(PlaybackTime(300)).is_none());
        assert!(!store.index.get(Timestamp(120_000)).unwrap().fetched);
        assert!(store.plan_fetch(PlaybackTime(600)).is_some());
    }

    #[test]
    fn merge_keeps_time_order_across_batches() {
        let mut store = store_with_buckets(&[(0, 2), (60_000, 2)]);
        let late = store.plan_fetch(PlaybackTime(90_000)).expect("plan");
        store.apply_fetch(
            late,
            CommentsResponse {
                status: "ok".to_owned(),
                comments: vec![wire("b/1/3", 70_000), wire("b/1/2", 65_000)],
            },
        );
        let early = store.plan_fetch(PlaybackTime(30_000)).expect("plan");
        store.apply_fetch(
            early,
            CommentsResponse {
                status: "ok".to_owned(),
                comments: vec![wire("b/1/1", 5_000)],
            },
        );
        let order: Vec<i64> = store
            .records()
            .iter()
            .map(|record| record.occurred_at.value())
            .collect();
        assert_eq!(order, vec![5_000, 65_000, 70_000]);
    }

    #[test]
    fn stale_plan_is_discarded() {
        let mut store = store_with_buckets(&[(0, 1)]);
        let plan = store.plan_fetch(PlaybackTime(0)).expect("plan");
        store.generation += 1;
        store.apply_fetch(
            plan,
            CommentsResponse {
                status: "ok".to_owned(),
                comments: vec![wire("b/1/1", 0)],
            },
        );
        assert!(store.records().is_empty());
        assert!(store.catalog().is_empty());
    }

    #[test]
    fn registered_titles_default_enabled() {
        let mut store = store_with_buckets(&[(0, 1)]);
        let plan = store.plan_fetch(PlaybackTime(0)).expect("plan");
        store.apply_fetch(
            plan,
            CommentsResponse {
                status: "ok".to_owned(),
                comments: vec![wire("b/1/1", 0)],
            },
        );
        assert!(store.catalog().is_enabled("t"));
    }
}
