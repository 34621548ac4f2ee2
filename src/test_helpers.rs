//! Test helpers for exercising the overlay engine without a network.
//!
//! These are provided for testing purposes only. [`ScriptedBackend`]
//! implements [`CommentBackend`](crate::backend::CommentBackend) over
//! in-memory data, records every request it receives, and can be told to
//! fail either call.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::OverlayError;
use crate::backend::{
    CommentBackend, CommentsResponse, IntervalBucket, IntervalsResponse, WireComment,
};
use crate::time::Timestamp;

/// In-memory comment backend driven by pre-scripted data.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    intervals: Vec<IntervalBucket>,
    comments: Vec<WireComment>,
    fail_intervals: bool,
    fail_comments: bool,
    intervals_calls: AtomicUsize,
    comments_calls: AtomicUsize,
    comment_requests: Mutex<Vec<(Timestamp, Timestamp)>>,
}

impl ScriptedBackend {
    /// Create a backend serving the given histogram and comments.
    #[must_use]
    pub fn new(intervals: Vec<IntervalBucket>, comments: Vec<WireComment>) -> Self {
        Self {
            intervals,
            comments,
            ..Self::default()
        }
    }

    /// Make every `intervals` call fail.
    #[must_use]
    pub fn failing_intervals(mut self) -> Self {
        self.fail_intervals = true;
        self
    }

    /// Make every `comments` call fail.
    #[must_use]
    pub fn failing_comments(mut self) -> Self {
        self.fail_comments = true;
        self
    }

    /// Number of `intervals` requests received.
    #[must_use]
    pub fn intervals_calls(&self) -> usize {
        self.intervals_calls.load(Ordering::Relaxed)
    }

    /// Number of `comments` requests received.
    #[must_use]
    pub fn comments_calls(&self) -> usize {
        self.comments_calls.load(Ordering::Relaxed)
    }

    /// Ranges of all `comments` requests received, in order.
    #[must_use]
    pub fn comment_requests(&self) -> Vec<(Timestamp, Timestamp)> {
        self.comment_requests
            .lock()
            .expect("comment request log poisoned")
            .clone()
    }
}

impl CommentBackend for ScriptedBackend {
    async fn intervals(
        &self,
        _queries: &[String],
        start: Timestamp,
        end: Timestamp,
    ) -> crate::Result<IntervalsResponse> {
        self.intervals_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_intervals {
            return Err(OverlayError::Status("error".to_owned()));
        }
        let intervals: Vec<IntervalBucket> = self
            .intervals
            .iter()
            .copied()
            .filter(|bucket| Timestamp(bucket.start) >= start && Timestamp(bucket.start) < end)
            .collect();
        Ok(IntervalsResponse {
            status: "ok".to_owned(),
            n_hits: intervals.iter().map(|bucket| bucket.n_hits).sum(),
            intervals,
        })
    }

    async fn comments(
        &self,
        _queries: &[String],
        start: Timestamp,
        end: Timestamp,
    ) -> crate::Result<CommentsResponse> {
        self.comments_calls.fetch_add(1, Ordering::Relaxed);
        self.comment_requests
            .lock()
            .expect("comment request log poisoned")
            .push((start, end));
        if self.fail_comments {
            return Err(OverlayError::Status("error".to_owned()));
        }
        let comments = self
            .comments
            .iter()
            .filter(|comment| {
                Timestamp(comment.occurred_at) >= start && Timestamp(comment.occurred_at) < end
            })
            .cloned()
            .collect();
        Ok(CommentsResponse {
            status: "ok".to_owned(),
            comments,
        })
    }
}

/// Build a histogram bucket.
#[must_use]
pub const fn bucket(start: i64, n_hits: u64) -> IntervalBucket {
    IntervalBucket { start, n_hits }
}

/// Build a wire comment on the default thread.
#[must_use]
pub fn wire_comment(id: &str, text: &str, occurred_at: i64) -> WireComment {
    WireComment {
        thread: "実況スレ".to_owned(),
        name: "名無し".to_owned(),
        contact: String::new(),
        text: text.to_owned(),
        id: id.to_owned(),
        occurred_at,
    }
}
