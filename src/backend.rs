//! Comment backend interfaces.
//!
//! The engine talks to the comment archive through the [`CommentBackend`]
//! trait: one call for a zero-filled minute histogram of comment density,
//! one for the raw comment payload of a sub-range. [`HttpCommentBackend`]
//! implements the trait over the query-parameterized HTTP API; tests supply
//! in-memory implementations instead.

pub mod api;
pub mod channel;
pub mod http;

pub use api::{CommentsResponse, IntervalBucket, IntervalsResponse, WireComment};
pub use channel::ChannelQueryMap;
pub use http::HttpCommentBackend;

use crate::time::Timestamp;

/// A source of interval histograms and comment payloads.
///
/// Both calls are read-only queries against the archive. Implementations
/// surface transport and decode failures as [`crate::OverlayError`]; the
/// store recovers from every error as an empty result, so failures here are
/// never fatal to the host.
pub trait CommentBackend {
    /// Fetch a minute-granularity histogram for the given channel queries
    /// over `[start, end)`. Every minute in the range is present in the
    /// result even when its hit count is zero.
    fn intervals(
        &self,
        queries: &[String],
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = crate::Result<IntervalsResponse>>;

    /// Fetch the raw comment payload for the given channel queries over
    /// `[start, end)`.
    fn comments(
        &self,
        queries: &[String],
        start: Timestamp,
        end: Timestamp,
    ) -> impl Future<Output = crate::Result<CommentsResponse>>;
}
