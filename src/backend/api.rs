//! Wire types of the comment archive API.
//!
//! Every field defaults when missing so that malformed responses decode to
//! empty results instead of failing the fetch.

use serde::{Deserialize, Serialize};

use crate::comment::CommentRecord;
use crate::time::Timestamp;

/// Response of the `intervals` query: a zero-filled minute histogram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalsResponse {
    /// Backend status marker, `"ok"` on success.
    #[serde(default)]
    pub status: String,
    /// Total hit count over the whole range.
    #[serde(default)]
    pub n_hits: u64,
    /// One bucket per minute of the requested range.
    #[serde(default)]
    pub intervals: Vec<IntervalBucket>,
}

/// One minute bucket of the histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalBucket {
    /// Bucket start, milliseconds since the Unix epoch.
    #[serde(default)]
    pub start: i64,
    /// Number of comments within the bucket.
    #[serde(default)]
    pub n_hits: u64,
}

/// Response of the `comments` query: the raw payload of a sub-range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsResponse {
    /// Backend status marker, `"ok"` on success.
    #[serde(default)]
    pub status: String,
    /// Comments within the requested range, in backend order.
    #[serde(default)]
    pub comments: Vec<WireComment>,
}

/// One comment as transferred on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireComment {
    /// Thread title the comment belongs to.
    #[serde(default)]
    pub thread: String,
    /// Author display name.
    #[serde(default)]
    pub name: String,
    /// Author contact field.
    #[serde(default)]
    pub contact: String,
    /// Comment body.
    #[serde(default)]
    pub text: String,
    /// Board/thread/sequence composite identifier.
    #[serde(default)]
    pub id: String,
    /// Post time, milliseconds since the Unix epoch.
    #[serde(default, rename = "occurredAt")]
    pub occurred_at: i64,
}

impl From<WireComment> for CommentRecord {
    fn from(wire: WireComment) -> Self {
        Self {
            id: wire.id,
            thread_title: wire.thread,
            author: wire.name,
            author_contact: wire.contact,
            text: wire.text,
            occurred_at: Timestamp(wire.occurred_at),
        }
    }
}
