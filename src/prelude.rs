//! Prelude module for the overlay engine crate.
//!
//! Re-exports the commonly used types so hosts can import everything in
//! one go with `use danmaku_rs::prelude::*;`.

pub use crate::{OverlayError, Result};

pub use crate::time::{DurationMs, MINUTE_MS, PlaybackTime, Timestamp};

pub use crate::comment::CommentRecord;

pub use crate::config::OverlayConfig;

pub use crate::backend::{
    ChannelQueryMap, CommentBackend, CommentsResponse, HttpCommentBackend, IntervalBucket,
    IntervalsResponse, WireComment,
};

pub use crate::store::{
    CommentStore, FETCH_THROTTLE, FETCH_WINDOW, FetchPlan, Interval, IntervalIndex, ThreadCatalog,
};

pub use crate::overlay::{
    ActiveComment, CommentGeometry, CommentPool, DEFAULT_SCREEN_WIDTH, LaneOccupant,
    LanePlacement, LaneState, LinearMotion, MonospaceMeasure, Motion, OverlayEngine,
    PlaybackCursor, PoolSlot, TextMeasure, select_lane,
};

pub use crate::player::OverlayPlayer;
