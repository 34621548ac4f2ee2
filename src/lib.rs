//! Scrolling comment overlay engine for recorded-program playback.
//!
//! This crate synchronizes a time-indexed stream of user comments with
//! video playback and assigns each comment a horizontal lane so that
//! simultaneously visible comments do not collide while scrolling across
//! the screen at constant velocity.
//!
//! The pipeline, leaf first:
//!
//! - [`store::IntervalIndex`] holds a minute-granularity histogram of
//!   comment density and tracks which minutes have been fetched.
//! - [`store::CommentStore`] performs windowed, coalesced fetches against
//!   the index and keeps the comment sequence ordered by post time.
//! - [`overlay::select_lane`] is the stateless lane scheduler.
//! - [`overlay::CommentPool`] bounds memory with a fixed arena of reusable
//!   comment slots.
//! - [`overlay::OverlayEngine`] is the playback clock synchronizer driving
//!   all of the above from the host's time signal.
//! - [`player::OverlayPlayer`] ties a store and an engine to a
//!   [`backend::CommentBackend`] for the host application.
//!
//! The engine consumes a playback-time signal and produces per-tick
//! placement snapshots; it does not render pixels itself. Every failure
//! path degrades to "fewer or no comments displayed" and leaves playback
//! untouched.

pub mod backend;
pub mod comment;
pub mod config;
pub mod overlay;
pub mod player;
pub mod prelude;
pub mod store;
pub mod test_helpers;
pub mod time;

use thiserror::Error;

/// An error at the comment backend boundary.
///
/// The engine core never raises these to the host: the store recovers from
/// every backend failure as an empty result. They surface only from direct
/// backend calls and configuration parsing.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Transport-level failure talking to the comment backend.
    #[error("backend transport: {0}")]
    Transport(#[from] reqwest::Error),
    /// A payload that could not be decoded.
    #[error("backend payload: {0}")]
    Payload(#[from] serde_json::Error),
    /// The backend answered with a non-ok status marker.
    #[error("backend status: {0}")]
    Status(String),
}

/// Result alias over [`OverlayError`].
pub type Result<T> = std::result::Result<T, OverlayError>;
