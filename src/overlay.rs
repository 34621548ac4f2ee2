//! Scrolling comment overlay engine.
//!
//! The engine owns all mutable overlay state: the playback cursor over the
//! comment sequence, the fixed slot pool and the lane states. Its only
//! mutation entry points are [`OverlayEngine::on_time_update`] and
//! [`OverlayEngine::on_config_change`]; the renderer polls a read-only
//! [`OverlayEngine::snapshot`] each frame.
//!
//! A backward time update of any magnitude is handled as a seek reset, so
//! backends with wrapping stream clocks self-heal through the reset path. A
//! forward jump larger than the comment lifetime clamps the catch-up window
//! instead of replaying the whole skipped interval.

pub mod lane;
pub mod measure;
pub mod motion;
pub mod pool;

pub use lane::{CommentGeometry, LaneOccupant, LanePlacement, LaneState, select_lane};
pub use measure::{MonospaceMeasure, TextMeasure};
pub use motion::{LinearMotion, Motion};
pub use pool::{CommentPool, PoolSlot};

use log::{debug, info};

use crate::comment::CommentRecord;
use crate::config::OverlayConfig;
use crate::store::ThreadCatalog;
use crate::time::{PlaybackTime, Timestamp};

/// Render surface width assumed until the host reports one.
pub const DEFAULT_SCREEN_WIDTH: f32 = 640.0;

/// Cursor over the time-ordered comment sequence.
///
/// Invariant: every record below `pointer` has `occurred_at` before the
/// window start plus the channel offset. The pointer is monotonically
/// non-decreasing except on an explicit backward-seek reset to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    pointer: usize,
    window_start: PlaybackTime,
}

impl PlaybackCursor {
    /// Index of the first unconsumed record.
    #[must_use]
    pub const fn pointer(&self) -> usize {
        self.pointer
    }

    /// Lower bound of the next consumption window.
    #[must_use]
    pub const fn window_start(&self) -> PlaybackTime {
        self.window_start
    }
}

/// One active comment placement for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveComment {
    /// Display text, markup already stripped.
    pub text: String,
    /// Vertical position in lane units. Fractional on fallback placements.
    pub lane: f32,
    /// Fraction of the travel completed, in `[0, 1]`.
    pub elapsed_fraction: f32,
}

/// The playback clock synchronizer.
///
/// Drives the comment pool and lane assignment from the host's playback
/// time signal. Comments are read from a [`crate::store::CommentStore`]
/// sequence passed in per tick; `origin` is the absolute time of playback
/// position zero with the configured delay applied.
#[derive(Debug)]
pub struct OverlayEngine<M = LinearMotion, T = MonospaceMeasure> {
    config: OverlayConfig,
    screen_width: f32,
    pool: CommentPool,
    lanes: Vec<LaneState>,
    cursor: PlaybackCursor,
    last_seen: Option<PlaybackTime>,
    motion: M,
    measure: T,
}

impl OverlayEngine {
    /// Create an engine with the built-in linear motion backend and width
    /// estimator.
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self::with_parts(config, LinearMotion::new(), MonospaceMeasure::default())
    }
}

impl<M: Motion, T: TextMeasure> OverlayEngine<M, T> {
    /// Create an engine with custom motion and measure backends.
    #[must_use]
    pub fn with_parts(config: OverlayConfig, motion: M, measure: T) -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            pool: CommentPool::new(config.max_comments),
            lanes: vec![LaneState::empty(); config.max_lines],
            cursor: PlaybackCursor::default(),
            last_seen: None,
            motion,
            measure,
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The playback cursor.
    #[must_use]
    pub const fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    /// The slot pool.
    #[must_use]
    pub const fn pool(&self) -> &CommentPool {
        &self.pool
    }

    /// The lane states.
    #[must_use]
    pub fn lanes(&self) -> &[LaneState] {
        &self.lanes
    }

    /// Report the render surface width used for lane scheduling.
    pub const fn set_viewport(&mut self, screen_width: f32) {
        self.screen_width = screen_width;
    }

    /// Apply a configuration change.
    ///
    /// The lane array is rebuilt when `max_lines` changes and the pool when
    /// `max_comments` changes (dropping active comments); `duration` and
    /// `delay` changes take effect on the next tick without a reset.
    pub fn on_config_change(&mut self, config: OverlayConfig) {
        if config.max_lines != self.config.max_lines {
            self.lanes = vec![LaneState::empty(); config.max_lines];
        }
        if config.max_comments != self.config.max_comments {
            let active: Vec<usize> = self.pool.iter_active().map(|(index, _)| index).collect();
            for index in active {
                self.motion.cancel(index);
            }
            self.pool.resize(config.max_comments);
            for lane in &mut self.lanes {
                lane.clear();
            }
        }
        self.config = config;
    }

    /// Deactivate everything and rewind the cursor to the start of the
    /// sequence.
    pub fn reset(&mut self) {
        let active: Vec<usize> = self.pool.iter_active().map(|(index, _)| index).collect();
        for index in active {
            self.motion.cancel(index);
        }
        self.pool.clear();
        for lane in &mut self.lanes {
            lane.clear();
        }
        self.cursor.pointer = 0;
    }

    /// Advance the overlay to playback position `t`.
    ///
    /// `records` is the time-ordered comment sequence, `catalog` the active
    /// thread filter, `origin` the absolute time of playback position zero
    /// with the channel delay applied. A backward `t` resets the overlay
    /// and reconsumes from the start of the sequence; a repeated identical
    /// `t` is a no-op.
    pub fn on_time_update(
        &mut self,
        t: PlaybackTime,
        records: &[CommentRecord],
        catalog: &ThreadCatalog,
        origin: Timestamp,
    ) {
        match self.last_seen {
            Some(last) if t == last => return,
            Some(last) if t < last => {
                info!(
                    "backward seek {} -> {}, resetting overlay",
                    last.value(),
                    t.value()
                );
                self.reset();
                self.cursor.window_start = t;
            }
            Some(last) if (t - last) > self.config.duration => {
                self.cursor.window_start = t - self.config.duration;
            }
            Some(_) => {}
            None => {
                self.cursor.window_start = t - self.config.duration;
            }
        }
        self.expire_completed(t);
        self.consume(records, catalog, origin, t);
        self.cursor.window_start = t;
        self.last_seen = Some(t);
    }

    /// Active placements at the last seen playback position.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ActiveComment> {
        self.snapshot_at(self.last_seen.unwrap_or_default())
    }

    /// Active placements at an arbitrary playback position, for renderers
    /// interpolating between ticks.
    #[must_use]
    pub fn snapshot_at(&self, now: PlaybackTime) -> Vec<ActiveComment> {
        self.pool
            .iter_active()
            .map(|(_, slot)| ActiveComment {
                text: slot
                    .comment()
                    .map(|comment| comment.text.clone())
                    .unwrap_or_default(),
                lane: slot.lane(),
                elapsed_fraction: (now - slot.activated_at()).fraction_of(self.config.duration),
            })
            .collect()
    }

    fn expire_completed(&mut self, now: PlaybackTime) {
        let expired: Vec<usize> = self
            .pool
            .iter_active()
            .filter(|&(index, _)| self.motion.position(index, now).is_none())
            .map(|(index, _)| index)
            .collect();
        for index in expired {
            for lane in &mut self.lanes {
                lane.clear_slot(index);
            }
            self.motion.cancel(index);
            self.pool.release(index);
        }
    }

    fn consume(
        &mut self,
        records: &[CommentRecord],
        catalog: &ThreadCatalog,
        origin: Timestamp,
        t: PlaybackTime,
    ) {
        let window_start = origin + self.cursor.window_start;
        let window_end = origin + t;
        while let Some(record) = records.get(self.cursor.pointer) {
            if record.occurred_at >= window_end {
                break;
            }
            if record.occurred_at >= window_start && catalog.is_enabled(&record.thread_title) {
                self.activate(record, t);
            }
            self.cursor.pointer += 1;
        }
    }

    fn activate(&mut self, record: &CommentRecord, now: PlaybackTime) {
        let text = record.display_text();
        let width = self.measure.width(&text);
        let geometry = CommentGeometry {
            width,
            travel: self.config.duration,
            screen_width: self.screen_width,
        };
        let occupied: Vec<f32> = self
            .pool
            .iter_active()
            .map(|(_, slot)| slot.lane())
            .collect();
        let placement = select_lane(&geometry, now, &self.lanes, &occupied);
        let mut display = record.clone();
        display.text = text;
        let Some(slot) = self
            .pool
            .activate(display, placement.position, now, width)
        else {
            debug!("comment pool exhausted, dropping {}", record.id);
            return;
        };
        if let Some(lane) = self.lanes.get_mut(placement.index) {
            lane.set_occupant(LaneOccupant {
                slot,
                entered_at: now,
                width,
                travel: self.config.duration,
            });
        }
        self.motion
            .schedule(slot, self.screen_width, -width, self.config.duration, now);
    }
}
