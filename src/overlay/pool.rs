//! Fixed-capacity pool of reusable comment slots.
//!
//! The pool is an arena with a round-robin cursor: bounded memory while
//! video plays for hours is an invariant, not an optimization. When every
//! slot is occupied the incoming comment is dropped; capacity is the
//! backpressure valve.

use crate::comment::CommentRecord;
use crate::time::PlaybackTime;

/// One reusable slot holding an on-screen comment.
#[derive(Debug, Clone, Default)]
pub struct PoolSlot {
    comment: Option<CommentRecord>,
    lane: f32,
    activated_at: PlaybackTime,
    width: f32,
}

impl PoolSlot {
    /// Whether the slot currently owns a visible comment.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.comment.is_some()
    }

    /// The held comment, if any.
    #[must_use]
    pub const fn comment(&self) -> Option<&CommentRecord> {
        self.comment.as_ref()
    }

    /// Assigned lane position. Fractional on fallback placements.
    #[must_use]
    pub const fn lane(&self) -> f32 {
        self.lane
    }

    /// Playback time at which the slot was activated.
    #[must_use]
    pub const fn activated_at(&self) -> PlaybackTime {
        self.activated_at
    }

    /// Measured pixel width of the comment text.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    fn activate(&mut self, comment: CommentRecord, lane: f32, at: PlaybackTime, width: f32) {
        self.comment = Some(comment);
        self.lane = lane;
        self.activated_at = at;
        self.width = width;
    }

    fn clear(&mut self) {
        self.comment = None;
        self.lane = 0.0;
        self.activated_at = PlaybackTime::default();
        self.width = 0.0;
    }
}

/// Fixed-size slot arena with a round-robin acquisition cursor.
#[derive(Debug, Clone)]
pub struct CommentPool {
    slots: Vec<PoolSlot>,
    cursor: usize,
}

impl CommentPool {
    /// Create a pool with `capacity` free slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![PoolSlot::default(); capacity],
            cursor: 0,
        }
    }

    /// Total number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_occupied()).count()
    }

    /// Find a free slot round-robin and activate it with the given comment.
    ///
    /// Returns the slot index, or `None` when every slot is occupied (the
    /// comment is dropped by the caller).
    pub fn activate(
        &mut self,
        comment: CommentRecord,
        lane: f32,
        at: PlaybackTime,
        width: f32,
    ) -> Option<usize> {
        let capacity = self.slots.len();
        let index = (0..capacity)
            .map(|offset| (self.cursor + offset) % capacity)
            .find(|&index| !self.slots[index].is_occupied())?;
        self.slots[index].activate(comment, lane, at, width);
        self.cursor = (index + 1) % capacity;
        Some(index)
    }

    /// Free a slot. Freeing an already-free slot is a no-op.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.clear();
        }
    }

    /// Free every slot.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.cursor = 0;
    }

    /// Replace the arena with `capacity` free slots, dropping all active
    /// comments.
    pub fn resize(&mut self, capacity: usize) {
        self.slots = vec![PoolSlot::default(); capacity];
        self.cursor = 0;
    }

    /// Access a slot by index.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&PoolSlot> {
        self.slots.get(index)
    }

    /// Iterate over occupied slots with their indices.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &PoolSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_occupied())
    }
}
