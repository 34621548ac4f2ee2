//! Horizontal motion of activated slots.
//!
//! The scheduling and collision logic is written once against the
//! [`Motion`] trait; only the motion backend varies per render target. The
//! built-in [`LinearMotion`] derives positions purely from elapsed playback
//! time. A renderer driving its own animation (declarative transitions,
//! direct style mutation) implements the trait, reports completion when its
//! animation ends, and the engine frees the slot on the next tick.

use std::collections::HashMap;

use crate::time::{DurationMs, PlaybackTime};

/// Motion backend for scrolling comment slots.
pub trait Motion {
    /// Begin moving a slot's leading edge from `from_x` to `to_x` over
    /// `duration`, starting at `now`.
    fn schedule(
        &mut self,
        slot: usize,
        from_x: f32,
        to_x: f32,
        duration: DurationMs,
        now: PlaybackTime,
    );

    /// Current x position of the slot's leading edge, or `None` once the
    /// travel has completed. The engine frees a slot when its motion
    /// reports completion.
    fn position(&self, slot: usize, now: PlaybackTime) -> Option<f32>;

    /// Forget a slot's motion (the slot was freed or reset).
    fn cancel(&mut self, slot: usize);
}

#[derive(Debug, Clone, Copy)]
struct Travel {
    from_x: f32,
    to_x: f32,
    started_at: PlaybackTime,
    duration: DurationMs,
}

/// Motion backend deriving positions linearly from elapsed playback time.
#[derive(Debug, Clone, Default)]
pub struct LinearMotion {
    travels: HashMap<usize, Travel>,
}

impl LinearMotion {
    /// Create an empty motion backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Motion for LinearMotion {
    fn schedule(
        &mut self,
        slot: usize,
        from_x: f32,
        to_x: f32,
        duration: DurationMs,
        now: PlaybackTime,
    ) {
        self.travels.insert(
            slot,
            Travel {
                from_x,
                to_x,
                started_at: now,
                duration,
            },
        );
    }

    fn position(&self, slot: usize, now: PlaybackTime) -> Option<f32> {
        let travel = self.travels.get(&slot)?;
        let elapsed = now - travel.started_at;
        if elapsed > travel.duration {
            return None;
        }
        let fraction = elapsed.fraction_of(travel.duration);
        Some(travel.from_x + (travel.to_x - travel.from_x) * fraction)
    }

    fn cancel(&mut self, slot: usize) {
        self.travels.remove(&slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linearly() {
        let mut motion = LinearMotion::new();
        motion.schedule(0, 800.0, -200.0, DurationMs(5000), PlaybackTime(1000));
        assert_eq!(motion.position(0, PlaybackTime(1000)), Some(800.0));
        assert_eq!(motion.position(0, PlaybackTime(3500)), Some(300.0));
        assert_eq!(motion.position(0, PlaybackTime(6000)), Some(-200.0));
    }

    #[test]
    fn completes_strictly_after_duration() {
        let mut motion = LinearMotion::new();
        motion.schedule(0, 800.0, -200.0, DurationMs(5000), PlaybackTime(0));
        assert!(motion.position(0, PlaybackTime(5000)).is_some());
        assert_eq!(motion.position(0, PlaybackTime(5001)), None);
    }

    #[test]
    fn cancel_forgets_the_slot() {
        let mut motion = LinearMotion::new();
        motion.schedule(3, 800.0, 0.0, DurationMs(1000), PlaybackTime(0));
        motion.cancel(3);
        assert_eq!(motion.position(3, PlaybackTime(0)), None);
    }

    #[test]
    fn unknown_slot_has_no_position() {
        let motion = LinearMotion::new();
        assert_eq!(motion.position(7, PlaybackTime(0)), None);
    }
}
