//! Lane assignment for scrolling comments.
//!
//! Each comment travels from `x = screen_width` to `x = -width` linearly
//! over its travel duration. [`select_lane`] is a pure function: given the
//! lane states at `now` it picks the first lane that is provably clear, and
//! degrades to the least-risk lane with a half-lane nudge when none is.

use crate::time::{DurationMs, PlaybackTime};

/// Geometry of a comment about to enter the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommentGeometry {
    /// Pixel width of the comment text.
    pub width: f32,
    /// Time the comment takes to cross the screen.
    pub travel: DurationMs,
    /// Current render surface width in pixels.
    pub screen_width: f32,
}

impl CommentGeometry {
    /// Leftward velocity in pixels per millisecond.
    #[must_use]
    pub fn velocity(&self) -> f32 {
        if self.travel.value() <= 0 {
            0.0
        } else {
            (self.screen_width + self.width) / self.travel.value() as f32
        }
    }
}

/// The comment currently tracked as occupying a lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneOccupant {
    /// Pool slot index of the occupant.
    pub slot: usize,
    /// Playback time at which the occupant entered the screen.
    pub entered_at: PlaybackTime,
    /// Pixel width of the occupant text.
    pub width: f32,
    /// Travel duration of the occupant.
    pub travel: DurationMs,
}

impl LaneOccupant {
    /// Playback time at which the occupant leaves the screen entirely.
    #[must_use]
    pub fn clears_at(&self) -> PlaybackTime {
        self.entered_at + self.travel
    }

    /// X position of the occupant's right edge at `now`.
    #[must_use]
    pub fn right_edge(&self, now: PlaybackTime, screen_width: f32) -> f32 {
        if self.travel.value() <= 0 {
            return -self.width;
        }
        let elapsed = (now - self.entered_at).value() as f32;
        let distance = (screen_width + self.width) * elapsed / self.travel.value() as f32;
        screen_width - distance + self.width
    }
}

/// Occupancy state of one lane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaneState {
    occupant: Option<LaneOccupant>,
}

impl LaneState {
    /// A lane with no tracked occupant.
    #[must_use]
    pub const fn empty() -> Self {
        Self { occupant: None }
    }

    /// The tracked occupant, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<&LaneOccupant> {
        self.occupant.as_ref()
    }

    /// Track a new occupant, replacing any prior one.
    pub const fn set_occupant(&mut self, occupant: LaneOccupant) {
        self.occupant = Some(occupant);
    }

    /// Clear the tracked occupant.
    pub const fn clear(&mut self) {
        self.occupant = None;
    }

    /// Clear the occupant only if it is the given slot.
    pub fn clear_slot(&mut self, slot: usize) {
        if self.occupant.is_some_and(|occupant| occupant.slot == slot) {
            self.occupant = None;
        }
    }
}

/// Outcome of a lane selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanePlacement {
    /// Index of the selected lane.
    pub index: usize,
    /// Vertical position in lane units. Equal to `index` in the common
    /// case; offset by `+-0.25` on nudged fallback placements.
    pub position: f32,
}

/// Assign a lane to an incoming comment.
///
/// Scans lanes in index order and returns the first that is empty, holds an
/// effectively invisible occupant, or is provably clear: the occupant will
/// have left the screen before the new comment's leading edge reaches the
/// occupant's current right edge, and that edge is already inside the
/// screen. When no lane qualifies, falls back to the lane minimizing
/// `(remaining life, right edge)` lexicographically, nudging the vertical
/// position by a quarter lane when `occupied_positions` already contains the
/// plain position.
#[must_use]
pub fn select_lane(
    geometry: &CommentGeometry,
    now: PlaybackTime,
    lanes: &[LaneState],
    occupied_positions: &[f32],
) -> LanePlacement {
    let velocity = geometry.velocity();
    let mut fallback: Option<(usize, f32, f32)> = None;

    for (index, lane) in lanes.iter().enumerate() {
        let Some(occupant) = lane.occupant() else {
            return LanePlacement {
                index,
                position: index as f32,
            };
        };
        if occupant.width <= 0.0 {
            return LanePlacement {
                index,
                position: index as f32,
            };
        }
        let remaining_life = (occupant.clears_at() - now).value() as f32;
        let right_edge = occupant.right_edge(now, geometry.screen_width);
        let reach_time = if velocity > 0.0 {
            (geometry.screen_width - right_edge) / velocity
        } else {
            f32::INFINITY
        };
        if remaining_life <= reach_time && right_edge <= geometry.screen_width {
            return LanePlacement {
                index,
                position: index as f32,
            };
        }
        let candidate = (index, remaining_life, right_edge);
        let better = fallback.is_none_or(|(_, best_life, best_edge)| {
            remaining_life
                .total_cmp(&best_life)
                .then(right_edge.total_cmp(&best_edge))
                .is_lt()
        });
        if better {
            fallback = Some(candidate);
        }
    }

    let index = fallback.map_or(0, |(index, _, _)| index);
    let position = nudged_position(index, occupied_positions);
    LanePlacement { index, position }
}

/// Pick `index`, `index + 0.25` or `index - 0.25`, whichever is not already
/// occupied; repeated fallbacks to the same lane alternate around it.
fn nudged_position(index: usize, occupied_positions: &[f32]) -> f32 {
    let base = index as f32;
    [base, base + 0.25, base - 0.25]
        .into_iter()
        .find(|candidate| {
            !occupied_positions
                .iter()
                .any(|taken| (taken - candidate).abs() < f32::EPSILON)
        })
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: f32 = 800.0;
    const TRAVEL: DurationMs = DurationMs(5000);

    fn geometry(width: f32) -> CommentGeometry {
        CommentGeometry {
            width,
            travel: TRAVEL,
            screen_width: SCREEN,
        }
    }

    fn occupied(slot: usize, entered_at: i64, width: f32) -> LaneState {
        let mut lane = LaneState::empty();
        lane.set_occupant(LaneOccupant {
            slot,
            entered_at: PlaybackTime(entered_at),
            width,
            travel: TRAVEL,
        });
        lane
    }

    #[test]
    fn empty_lane_wins_first() {
        let lanes = [LaneState::empty(), LaneState::empty()];
        let placement = select_lane(&geometry(100.0), PlaybackTime(0), &lanes, &[]);
        assert_eq!(placement.index, 0);
        assert_eq!(placement.position, 0.0);
    }

    #[test]
    fn occupied_first_lane_defers_to_second() {
        // Lane 0 occupant entered 1 s before the candidate: clears at 4000,
        // right edge at 600 px. The candidate would reach that edge after
        // ~1111 ms, long before the occupant clears, so lane 0 is not
        // provably clear yet.
        let lanes = [occupied(0, -1000, 200.0), LaneState::empty()];
        let placement = select_lane(&geometry(100.0), PlaybackTime(1000), &lanes, &[]);
        assert_eq!(placement.index, 1);
        assert_eq!(placement.position, 1.0);
    }

    #[test]
    fn lane_clear_before_reach_is_reused() {
        // Occupant almost done: clears in 500 ms, right edge at 90 px. The
        // candidate needs ~3945 ms to reach x = 90, so the lane is provably
        // clear.
        let lanes = [occupied(0, -4500, 100.0)];
        let placement = select_lane(&geometry(100.0), PlaybackTime(0), &lanes, &[]);
        assert_eq!(placement.index, 0);
    }

    #[test]
    fn occupant_still_entering_blocks_the_lane() {
        // Right edge beyond the screen edge: the occupant has not fully
        // entered, so the lane can never be provably clear.
        let lanes = [occupied(0, -100, 300.0), LaneState::empty()];
        let placement = select_lane(&geometry(50.0), PlaybackTime(0), &lanes, &[]);
        assert_eq!(placement.index, 1);
    }

    #[test]
    fn invisible_occupant_counts_as_free() {
        let lanes = [occupied(0, 0, 0.0)];
        let placement = select_lane(&geometry(100.0), PlaybackTime(0), &lanes, &[]);
        assert_eq!(placement.index, 0);
    }

    #[test]
    fn fallback_picks_least_risk_lane() {
        // Both lanes blocked; lane 1 clears sooner.
        let lanes = [occupied(0, -500, 300.0), occupied(1, -2000, 300.0)];
        let placement = select_lane(&geometry(200.0), PlaybackTime(0), &lanes, &[]);
        assert_eq!(placement.index, 1);
        assert_eq!(placement.position, 1.0);
    }

    #[test]
    fn repeated_fallback_nudges_position() {
        let lanes = [occupied(0, -500, 300.0), occupied(1, -2000, 300.0)];
        let geometry = geometry(200.0);
        let first = select_lane(&geometry, PlaybackTime(0), &lanes, &[]);
        assert_eq!(first.position, 1.0);
        let second = select_lane(&geometry, PlaybackTime(0), &lanes, &[1.0]);
        assert_eq!(second.position, 1.25);
        let third = select_lane(&geometry, PlaybackTime(0), &lanes, &[1.0, 1.25]);
        assert_eq!(third.position, 0.75);
        let fourth = select_lane(&geometry, PlaybackTime(0), &lanes, &[1.0, 1.25, 0.75]);
        assert_eq!(fourth.position, 1.0);
    }
}
