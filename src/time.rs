//! Time primitives for the overlay engine.
//!
//! Comment records carry absolute wall-clock timestamps, while the host
//! application reports playback position in milliseconds relative to program
//! start. [`DurationMs`] bridges the two; the configured channel delay is a
//! plain (possibly negative) [`DurationMs`] applied uniformly when mapping
//! playback time onto comment timestamps.

use serde::{Deserialize, Serialize};

/// Milliseconds in one histogram bucket (one calendar minute).
pub const MINUTE_MS: i64 = 60_000;

/// Absolute time in milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Create a new `Timestamp`.
    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the contained millisecond value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Round down to the minute boundary at or below this time.
    #[must_use]
    pub const fn floor_to_minute(self) -> Self {
        Self(self.0.div_euclid(MINUTE_MS) * MINUTE_MS)
    }

    /// Round up to the minute boundary at or above this time.
    #[must_use]
    pub const fn ceil_to_minute(self) -> Self {
        let floored = self.floor_to_minute();
        if floored.0 == self.0 {
            floored
        } else {
            Self(floored.0 + MINUTE_MS)
        }
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::ops::Add<DurationMs> for Timestamp {
    type Output = Self;

    fn add(self, rhs: DurationMs) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub<DurationMs> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: DurationMs) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Sub for Timestamp {
    type Output = DurationMs;

    fn sub(self, rhs: Self) -> Self::Output {
        DurationMs(self.0 - rhs.0)
    }
}

impl std::ops::Add<PlaybackTime> for Timestamp {
    type Output = Self;

    fn add(self, rhs: PlaybackTime) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

/// Playback position in milliseconds relative to program start.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlaybackTime(pub i64);

impl PlaybackTime {
    /// Create a new `PlaybackTime`.
    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the contained millisecond value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for PlaybackTime {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::ops::Add<DurationMs> for PlaybackTime {
    type Output = Self;

    fn add(self, rhs: DurationMs) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub<DurationMs> for PlaybackTime {
    type Output = Self;

    fn sub(self, rhs: DurationMs) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Sub for PlaybackTime {
    type Output = DurationMs;

    fn sub(self, rhs: Self) -> Self::Output {
        DurationMs(self.0 - rhs.0)
    }
}

/// A span of time in milliseconds. May be negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DurationMs(pub i64);

impl DurationMs {
    /// The zero span.
    pub const ZERO: Self = Self(0);

    /// One second.
    pub const SECOND: Self = Self(1000);

    /// One minute.
    pub const MINUTE: Self = Self(MINUTE_MS);

    /// Create a new `DurationMs`.
    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the contained millisecond value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Absolute magnitude of the span.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// The span as a fraction of another span, clamped to `[0, 1]`.
    #[must_use]
    pub fn fraction_of(self, whole: Self) -> f32 {
        if whole.0 <= 0 {
            1.0
        } else {
            (self.0 as f32 / whole.0 as f32).clamp(0.0, 1.0)
        }
    }
}

impl From<i64> for DurationMs {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::ops::Add for DurationMs {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for DurationMs {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Neg for DurationMs {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minute_alignment() {
        assert_eq!(Timestamp(0).floor_to_minute(), Timestamp(0));
        assert_eq!(Timestamp(59_999).floor_to_minute(), Timestamp(0));
        assert_eq!(Timestamp(60_000).floor_to_minute(), Timestamp(60_000));
        assert_eq!(Timestamp(60_001).ceil_to_minute(), Timestamp(120_000));
        assert_eq!(Timestamp(60_000).ceil_to_minute(), Timestamp(60_000));
    }

    #[test]
    fn minute_alignment_negative() {
        assert_eq!(Timestamp(-1).floor_to_minute(), Timestamp(-60_000));
        assert_eq!(Timestamp(-1).ceil_to_minute(), Timestamp(0));
        assert_eq!(Timestamp(-60_000).floor_to_minute(), Timestamp(-60_000));
    }

    #[test]
    fn playback_arithmetic() {
        let start = Timestamp(1_000_000);
        let at = start + PlaybackTime(30_000) + DurationMs(-500);
        assert_eq!(at, Timestamp(1_029_500));
        assert_eq!(PlaybackTime(3000) - PlaybackTime(1000), DurationMs(2000));
    }

    #[test]
    fn fraction_clamps() {
        assert_eq!(DurationMs(2500).fraction_of(DurationMs(5000)), 0.5);
        assert_eq!(DurationMs(-10).fraction_of(DurationMs(5000)), 0.0);
        assert_eq!(DurationMs(9000).fraction_of(DurationMs(5000)), 1.0);
        assert_eq!(DurationMs(1).fraction_of(DurationMs::ZERO), 1.0);
    }
}
