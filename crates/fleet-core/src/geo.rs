//! Planar coordinate type and the fixed-step motion primitive.
//!
//! Graph coordinates are plain Cartesian units (metres in practice, but the
//! simulator never assumes a unit).  `f32` is plenty for warehouse-scale maps.

/// A 2-D point in graph coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        self.distance_2(other).sqrt()
    }

    /// Squared Euclidean distance — cheaper when only comparing.
    #[inline]
    pub fn distance_2(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Advance one fixed step of length `step` toward `target`.
    ///
    /// Returns [`Step::Arrived`] when the remaining distance is strictly less
    /// than `step` (the caller snaps to `target`); otherwise the new position,
    /// exactly `step` closer.
    pub fn step_toward(self, target: Point, step: f32) -> Step {
        let remaining = self.distance(target);
        if remaining < step {
            return Step::Arrived;
        }
        Step::Advanced(self.lerp(target, step / remaining))
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Outcome of [`Point::step_toward`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Step {
    /// Still travelling; holds the new position.
    Advanced(Point),
    /// Within one step of the target.
    Arrived,
}
