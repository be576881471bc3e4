use crate::{Interval, Vec3};

/// A ray with origin, direction and the parametric range in which hits count.
///
/// The direction does not have to be normalized. Hits are only accepted for
/// `t` in `(t_min, t_max)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// Offset used to keep secondary rays from re-hitting the surface they leave.
    pub const DEFAULT_T_MIN: f32 = 1e-4;

    /// Create a new ray with the default interval `[1e-4, inf)`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_interval(origin, direction, Self::DEFAULT_T_MIN, f32::INFINITY)
    }

    /// Create a ray restricted to `[t_min, t_max)`.
    pub fn with_interval(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        debug_assert!(t_min < t_max, "ray interval [{t_min}, {t_max}) is empty");
        Self {
            origin,
            direction,
            t_min,
            t_max,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// The valid parametric range as an [`Interval`].
    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.t_min, self.t_max)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
