use crate::{Interval, Ray, Vec3};

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis). The empty box has
/// inverted intervals so that the first [`Aabb::expand`] sets real bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Smallest box containing every point in the iterator.
    pub fn from_iter_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.expand(p);
        }
        aabb
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// True until something has been expanded into the box.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Grow the box to contain `p`.
    pub fn expand(&mut self, p: Vec3) {
        self.x = self.x.include(p.x);
        self.y = self.y.include(p.y);
        self.z = self.z.include(p.z);
    }

    /// Grow the box to contain `other`.
    pub fn expand_box(&mut self, other: &Aabb) {
        *self = Aabb::surrounding(self, other);
    }

    /// Get the interval for a specific axis.
    pub fn axis_interval(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Returns the axis with the longest extent.
    ///
    /// Ties prefer X over Y over Z.
    pub fn max_extent(&self) -> Axis {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size >= y_size && x_size >= z_size {
            Axis::X
        } else if y_size >= z_size {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    pub fn surface_area(&self) -> f32 {
        let d = self.max() - self.min();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    /// Returns true if `p` lies inside the box or on its boundary.
    pub fn contains(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Returns true if the two boxes share at least one point.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let a = self.axis_interval(axis);
            let b = other.axis_interval(axis);
            a.max >= b.min && a.min <= b.max
        })
    }

    /// Test if a ray intersects this AABB within the ray's own interval.
    ///
    /// Uses the slab method. A zero direction component gives an infinite
    /// reciprocal, which leaves the interval untouched when the origin is
    /// inside that slab and empties it otherwise.
    pub fn hit(&self, r: &Ray) -> bool {
        let mut ray_t = r.interval();

        for axis in Axis::ALL {
            let i = axis.index();
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[i];
            let mut t0 = (slab.min - r.origin[i]) * adinv;
            let mut t1 = (slab.max - r.origin[i]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // f32::max/min drop a NaN operand (origin on a plane, parallel ray)
            ray_t.min = ray_t.min.max(t0);
            ray_t.max = ray_t.max.min(t1);
            if ray_t.min > ray_t.max {
                return false;
            }
        }

        true
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
