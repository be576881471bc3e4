//! Primitive trait and HitRecord for ray-object intersection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use umbra_math::{Aabb, Ray, Vec3};

use crate::{Material, Sampler};

static NEXT_PRIMITIVE_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of a primitive, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(u64);

impl PrimitiveId {
    /// Allocate a fresh identity.
    pub fn next() -> Self {
        Self(NEXT_PRIMITIVE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Closest intersection found so far along a ray.
///
/// A single record is threaded through a whole query; primitives only
/// overwrite it with hits strictly closer than `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
    /// The primitive that was hit
    pub id: Option<PrimitiveId>,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            front_face: false,
            id: None,
        }
    }
}

impl HitRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `t` is inside the ray's interval and closer than the current hit.
    #[inline]
    pub fn accepts(&self, ray: &Ray, t: f32) -> bool {
        t > ray.t_min && t < ray.t_max && t < self.t
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The stored normal always opposes the ray.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) <= 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Something a ray can hit.
///
/// Implementations must be `Send + Sync`: a built scene is shared read-only
/// between render workers.
pub trait Primitive: Send + Sync {
    /// Intersect `ray`, updating `rec` only with a hit closer than `rec.t`.
    ///
    /// Returns true if `rec` was updated.
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    fn id(&self) -> Option<PrimitiveId> {
        None
    }

    fn material(&self) -> Option<&Arc<dyn Material>> {
        None
    }

    /// Sample a direction from `rec.p` toward this primitive.
    fn sample(&self, _rec: &HitRecord, _sampler: &mut dyn Sampler) -> Vec3 {
        Vec3::ZERO
    }

    /// Solid-angle density of [`Primitive::sample`] for `direction` seen from `rec.p`.
    fn pdf(&self, _rec: &HitRecord, _direction: Vec3) -> f32 {
        0.0
    }
}
