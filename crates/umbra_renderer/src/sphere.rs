//! Sphere primitive for ray tracing.

use std::sync::Arc;

use umbra_math::{Aabb, Ray, Vec3};

use crate::hittable::{HitRecord, Primitive, PrimitiveId};
use crate::sampling::{
    sample_cone, sample_cone_pdf, sample_unit_sphere, sample_unit_sphere_pdf, Onb,
};
use crate::{Material, Sampler};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
    id: PrimitiveId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
            id: PrimitiveId::next(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Cosine of the half-angle of the cone the sphere subtends from `p`,
    /// or `None` when `p` is inside the sphere.
    fn cos_theta_max(&self, p: Vec3) -> Option<f32> {
        let dist_squared = (self.center - p).length_squared();
        let r2 = self.radius * self.radius;
        if dist_squared <= r2 {
            return None;
        }
        Some((1.0 - r2 / dist_squared).max(0.0).sqrt())
    }
}

impl Primitive for Sphere {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !(root > ray.t_min && root < ray.t_max) {
            root = (h + sqrtd) / a;
            if !(root > ray.t_min && root < ray.t_max) {
                return false;
            }
        }
        if !rec.accepts(ray, root) {
            return false;
        }

        rec.t = root;
        rec.p = ray.at(root);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        rec.id = Some(self.id);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn id(&self) -> Option<PrimitiveId> {
        Some(self.id)
    }

    fn material(&self) -> Option<&Arc<dyn Material>> {
        Some(&self.material)
    }

    fn sample(&self, rec: &HitRecord, sampler: &mut dyn Sampler) -> Vec3 {
        let u = sampler.get_2d();
        match self.cos_theta_max(rec.p) {
            Some(cos_theta_max) => {
                let basis = Onb::from_w(self.center - rec.p);
                basis.local(sample_cone(u.x, u.y, cos_theta_max))
            }
            None => sample_unit_sphere(u.x, u.y),
        }
    }

    fn pdf(&self, rec: &HitRecord, direction: Vec3) -> f32 {
        let Some(cos_theta_max) = self.cos_theta_max(rec.p) else {
            return sample_unit_sphere_pdf();
        };

        let mut probe = HitRecord::new();
        if !self.hit(&Ray::new(rec.p, direction), &mut probe) {
            return 0.0;
        }
        sample_cone_pdf(cos_theta_max)
    }
}
