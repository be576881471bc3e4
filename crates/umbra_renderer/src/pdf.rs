//! Probability densities over directions.

use umbra_math::Vec3;

use crate::hittable::{HitRecord, Primitive};
use crate::sampling::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf, Onb};
use crate::Sampler;

/// A direction distribution anchored at a shading point.
pub trait Pdf {
    /// Draw a direction.
    fn sample(&self, rec: &HitRecord, sampler: &mut dyn Sampler) -> Vec3;

    /// Solid-angle density of `direction`.
    fn value(&self, rec: &HitRecord, direction: Vec3) -> f32;
}

/// Cosine-weighted hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    basis: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            basis: Onb::from_w(normal),
        }
    }
}

impl Pdf for CosinePdf {
    fn sample(&self, _rec: &HitRecord, sampler: &mut dyn Sampler) -> Vec3 {
        let u = sampler.get_2d();
        self.basis.local(sample_cosine_hemisphere(u.x, u.y))
    }

    fn value(&self, _rec: &HitRecord, direction: Vec3) -> f32 {
        sample_cosine_hemisphere_pdf(direction.normalize().dot(self.basis.w))
    }
}

/// Directions toward a primitive, as seen from the shading point.
pub struct HittablePdf<'a> {
    primitive: &'a dyn Primitive,
}

impl<'a> HittablePdf<'a> {
    pub fn new(primitive: &'a dyn Primitive) -> Self {
        Self { primitive }
    }
}

impl Pdf for HittablePdf<'_> {
    fn sample(&self, rec: &HitRecord, sampler: &mut dyn Sampler) -> Vec3 {
        self.primitive.sample(rec, sampler)
    }

    fn value(&self, rec: &HitRecord, direction: Vec3) -> f32 {
        self.primitive.pdf(rec, direction)
    }
}

/// Even mixture of two densities.
pub struct MixPdf<'a> {
    pdfs: [&'a dyn Pdf; 2],
}

impl<'a> MixPdf<'a> {
    pub fn new(first: &'a dyn Pdf, second: &'a dyn Pdf) -> Self {
        Self {
            pdfs: [first, second],
        }
    }
}

impl Pdf for MixPdf<'_> {
    fn sample(&self, rec: &HitRecord, sampler: &mut dyn Sampler) -> Vec3 {
        if sampler.get_1d() < 0.5 {
            self.pdfs[0].sample(rec, sampler)
        } else {
            self.pdfs[1].sample(rec, sampler)
        }
    }

    fn value(&self, rec: &HitRecord, direction: Vec3) -> f32 {
        0.5 * self.pdfs[0].value(rec, direction) + 0.5 * self.pdfs[1].value(rec, direction)
    }
}
