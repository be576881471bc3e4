//! Warping functions from the unit square to directions, with their densities.
//!
//! All directions are expressed in a local frame whose +Z is the axis of
//! interest; use [`Onb`] to bring them into world space.

use std::f32::consts::PI;

use umbra_math::Vec3;

use crate::Sampler;

/// Orthonormal basis built around a single direction (`w`).
#[derive(Debug, Clone, Copy)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Basis whose `w` axis is `n` normalized.
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    /// Local coordinates to world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}

/// Uniform direction on the unit sphere.
pub fn sample_unit_sphere(u1: f32, u2: f32) -> Vec3 {
    let phi = 2.0 * PI * u1;
    let cos_theta = 1.0 - 2.0 * u2;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

pub fn sample_unit_sphere_pdf() -> f32 {
    1.0 / (4.0 * PI)
}

/// Cosine-weighted direction on the +Z hemisphere.
pub fn sample_cosine_hemisphere(u1: f32, u2: f32) -> Vec3 {
    let phi = 2.0 * PI * u1;
    let cos_theta = u2.sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

pub fn sample_cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    if cos_theta > 0.0 {
        cos_theta / PI
    } else {
        0.0
    }
}

/// Uniform direction inside the cone around +Z with half-angle `acos(cos_theta_max)`.
pub fn sample_cone(u1: f32, u2: f32, cos_theta_max: f32) -> Vec3 {
    let phi = 2.0 * PI * u1;
    let cos_theta = 1.0 - u2 * (1.0 - cos_theta_max);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

pub fn sample_cone_pdf(cos_theta_max: f32) -> f32 {
    1.0 / (2.0 * PI * (1.0 - cos_theta_max))
}

/// Random unit vector, used for fuzzy reflections.
pub fn random_unit_vector(sampler: &mut dyn Sampler) -> Vec3 {
    let u = sampler.get_2d();
    sample_unit_sphere(u.x, u.y)
}
