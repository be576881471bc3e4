//! Material trait for surface scattering.

use umbra_math::{Ray, Vec3};

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, Pdf};
use crate::sampling::{random_unit_vector, sample_cosine_hemisphere_pdf};
use crate::Sampler;

/// Color type alias (linear RGB radiance, unclamped)
pub type Color = Vec3;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    pub attenuation: Color,
    pub scattered: Ray,
    /// Density of the direction the material chose. Delta lobes report 1.
    pub pdf: f32,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are immutable and shared between primitives through `Arc`.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        sampler: &mut dyn Sampler,
    ) -> Option<ScatterRecord>;

    /// Radiance emitted toward the viewer of `rec`. Black for most materials.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord) -> Color {
        Color::ZERO
    }

    /// Constant radiance of an emitter, independent of viewing direction.
    ///
    /// Used to find the lights in a scene.
    fn emission(&self) -> Color {
        Color::ZERO
    }

    /// Density of this material's own sampling strategy for `scattered`.
    ///
    /// Zero for delta lobes, which an externally chosen direction never hits.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        sampler: &mut dyn Sampler,
    ) -> Option<ScatterRecord> {
        let pdf = CosinePdf::new(rec.normal);
        let direction = pdf.sample(rec, sampler);
        let density = pdf.value(rec, direction);
        if density <= 0.0 {
            return None;
        }

        Some(ScatterRecord {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction),
            pdf: density,
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        sample_cosine_hemisphere_pdf(rec.normal.dot(scattered.direction().normalize()))
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// A perfect mirror.
    pub fn mirror(albedo: Color) -> Self {
        Self::new(albedo, 0.0)
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        sampler: &mut dyn Sampler,
    ) -> Option<ScatterRecord> {
        let mut direction = reflect(ray_in.direction().normalize(), rec.normal);
        if self.fuzz > 0.0 {
            direction = direction + self.fuzz * random_unit_vector(sampler);
        }

        // Only scatter if the reflected ray is in the same hemisphere as the normal
        if direction.dot(rec.normal) > 0.0 {
            Some(ScatterRecord {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, direction.normalize()),
                pdf: 1.0,
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        sampler: &mut dyn Sampler,
    ) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > sampler.get_1d()
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction.normalize()),
            pdf: 1.0,
        })
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _sampler: &mut dyn Sampler,
    ) -> Option<ScatterRecord> {
        None
    }

    /// Emits only toward the side the outward normal faces.
    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord) -> Color {
        if rec.front_face {
            self.emit
        } else {
            Color::ZERO
        }
    }

    fn emission(&self) -> Color {
        self.emit
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with normal `n` facing the incoming side.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
