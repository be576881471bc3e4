//! Radiance estimators.
//!
//! Every integrator answers the same question: how much light travels back
//! along `ray`? They are stateless; all randomness comes from the sampler
//! passed in, and recursion stops once `depth` reaches zero.

use umbra_math::Ray;

use crate::hittable::{HitRecord, Primitive};
use crate::material::Color;
use crate::scene::Scene;
use crate::Sampler;

/// Estimates incoming radiance along a camera or bounce ray.
pub trait Integrator: Send + Sync {
    fn li(&self, ray: &Ray, scene: &Scene, sampler: &mut dyn Sampler, depth: u32) -> Color;
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Closest hit in `scene`, if any.
fn intersect(scene: &Scene, ray: &Ray) -> Option<HitRecord> {
    let mut rec = HitRecord::new();
    scene.hit(ray, &mut rec).then_some(rec)
}

/// Material-sampled bounces under a sky dome. Ignores emission.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestIntegrator;

impl Integrator for TestIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, sampler: &mut dyn Sampler, depth: u32) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        let Some(rec) = intersect(scene, ray) else {
            return sky_gradient(ray);
        };
        let Some(material) = rec.id.and_then(|id| scene.get(id).material()) else {
            return Color::ZERO;
        };

        match material.scatter(ray, &rec, sampler) {
            Some(scatter) => {
                scatter.attenuation * self.li(&scatter.scattered, scene, sampler, depth - 1)
            }
            // Absorbed
            None => Color::ZERO,
        }
    }
}

/// Shading normal mapped to `[0, 1]` per channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalIntegrator;

impl Integrator for NormalIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, _sampler: &mut dyn Sampler, _depth: u32) -> Color {
        match intersect(scene, ray) {
            Some(rec) => 0.5 * (rec.normal + Color::ONE),
            None => Color::ZERO,
        }
    }
}

/// White where the ray hits anything, black elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct VisibilityIntegrator;

impl Integrator for VisibilityIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, _sampler: &mut dyn Sampler, _depth: u32) -> Color {
        if intersect(scene, ray).is_some() {
            Color::ONE
        } else {
            Color::ZERO
        }
    }
}

/// Whitted-style recursion: emission plus the material's own scattered ray.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitIntegrator;

impl Integrator for WhitIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, sampler: &mut dyn Sampler, depth: u32) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        let Some(rec) = intersect(scene, ray) else {
            return Color::ZERO;
        };
        let Some(material) = rec.id.and_then(|id| scene.get(id).material()) else {
            return Color::ZERO;
        };

        let emission = material.emitted(ray, &rec);
        match material.scatter(ray, &rec, sampler) {
            Some(scatter) => {
                emission
                    + scatter.attenuation
                        * self.li(&scatter.scattered, scene, sampler, depth - 1)
            }
            None => emission,
        }
    }
}

/// Path tracer that picks each bounce direction by sampling a light.
///
/// One light is chosen uniformly per bounce and the direction is drawn from
/// its solid-angle density. Directions the material cannot scatter into
/// (delta lobes, back sides) carry zero weight. There is no Russian roulette:
/// `depth` is a hard cutoff.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathIntegrator;

impl Integrator for PathIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, sampler: &mut dyn Sampler, depth: u32) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        let Some(rec) = intersect(scene, ray) else {
            return Color::ZERO;
        };
        let Some(material) = rec.id.and_then(|id| scene.get(id).material()) else {
            return Color::ZERO;
        };

        let emission = material.emitted(ray, &rec);
        let Some(scatter) = material.scatter(ray, &rec, sampler) else {
            return emission;
        };

        let lights = scene.lights();
        if lights.is_empty() {
            return emission;
        }

        let n = lights.len();
        let pick = ((sampler.get_1d() * n as f32) as usize).min(n - 1);
        let light = scene.get(lights[pick]);

        let direction = light.sample(&rec, sampler);
        let density = light.pdf(&rec, direction) / n as f32;
        if !(density > 0.0 && density.is_finite()) {
            return emission;
        }

        let next = Ray::new(rec.p, direction);
        let scattering_pdf = material.scattering_pdf(ray, &rec, &next);
        if scattering_pdf <= 0.0 {
            return emission;
        }

        emission
            + scatter.attenuation * scattering_pdf * self.li(&next, scene, sampler, depth - 1)
                / density
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use umbra_math::Vec3;

    use crate::material::{Dielectric, DiffuseLight, Lambertian, Metal};
    use crate::mesh::Mesh;
    use crate::sphere::Sphere;
    use crate::RandomSampler;

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
        )));
        scene.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5))),
        )));
        scene.add(Box::new(Mesh::quad(
            Vec3::new(-1.0, 2.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Arc::new(DiffuseLight::new(Color::splat(4.0))),
        )));
        scene.add(Box::new(Sphere::new(
            Vec3::new(1.5, 1.0, -1.0),
            0.25,
            Arc::new(DiffuseLight::new(Color::new(2.0, 1.0, 0.5))),
        )));
        scene.build();
        scene
    }

    #[test]
    fn test_depth_zero_is_black() {
        let scene = lit_scene();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let mut sampler = RandomSampler::new(40);

        assert_eq!(TestIntegrator.li(&ray, &scene, &mut sampler, 0), Color::ZERO);
        assert_eq!(WhitIntegrator.li(&ray, &scene, &mut sampler, 0), Color::ZERO);
        assert_eq!(PathIntegrator.li(&ray, &scene, &mut sampler, 0), Color::ZERO);
    }

    #[test]
    fn test_test_integrator_sky_on_miss() {
        let scene = lit_scene();
        let mut sampler = RandomSampler::new(41);

        let up = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Y);
        let c = TestIntegrator.li(&up, &scene, &mut sampler, 5);
        assert!((c - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);

        let sideways = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let c = TestIntegrator.li(&sideways, &scene, &mut sampler, 5);
        assert!((c - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_test_integrator_absorbed_is_black() {
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::ONE)),
        )));
        scene.build();
        let mut sampler = RandomSampler::new(42);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(TestIntegrator.li(&ray, &scene, &mut sampler, 5), Color::ZERO);
    }

    #[test]
    fn test_test_integrator_mirror_tints_sky() {
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Metal::mirror(Color::new(0.5, 0.5, 0.5))),
        )));
        scene.build();
        let mut sampler = RandomSampler::new(43);

        // Head-on reflection goes straight back along +Z: sky at y = 0
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let c = TestIntegrator.li(&ray, &scene, &mut sampler, 5);
        assert!((c - 0.5 * Color::new(0.75, 0.85, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_normal_and_visibility() {
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Lambertian::new(Color::ONE)),
        )));
        scene.build();
        let mut sampler = RandomSampler::new(44);

        let hit = Ray::new(Vec3::ZERO, -Vec3::Z);
        let miss = Ray::new(Vec3::ZERO, Vec3::Z);

        let n = NormalIntegrator.li(&hit, &scene, &mut sampler, 1);
        assert!((n - Color::new(0.5, 0.5, 1.0)).length() < 1e-5);
        assert_eq!(NormalIntegrator.li(&miss, &scene, &mut sampler, 1), Color::ZERO);

        assert_eq!(VisibilityIntegrator.li(&hit, &scene, &mut sampler, 1), Color::ONE);
        assert_eq!(VisibilityIntegrator.li(&miss, &scene, &mut sampler, 1), Color::ZERO);
    }

    #[test]
    fn test_whit_emissive_sphere_is_exact() {
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::ONE)),
        )));
        scene.build();
        let mut sampler = RandomSampler::new(45);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(WhitIntegrator.li(&ray, &scene, &mut sampler, 5), Color::ONE);
        assert_eq!(PathIntegrator.li(&ray, &scene, &mut sampler, 5), Color::ONE);

        let miss = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(WhitIntegrator.li(&miss, &scene, &mut sampler, 5), Color::ZERO);
    }

    #[test]
    fn test_whit_light_is_dark_from_behind() {
        let mut scene = Scene::new();
        scene.add(Box::new(Mesh::quad(
            Vec3::new(-1.0, -1.0, -3.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Arc::new(DiffuseLight::new(Color::ONE)),
        )));
        scene.add(Box::new(Sphere::new(
            Vec3::new(4.0, 0.0, 0.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::ONE)),
        )));
        scene.build();
        let mut sampler = RandomSampler::new(50);

        let front = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(WhitIntegrator.li(&front, &scene, &mut sampler, 5), Color::ONE);

        let back = Ray::new(Vec3::new(0.0, 0.0, -6.0), Vec3::Z);
        assert_eq!(WhitIntegrator.li(&back, &scene, &mut sampler, 5), Color::ZERO);

        // Inside an emissive sphere the surface faces away
        let inside = Ray::new(Vec3::new(4.0, 0.0, 0.0), Vec3::X);
        assert_eq!(WhitIntegrator.li(&inside, &scene, &mut sampler, 5), Color::ZERO);
    }

    #[test]
    fn test_whit_glass_passes_light_through() {
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            0.5,
            Arc::new(Dielectric::new(1.0)),
        )));
        scene.add(Box::new(Mesh::quad(
            Vec3::new(-5.0, -5.0, -10.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Arc::new(DiffuseLight::new(Color::splat(2.0))),
        )));
        scene.build();
        let mut sampler = RandomSampler::new(46);

        // Index 1.0 never bends or reflects: the ray crosses the sphere and reaches the wall
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let c = WhitIntegrator.li(&ray, &scene, &mut sampler, 5);
        assert!((c - Color::splat(2.0)).length() < 1e-5);
    }

    #[test]
    fn test_path_is_finite_and_non_negative() {
        let scene = lit_scene();
        let mut sampler = RandomSampler::new(47);

        let mut total = Color::ZERO;
        for i in 0..200 {
            let x = (i % 20) as f32 / 10.0 - 1.0;
            let y = (i / 20) as f32 / 10.0 - 0.5;
            let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(x, y, -3.0));
            let c = PathIntegrator.li(&ray, &scene, &mut sampler, 4);
            assert!(c.is_finite(), "non-finite radiance {c:?}");
            assert!(c.min_element() >= 0.0, "negative radiance {c:?}");
            total += c;
        }
        // The lit scene is not black
        assert!(total.max_element() > 0.0);
    }

    #[test]
    fn test_path_without_lights_returns_emission_only() {
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Lambertian::new(Color::ONE)),
        )));
        scene.build();
        let mut sampler = RandomSampler::new(48);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(PathIntegrator.li(&ray, &scene, &mut sampler, 8), Color::ZERO);
    }

    #[test]
    fn test_path_direct_light_on_diffuse_floor() {
        // Floor lit by a single panel: one bounce of light sampling gives
        // the irradiance-weighted albedo, which must be strictly positive.
        let mut scene = Scene::new();
        scene.add(Box::new(Mesh::quad(
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, 20.0),
            Vec3::new(20.0, 0.0, 0.0),
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )));
        scene.add(Box::new(Mesh::quad(
            Vec3::new(-0.5, 1.0, -0.5),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Arc::new(DiffuseLight::new(Color::ONE)),
        )));
        scene.build();
        let mut sampler = RandomSampler::new(49);

        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.3), Vec3::new(0.0, -1.0, 0.0));
        let n = 2000;
        let mut sum = Color::ZERO;
        for _ in 0..n {
            sum += PathIntegrator.li(&ray, &scene, &mut sampler, 2);
        }
        let estimate = sum / n as f32;

        // Radiance = albedo / π · ∫ L cos dω = 0.5 / π · E, with E below the
        // solid angle of the panel (about 0.5 sr seen from the floor).
        assert!(estimate.x > 0.01 && estimate.x < 0.5 / std::f32::consts::PI);
        assert!((estimate.x - estimate.y).abs() < 1e-6);
    }
}
