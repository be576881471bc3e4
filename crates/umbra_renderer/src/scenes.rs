//! Built-in demo scenes.

use std::sync::Arc;

use umbra_math::Vec3;

use crate::camera::Camera;
use crate::config::{RenderConfig, SceneKind};
use crate::material::{Color, Dielectric, DiffuseLight, Lambertian, Metal};
use crate::mesh::Mesh;
use crate::sampler::{stream_seed, RandomSampler};
use crate::scene::Scene;
use crate::sphere::Sphere;
use crate::{Material, Sampler};

/// Build the scene and matching camera selected by `config.scene`.
///
/// The returned scene is already built.
pub fn build_scene(config: &RenderConfig) -> (Scene, Camera) {
    let mut scene = Scene::with_bvh_options(config.bvh_options());
    let camera = match config.scene {
        SceneKind::Spheres => spheres(&mut scene, config),
        SceneKind::Random => random(&mut scene, config),
        SceneKind::Lights => lights(&mut scene, config),
    };
    scene.build();
    (scene, camera)
}

fn spheres(scene: &mut Scene, config: &RenderConfig) -> Camera {
    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let left: Arc<dyn Material> = Arc::new(Metal::mirror(Color::new(0.8, 0.8, 0.8)));
    let right: Arc<dyn Material> = Arc::new(Metal::mirror(Color::new(0.8, 0.6, 0.2)));

    scene.add(Box::new(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground)));
    scene.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, center)));
    scene.add(Box::new(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, left)));
    scene.add(Box::new(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, right)));

    Camera::new()
        .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(45.0, config.aspect_ratio())
}

fn random(scene: &mut Scene, config: &RenderConfig) -> Camera {
    // Layout uses its own stream so it does not shift with bucket seeds
    let mut sampler = RandomSampler::new(stream_seed(config.seed, u64::MAX));

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
    scene.add(Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = sampler.get_1d();
            let center = Vec3::new(
                a as f32 + 0.9 * sampler.get_1d(),
                0.2,
                b as f32 + 0.9 * sampler.get_1d(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    sampler.get_1d() * sampler.get_1d(),
                    sampler.get_1d() * sampler.get_1d(),
                    sampler.get_1d() * sampler.get_1d(),
                );
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + sampler.get_1d()),
                    0.5 * (1.0 + sampler.get_1d()),
                    0.5 * (1.0 + sampler.get_1d()),
                );
                Arc::new(Metal::new(albedo, 0.5 * sampler.get_1d()))
            } else {
                glass.clone()
            };
            scene.add(Box::new(Sphere::new(center, 0.2, material)));
        }
    }

    scene.add(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)));
    scene.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    scene.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.7, 0.6, 0.5))),
    )));

    Camera::new()
        .with_position(Vec3::new(13.0, 2.5, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(30.0, config.aspect_ratio())
}

fn lights(scene: &mut Scene, config: &RenderConfig) -> Camera {
    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.6)));
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.7, 0.15, 0.1)));
    let blue: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.6)));

    scene.add(Box::new(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground)));
    scene.add(Box::new(Sphere::new(Vec3::new(-0.6, 0.0, -1.0), 0.5, red)));
    scene.add(Box::new(Sphere::new(Vec3::new(0.6, -0.2, -0.6), 0.3, blue)));

    scene.add(Box::new(Mesh::quad(
        Vec3::new(-1.0, 2.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 2.0),
        Arc::new(DiffuseLight::new(Color::splat(4.0))),
    )));
    scene.add(Box::new(Sphere::new(
        Vec3::new(1.5, 0.6, -1.5),
        0.2,
        Arc::new(DiffuseLight::new(Color::new(6.0, 4.0, 2.0))),
    )));

    Camera::new()
        .with_position(Vec3::new(0.0, 0.8, 4.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(40.0, config.aspect_ratio())
}
