//! Umbra renderer - CPU Monte Carlo ray tracing.
//!
//! Scene description (spheres, triangle meshes, materials), a BVH over the
//! scene, light-sampling PDFs and a family of integrators, plus a bucketed
//! parallel driver that turns a camera and a scene into an image.

mod bucket;
mod bvh;
mod camera;
mod config;
mod hittable;
mod integrator;
mod material;
mod mesh;
mod pdf;
mod renderer;
mod sampler;
pub mod sampling;
mod scene;
mod scenes;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode, BvhNodeKind, BvhOptions};
pub use camera::Camera;
pub use config::{IntegratorKind, RenderConfig, SceneKind};
pub use hittable::{HitRecord, Primitive, PrimitiveId};
pub use integrator::{
    Integrator, NormalIntegrator, PathIntegrator, TestIntegrator, VisibilityIntegrator,
    WhitIntegrator,
};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterRecord,
};
pub use mesh::{GeometryError, Mesh};
pub use pdf::{CosinePdf, HittablePdf, MixPdf, Pdf};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, render, render_pixel, ImageBuffer, RenderError, RenderResult,
};
pub use sampler::{stream_seed, RandomSampler, Sampler};
pub use sampling::Onb;
pub use scene::Scene;
pub use scenes::build_scene;
pub use sphere::Sphere;

/// Re-export common math types from umbra_math
pub use umbra_math::{Aabb, Axis, Interval, Ray, Vec3};
