//! Indexed triangle mesh.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use thiserror::Error;
use umbra_math::{Aabb, Ray, Vec3};

use crate::hittable::{HitRecord, Primitive, PrimitiveId};
use crate::{Material, Sampler};

/// Determinants smaller than this are treated as rays parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-5;

/// Errors raised while assembling geometry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error("mesh has no triangles")]
    EmptyIndices,

    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotMultipleOfThree(usize),

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// A triangle mesh sharing one material.
pub struct Mesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    material: Arc<dyn Material>,
    bbox: Aabb,
    /// Total surface area of all triangles
    area: f32,
    id: PrimitiveId,
}

impl Mesh {
    /// Create a mesh from a vertex buffer and a flat triangle index list.
    pub fn new(
        vertices: Vec<Vec3>,
        indices: Vec<u32>,
        material: Arc<dyn Material>,
    ) -> Result<Self, GeometryError> {
        if indices.is_empty() {
            return Err(GeometryError::EmptyIndices);
        }
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCountNotMultipleOfThree(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        let bbox = Aabb::from_iter_points(indices.iter().map(|&i| vertices[i as usize]));

        let mut mesh = Self {
            vertices,
            indices,
            material,
            bbox,
            area: 0.0,
            id: PrimitiveId::next(),
        };
        mesh.area = (0..mesh.triangle_count())
            .map(|tri| {
                let [v0, v1, v2] = mesh.triangle(tri);
                0.5 * (v1 - v0).cross(v2 - v0).length()
            })
            .sum();

        log::debug!(
            "Mesh {:?}: {} vertices, {} triangles, area {:.4}",
            mesh.id,
            mesh.vertices.len(),
            mesh.triangle_count(),
            mesh.area
        );

        Ok(mesh)
    }

    /// Axis-aligned quad with corners `corner`, `corner + u`, `corner + u + v`, `corner + v`.
    pub fn quad(corner: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let vertices = vec![corner, corner + u, corner + u + v, corner + v];
        let indices = vec![0, 1, 2, 0, 2, 3];
        match Self::new(vertices, indices, material) {
            Ok(mesh) => mesh,
            Err(err) => unreachable!("quad topology is always valid: {err}"),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    fn triangle(&self, tri: usize) -> [Vec3; 3] {
        let base = tri * 3;
        [
            self.vertices[self.indices[base] as usize],
            self.vertices[self.indices[base + 1] as usize],
            self.vertices[self.indices[base + 2] as usize],
        ]
    }

    /// Möller-Trumbore test of a single triangle. Returns `t` and the geometric normal.
    fn intersect_triangle(&self, ray: &Ray, tri: usize) -> Option<(f32, Vec3)> {
        let [v0, v1, v2] = self.triangle(tri);
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        Some((t, edge1.cross(edge2).normalize()))
    }
}

impl Primitive for Mesh {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let mut is_hit = false;

        for tri in 0..self.triangle_count() {
            let Some((t, normal)) = self.intersect_triangle(ray, tri) else {
                continue;
            };
            if !rec.accepts(ray, t) {
                continue;
            }

            rec.t = t;
            rec.p = ray.at(t);
            rec.set_face_normal(ray, normal);
            rec.id = Some(self.id);
            is_hit = true;
        }

        is_hit
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
        let count = self.triangle_count();
        let tri = ((sampler.get_1d() * count as f32) as usize).min(count - 1);
        let [v0, v1, v2] = self.triangle(tri);

        let mut u = sampler.get_1d();
        let mut v = sampler.get_1d();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }

        let p = v0 + u * (v1 - v0) + v * (v2 - v0);
        (p - rec.p).normalize()
    }

    fn pdf(&self, rec: &HitRecord, direction: Vec3) -> f32 {
        let direction = direction.normalize();
        let mut probe = HitRecord::new();
        if !self.hit(&Ray::new(rec.p, direction), &mut probe) {
            return 0.0;
        }

        let distance_squared = probe.t * probe.t;
        let cosine = direction.dot(probe.normal).abs();
        distance_squared / (cosine * self.area)
    }
}
