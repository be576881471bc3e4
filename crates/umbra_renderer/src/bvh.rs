//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in a flat vector and refer to primitives by their index in
//! the owning scene. Children are stored before their parent, so the root is
//! always the last node.

use umbra_math::{Aabb, Ray};

use crate::hittable::{HitRecord, Primitive};

/// Build parameters for [`Bvh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvhOptions {
    /// Maximum primitives per leaf node before splitting. Zero is treated as one.
    pub max_leaf_size: usize,
}

impl Default for BvhOptions {
    fn default() -> Self {
        Self { max_leaf_size: 4 }
    }
}

/// BVH node - either an interior node with two children or a leaf with primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum BvhNodeKind {
    Interior { left: usize, right: usize },
    Leaf { primitives: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BvhNode {
    pub bbox: Aabb,
    pub kind: BvhNodeKind,
}

/// Median-split BVH over a primitive list it does not own.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: usize,
}

impl Bvh {
    /// Build a hierarchy over `primitives`.
    ///
    /// # Panics
    ///
    /// Panics if `primitives` is empty.
    pub fn build(primitives: &[Box<dyn Primitive>], options: BvhOptions) -> Self {
        assert!(
            !primitives.is_empty(),
            "cannot build a BVH over zero primitives"
        );

        let max_leaf_size = options.max_leaf_size.max(1);
        let boxes: Vec<Aabb> = primitives.iter().map(|p| p.bounding_box()).collect();
        let mut indices: Vec<usize> = (0..primitives.len()).collect();
        let mut nodes = Vec::with_capacity(2 * primitives.len() / max_leaf_size + 1);

        let root = Self::build_recursive(&mut nodes, &boxes, &mut indices, max_leaf_size);

        log::debug!(
            "BVH built: {} primitives, {} nodes, leaf size {}",
            primitives.len(),
            nodes.len(),
            max_leaf_size
        );

        Self { nodes, root }
    }

    /// Recursive construction. Returns the index of the emitted node.
    ///
    /// Simple median-split approach: sort primitives by box centre on the
    /// longest axis, split in half, recurse.
    fn build_recursive(
        nodes: &mut Vec<BvhNode>,
        boxes: &[Aabb],
        indices: &mut [usize],
        max_leaf_size: usize,
    ) -> usize {
        let bbox = indices
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| Aabb::surrounding(&acc, &boxes[i]));

        // Create leaf for small sets
        if indices.len() <= max_leaf_size {
            nodes.push(BvhNode {
                bbox,
                kind: BvhNodeKind::Leaf {
                    primitives: indices.to_vec(),
                },
            });
            return nodes.len() - 1;
        }

        let axis = bbox.max_extent().index();
        indices.sort_unstable_by(|&a, &b| {
            boxes[a].center()[axis].total_cmp(&boxes[b].center()[axis])
        });

        let mid = indices.len() / 2;
        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = Self::build_recursive(nodes, boxes, left_indices, max_leaf_size);
        let right = Self::build_recursive(nodes, boxes, right_indices, max_leaf_size);

        nodes.push(BvhNode {
            bbox,
            kind: BvhNodeKind::Interior { left, right },
        });
        nodes.len() - 1
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn bounding_box(&self) -> Aabb {
        self.nodes[self.root].bbox
    }

    /// Find the closest hit among `primitives`, which must be the list the
    /// hierarchy was built over.
    pub fn hit(&self, primitives: &[Box<dyn Primitive>], ray: &Ray, rec: &mut HitRecord) -> bool {
        self.hit_node(self.root, primitives, ray, rec)
    }

    fn hit_node(
        &self,
        node: usize,
        primitives: &[Box<dyn Primitive>],
        ray: &Ray,
        rec: &mut HitRecord,
    ) -> bool {
        let node = &self.nodes[node];

        // Boxes beyond the closest hit so far cannot improve it
        let clipped = Ray {
            t_max: ray.t_max.min(rec.t),
            ..*ray
        };
        if !node.bbox.hit(&clipped) {
            return false;
        }

        match &node.kind {
            BvhNodeKind::Leaf { primitives: leaf } => {
                let mut hit_anything = false;
                for &i in leaf {
                    if primitives[i].hit(ray, rec) {
                        hit_anything = true;
                    }
                }
                hit_anything
            }
            BvhNodeKind::Interior { left, right } => {
                let hit_left = self.hit_node(*left, primitives, ray, rec);
                let hit_right = self.hit_node(*right, primitives, ray, rec);
                hit_left || hit_right
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use umbra_math::Vec3;

    use crate::material::{Color, Lambertian};
    use crate::mesh::Mesh;
    use crate::sphere::Sphere;
    use crate::Material;

    fn random_spheres(count: usize, seed: u64) -> Vec<Box<dyn Primitive>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        (0..count)
            .map(|_| {
                let center = Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                let radius = rng.gen_range(0.05..0.6);
                Box::new(Sphere::new(center, radius, material.clone())) as Box<dyn Primitive>
            })
            .collect()
    }

    fn linear_hit(primitives: &[Box<dyn Primitive>], ray: &Ray, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        for p in primitives {
            if p.hit(ray, rec) {
                hit_anything = true;
            }
        }
        hit_anything
    }

    #[test]
    #[should_panic(expected = "zero primitives")]
    fn test_bvh_empty_panics() {
        Bvh::build(&[], BvhOptions::default());
    }

    #[test]
    fn test_bvh_single_sphere() {
        let primitives: Vec<Box<dyn Primitive>> = vec![Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        ))];
        let bvh = Bvh::build(&primitives, BvhOptions::default());

        // Should create a leaf
        assert_eq!(bvh.nodes().len(), 1);
        assert!(matches!(bvh.nodes()[0].kind, BvhNodeKind::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::new();
        assert!(bvh.hit(&primitives, &ray, &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_structure() {
        let primitives = random_spheres(100, 1);
        let options = BvhOptions { max_leaf_size: 3 };
        let bvh = Bvh::build(&primitives, options);

        assert_eq!(bvh.root(), bvh.nodes().len() - 1);

        let mut seen = vec![0usize; primitives.len()];
        for (i, node) in bvh.nodes().iter().enumerate() {
            match &node.kind {
                BvhNodeKind::Leaf { primitives: leaf } => {
                    assert!(!leaf.is_empty() && leaf.len() <= 3);
                    for &p in leaf {
                        seen[p] += 1;
                        let b = primitives[p].bounding_box();
                        assert_eq!(Aabb::surrounding(&node.bbox, &b), node.bbox);
                    }
                }
                BvhNodeKind::Interior { left, right } => {
                    // Children precede their parent
                    assert!(*left < i && *right < i);
                    for child in [left, right] {
                        let b = bvh.nodes()[*child].bbox;
                        assert_eq!(Aabb::surrounding(&node.bbox, &b), node.bbox);
                    }
                }
            }
        }
        // Every primitive lands in exactly one leaf
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_zero_leaf_size_clamped() {
        let primitives = random_spheres(8, 2);
        let bvh = Bvh::build(&primitives, BvhOptions { max_leaf_size: 0 });
        for node in bvh.nodes() {
            if let BvhNodeKind::Leaf { primitives: leaf } = &node.kind {
                assert_eq!(leaf.len(), 1);
            }
        }
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let primitives = random_spheres(400, 3);
        let bvh = Bvh::build(&primitives, BvhOptions::default());
        let mut rng = StdRng::seed_from_u64(4);

        let mut hits = 0;
        let mut misses = 0;
        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            );
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if direction.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new(origin, direction);

            let mut expected = HitRecord::new();
            let linear = linear_hit(&primitives, &ray, &mut expected);
            let mut actual = HitRecord::new();
            let accelerated = bvh.hit(&primitives, &ray, &mut actual);

            assert_eq!(linear, accelerated);
            if linear {
                hits += 1;
                assert_eq!(expected.t, actual.t);
                assert_eq!(expected.id, actual.id);
            } else {
                misses += 1;
                assert_eq!(actual, HitRecord::new());
            }
        }
        assert!(hits > 100, "too few hits: {hits}");
        assert!(misses > 100, "too few misses: {misses}");
    }

    #[test]
    fn test_bvh_matches_linear_scan_flat_quads() {
        // Axis-aligned quads have zero-thickness boxes
        let mut rng = StdRng::seed_from_u64(8);
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let mut planes = Vec::new();
        let primitives: Vec<Box<dyn Primitive>> = (0..300)
            .map(|_| {
                let axis = rng.gen_range(0..3);
                let mut corner = Vec3::new(
                    rng.gen_range(-8..8) as f32,
                    rng.gen_range(-8..8) as f32,
                    rng.gen_range(-8..8) as f32,
                );
                corner[axis] = rng.gen_range(-8.0..8.0);
                planes.push((axis, corner[axis]));
                let mut u = Vec3::ZERO;
                let mut v = Vec3::ZERO;
                u[(axis + 1) % 3] = rng.gen_range(1..4) as f32;
                v[(axis + 2) % 3] = rng.gen_range(1..4) as f32;
                Box::new(Mesh::quad(corner, u, v, material.clone())) as Box<dyn Primitive>
            })
            .collect();
        let bvh = Bvh::build(&primitives, BvhOptions::default());

        let mut hits = 0;
        let mut misses = 0;
        for _ in 0..2000 {
            let mut origin = Vec3::new(
                rng.gen_range(-12..12) as f32,
                rng.gen_range(-12..12) as f32,
                rng.gen_range(-12..12) as f32,
            );
            // Half the rays start on some quad's plane
            if rng.gen_bool(0.5) {
                let (axis, offset) = planes[rng.gen_range(0..planes.len())];
                origin[axis] = offset;
            }
            let mut direction = Vec3::ZERO;
            direction[rng.gen_range(0..3)] = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            let ray = Ray::new(origin, direction);

            let mut expected = HitRecord::new();
            let linear = linear_hit(&primitives, &ray, &mut expected);
            let mut actual = HitRecord::new();
            let accelerated = bvh.hit(&primitives, &ray, &mut actual);

            assert_eq!(linear, accelerated, "{ray:?}");
            if linear {
                hits += 1;
                assert_eq!(expected.t, actual.t);
                assert_eq!(expected.id, actual.id);
            } else {
                misses += 1;
            }
        }
        assert!(hits > 100, "too few hits: {hits}");
        assert!(misses > 100, "too few misses: {misses}");
    }

    #[test]
    fn test_bvh_respects_existing_record() {
        let primitives = random_spheres(50, 5);
        let bvh = Bvh::build(&primitives, BvhOptions::default());
        let ray = Ray::new(Vec3::splat(-20.0), Vec3::ONE);

        let mut rec = HitRecord {
            t: 1e-3,
            ..HitRecord::new()
        };
        assert!(!bvh.hit(&primitives, &ray, &mut rec));
        assert_eq!(rec.t, 1e-3);
    }
}
