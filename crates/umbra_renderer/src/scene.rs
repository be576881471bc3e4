//! Scene container: owns primitives, the BVH over them and the light list.

use std::collections::HashMap;

use umbra_math::{Aabb, Ray};

use crate::bvh::{Bvh, BvhOptions};
use crate::hittable::{HitRecord, Primitive, PrimitiveId};
use crate::material::Color;

/// A collection of primitives.
///
/// Call [`Scene::build`] after the last [`Scene::add`] and before rendering;
/// an unbuilt scene still answers queries with a linear scan but reports no
/// lights.
#[derive(Default)]
pub struct Scene {
    primitives: Vec<Box<dyn Primitive>>,
    bvh: Option<Bvh>,
    bvh_options: BvhOptions,
    lights: Vec<PrimitiveId>,
    index: HashMap<PrimitiveId, usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene whose BVH will be built with `options`.
    pub fn with_bvh_options(options: BvhOptions) -> Self {
        Self {
            bvh_options: options,
            ..Self::default()
        }
    }

    /// Add a primitive. Invalidates the BVH and the light list.
    pub fn add(&mut self, primitive: Box<dyn Primitive>) -> Option<PrimitiveId> {
        let id = primitive.id();
        if let Some(id) = id {
            self.index.insert(id, self.primitives.len());
        }
        self.primitives.push(primitive);
        self.bvh = None;
        self.lights.clear();
        id
    }

    /// Build the BVH if needed and collect every emissive primitive.
    pub fn build(&mut self) {
        if self.bvh.is_none() && !self.primitives.is_empty() {
            self.bvh = Some(Bvh::build(&self.primitives, self.bvh_options));
        }

        self.lights = self
            .primitives
            .iter()
            .filter(|p| {
                p.material()
                    .is_some_and(|m| m.emission() != Color::ZERO)
            })
            .filter_map(|p| p.id())
            .collect();

        log::info!(
            "Scene built: {} primitives, {} lights, {} BVH nodes",
            self.primitives.len(),
            self.lights.len(),
            self.bvh.as_ref().map_or(0, |b| b.nodes().len())
        );
    }

    /// Look up a primitive by identity.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not added to this scene.
    pub fn get(&self, id: PrimitiveId) -> &dyn Primitive {
        match self.index.get(&id) {
            Some(&i) => self.primitives[i].as_ref(),
            None => panic!("primitive {id:?} is not part of this scene"),
        }
    }

    /// Identities of the emissive primitives found by the last [`Scene::build`].
    pub fn lights(&self) -> &[PrimitiveId] {
        &self.lights
    }

    pub fn primitives(&self) -> &[Box<dyn Primitive>] {
        &self.primitives
    }

    pub fn is_built(&self) -> bool {
        self.bvh.is_some()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Primitive for Scene {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        if let Some(bvh) = &self.bvh {
            return bvh.hit(&self.primitives, ray, rec);
        }

        let mut hit_anything = false;
        for primitive in &self.primitives {
            if primitive.hit(ray, rec) {
                hit_anything = true;
            }
        }
        hit_anything
    }

    /// # Panics
    ///
    /// Panics on an empty scene.
    fn bounding_box(&self) -> Aabb {
        assert!(
            !self.primitives.is_empty(),
            "bounding box of an empty scene"
        );
        match &self.bvh {
            Some(bvh) => bvh.bounding_box(),
            None => self
                .primitives
                .iter()
                .fold(Aabb::EMPTY, |acc, p| Aabb::surrounding(&acc, &p.bounding_box())),
        }
    }
}
