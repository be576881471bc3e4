//! Render configuration, loadable from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bucket::DEFAULT_BUCKET_SIZE;
use crate::bvh::BvhOptions;
use crate::integrator::{
    Integrator, NormalIntegrator, PathIntegrator, TestIntegrator, VisibilityIntegrator,
    WhitIntegrator,
};

/// Which radiance estimator to render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    #[default]
    Test,
    Normal,
    Visibility,
    Whit,
    Path,
}

impl IntegratorKind {
    pub fn build(self) -> Box<dyn Integrator> {
        match self {
            IntegratorKind::Test => Box::new(TestIntegrator),
            IntegratorKind::Normal => Box::new(NormalIntegrator),
            IntegratorKind::Visibility => Box::new(VisibilityIntegrator),
            IntegratorKind::Whit => Box::new(WhitIntegrator),
            IntegratorKind::Path => Box::new(PathIntegrator),
        }
    }

    /// True if the estimator only sees light arriving from emissive primitives.
    pub fn needs_lights(self) -> bool {
        matches!(self, IntegratorKind::Path)
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegratorKind::Test => "test",
            IntegratorKind::Normal => "normal",
            IntegratorKind::Visibility => "visibility",
            IntegratorKind::Whit => "whit",
            IntegratorKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Four spheres resting on a large ground sphere
    #[default]
    Spheres,
    /// Field of small random spheres around three large ones
    Random,
    /// Diffuse spheres lit by an emissive panel and an emissive sphere
    Lights,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Display gamma applied when writing the image
    pub gamma: f32,
    /// Seed for all sampling; equal seeds give identical images
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Maximum primitives per BVH leaf
    pub bvh_leaf_size: usize,
    pub integrator: IntegratorKind,
    pub scene: SceneKind,
    /// Output PNG path
    pub output: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            samples_per_pixel: 16,
            max_depth: 10,
            gamma: 2.2,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            bvh_leaf_size: BvhOptions::default().max_leaf_size,
            integrator: IntegratorKind::default(),
            scene: SceneKind::default(),
            output: "output.png".to_string(),
        }
    }
}

impl RenderConfig {
    /// Width over height, or 1 for a degenerate image.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn bvh_options(&self) -> BvhOptions {
        BvhOptions {
            max_leaf_size: self.bvh_leaf_size,
        }
    }
}
