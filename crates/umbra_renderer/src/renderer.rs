//! Image formation: pixel sampling, parallel bucket rendering and output.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::integrator::Integrator;
use crate::material::Color;
use crate::scene::Scene;
use crate::Sampler;

/// Errors that can occur while writing render output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot write an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
}

/// Result type for render output operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Apply display gamma to a linear value. Gamma <= 0 leaves it linear.
#[inline]
pub fn linear_to_gamma(linear: f32, gamma: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if gamma > 0.0 {
        linear.powf(1.0 / gamma)
    } else {
        linear
    }
}

/// Convert a linear color to 8-bit RGB after gamma correction and clamping.
pub fn color_to_rgb8(color: Color, gamma: f32) -> [u8; 3] {
    let channel = |c: f32| (255.0 * linear_to_gamma(c, gamma).clamp(0.0, 1.0)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// Samples are jittered inside the pixel and averaged. Pixel `(0, 0)` is the
/// top-left corner of the image.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    integrator: &dyn Integrator,
    x: u32,
    y: u32,
    config: &RenderConfig,
    sampler: &mut dyn Sampler,
) -> Color {
    let spp = config.samples_per_pixel.max(1);
    let width = config.width as f32;
    let height = config.height as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..spp {
        let jitter = sampler.get_2d();
        let s = (x as f32 + jitter.x) / width * 2.0 - 1.0;
        let t = 1.0 - (y as f32 + jitter.y) / height * 2.0;
        let ray = camera.get_ray(s, t);
        pixel_color += integrator.li(&ray, scene, sampler, config.max_depth);
    }

    pixel_color / spp as f32
}

/// Linear color image storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to gamma-corrected RGB bytes, row-major from the top-left.
    pub fn to_rgb8(&self, gamma: f32) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| color_to_rgb8(*c, gamma))
            .collect()
    }

    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: impl AsRef<Path>, gamma: f32) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }

        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_rgb8(gamma),
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;

        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the entire scene, buckets in parallel.
///
/// The scene must already be built. Output is deterministic for a fixed
/// `config.seed`.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    integrator: &dyn Integrator,
    config: &RenderConfig,
) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);

    log::info!(
        "Rendering {}x{} at {} spp, depth {}, {} buckets",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, scene, integrator, config))
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
