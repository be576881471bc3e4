//! Pinhole camera for ray generation.

use umbra_math::{Ray, Vec3};

/// Camera for generating rays into the scene.
///
/// Rays are addressed by screen coordinates `(s, t)` in `[-1, 1]`, with
/// `(-1, -1)` at the bottom-left corner of the image and `(1, 1)` at the
/// top-right.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    vfov: f32, // Vertical field of view in degrees
    aspect: f32,

    // Cached computed values (set by initialize())
    u: Vec3,
    v: Vec3,
    w: Vec3,
    half_width: f32,
    half_height: f32,
}

impl Camera {
    /// Create a camera at the origin looking down -Z with a 90 degree square view.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect: 1.0,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            half_width: 1.0,
            half_height: 1.0,
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set vertical field of view (degrees) and width / height ratio.
    pub fn with_lens(mut self, vfov: f32, aspect: f32) -> Self {
        self.vfov = vfov;
        self.aspect = aspect;
        self.initialize();
        self
    }

    fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        self.half_height = (theta / 2.0).tan();
        self.half_width = self.aspect * self.half_height;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);
    }

    pub fn origin(&self) -> Vec3 {
        self.look_from
    }

    /// Generate the ray through screen position `(s, t)`.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let direction =
            s * self.half_width * self.u + t * self.half_height * self.v - self.w;
        Ray::new(self.look_from, direction)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_center_ray() {
        let camera = Camera::new().with_position(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::Y,
        );

        let ray = camera.get_ray(0.0, 0.0);
        assert_eq!(ray.origin(), Vec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction().normalize() - (-Vec3::Z)).length() < 1e-6);
        assert_eq!(ray.t_min, Ray::DEFAULT_T_MIN);
        assert_eq!(ray.t_max, f32::INFINITY);
    }

    #[test]
    fn test_camera_corners_follow_fov() {
        let camera = Camera::new().with_lens(90.0, 2.0);

        // tan(45°) = 1, so the top-right corner sits at (2, 1, -1)
        let ray = camera.get_ray(1.0, 1.0);
        assert!((ray.direction() - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-5);

        let ray = camera.get_ray(-1.0, -1.0);
        assert!((ray.direction() - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_camera_basis_is_orthonormal() {
        let camera = Camera::new()
            .with_position(Vec3::new(13.0, 2.5, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(30.0, 4.0 / 3.0);

        assert!((camera.u.length() - 1.0).abs() < 1e-5);
        assert!((camera.v.length() - 1.0).abs() < 1e-5);
        assert!(camera.u.dot(camera.v).abs() < 1e-5);
        assert!(camera.u.dot(camera.w).abs() < 1e-5);

        // Screen up stays on the world-up side
        assert!(camera.v.y > 0.0);
        let center = camera.get_ray(0.0, 0.0).direction().normalize();
        assert!((center - (-Vec3::new(13.0, 2.5, 3.0).normalize())).length() < 1e-5);
    }
}
