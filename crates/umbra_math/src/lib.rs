//! Umbra math types.
//!
//! Re-exports glam and adds the small set of geometric value types shared by
//! the renderer: [`Interval`], [`Axis`], [`Aabb`] and [`Ray`].

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::{Aabb, Axis};
pub use interval::Interval;
pub use ray::Ray;
