//! Random point sampling shared by the layout classes

use std::f32::consts::TAU;
use rand::Rng;

use crate::math::Vec3;

/// Chaos position inside a sphere of `radius`.
///
/// Direction is uniform on the sphere but the radius is drawn linearly, so
/// points cluster toward the center rather than filling the volume evenly.
/// That density is the intended look of the scattered cloud.
pub fn chaos_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let r = rng.gen::<f32>() * radius;
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Uniform angle in `[0, 2π)`
pub fn angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * TAU
}

/// Point on a horizontal circle of radius `r` at height `y`
pub fn on_ring(r: f32, theta: f32, y: f32) -> Vec3 {
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}
