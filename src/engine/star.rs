use std::f32::consts::TAU;

use super::buffers::{GroupBuffers, COLOR_STRIDE, MATRIX_STRIDE, POSITION_STRIDE};
use super::clamp_progress;
use crate::math::{Transform, Vec3};

/// How far above the tip the star rests
const TOP_OFFSET: f32 = 1.2;
const BOB_AMPLITUDE: f32 = 0.2;
const BOB_FREQUENCY: f32 = 2.5;
/// Yaw added per frame, in both states
const SPIN_PER_FRAME: f32 = 0.02;

/// The star topper: wanders on a slow orbit in chaos, bobs above the tip
/// once formed, and grows from 60% to full size as it settles.
pub struct StarTopper {
    top_y: f32,
    yaw: f32,
    scratch: Transform,
    buffers: GroupBuffers,
}

impl StarTopper {
    pub fn new(tree_height: f32, color: Vec3) -> Self {
        let mut buffers = GroupBuffers::instances(1);
        color.write_to(&mut buffers.slices_mut().colors[..COLOR_STRIDE]);
        let mut star = Self {
            top_y: tree_height / 2.0 + TOP_OFFSET,
            yaw: 0.0,
            scratch: Transform::default(),
            buffers,
        };
        star.write(chaos_orbit(0.0), 0.0);
        star
    }

    pub fn tick(&mut self, progress: f32, elapsed: f32) {
        let p = clamp_progress(progress);
        let resting = Vec3::new(0.0, self.top_y + (elapsed * BOB_FREQUENCY).sin() * BOB_AMPLITUDE, 0.0);
        let position = chaos_orbit(elapsed).lerp(&resting, p);

        self.yaw = (self.yaw + SPIN_PER_FRAME).rem_euclid(TAU);
        self.write(position, p);
    }

    fn write(&mut self, position: Vec3, progress: f32) {
        self.scratch.position = position;
        self.scratch.rotation = Vec3::new(0.0, self.yaw, 0.0);
        self.scratch.scale = Vec3::splat(0.6 + 0.4 * progress);

        let out = self.buffers.slices_mut();
        position.write_to(&mut out.positions[..POSITION_STRIDE]);
        self.scratch.write_matrix(&mut out.matrices[..MATRIX_STRIDE]);
        self.buffers.mark_dirty();
    }

    /// Height the star rests at when formed, before the bob
    pub fn top_y(&self) -> f32 {
        self.top_y
    }

    pub fn position(&self) -> Vec3 {
        Vec3::read_from(self.buffers.positions())
    }

    pub fn transform(&self) -> &Transform {
        &self.scratch
    }

    pub fn buffers(&self) -> &GroupBuffers {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut GroupBuffers {
        &mut self.buffers
    }
}

/// Where the star drifts while the tree is scattered
pub fn chaos_orbit(elapsed: f32) -> Vec3 {
    Vec3::new(
        (elapsed * 0.6).cos() * 7.0,
        (elapsed * 0.4).sin() * 6.0,
        (elapsed * 0.5).sin() * 5.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_chaos_follows_orbit() {
        let mut star = StarTopper::new(12.0, Vec3::ONE);
        star.tick(0.0, 3.0);
        assert_eq!(star.position(), chaos_orbit(3.0));
        assert!((star.transform().scale.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_star_formed_rests_above_tip() {
        let mut star = StarTopper::new(12.0, Vec3::ONE);
        assert!((star.top_y() - 7.2).abs() < 1e-6);
        star.tick(1.0, 0.0);
        let p = star.position();
        assert_eq!(p.x, 0.0);
        assert_eq!(p.z, 0.0);
        assert!((p.y - 7.2).abs() < 1e-5);
        assert!((star.transform().scale.y - 1.0).abs() < 1e-6);

        star.tick(1.0, 0.3);
        assert!((star.position().y - 7.2).abs() <= BOB_AMPLITUDE + 1e-5);
    }

    #[test]
    fn test_star_spins_every_frame() {
        let mut star = StarTopper::new(12.0, Vec3::ONE);
        for _ in 0..10 {
            star.tick(0.5, 1.0);
        }
        assert!((star.transform().rotation.y - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_star_matrix_written() {
        let mut star = StarTopper::new(12.0, Vec3::new(0.75, 0.75, 0.75));
        star.tick(1.0, 0.0);
        let m = star.buffers().matrices();
        assert_eq!(m.len(), 16);
        assert!((m[13] - 7.2).abs() < 1e-5);
        assert_eq!(&star.buffers().colors()[..3], &[0.75, 0.75, 0.75]);
    }
}
