use std::f32::consts::TAU;

use tracing::debug;

use super::buffers::{GroupBuffers, COLOR_STRIDE, MATRIX_STRIDE, POSITION_STRIDE};
use super::clamp_progress;
use crate::animation::TreeState;
use crate::config::MotionConfig;
use crate::layout::{ItemKind, LayoutItem};
use crate::math::{Transform, Vec3};

/// One instanced-mesh ornament class (gems, pearls or lights).
///
/// Each item gets a small time-varying offset on its progress so items
/// arrive staggered instead of snapping together. Once the tree is
/// formed the ornaments sway and slowly spin; in chaos they tumble, and
/// the tumble keeps accumulating for as long as the chaos lasts.
pub struct OrnamentGroup {
    kind: ItemKind,
    items: Vec<LayoutItem>,
    /// Per-item Euler rotation carried between frames
    rotations: Box<[Vec3]>,
    motion: MotionConfig,
    scratch: Transform,
    buffers: GroupBuffers,
}

impl OrnamentGroup {
    pub fn new(kind: ItemKind, items: Vec<LayoutItem>, motion: MotionConfig) -> Self {
        let len = items.len();
        debug!(group = kind.name(), items = len, "allocating instance buffers");
        let mut buffers = GroupBuffers::instances(len);
        {
            let out = buffers.slices_mut();
            for (item, slot) in items.iter().zip(out.positions.chunks_exact_mut(POSITION_STRIDE)) {
                item.chaos_position().write_to(slot);
            }
            for (item, slot) in items.iter().zip(out.colors.chunks_exact_mut(COLOR_STRIDE)) {
                item.color().write_to(slot);
            }
        }

        Self {
            kind,
            items,
            rotations: vec![Vec3::ZERO; len].into_boxed_slice(),
            motion,
            scratch: Transform::default(),
            buffers,
        }
    }

    /// One pass over every instance: position, transform and color
    pub fn tick(&mut self, progress: f32, state: TreeState, elapsed: f32) {
        let progress = clamp_progress(progress);
        let motion = self.motion;
        let formed = state.is_formed();

        let out = self.buffers.slices_mut();
        let slots = out
            .positions
            .chunks_exact_mut(POSITION_STRIDE)
            .zip(out.matrices.chunks_exact_mut(MATRIX_STRIDE))
            .zip(out.colors.chunks_exact_mut(COLOR_STRIDE));

        for (i, ((item, rotation), ((position_slot, matrix_slot), color_slot))) in self
            .items
            .iter()
            .zip(self.rotations.iter_mut())
            .zip(slots)
            .enumerate()
        {
            let phase = i as f32;
            let t = staggered_progress(progress, elapsed, i, motion.jitter);
            let mut position = item.chaos_position().lerp(&item.target_position(), t);

            if formed {
                position.y += (elapsed * motion.sway_frequency + phase * 0.2).sin() * motion.sway;
                rotation.y = (elapsed * motion.spin_rate + phase * 0.1).rem_euclid(TAU);
            } else {
                rotation.x = (rotation.x + motion.tumble_x).rem_euclid(TAU);
                rotation.z = (rotation.z + motion.tumble_z).rem_euclid(TAU);
            }

            self.scratch.position = position;
            self.scratch.rotation = *rotation;
            self.scratch.write_matrix(matrix_slot);
            position.write_to(position_slot);
            item.color().write_to(color_slot);
        }

        self.buffers.mark_dirty();
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn rotation(&self, index: usize) -> Vec3 {
        self.rotations[index]
    }

    pub fn buffers(&self) -> &GroupBuffers {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut GroupBuffers {
        &mut self.buffers
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of item `index` as last written
    pub fn position(&self, index: usize) -> Vec3 {
        let start = index * POSITION_STRIDE;
        Vec3::read_from(&self.buffers.positions()[start..start + POSITION_STRIDE])
    }
}

#[inline]
fn staggered_progress(progress: f32, elapsed: f32, index: usize, jitter: f32) -> f32 {
    let offset = (elapsed * 0.5 + index as f32 * 0.1).sin() * jitter;
    clamp_progress(progress + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat4;

    fn items(kind: ItemKind, n: usize) -> Vec<LayoutItem> {
        (0..n)
            .map(|i| {
                let f = i as f32;
                LayoutItem::new(
                    Vec3::new(10.0 - f, f * 0.5, -3.0),
                    Vec3::new(f * 0.1, -2.0 + f * 0.05, 1.0),
                    kind,
                    Vec3::new(0.1 * f, 0.5, 1.0),
                    0.05,
                )
            })
            .collect()
    }

    fn assert_close(a: Vec3, b: Vec3, eps: f32) {
        assert!((a - b).length() <= eps, "expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn test_progress_zero_is_chaos_without_jitter() {
        let mut g = OrnamentGroup::new(ItemKind::Gem, items(ItemKind::Gem, 20), MotionConfig::still());
        g.tick(0.0, TreeState::Chaos, 3.7);
        for (i, item) in g.items().iter().enumerate() {
            assert_eq!(g.position(i), item.chaos_position());
        }
    }

    #[test]
    fn test_progress_one_is_target_without_jitter() {
        let mut g = OrnamentGroup::new(ItemKind::Pearl, items(ItemKind::Pearl, 20), MotionConfig::still());
        g.tick(1.0, TreeState::Formed, 12.0);
        for (i, item) in g.items().iter().enumerate() {
            assert_eq!(g.position(i), item.target_position());
        }
    }

    #[test]
    fn test_jitter_staggers_items() {
        let jitter = MotionConfig::default().jitter;
        let a = staggered_progress(0.5, 1.0, 0, jitter);
        let b = staggered_progress(0.5, 1.0, 3, jitter);
        assert!((a - b).abs() > 1e-4);
        for i in 0..4 {
            let p = staggered_progress(0.5, 1.0, i, jitter);
            assert!((p - 0.5).abs() <= 0.02 + 1e-6);
        }
        assert_eq!(staggered_progress(1.0, 0.0, 0, jitter), 1.0);
        assert!(staggered_progress(0.0, 10.0, 7, jitter) >= 0.0);
    }

    #[test]
    fn test_formed_sway_is_small() {
        let motion = MotionConfig {
            jitter: 0.0,
            ..MotionConfig::default()
        };
        let mut g = OrnamentGroup::new(ItemKind::Light, items(ItemKind::Light, 10), motion);
        for frame in 0..120 {
            g.tick(1.0, TreeState::Formed, frame as f32 / 60.0);
            for (i, item) in g.items().iter().enumerate() {
                assert_close(g.position(i), item.target_position(), motion.sway + 1e-5);
            }
        }
    }

    #[test]
    fn test_chaos_tumble_accumulates() {
        let mut g = OrnamentGroup::new(ItemKind::Gem, items(ItemKind::Gem, 3), MotionConfig::default());
        g.tick(0.2, TreeState::Chaos, 0.0);
        g.tick(0.2, TreeState::Chaos, 0.016);
        g.tick(0.2, TreeState::Chaos, 0.033);
        let r = g.rotation(1);
        assert!((r.x - 0.15).abs() < 1e-5);
        assert!((r.z - 0.12).abs() < 1e-5);

        // Switching to formed keeps the tumble and sets the yaw
        g.tick(0.2, TreeState::Formed, 2.0);
        let r = g.rotation(1);
        assert!((r.x - 0.15).abs() < 1e-5);
        assert!((r.y - (2.0 * 0.1 + 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_tumble_wraps_and_stays_finite() {
        let mut g = OrnamentGroup::new(ItemKind::Gem, items(ItemKind::Gem, 2), MotionConfig::default());
        for frame in 0..10_000 {
            g.tick(0.0, TreeState::Chaos, frame as f32 / 60.0);
        }
        let r = g.rotation(0);
        assert!(r.x >= 0.0 && r.x < TAU);
        assert!(g.buffers().matrices().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_matrix_matches_position_and_rotation() {
        let mut g = OrnamentGroup::new(ItemKind::Gem, items(ItemKind::Gem, 5), MotionConfig::default());
        g.tick(0.6, TreeState::Formed, 4.2);
        let i = 3;
        let expected = Mat4::compose(g.position(i), g.rotation(i), Vec3::ONE);
        let start = i * MATRIX_STRIDE;
        let written = &g.buffers().matrices()[start..start + MATRIX_STRIDE];
        for (a, b) in written.iter().zip(expected.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_colors_follow_items() {
        let mut g = OrnamentGroup::new(ItemKind::Gem, items(ItemKind::Gem, 6), MotionConfig::default());
        g.tick(0.5, TreeState::Formed, 1.0);
        let colors = g.buffers().colors();
        for (i, item) in g.items().iter().enumerate() {
            assert_eq!(Vec3::read_from(&colors[i * COLOR_STRIDE..]), item.color());
        }
    }

    #[test]
    fn test_layout_unchanged_by_ticks() {
        let mut g = OrnamentGroup::new(ItemKind::Pearl, items(ItemKind::Pearl, 8), MotionConfig::default());
        let before = g.items().to_vec();
        for frame in 0..50 {
            let state = if frame % 2 == 0 { TreeState::Formed } else { TreeState::Chaos };
            g.tick(frame as f32 / 50.0, state, frame as f32 * 0.1);
        }
        assert_eq!(g.items(), &before[..]);
    }

    #[test]
    fn test_empty_group() {
        let mut g = OrnamentGroup::new(ItemKind::Light, Vec::new(), MotionConfig::default());
        g.tick(0.5, TreeState::Formed, 1.0);
        assert!(g.is_empty());
        assert_eq!(g.kind(), ItemKind::Light);
    }
}
