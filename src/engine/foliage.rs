use super::buffers::{GroupBuffers, POSITION_STRIDE};
use super::clamp_progress;
use crate::layout::LayoutItem;
use crate::math::Vec3;

/// Dense point cloud of needles.
///
/// Points follow the group progress directly with no per-item stagger;
/// at this density the difference is not visible and the loop stays a
/// plain lerp.
pub struct FoliageCloud {
    items: Vec<LayoutItem>,
    sizes: Box<[f32]>,
    color: Vec3,
    buffers: GroupBuffers,
}

impl FoliageCloud {
    pub fn new(items: Vec<LayoutItem>, color: Vec3) -> Self {
        let sizes = items.iter().map(|item| item.size()).collect::<Vec<_>>().into_boxed_slice();
        let mut cloud = Self {
            buffers: GroupBuffers::points(items.len()),
            items,
            sizes,
            color,
        };
        cloud.tick(0.0);
        cloud
    }

    /// Write every point at `progress` (clamped to 0..1)
    pub fn tick(&mut self, progress: f32) {
        let p = clamp_progress(progress);
        let out = self.buffers.slices_mut();

        for (item, slot) in self.items.iter().zip(out.positions.chunks_exact_mut(POSITION_STRIDE)) {
            item.position_at(p).write_to(slot);
        }

        self.buffers.mark_dirty();
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    /// Per-point sizes, fixed at construction
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Single material color for the whole cloud
    pub fn color(&self) -> Vec3 {
        self.color
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
