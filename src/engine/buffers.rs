//! Flat output buffers handed to the renderer
//!
//! Sized once from the item count and stored as boxed slices, so they can
//! never grow or shrink and views taken over them stay valid for the
//! lifetime of the group.

/// Floats per position (xyz)
pub const POSITION_STRIDE: usize = 3;
/// Floats per color (rgb)
pub const COLOR_STRIDE: usize = 3;
/// Floats per column-major 4x4 matrix
pub const MATRIX_STRIDE: usize = 16;

/// Mutable views of every buffer in a group, borrowed together for one pass
pub struct BufferSlicesMut<'a> {
    pub positions: &'a mut [f32],
    pub colors: &'a mut [f32],
    pub matrices: &'a mut [f32],
}

#[derive(Debug, Clone)]
pub struct GroupBuffers {
    len: usize,
    positions: Box<[f32]>,
    colors: Box<[f32]>,
    matrices: Box<[f32]>,
    dirty: bool,
}

impl GroupBuffers {
    /// Positions only, for point clouds
    pub fn points(len: usize) -> Self {
        Self {
            len,
            positions: vec![0.0; len * POSITION_STRIDE].into_boxed_slice(),
            colors: Box::default(),
            matrices: Box::default(),
            dirty: true,
        }
    }

    /// Positions, colors and one transform per item, for instanced meshes
    pub fn instances(len: usize) -> Self {
        let mut matrices = vec![0.0; len * MATRIX_STRIDE].into_boxed_slice();
        for m in matrices.chunks_exact_mut(MATRIX_STRIDE) {
            m[0] = 1.0;
            m[5] = 1.0;
            m[10] = 1.0;
            m[15] = 1.0;
        }
        Self {
            len,
            positions: vec![0.0; len * POSITION_STRIDE].into_boxed_slice(),
            colors: vec![0.0; len * COLOR_STRIDE].into_boxed_slice(),
            matrices,
            dirty: true,
        }
    }

    /// Number of items the buffers hold
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Empty for point groups
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Empty for point groups
    pub fn matrices(&self) -> &[f32] {
        &self.matrices
    }

    pub(crate) fn slices_mut(&mut self) -> BufferSlicesMut<'_> {
        BufferSlicesMut {
            positions: &mut self.positions,
            colors: &mut self.colors,
            matrices: &mut self.matrices,
        }
    }

    /// Flag the whole group for re-upload; called once per pass
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and clear the dirty flag (consumer side)
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
