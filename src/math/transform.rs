use super::{Mat4, Vec3};

/// Reusable position/rotation/scale holder.
///
/// One instance lives per animation group and is overwritten for every
/// item, so the per-frame loop builds matrices without allocating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in X, Y, Z order
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        // Degenerate orientation falls back to no rotation instead of NaN
        let rotation = if self.rotation.is_finite() {
            self.rotation
        } else {
            Vec3::ZERO
        };
        Mat4::compose(self.position, rotation, self.scale)
    }

    /// Write the composed matrix into a 16-float buffer slot
    #[inline]
    pub fn write_matrix(&self, out: &mut [f32]) {
        self.matrix().write_to(out);
    }
}
