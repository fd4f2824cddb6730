//! Per-frame interpolation engine
//!
//! Each group owns its layout records and a fixed set of flat output
//! buffers. `tick` makes a single pass over the items, blending chaos to
//! target by the group's progress and writing straight into those
//! buffers; nothing is allocated per frame.

pub mod buffers;
pub mod foliage;
pub mod ornaments;
pub mod star;

pub use buffers::{GroupBuffers, COLOR_STRIDE, MATRIX_STRIDE, POSITION_STRIDE};
pub use foliage::FoliageCloud;
pub use ornaments::OrnamentGroup;
pub use star::{chaos_orbit, StarTopper};

/// Clamp an interpolation scalar to 0..1, mapping NaN to 0
#[inline]
pub fn clamp_progress(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(-0.5), 0.0);
        assert_eq!(clamp_progress(1.5), 1.0);
        assert_eq!(clamp_progress(0.25), 0.25);
        assert_eq!(clamp_progress(f32::NAN), 0.0);
        assert_eq!(clamp_progress(f32::INFINITY), 1.0);
    }
}
