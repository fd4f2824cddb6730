use crate::config::TreeShape;

/// Radius-by-height silhouette of the tree.
///
/// A cone from `base_radius` at the bottom to a point at the top, with an
/// optional sawtooth "tier" bulge repeating `tiers` times up the trunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeProfile {
    pub height: f32,
    pub base_radius: f32,
    pub tiers: u32,
}

impl TreeProfile {
    pub fn new(height: f32, base_radius: f32, tiers: u32) -> Self {
        Self {
            height,
            base_radius,
            tiers,
        }
    }

    pub fn from_shape(shape: &TreeShape) -> Self {
        Self::new(shape.height, shape.base_radius, shape.tiers)
    }

    /// Height above the base mapped to 0..1; a flat tree maps everything to 0
    pub fn normalized_height(&self, h: f32) -> f32 {
        if self.height > 0.0 {
            (h / self.height).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Position within the current tier, 0 at a tier's bottom rising to 1
    pub fn tier_bump(&self, t: f32) -> f32 {
        (t * self.tiers as f32).rem_euclid(1.0)
    }

    /// Plain cone radius at normalized height `t`
    pub fn cone_radius(&self, t: f32) -> f32 {
        (1.0 - t) * self.base_radius
    }

    /// Tiered radius: the cone widened by `bump_strength * tier_bump(t)^2`
    pub fn max_radius(&self, t: f32, bump_strength: f32) -> f32 {
        let bump = self.tier_bump(t);
        self.cone_radius(t) * (1.0 + bump * bump * bump_strength)
    }

    /// World-space y for a height measured from the base (tree is centered)
    pub fn world_y(&self, h: f32) -> f32 {
        h - self.height / 2.0
    }
}
