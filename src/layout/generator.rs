use std::f32::consts::{PI, TAU};
use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use super::profile::TreeProfile;
use super::sampling::{angle, chaos_point, on_ring};
use crate::config::{Counts, NecklaceConfig, Palette, TreeConfig};
use crate::math::Vec3;

/// Tier bulge for the foliage silhouette
const FOLIAGE_TIER_BUMP: f32 = 0.15;
/// Tier bulge for the gem layer
const GEM_TIER_BUMP: f32 = 0.20;
/// `rand^0.7` pushes foliage toward the outer surface
const FOLIAGE_RADIAL_EXPONENT: f32 = 0.7;
/// Gems sit inside the pearl layer
const GEM_INSET: f32 = 0.85;
/// Pearls drape outside the silhouette
const PEARL_OUTSET: f32 = 1.12;
const PEARL_DROOP: f32 = 0.25;
const PEARL_PUSH: f32 = 0.2;
/// Lights glow from deep inside
const LIGHT_INSET: f32 = 0.5;

const GEM_WEIGHT: f32 = 0.05;
const PEARL_WEIGHT: f32 = 0.03;
const LIGHT_WEIGHT: f32 = 0.02;

/// Class of a layout item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Foliage,
    Gem,
    Pearl,
    Light,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Foliage => "foliage",
            ItemKind::Gem => "gems",
            ItemKind::Pearl => "pearls",
            ItemKind::Light => "lights",
        }
    }
}

/// One particle or ornament with its two fixed positions.
///
/// Fields are private: once generated an item can only be read, never
/// moved, so the morph is always between the same two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutItem {
    chaos_position: Vec3,
    target_position: Vec3,
    kind: ItemKind,
    color: Vec3,
    size: f32,
}

impl LayoutItem {
    pub fn new(chaos_position: Vec3, target_position: Vec3, kind: ItemKind, color: Vec3, size: f32) -> Self {
        Self {
            chaos_position,
            target_position,
            kind,
            color,
            size,
        }
    }

    pub fn chaos_position(&self) -> Vec3 {
        self.chaos_position
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Point size for foliage, ornament weight otherwise
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Position at interpolation fraction `t` (clamped to 0..1)
    #[inline]
    pub fn position_at(&self, t: f32) -> Vec3 {
        self.chaos_position.lerp(&self.target_position, t.clamp(0.0, 1.0))
    }
}

/// One spiral pearl strand
#[derive(Debug, Clone, PartialEq)]
pub struct NecklaceStrand {
    /// Angle at the bottom of the tree where the strand starts
    pub start_angle: f32,
    /// Indices into [`SceneLayout::pearls`]
    pub pearls: Range<usize>,
}

/// Every generated item, grouped by class
#[derive(Debug, Clone, Default)]
pub struct SceneLayout {
    pub foliage: Vec<LayoutItem>,
    pub gems: Vec<LayoutItem>,
    pub pearls: Vec<LayoutItem>,
    pub lights: Vec<LayoutItem>,
    pub strands: Vec<NecklaceStrand>,
}

impl SceneLayout {
    pub fn len(&self) -> usize {
        self.foliage.len() + self.gems.len() + self.pearls.len() + self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the chaos and target positions for every item class
pub struct LayoutGenerator {
    profile: TreeProfile,
    chaos_radius: f32,
    counts: Counts,
    necklaces: NecklaceConfig,
    palette: Palette,
}

impl LayoutGenerator {
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            profile: TreeProfile::from_shape(&config.shape),
            chaos_radius: config.shape.chaos_radius,
            counts: config.counts,
            necklaces: config.necklaces,
            palette: config.palette.clone(),
        }
    }

    pub fn profile(&self) -> &TreeProfile {
        &self.profile
    }

    /// Generate every class. All randomness comes from `rng`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SceneLayout {
        let foliage = self.foliage(rng);
        let gems = self.gems(rng);
        let (pearls, strands) = self.pearls(rng);
        let lights = self.lights(rng);

        info!(
            foliage = foliage.len(),
            gems = gems.len(),
            pearls = pearls.len(),
            strands = strands.len(),
            lights = lights.len(),
            "generated tree layout"
        );

        SceneLayout {
            foliage,
            gems,
            pearls,
            lights,
            strands,
        }
    }

    /// Random height up the trunk, returned with its normalized value
    fn height<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, f32) {
        let h = rng.gen::<f32>() * self.profile.height;
        (h, self.profile.normalized_height(h))
    }

    pub fn foliage<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<LayoutItem> {
        (0..self.counts.foliage)
            .map(|_| {
                let chaos = chaos_point(rng, self.chaos_radius);
                let (h, t) = self.height(rng);
                let r_max = self.profile.max_radius(t, FOLIAGE_TIER_BUMP);
                let r = rng.gen::<f32>().powf(FOLIAGE_RADIAL_EXPONENT) * r_max;
                let target = on_ring(r, angle(rng), self.profile.world_y(h));
                let size = rng.gen::<f32>() * 0.05 + 0.02;
                LayoutItem::new(chaos, target, ItemKind::Foliage, self.palette.foliage, size)
            })
            .collect()
    }

    pub fn gems<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<LayoutItem> {
        let palette = &self.palette.gems;
        (0..self.counts.gems)
            .map(|_| {
                let chaos = chaos_point(rng, self.chaos_radius);
                let (h, t) = self.height(rng);
                let r = self.profile.max_radius(t, GEM_TIER_BUMP) * GEM_INSET;
                let target = on_ring(r, angle(rng), self.profile.world_y(h));
                let color = palette.choose(rng).copied().unwrap_or(Vec3::ONE);
                LayoutItem::new(chaos, target, ItemKind::Gem, color, GEM_WEIGHT)
            })
            .collect()
    }

    /// Pearls are split evenly between strands; any remainder is dropped so
    /// every strand has the same length.
    pub fn pearls<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<LayoutItem>, Vec<NecklaceStrand>) {
        let strands = self.necklaces.strands;
        if strands == 0 {
            return (Vec::new(), Vec::new());
        }
        let per_strand = self.counts.pearls / strands;
        if per_strand == 0 {
            return (Vec::new(), Vec::new());
        }

        let mut pearls = Vec::with_capacity(per_strand * strands);
        let mut out_strands = Vec::with_capacity(strands);

        for n in 0..strands {
            let start_angle = n as f32 * TAU / strands as f32;
            let first = pearls.len();

            for i in 0..per_strand {
                let chaos = chaos_point(rng, self.chaos_radius);
                let t = i as f32 / per_strand as f32;
                pearls.push(LayoutItem::new(
                    chaos,
                    self.necklace_point(start_angle, t),
                    ItemKind::Pearl,
                    self.palette.pearl,
                    PEARL_WEIGHT,
                ));
            }

            out_strands.push(NecklaceStrand {
                start_angle,
                pearls: first..pearls.len(),
            });
        }

        (pearls, out_strands)
    }

    /// Point on a strand at parameter `t` in `[0, 1)`.
    ///
    /// Only the positive half of the sag wave is used, giving periodic
    /// droops and outward bulges between taut attachment points.
    pub fn necklace_point(&self, start_angle: f32, t: f32) -> Vec3 {
        let h = t * self.profile.height;
        let theta = start_angle + t * TAU * self.necklaces.spiral_rotations;
        let sag = (t * PI * self.necklaces.sag_frequency).sin().max(0.0);
        let r = self.profile.cone_radius(t) * PEARL_OUTSET + sag * PEARL_PUSH;
        on_ring(r, theta, self.profile.world_y(h) - sag * PEARL_DROOP)
    }

    pub fn lights<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<LayoutItem> {
        (0..self.counts.lights)
            .map(|_| {
                let chaos = chaos_point(rng, self.chaos_radius);
                let (h, t) = self.height(rng);
                let r = self.profile.cone_radius(t) * LIGHT_INSET;
                let target = on_ring(r, angle(rng), self.profile.world_y(h));
                LayoutItem::new(chaos, target, ItemKind::Light, self.palette.light, LIGHT_WEIGHT)
            })
            .collect()
    }
}
