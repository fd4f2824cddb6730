use serde::Deserialize;
use tracing::debug;

use super::palette::{Palette, PaletteInput};
use crate::animation::{DampingMode, TreeState};
use crate::error::ConfigError;

/// Upper bound on any per-class count, strands included
pub const MAX_ITEMS_PER_CLASS: usize = 1_000_000;
/// Upper bound on concurrently live shooting stars
pub const MAX_METEORS: usize = 64;

/// YAML input format for a tree scene.
///
/// Every section is optional; missing values take the built-in defaults.
/// Counts are signed so that negative input can be clamped instead of
/// rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigInput {
    pub seed: Option<u64>,
    pub initial_state: Option<TreeState>,
    pub tree: ShapeInput,
    pub counts: CountsInput,
    pub necklaces: NecklaceInput,
    pub damping: DampingConfig,
    pub motion: MotionConfig,
    pub shooting_stars: ShootingStarInput,
    pub palette: PaletteInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShapeInput {
    pub height: f32,
    pub base_radius: f32,
    pub chaos_radius: f32,
    pub tiers: i64,
}

impl Default for ShapeInput {
    fn default() -> Self {
        Self {
            height: 12.0,
            base_radius: 4.5,
            chaos_radius: 15.0,
            tiers: 6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CountsInput {
    pub foliage: i64,
    pub gems: i64,
    pub pearls: i64,
    pub lights: i64,
    pub fairy_dust: i64,
}

impl Default for CountsInput {
    fn default() -> Self {
        Self {
            foliage: 35_000,
            gems: 450,
            pearls: 1_500,
            lights: 200,
            fairy_dust: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NecklaceInput {
    pub strands: i64,
    pub spiral_rotations: f32,
    pub sag_frequency: f32,
}

impl Default for NecklaceInput {
    fn default() -> Self {
        Self {
            strands: 10,
            spiral_rotations: 6.0,
            sag_frequency: 24.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShootingStarInput {
    pub max_live: i64,
    pub spawn_chance: f32,
}

impl Default for ShootingStarInput {
    fn default() -> Self {
        Self {
            max_live: 5,
            spawn_chance: 0.015,
        }
    }
}

/// Per-group exponential smoothing factors (fraction of the remaining
/// distance covered per frame)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DampingConfig {
    pub foliage: f32,
    pub ornaments: f32,
    pub star: f32,
    /// Rescale the factors by frame length so groups settle in the same
    /// wall-clock time at any frame rate. Off by default: each update
    /// applies the factor once.
    pub frame_rate_independent: bool,
}

impl Default for DampingConfig {
    fn default() -> Self {
        Self {
            foliage: 0.05,
            ornaments: 0.035,
            star: 0.05,
            frame_rate_independent: false,
        }
    }
}

impl DampingConfig {
    fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            foliage: unit_or(self.foliage, defaults.foliage),
            ornaments: unit_or(self.ornaments, defaults.ornaments),
            star: unit_or(self.star, defaults.star),
            frame_rate_independent: self.frame_rate_independent,
        }
    }

    /// How the factors are applied
    pub fn mode(&self) -> DampingMode {
        if self.frame_rate_independent {
            DampingMode::FrameTime
        } else {
            DampingMode::PerFrame
        }
    }
}

/// Secondary motion applied to ornament instances
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Amplitude of the per-item progress stagger
    pub jitter: f32,
    /// Vertical sway amplitude while formed
    pub sway: f32,
    pub sway_frequency: f32,
    /// Yaw speed (radians per second) while formed
    pub spin_rate: f32,
    /// Rotation added per frame around X while in chaos
    pub tumble_x: f32,
    /// Rotation added per frame around Z while in chaos
    pub tumble_z: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            jitter: 0.02,
            sway: 0.015,
            sway_frequency: 1.2,
            spin_rate: 0.1,
            tumble_x: 0.05,
            tumble_z: 0.04,
        }
    }
}

impl MotionConfig {
    /// No jitter, sway or spin: items land exactly on their targets
    pub fn still() -> Self {
        Self {
            jitter: 0.0,
            sway: 0.0,
            sway_frequency: 0.0,
            spin_rate: 0.0,
            tumble_x: 0.0,
            tumble_z: 0.0,
        }
    }

    fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            jitter: finite_or(self.jitter, d.jitter),
            sway: finite_or(self.sway, d.sway),
            sway_frequency: finite_or(self.sway_frequency, d.sway_frequency),
            spin_rate: finite_or(self.spin_rate, d.spin_rate),
            tumble_x: finite_or(self.tumble_x, d.tumble_x),
            tumble_z: finite_or(self.tumble_z, d.tumble_z),
        }
    }
}

/// Tree silhouette dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeShape {
    pub height: f32,
    pub base_radius: f32,
    pub chaos_radius: f32,
    pub tiers: u32,
}

/// Number of items per class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub foliage: usize,
    pub gems: usize,
    pub pearls: usize,
    pub lights: usize,
    pub fairy_dust: usize,
}

/// Pearl necklace curve parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NecklaceConfig {
    pub strands: usize,
    pub spiral_rotations: f32,
    pub sag_frequency: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootingStarConfig {
    pub max_live: usize,
    /// Probability of a spawn attempt succeeding on any given frame
    pub spawn_chance: f32,
}

/// Validated scene configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    pub seed: u64,
    pub initial_state: TreeState,
    pub shape: TreeShape,
    pub counts: Counts,
    pub necklaces: NecklaceConfig,
    pub damping: DampingConfig,
    pub motion: MotionConfig,
    pub shooting_stars: ShootingStarConfig,
    pub palette: Palette,
}

impl Default for TreeConfig {
    fn default() -> Self {
        ConfigInput::default().build(Palette::default())
    }
}

impl TreeConfig {
    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let input: ConfigInput = serde_yaml::from_str(yaml)?;
        let config = input.resolve()?;
        debug!(?config.counts, seed = config.seed, "loaded tree config");
        Ok(config)
    }
}

impl ConfigInput {
    /// Clamp out-of-range values and resolve colors
    pub fn resolve(&self) -> Result<TreeConfig, ConfigError> {
        Ok(self.build(self.palette.resolve()?))
    }

    fn build(&self, palette: Palette) -> TreeConfig {
        TreeConfig {
            seed: self.seed.unwrap_or(42),
            initial_state: self.initial_state.unwrap_or_default(),
            shape: TreeShape {
                height: non_negative(self.tree.height),
                base_radius: non_negative(self.tree.base_radius),
                chaos_radius: non_negative(self.tree.chaos_radius),
                tiers: u32::try_from(self.tree.tiers.max(0)).unwrap_or(u32::MAX),
            },
            counts: Counts {
                foliage: count(self.counts.foliage, MAX_ITEMS_PER_CLASS),
                gems: count(self.counts.gems, MAX_ITEMS_PER_CLASS),
                pearls: count(self.counts.pearls, MAX_ITEMS_PER_CLASS),
                lights: count(self.counts.lights, MAX_ITEMS_PER_CLASS),
                fairy_dust: count(self.counts.fairy_dust, MAX_ITEMS_PER_CLASS),
            },
            necklaces: NecklaceConfig {
                strands: count(self.necklaces.strands, MAX_ITEMS_PER_CLASS),
                spiral_rotations: finite_or(self.necklaces.spiral_rotations, 6.0),
                sag_frequency: finite_or(self.necklaces.sag_frequency, 24.0),
            },
            damping: self.damping.sanitized(),
            motion: self.motion.sanitized(),
            shooting_stars: ShootingStarConfig {
                max_live: count(self.shooting_stars.max_live, MAX_METEORS),
                spawn_chance: unit_or(self.shooting_stars.spawn_chance, 0.0),
            },
            palette,
        }
    }
}

fn count(v: i64, max: usize) -> usize {
    usize::try_from(v.max(0)).map_or(max, |n| n.min(max))
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

fn finite_or(v: f32, default: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        default
    }
}

fn unit_or(v: f32, default: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        default
    }
}
