use std::f32::consts::TAU;

use rand::Rng;

use crate::animation::TreeState;
use crate::engine::{GroupBuffers, POSITION_STRIDE};
use crate::layout::TreeProfile;
use crate::math::Vec3;

/// Angle added per formed frame
const ORBIT_STEP: f32 = 0.02;
/// Fraction of a mote's speed climbed per formed frame
const CLIMB_SCALE: f32 = 0.1;
/// Clearance between the cone and the motes
const SURFACE_GAP: f32 = 0.2;
/// Multiplicative outward drift per chaos frame
const EXPLODE_FACTOR: f32 = 1.02;

#[derive(Debug, Clone, Copy)]
struct Mote {
    angle: f32,
    /// Height above the tree base
    height: f32,
    speed: f32,
    radius_offset: f32,
}

/// Sparkles spiralling up the formed tree.
///
/// In chaos the motes are pushed outward by a constant factor every frame
/// and never recalled or respawned, so a long chaos spell carries them
/// arbitrarily far from the origin.
pub struct FairyDust {
    motes: Vec<Mote>,
    profile: TreeProfile,
    color: Vec3,
    buffers: GroupBuffers,
}

impl FairyDust {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, profile: TreeProfile, color: Vec3) -> Self {
        let motes = (0..count)
            .map(|_| Mote {
                angle: rng.gen::<f32>() * TAU,
                height: rng.gen::<f32>() * profile.height.max(0.0),
                speed: 0.2 + rng.gen::<f32>() * 0.5,
                radius_offset: rng.gen::<f32>() * 0.5,
            })
            .collect();

        let mut dust = Self {
            motes,
            profile,
            color,
            buffers: GroupBuffers::points(count),
        };
        dust.write_spiral();
        dust
    }

    /// Advance every mote one frame
    pub fn update(&mut self, state: TreeState) {
        match state {
            TreeState::Formed => {
                let height = self.profile.height;
                for mote in &mut self.motes {
                    mote.height = if height > 0.0 {
                        (mote.height + mote.speed * CLIMB_SCALE).rem_euclid(height)
                    } else {
                        0.0
                    };
                    mote.angle = (mote.angle + ORBIT_STEP).rem_euclid(TAU);
                }
                self.write_spiral();
            }
            TreeState::Chaos => {
                let out = self.buffers.slices_mut();
                for v in out.positions.iter_mut() {
                    *v *= EXPLODE_FACTOR;
                }
                self.buffers.mark_dirty();
            }
        }
    }

    fn write_spiral(&mut self) {
        let profile = self.profile;
        let out = self.buffers.slices_mut();
        for (mote, slot) in self.motes.iter().zip(out.positions.chunks_exact_mut(POSITION_STRIDE)) {
            spiral_point(&profile, mote).write_to(slot);
        }
        self.buffers.mark_dirty();
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Height above the base of mote `index`
    pub fn height(&self, index: usize) -> f32 {
        self.motes[index].height
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let start = index * POSITION_STRIDE;
        Vec3::read_from(&self.buffers.positions()[start..start + POSITION_STRIDE])
    }

    pub fn buffers(&self) -> &GroupBuffers {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut GroupBuffers {
        &mut self.buffers
    }

    pub fn len(&self) -> usize {
        self.motes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motes.is_empty()
    }
}

fn spiral_point(profile: &TreeProfile, mote: &Mote) -> Vec3 {
    let t = profile.normalized_height(mote.height);
    let r = profile.cone_radius(t) + mote.radius_offset + SURFACE_GAP;
    Vec3::new(mote.angle.cos() * r, profile.world_y(mote.height), mote.angle.sin() * r)
}
