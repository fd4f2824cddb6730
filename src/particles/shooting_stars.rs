use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::config::{ShootingStarConfig, MAX_METEORS};
use crate::engine::{MATRIX_STRIDE, POSITION_STRIDE};
use crate::math::{Mat4, Vec3};

/// A single meteor streaking across the background
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meteor {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds since spawn
    pub age: f32,
    pub max_age: f32,
}

impl Meteor {
    fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 60.0,
            15.0 + rng.gen::<f32>() * 10.0,
            -20.0 - rng.gen::<f32>() * 10.0,
        );
        let speed_x = rng.gen::<f32>() * 10.0 + 10.0;
        let direction = if rng.gen::<f32>() > 0.5 { 1.0 } else { -1.0 };
        let velocity = Vec3::new(
            speed_x * direction,
            -rng.gen::<f32>() * 10.0 - 10.0,
            rng.gen::<f32>() * 5.0,
        );
        Self {
            position,
            velocity,
            age: 0.0,
            max_age: 1.5 + rng.gen::<f32>() * 1.5,
        }
    }

    /// Fades in from 0 and back out to 0 over the meteor's life
    pub fn opacity(&self) -> f32 {
        if self.max_age <= 0.0 {
            return 0.0;
        }
        let life = (self.age / self.max_age).clamp(0.0, 1.0);
        (life * PI).sin().max(0.0)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.max_age
    }

    /// Trail transform: the +Y axis turned onto the direction of travel
    pub fn trail_matrix(&self) -> Mat4 {
        let p = self.position;
        Mat4::translation(p.x, p.y, p.z).mul(&Mat4::from_rotation_arc(Vec3::UP, self.velocity))
    }
}

/// Fixed pool of meteor slots.
///
/// Every slot has a trail transform, a head position and an opacity in the
/// output buffers; free slots are written with opacity 0 so the renderer
/// can keep one handle per slot and skip invisible ones.
pub struct ShootingStars {
    slots: Box<[Option<Meteor>]>,
    spawn_chance: f32,
    rng: StdRng,
    matrices: Box<[f32]>,
    heads: Box<[f32]>,
    opacities: Box<[f32]>,
    dirty: bool,
}

impl ShootingStars {
    pub fn new(config: &ShootingStarConfig, seed: u64) -> Self {
        let cap = config.max_live.min(MAX_METEORS);
        let mut stars = Self {
            slots: vec![None; cap].into_boxed_slice(),
            spawn_chance: config.spawn_chance,
            rng: StdRng::seed_from_u64(seed),
            matrices: vec![0.0; cap * MATRIX_STRIDE].into_boxed_slice(),
            heads: vec![0.0; cap * POSITION_STRIDE].into_boxed_slice(),
            opacities: vec![0.0; cap].into_boxed_slice(),
            dirty: true,
        };
        stars.write_buffers();
        stars
    }

    /// One frame: maybe spawn, integrate, cull, then rewrite the slot buffers.
    ///
    /// The spawn roll happens once per call regardless of `dt`.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if self.rng.gen::<f32>() < self.spawn_chance {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
                let meteor = Meteor::spawn(&mut self.rng);
                trace!(x = meteor.position.x, max_age = meteor.max_age, "meteor spawned");
                *slot = Some(meteor);
            }
        }

        for slot in self.slots.iter_mut() {
            let expired = match slot {
                Some(meteor) => {
                    meteor.age += dt;
                    meteor.position += meteor.velocity * dt;
                    meteor.is_expired()
                }
                None => false,
            };
            if expired {
                trace!("meteor culled");
                *slot = None;
            }
        }

        self.write_buffers();
    }

    fn write_buffers(&mut self) {
        let slots = self
            .matrices
            .chunks_exact_mut(MATRIX_STRIDE)
            .zip(self.heads.chunks_exact_mut(POSITION_STRIDE))
            .zip(self.opacities.iter_mut());

        for (slot, ((matrix, head), opacity)) in self.slots.iter().zip(slots) {
            match slot {
                Some(meteor) => {
                    meteor.trail_matrix().write_to(matrix);
                    meteor.position.write_to(head);
                    *opacity = meteor.opacity();
                }
                None => {
                    Mat4::identity().write_to(matrix);
                    Vec3::ZERO.write_to(head);
                    *opacity = 0.0;
                }
            }
        }
        self.dirty = true;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn live(&self) -> impl Iterator<Item = &Meteor> {
        self.slots.iter().flatten()
    }

    #[cfg(test)]
    fn slot(&self, index: usize) -> Option<&Meteor> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// One 4x4 trail transform per slot
    pub fn matrices(&self) -> &[f32] {
        &self.matrices
    }

    /// One head position per slot
    pub fn heads(&self) -> &[f32] {
        &self.heads
    }

    /// One opacity per slot, 0 when the slot is free
    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
