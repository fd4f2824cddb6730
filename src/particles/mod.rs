//! Decorative systems with their own spawn, update and cull logic

pub mod fairy_dust;
pub mod shooting_stars;

pub use fairy_dust::FairyDust;
pub use shooting_stars::{Meteor, ShootingStars};
