//! Per-frame orchestration of every animated group
//!
//! The host calls [`Scene::update`] once per frame with the frame clock.
//! Each group's progress controller advances first, then the group writes
//! its buffers from that fresh value, so a buffer is never more than one
//! frame behind the state signal.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::animation::{FrameTime, ProgressController, TreeState};
use crate::config::TreeConfig;
use crate::engine::{FoliageCloud, OrnamentGroup, StarTopper};
use crate::layout::{ItemKind, LayoutGenerator, NecklaceStrand};
use crate::particles::{FairyDust, ShootingStars};

/// Mixed into the scene seed so meteors do not replay the layout draws
const METEOR_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct Scene {
    state: TreeState,

    foliage_progress: ProgressController,
    gem_progress: ProgressController,
    pearl_progress: ProgressController,
    light_progress: ProgressController,
    star_progress: ProgressController,
    dust_progress: ProgressController,

    foliage: FoliageCloud,
    gems: OrnamentGroup,
    pearls: OrnamentGroup,
    lights: OrnamentGroup,
    strands: Vec<NecklaceStrand>,
    star: StarTopper,
    fairy_dust: FairyDust,
    shooting_stars: ShootingStars,
}

impl Scene {
    /// Build a scene with a layout seeded from `config.seed`
    pub fn new(config: &TreeConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, &mut rng)
    }

    /// Build a scene drawing every layout sample from `rng`
    pub fn with_rng<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Self {
        let generator = LayoutGenerator::new(config);
        let layout = generator.generate(rng);
        let profile = *generator.profile();
        let palette = &config.palette;
        let damping = config.damping;
        let controller = |factor: f32| ProgressController::new(factor).with_mode(damping.mode());

        let fairy_dust = FairyDust::new(rng, config.counts.fairy_dust, profile, palette.fairy_dust);
        let shooting_stars = ShootingStars::new(&config.shooting_stars, config.seed ^ METEOR_SEED_SALT);

        let scene = Self {
            state: config.initial_state,
            foliage_progress: controller(damping.foliage),
            gem_progress: controller(damping.ornaments),
            pearl_progress: controller(damping.ornaments),
            light_progress: controller(damping.ornaments),
            star_progress: controller(damping.star),
            dust_progress: controller(damping.foliage),
            foliage: FoliageCloud::new(layout.foliage, palette.foliage),
            gems: OrnamentGroup::new(ItemKind::Gem, layout.gems, config.motion),
            pearls: OrnamentGroup::new(ItemKind::Pearl, layout.pearls, config.motion),
            lights: OrnamentGroup::new(ItemKind::Light, layout.lights, config.motion),
            strands: layout.strands,
            star: StarTopper::new(profile.height, palette.star),
            fairy_dust,
            shooting_stars,
        };

        info!(
            items = scene.item_count(),
            fairy_dust = scene.fairy_dust.len(),
            meteor_slots = scene.shooting_stars.capacity(),
            state = ?scene.state,
            "scene ready"
        );
        scene
    }

    /// Advance every group by one frame
    pub fn update(&mut self, frame: FrameTime) {
        let FrameTime { delta, elapsed } = frame;
        let state = self.state;

        let p = self.foliage_progress.update(delta, state);
        self.foliage.tick(p);

        let p = self.gem_progress.update(delta, state);
        self.gems.tick(p, state, elapsed);
        let p = self.pearl_progress.update(delta, state);
        self.pearls.tick(p, state, elapsed);
        let p = self.light_progress.update(delta, state);
        self.lights.tick(p, state, elapsed);

        let p = self.star_progress.update(delta, state);
        self.star.tick(p, elapsed);

        self.dust_progress.update(delta, state);
        self.fairy_dust.update(state);

        self.shooting_stars.update(delta);
    }

    pub fn state(&self) -> TreeState {
        self.state
    }

    /// Change the target every group eases toward. In-flight progress is
    /// kept, so a reversal before convergence turns around smoothly.
    pub fn set_state(&mut self, state: TreeState) {
        if state != self.state {
            debug!(from = ?self.state, to = ?state, "tree state changed");
            self.state = state;
        }
    }

    pub fn toggle(&mut self) -> TreeState {
        self.set_state(self.state.toggled());
        self.state
    }

    /// Number of interpolated layout items across foliage and ornaments
    pub fn item_count(&self) -> usize {
        self.foliage.len() + self.gems.len() + self.pearls.len() + self.lights.len()
    }

    pub fn foliage_progress(&self) -> &ProgressController {
        &self.foliage_progress
    }

    pub fn gem_progress(&self) -> &ProgressController {
        &self.gem_progress
    }

    pub fn pearl_progress(&self) -> &ProgressController {
        &self.pearl_progress
    }

    pub fn light_progress(&self) -> &ProgressController {
        &self.light_progress
    }

    pub fn star_progress(&self) -> &ProgressController {
        &self.star_progress
    }

    pub fn dust_progress(&self) -> &ProgressController {
        &self.dust_progress
    }

    pub fn foliage(&self) -> &FoliageCloud {
        &self.foliage
    }

    pub fn foliage_mut(&mut self) -> &mut FoliageCloud {
        &mut self.foliage
    }

    pub fn gems(&self) -> &OrnamentGroup {
        &self.gems
    }

    pub fn gems_mut(&mut self) -> &mut OrnamentGroup {
        &mut self.gems
    }

    pub fn pearls(&self) -> &OrnamentGroup {
        &self.pearls
    }

    pub fn pearls_mut(&mut self) -> &mut OrnamentGroup {
        &mut self.pearls
    }

    pub fn lights(&self) -> &OrnamentGroup {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut OrnamentGroup {
        &mut self.lights
    }

    pub fn strands(&self) -> &[NecklaceStrand] {
        &self.strands
    }

    pub fn star(&self) -> &StarTopper {
        &self.star
    }

    pub fn star_mut(&mut self) -> &mut StarTopper {
        &mut self.star
    }

    pub fn fairy_dust(&self) -> &FairyDust {
        &self.fairy_dust
    }

    pub fn fairy_dust_mut(&mut self) -> &mut FairyDust {
        &mut self.fairy_dust
    }

    pub fn shooting_stars(&self) -> &ShootingStars {
        &self.shooting_stars
    }

    pub fn shooting_stars_mut(&mut self) -> &mut ShootingStars {
        &mut self.shooting_stars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::DampingMode;
    use crate::config::{Counts, MotionConfig};

    const DT: f32 = 1.0 / 60.0;

    fn small_config() -> TreeConfig {
        let mut config = TreeConfig::default();
        config.counts.foliage = 1000;
        config.counts.gems = 40;
        config.counts.pearls = 60;
        config.counts.lights = 20;
        config.counts.fairy_dust = 30;
        config
    }

    fn run(scene: &mut Scene, frames: u32) {
        for i in 0..frames {
            scene.update(FrameTime::fixed(i, DT));
        }
    }

    #[test]
    fn test_chaos_to_formed_end_to_end() {
        let mut config = small_config();
        config.initial_state = TreeState::Chaos;
        config.damping.foliage = 0.05;
        let mut scene = Scene::new(&config);
        assert_eq!(scene.foliage().len(), 1000);

        scene.set_state(TreeState::Formed);
        run(&mut scene, 200);

        assert!(scene.foliage_progress().progress() > 0.99);
        // Remaining distance is (1 - progress) of the chaos-to-target span
        let eps = (1.0 - scene.foliage_progress().progress()) * 2.0 * (config.shape.chaos_radius + 10.0);
        for (i, item) in scene.foliage().items().iter().enumerate() {
            let d = (scene.foliage().position(i) - item.target_position()).length();
            assert!(d <= eps, "item {} is {} from its target", i, d);
        }
    }

    #[test]
    fn test_groups_settle_at_different_rates() {
        let mut config = small_config();
        config.initial_state = TreeState::Formed;
        let mut scene = Scene::new(&config);
        run(&mut scene, 30);
        let foliage = scene.foliage_progress().progress();
        let gems = scene.gem_progress().progress();
        assert!(foliage > gems);
        assert!((scene.star_progress().progress() - foliage).abs() < 1e-6);
        assert_eq!(gems, scene.pearl_progress().progress());
    }

    #[test]
    fn test_toggle_reverses_smoothly() {
        let mut scene = Scene::new(&small_config());
        run(&mut scene, 20);
        let before = scene.foliage_progress().progress();
        assert!(before > 0.0 && before < 1.0);

        assert_eq!(scene.toggle(), TreeState::Chaos);
        scene.update(FrameTime::new(DT, 21.0 * DT));
        let after = scene.foliage_progress().progress();
        assert!(after < before && after > 0.0);

        assert_eq!(scene.toggle(), TreeState::Formed);
        assert!(scene.state().is_formed());
    }

    #[test]
    fn test_layout_invariant_across_frames() {
        let mut scene = Scene::new(&small_config());
        let gems = scene.gems().items().to_vec();
        let foliage = scene.foliage().items().to_vec();
        run(&mut scene, 50);
        scene.toggle();
        run(&mut scene, 50);
        assert_eq!(scene.gems().items(), &gems[..]);
        assert_eq!(scene.foliage().items(), &foliage[..]);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let config = small_config();
        let mut a = Scene::new(&config);
        let mut b = Scene::new(&config);
        run(&mut a, 10);
        run(&mut b, 10);
        assert_eq!(a.foliage().buffers().positions(), b.foliage().buffers().positions());
        assert_eq!(a.pearls().buffers().matrices(), b.pearls().buffers().matrices());
        assert_eq!(a.fairy_dust().buffers().positions(), b.fairy_dust().buffers().positions());
    }

    #[test]
    fn test_buffers_keep_their_length() {
        let mut scene = Scene::new(&small_config());
        let lens = (
            scene.foliage().buffers().positions().len(),
            scene.gems().buffers().matrices().len(),
            scene.shooting_stars().matrices().len(),
        );
        run(&mut scene, 100);
        scene.toggle();
        run(&mut scene, 100);
        assert_eq!(lens.0, 3000);
        assert_eq!(lens.1, 40 * 16);
        assert_eq!(scene.foliage().buffers().positions().len(), lens.0);
        assert_eq!(scene.gems().buffers().matrices().len(), lens.1);
        assert_eq!(scene.shooting_stars().matrices().len(), lens.2);
    }

    #[test]
    fn test_empty_scene_updates() {
        let mut config = TreeConfig::default();
        config.counts = Counts {
            foliage: 0,
            gems: 0,
            pearls: 0,
            lights: 0,
            fairy_dust: 0,
        };
        config.shooting_stars.max_live = 0;
        let mut scene = Scene::new(&config);
        run(&mut scene, 5);
        assert_eq!(scene.item_count(), 0);
        assert!(scene.strands().is_empty());
    }

    #[test]
    fn test_oversized_config_builds() {
        let yaml = "
counts:
  foliage: 50
  gems: 10
  pearls: 20
  lights: 5
  fairy_dust: 5
necklaces:
  strands: 9223372036854775807
shooting_stars:
  max_live: 9223372036854775807
  spawn_chance: 1.0
";
        let config = TreeConfig::from_yaml(yaml).unwrap();
        let mut scene = Scene::new(&config);
        run(&mut scene, 10);
        assert_eq!(scene.shooting_stars().capacity(), crate::config::MAX_METEORS);
        assert!(scene.pearls().is_empty());
    }

    #[test]
    fn test_damping_mode_reaches_every_group() {
        let mut config = small_config();
        config.damping.frame_rate_independent = true;
        let mut scene = Scene::new(&config);
        scene.update(FrameTime::new(1.0 / 30.0, 1.0 / 30.0));
        assert!((scene.foliage_progress().progress() - 0.0975).abs() < 1e-5);
        assert_eq!(scene.gem_progress().mode(), DampingMode::FrameTime);

        let mut scene = Scene::new(&small_config());
        scene.update(FrameTime::new(0.0, 0.0));
        assert!((scene.foliage_progress().progress() - 0.05).abs() < 1e-6);
        assert_eq!(scene.star_progress().mode(), DampingMode::PerFrame);
    }

    #[test]
    fn test_still_motion_lands_exactly() {
        let mut config = small_config();
        config.motion = MotionConfig::still();
        let mut scene = Scene::new(&config);
        run(&mut scene, 2000);
        let lights = scene.lights();
        for (i, item) in lights.items().iter().enumerate() {
            assert!((lights.position(i) - item.target_position()).length() < 1e-3);
        }
    }

    #[test]
    fn test_all_outputs_finite() {
        let mut scene = Scene::new(&small_config());
        for i in 0..300 {
            if i == 150 {
                scene.toggle();
            }
            scene.update(FrameTime::fixed(i, DT));
        }
        assert!(scene.gems().buffers().matrices().iter().all(|v| v.is_finite()));
        assert!(scene.star().buffers().matrices().iter().all(|v| v.is_finite()));
        assert!(scene.shooting_stars().matrices().iter().all(|v| v.is_finite()));
        assert!(scene.foliage().buffers().positions().iter().all(|v| v.is_finite()));
    }
}
