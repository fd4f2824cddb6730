use wasm_bindgen::prelude::*;

pub mod animation;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod logging;
pub mod math;
pub mod particles;
pub mod scene;

pub use animation::{FrameTime, ProgressController, TreeState};
pub use config::TreeConfig;
pub use error::ConfigError;
pub use scene::Scene;

use engine::GroupBuffers;
use math::Vec3;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

/// Animated groups addressable from JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Foliage = 0,
    Gems = 1,
    Pearls = 2,
    Lights = 3,
    Star = 4,
    FairyDust = 5,
    ShootingStars = 6,
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct HolidayTree {
    scene: Scene,
    config: TreeConfig,
}

#[wasm_bindgen]
impl HolidayTree {
    /// Create an engine with the default tree
    #[wasm_bindgen(constructor)]
    pub fn new() -> HolidayTree {
        Self::from_config(TreeConfig::default())
    }

    /// Create an engine from a YAML configuration string
    #[wasm_bindgen]
    pub fn from_yaml(yaml: &str) -> Result<HolidayTree, JsValue> {
        let config = TreeConfig::from_yaml(yaml).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_config(config))
    }

    /// Advance one frame. `dt` and `elapsed` are in seconds.
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32, elapsed: f32) {
        self.scene.update(FrameTime::new(dt, elapsed));
    }

    /// Flip between formed and chaos; returns true when now formed
    #[wasm_bindgen]
    pub fn toggle(&mut self) -> bool {
        self.scene.toggle().is_formed()
    }

    #[wasm_bindgen]
    pub fn set_formed(&mut self, formed: bool) {
        let state = if formed { TreeState::Formed } else { TreeState::Chaos };
        self.scene.set_state(state);
    }

    #[wasm_bindgen]
    pub fn is_formed(&self) -> bool {
        self.scene.state().is_formed()
    }

    /// Progress scalar of a group, 0 = chaos and 1 = formed.
    /// Shooting stars ignore the tree state and always report 0.
    #[wasm_bindgen]
    pub fn progress(&self, group: Group) -> f32 {
        let controller = match group {
            Group::Foliage => self.scene.foliage_progress(),
            Group::Gems => self.scene.gem_progress(),
            Group::Pearls => self.scene.pearl_progress(),
            Group::Lights => self.scene.light_progress(),
            Group::Star => self.scene.star_progress(),
            Group::FairyDust => self.scene.dust_progress(),
            Group::ShootingStars => return 0.0,
        };
        controller.progress()
    }

    /// Number of items (or slots, for shooting stars) in a group
    #[wasm_bindgen]
    pub fn count(&self, group: Group) -> usize {
        match group {
            Group::ShootingStars => self.scene.shooting_stars().capacity(),
            _ => self.buffers(group).map(GroupBuffers::len).unwrap_or(0),
        }
    }

    /// Number of meteors currently in flight
    #[wasm_bindgen]
    pub fn live_meteors(&self) -> usize {
        self.scene.shooting_stars().live_count()
    }

    /// Returns and clears the group's dirty flag
    #[wasm_bindgen]
    pub fn take_dirty(&mut self, group: Group) -> bool {
        match group {
            Group::Foliage => self.scene.foliage_mut().buffers_mut().take_dirty(),
            Group::Gems => self.scene.gems_mut().buffers_mut().take_dirty(),
            Group::Pearls => self.scene.pearls_mut().buffers_mut().take_dirty(),
            Group::Lights => self.scene.lights_mut().buffers_mut().take_dirty(),
            Group::Star => self.scene.star_mut().buffers_mut().take_dirty(),
            Group::FairyDust => self.scene.fairy_dust_mut().buffers_mut().take_dirty(),
            Group::ShootingStars => self.scene.shooting_stars_mut().take_dirty(),
        }
    }

    /// Single material color of a group as `[r, g, b]`
    #[wasm_bindgen]
    pub fn material_color(&self, group: Group) -> Vec<f32> {
        let palette = &self.config.palette;
        let color = match group {
            Group::Foliage => self.scene.foliage().color(),
            Group::Gems => Vec3::ONE,
            Group::Pearls => palette.pearl,
            Group::Lights => palette.light,
            Group::Star => palette.star,
            Group::FairyDust => self.scene.fairy_dust().color(),
            Group::ShootingStars => palette.meteor,
        };
        color.to_array().to_vec()
    }

    /// Zero-copy view of a group's positions (xyz per item; meteor heads
    /// for shooting stars).
    ///
    /// Views alias wasm memory and are detached if it grows, so take a
    /// fresh view after every `render`.
    #[wasm_bindgen]
    pub fn positions(&self, group: Group) -> js_sys::Float32Array {
        match group {
            Group::ShootingStars => view(self.scene.shooting_stars().heads()),
            _ => view(self.buffers(group).map(GroupBuffers::positions).unwrap_or(&[])),
        }
    }

    /// Zero-copy view of per-instance colors (rgb per item); empty for
    /// point groups
    #[wasm_bindgen]
    pub fn colors(&self, group: Group) -> js_sys::Float32Array {
        view(self.buffers(group).map(GroupBuffers::colors).unwrap_or(&[]))
    }

    /// Zero-copy view of column-major 4x4 transforms (16 floats per item)
    #[wasm_bindgen]
    pub fn matrices(&self, group: Group) -> js_sys::Float32Array {
        match group {
            Group::ShootingStars => view(self.scene.shooting_stars().matrices()),
            _ => view(self.buffers(group).map(GroupBuffers::matrices).unwrap_or(&[])),
        }
    }

    /// Per-point foliage sizes
    #[wasm_bindgen]
    pub fn foliage_sizes(&self) -> js_sys::Float32Array {
        view(self.scene.foliage().sizes())
    }

    /// One opacity per meteor slot; 0 marks a free slot
    #[wasm_bindgen]
    pub fn meteor_opacities(&self) -> js_sys::Float32Array {
        view(self.scene.shooting_stars().opacities())
    }
}

impl HolidayTree {
    /// Build from an already validated config
    pub fn from_config(config: TreeConfig) -> Self {
        let scene = Scene::new(&config);
        Self { scene, config }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    fn buffers(&self, group: Group) -> Option<&GroupBuffers> {
        match group {
            Group::Foliage => Some(self.scene.foliage().buffers()),
            Group::Gems => Some(self.scene.gems().buffers()),
            Group::Pearls => Some(self.scene.pearls().buffers()),
            Group::Lights => Some(self.scene.lights().buffers()),
            Group::Star => Some(self.scene.star().buffers()),
            Group::FairyDust => Some(self.scene.fairy_dust().buffers()),
            Group::ShootingStars => None,
        }
    }
}

impl Default for HolidayTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Star polygon vertices as flat `[x0, y0, x1, y1, ...]`, first tip up
#[wasm_bindgen]
pub fn star_outline(points: u32, outer_radius: f32, inner_radius: f32) -> Vec<f32> {
    layout::star_outline(points as usize, outer_radius, inner_radius)
        .into_iter()
        .flatten()
        .collect()
}

fn view(data: &[f32]) -> js_sys::Float32Array {
    // Safety: the buffers are boxed slices owned by the scene and are never
    // reallocated; the caller is told to re-fetch after each frame.
    unsafe { js_sys::Float32Array::view(data) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn small_tree(formed: bool) -> HolidayTree {
        let state = if formed { "formed" } else { "chaos" };
        let yaml = format!(
            "initial_state: {}\ncounts:\n  foliage: 300\n  gems: 30\n  pearls: 40\n  lights: 10\n  fairy_dust: 12\n",
            state
        );
        match HolidayTree::from_yaml(&yaml) {
            Ok(tree) => tree,
            Err(_) => panic!("valid yaml rejected"),
        }
    }

    #[test]
    fn test_counts_follow_config() {
        let tree = small_tree(true);
        assert_eq!(tree.count(Group::Foliage), 300);
        assert_eq!(tree.count(Group::Gems), 30);
        assert_eq!(tree.count(Group::Pearls), 40);
        assert_eq!(tree.count(Group::Lights), 10);
        assert_eq!(tree.count(Group::Star), 1);
        assert_eq!(tree.count(Group::FairyDust), 12);
        assert_eq!(tree.count(Group::ShootingStars), 5);
    }

    #[test]
    fn test_render_and_toggle() {
        let mut tree = small_tree(false);
        assert!(!tree.is_formed());
        assert!(tree.toggle());
        let mut elapsed = 0.0;
        for _ in 0..120 {
            elapsed += DT;
            tree.render(DT, elapsed);
        }
        assert!(tree.progress(Group::Foliage) > 0.9);
        assert!(tree.progress(Group::Gems) < tree.progress(Group::Foliage));
        assert_eq!(tree.progress(Group::ShootingStars), 0.0);

        tree.set_formed(false);
        assert!(!tree.is_formed());
    }

    #[test]
    fn test_dirty_flags_cleared_by_reader() {
        let mut tree = small_tree(true);
        tree.render(DT, DT);
        assert!(tree.take_dirty(Group::Foliage));
        assert!(!tree.take_dirty(Group::Foliage));
        assert!(tree.take_dirty(Group::ShootingStars));
        tree.render(DT, 2.0 * DT);
        assert!(tree.take_dirty(Group::Foliage));
    }

    #[test]
    fn test_material_colors() {
        let tree = HolidayTree::new();
        let c = tree.material_color(Group::Foliage);
        assert_eq!(c.len(), 3);
        assert!(c.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(tree.material_color(Group::Gems), vec![1.0, 1.0, 1.0]);
        let palette = &tree.config().palette;
        assert_eq!(c, palette.foliage.to_array().to_vec());
        assert_eq!(tree.material_color(Group::FairyDust), palette.fairy_dust.to_array().to_vec());
    }

    #[test]
    fn test_star_outline_is_flat() {
        let flat = star_outline(5, 1.0, 0.4);
        assert_eq!(flat.len(), 20);
        assert!(flat[0].abs() < 1e-6);
        assert!((flat[1] - 1.0).abs() < 1e-6);
    }
}
