pub mod palette;
pub mod tree_config;

pub use palette::{parse_hex_color, Palette, PaletteInput};
pub use tree_config::{
    ConfigInput, Counts, DampingConfig, MotionConfig, NecklaceConfig, ShootingStarConfig,
    TreeConfig, TreeShape, MAX_ITEMS_PER_CLASS, MAX_METEORS,
};
