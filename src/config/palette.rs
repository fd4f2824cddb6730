//! Color palette for every animated group
//!
//! Colors are authored as `#RRGGBB` strings and resolved once into
//! `Vec3` RGB triples in the 0..1 range.

use serde::Deserialize;
use crate::error::ConfigError;
use crate::math::Vec3;

/// Default gem colors: platinum and silver tones, two emeralds, pale gold,
/// metallic rose and pink diamond
pub const DEFAULT_GEM_COLORS: [&str; 11] = [
    "#F5F5F7", "#E5E4E2", "#D1D1D1", "#B8B8B8", "#A9A9A9", "#FFFFFF",
    "#012015", "#001F18", "#E6BE8A", "#D4AFB9", "#FBCFE8",
];

/// Palette as written in YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaletteInput {
    pub foliage: String,
    pub pearl: String,
    pub light: String,
    pub star: String,
    pub fairy_dust: String,
    pub meteor: String,
    pub gems: Vec<String>,
}

impl Default for PaletteInput {
    fn default() -> Self {
        Self {
            foliage: "#012015".to_string(),
            pearl: "#F0F0F5".to_string(),
            light: "#FADADD".to_string(),
            star: "#C0C0C0".to_string(),
            fairy_dust: "#F5F5F7".to_string(),
            meteor: "#F5F5F7".to_string(),
            gems: DEFAULT_GEM_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Resolved palette
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub foliage: Vec3,
    pub pearl: Vec3,
    pub light: Vec3,
    pub star: Vec3,
    pub fairy_dust: Vec3,
    pub meteor: Vec3,
    /// Never empty; an empty list in the input resolves to plain white
    pub gems: Vec<Vec3>,
}

impl Default for Palette {
    fn default() -> Self {
        // The built-in strings are valid hex
        PaletteInput::default()
            .resolve()
            .unwrap_or_else(|_| Self::fallback())
    }
}

impl Palette {
    fn fallback() -> Self {
        Self {
            foliage: Vec3::ONE,
            pearl: Vec3::ONE,
            light: Vec3::ONE,
            star: Vec3::ONE,
            fairy_dust: Vec3::ONE,
            meteor: Vec3::ONE,
            gems: vec![Vec3::ONE],
        }
    }
}

impl PaletteInput {
    pub fn resolve(&self) -> Result<Palette, ConfigError> {
        let mut gems = self
            .gems
            .iter()
            .enumerate()
            .map(|(i, hex)| parse_hex_color(&format!("palette.gems[{}]", i), hex))
            .collect::<Result<Vec<_>, _>>()?;
        if gems.is_empty() {
            gems.push(Vec3::ONE);
        }

        Ok(Palette {
            foliage: parse_hex_color("palette.foliage", &self.foliage)?,
            pearl: parse_hex_color("palette.pearl", &self.pearl)?,
            light: parse_hex_color("palette.light", &self.light)?,
            star: parse_hex_color("palette.star", &self.star)?,
            fairy_dust: parse_hex_color("palette.fairy_dust", &self.fairy_dust)?,
            meteor: parse_hex_color("palette.meteor", &self.meteor)?,
            gems,
        })
    }
}

/// Parse `#RRGGBB` (leading `#` optional) into 0..1 RGB
pub fn parse_hex_color(field: &str, value: &str) -> Result<Vec3, ConfigError> {
    let invalid = || ConfigError::InvalidColor {
        field: field.to_string(),
        value: value.to_string(),
    };

    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| invalid())
    };

    Ok(Vec3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
