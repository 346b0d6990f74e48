use std::{
	collections::HashMap,
	fs,
	path::Path,
};

use image::Rgba;
use serde::Deserialize;

use crate::MapResult;

/// Transparent pixels composite to nothing under `over`.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Read-only map from block name to RGBA color.
/// Missing names resolve to [TRANSPARENT], so a block this palette
/// does not know simply leaves no pixel on the map.
#[derive(Debug, Clone, Default)]
pub struct BlockPalette {
	colors: HashMap<String, Rgba<u8>>,
}

/// On-disk palette override format:
/// ```toml
/// [colors]
/// "minecraft:stone" = [125, 125, 125, 255]
/// ```
#[derive(Debug, Deserialize)]
struct PaletteFile {
	colors: HashMap<String, [u8; 4]>,
}

impl BlockPalette {
	pub fn new() -> Self {
		Self::default()
	}

	/// The built-in colors for the common overworld surface blocks.
	pub fn builtin() -> Self {
		let mut palette = Self::new();
		for (name, color) in BUILTIN_COLORS {
			palette.colors.insert(format!("minecraft:{name}"), Rgba(*color));
		}
		palette
	}

	pub fn insert(&mut self, name: impl Into<String>, color: Rgba<u8>) {
		self.colors.insert(name.into(), color);
	}

	pub fn color(&self, name: &str) -> Rgba<u8> {
		self.colors.get(name).copied().unwrap_or(TRANSPARENT)
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Merge colors from a TOML override file. Entries replace any
	/// built-in color of the same block name.
	pub fn load_overrides(&mut self, path: impl AsRef<Path>) -> MapResult<()> {
		let text = fs::read_to_string(path)?;
		let file: PaletteFile = toml::from_str(&text)?;
		for (name, [r, g, b, a]) in file.colors {
			self.colors.insert(name, Rgba([r, g, b, a]));
		}
		Ok(())
	}
}

// Flat colors approximating the game's own map rendering. Alpha is
// opaque throughout except water.
const BUILTIN_COLORS: &[(&str, [u8; 4])] = &[
	("stone", [125, 125, 125, 255]),
	("granite", [149, 103, 85, 255]),
	("polished_granite", [159, 110, 90, 255]),
	("diorite", [188, 188, 188, 255]),
	("polished_diorite", [193, 193, 193, 255]),
	("andesite", [136, 136, 136, 255]),
	("polished_andesite", [141, 141, 141, 255]),
	("deepslate", [80, 80, 82, 255]),
	("tuff", [108, 109, 102, 255]),
	("calcite", [223, 224, 220, 255]),
	("bedrock", [85, 85, 85, 255]),
	("grass_block", [127, 178, 56, 255]),
	("dirt", [150, 108, 74, 255]),
	("coarse_dirt", [119, 85, 59, 255]),
	("rooted_dirt", [144, 103, 76, 255]),
	("podzol", [90, 63, 24, 255]),
	("mycelium", [111, 99, 105, 255]),
	("mud", [60, 57, 60, 255]),
	("clay", [164, 168, 184, 255]),
	("sand", [247, 233, 163, 255]),
	("red_sand", [190, 102, 33, 255]),
	("gravel", [136, 126, 126, 255]),
	("sandstone", [216, 202, 155, 255]),
	("red_sandstone", [187, 92, 31, 255]),
	("terracotta", [152, 94, 67, 255]),
	("water", [64, 64, 255, 192]),
	("lava", [255, 129, 0, 255]),
	("ice", [160, 160, 255, 255]),
	("packed_ice", [141, 180, 250, 255]),
	("blue_ice", [116, 167, 253, 255]),
	("snow", [255, 255, 255, 255]),
	("snow_block", [249, 254, 254, 255]),
	("powder_snow", [248, 253, 253, 255]),
	("oak_log", [102, 81, 50, 255]),
	("spruce_log", [58, 37, 16, 255]),
	("birch_log", [216, 215, 210, 255]),
	("jungle_log", [87, 67, 26, 255]),
	("acacia_log", [103, 96, 86, 255]),
	("dark_oak_log", [60, 46, 26, 255]),
	("oak_leaves", [58, 95, 27, 255]),
	("spruce_leaves", [45, 72, 35, 255]),
	("birch_leaves", [88, 115, 60, 255]),
	("jungle_leaves", [56, 94, 22, 255]),
	("acacia_leaves", [78, 110, 36, 255]),
	("dark_oak_leaves", [48, 79, 21, 255]),
	("azalea_leaves", [92, 112, 48, 255]),
	("oak_planks", [162, 130, 78, 255]),
	("moss_block", [89, 109, 45, 255]),
	("cactus", [15, 117, 34, 255]),
	("pumpkin", [197, 117, 25, 255]),
	("melon", [111, 144, 29, 255]),
	("hay_block", [166, 136, 38, 255]),
	("coal_ore", [105, 105, 105, 255]),
	("iron_ore", [135, 130, 126, 255]),
	("copper_ore", [124, 125, 120, 255]),
	("gold_ore", [143, 140, 125, 255]),
	("netherrack", [112, 2, 0, 255]),
	("soul_sand", [81, 62, 50, 255]),
	("soul_soil", [75, 57, 46, 255]),
	("basalt", [73, 74, 79, 255]),
	("blackstone", [42, 36, 41, 255]),
	("end_stone", [221, 223, 165, 255]),
	("obsidian", [21, 20, 31, 255]),
	("mossy_cobblestone", [110, 118, 94, 255]),
	("cobblestone", [127, 127, 127, 255]),
];
