use image::RgbaImage;

use crate::{
	chunk::{
		BlockStates,
		ChunkNbt,
		Section,
	},
	math::bit,
};

use super::palette::BlockPalette;

/// Width and height of one chunk tile in pixels. Each pixel is one
/// column of the world.
pub const TILE_SIZE: u32 = 16;

/// Stored height-map values are the column's world Y plus 65; a stored
/// zero means the column has no motion-blocking block at all.
const HEIGHT_OFFSET: i64 = 65;

/// Sections are resolved by `Y + 4`. 24 section slots cover the world
/// height of this format.
const SECTION_OFFSET: i32 = 4;
const SECTION_COUNT: usize = 24;

/// Resolve the palette index of the block at section-local `(x, y, z)`.
///
/// Entries never straddle word boundaries: every word keeps its
/// `64 % bpb` low bits as padding, so the word index is the linear
/// block index divided by blocks-per-word, and the slot within the
/// word is the remainder. Slots count from the high end of the
/// unpacked bit positions.
///
/// Returns `None` when the section has no resolvable data: an empty
/// `data` array (a uniform section), an empty palette, or a packed
/// index that runs past the data. Callers skip such columns.
pub fn palette_index(states: &BlockStates, x: usize, y: usize, z: usize) -> Option<usize> {
	if states.data.is_empty() || states.palette.is_empty() {
		return None;
	}
	let bpb = states.data.len() * 64 / 4096;
	if bpb == 0 {
		return None;
	}
	let usable = 64 - 64 % bpb;
	let blocks_per_word = usable / bpb;
	let linear = y * 256 + z * 16 + x;
	let word = *states.data.get(linear / blocks_per_word)?;
	let slot = linear % blocks_per_word;

	let bits = bit::unpack(word);
	let start = 64 - (slot + 1) * bpb;
	Some(bit::pack(&bits[start..start + bpb]) as usize)
}

/// Decode the stored 9-bit values of a packed height map in storage
/// order. Entry 0 of a word sits in unpacked positions 55..64, entry 1
/// in 46..55, and so on toward the top; each word holds seven entries,
/// except the last which only carries four before running past column
/// 255 (37 * 7 = 259 slots for 256 columns).
pub fn heightmap_entries(heights: &[i64]) -> Vec<u16> {
	let mut values = Vec::with_capacity(heights.len() * 7);
	for (word_index, word) in heights.iter().enumerate() {
		let bits = bit::unpack(*word);
		let entries = if word_index == heights.len() - 1 { 4 } else { 7 };
		for slot in 0..entries {
			let hi = 55 - slot * 9;
			values.push(bit::pack(&bits[hi..hi + 9]) as u16);
		}
	}
	values
}

/// Draw the chunk orthogonally (top-down) into a 16x16 RGBA tile.
///
/// The 256 columns are walked in storage order, with a cursor that
/// advances `cx` per height-map entry and rolls to the next `cz` row
/// at 16. Columns that cannot be resolved stay transparent, so
/// compositing them later is a no-op.
pub fn render_tile(chunk: &ChunkNbt, palette: &BlockPalette) -> RgbaImage {
	let mut tile = RgbaImage::new(TILE_SIZE, TILE_SIZE);
	let Some(heights) = chunk.heightmaps.motion_blocking.as_ref() else {
		return tile;
	};

	let mut sections: [Option<&Section>; SECTION_COUNT] = [None; SECTION_COUNT];
	for section in &chunk.sections {
		let index = section.y + SECTION_OFFSET;
		if (0..SECTION_COUNT as i32).contains(&index) {
			sections[index as usize] = Some(section);
		}
	}

	let mut cx: u32 = 0;
	let mut cz: u32 = 0;
	for stored in heightmap_entries(heights) {
		if cx == TILE_SIZE {
			cx = 0;
			cz += 1;
		}
		if cz == TILE_SIZE {
			// Only reachable on a malformed height map that holds
			// more than 256 columns worth of entries.
			return tile;
		}

		if stored == 0 {
			// No motion-blocking block in this column.
			cx += 1;
			continue;
		}
		let abs_y = stored as i64 - HEIGHT_OFFSET;
		let section_y = abs_y.div_euclid(16) as i32;
		let local_y = abs_y.rem_euclid(16) as usize;

		let slot_index = section_y + SECTION_OFFSET;
		let section = if (0..SECTION_COUNT as i32).contains(&slot_index) {
			sections[slot_index as usize]
		} else {
			None
		};
		let Some(states) = section.and_then(|section| section.block_states.as_ref()) else {
			cx += 1;
			continue;
		};
		let Some(block) = palette_index(states, cx as usize, local_y, cz as usize) else {
			cx += 1;
			continue;
		};
		if let Some(entry) = states.palette.get(block) {
			tile.put_pixel(cx, cz, palette.color(&entry.name));
		}
		cx += 1;
	}
	tile
}
