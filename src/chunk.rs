use std::collections::HashMap;

use byteorder::{
	BigEndian,
	ReadBytesExt,
};

use crate::{
	MapError,
	MapResult,
	ioext::Readable,
	nbt::{
		DecodeNbt,
		Map,
		mismatch,
		io::read_named_tag,
		tag::{
			ListTag,
			Tag,
		},
	},
	region::compression::CompressionScheme,
};

/// Pulls a named tag out of a compound and decodes it into a typed
/// value. The `Option` form tolerates a missing tag; the plain form
/// fails with [MapError::NotFoundInCompound].
macro_rules! map_decoder {
	($map:expr; $name:literal -> Option<$type:ty>) => {
		match $map.remove($name) {
			Some(tag) => Some(<$type>::decode_nbt(tag)?),
			None => None,
		}
	};
	($map:expr; $name:literal -> $type:ty) => {
		<$type>::decode_nbt(
			$map.remove($name)
				.ok_or(MapError::NotFoundInCompound($name.to_owned()))?
		)?
	};
}

/// One chunk slot fetched out of a region file: the raw slot bytes,
/// the declared payload length and compression scheme, and the decoded
/// structure.
#[derive(Debug, Clone)]
pub struct Chunk {
	raw: Vec<u8>,
	/// The declared payload length in bytes. It excludes the length
	/// field itself but includes the compression byte.
	pub length: u32,
	pub scheme: CompressionScheme,
	pub nbt: ChunkNbt,
}

impl Chunk {
	/// Decode a chunk from the raw bytes of its sector range.
	/// The first four bytes are the big-endian payload length, the
	/// fifth selects the compression scheme, and the remainder is the
	/// compressed NBT stream, framed to `length - 1` bytes.
	pub fn from_raw(raw: Vec<u8>) -> MapResult<Chunk> {
		let mut header = raw.as_slice();
		let length = header.read_u32::<BigEndian>()?;
		let scheme = CompressionScheme::read_from(&mut header)?;
		let compressed_len = (length as usize).saturating_sub(1);
		let end = raw.len().min(5 + compressed_len);
		let payload = scheme.decompress(&raw[5..end])?;
		let (_, tag) = read_named_tag(&mut payload.as_slice())?;
		let nbt = ChunkNbt::decode_nbt(tag)?;
		Ok(Chunk {
			raw,
			length,
			scheme,
			nbt,
		})
	}

	/// The raw bytes of the whole chunk slot, header included.
	pub fn raw(&self) -> &[u8] {
		&self.raw
	}
}

/// The decoded structure of one chunk payload.
/// The renderer consumes `x_pos`, `z_pos`, `sections`, and the
/// motion-blocking height map; the remaining documented fields are
/// decoded and retained, and anything else ends up in `rest`.
#[derive(Debug, Clone, Default)]
pub struct ChunkNbt {
	pub data_version: Option<i32>,
	/// Global chunk coordinates.
	pub x_pos: i32,
	pub z_pos: i32,
	pub status: Option<String>,
	pub is_light_on: Option<i8>,
	pub last_update: Option<i64>,
	pub inhabited_time: Option<i64>,
	pub sections: Vec<Section>,
	pub heightmaps: Heightmaps,
	pub structures: Option<Map>,
	/// Whatever the format carries that this model does not name.
	pub rest: Map,
}

impl ChunkNbt {
	/// Find the section with the given section Y. Y values are unique
	/// within a chunk, spanning -4..20 in this format.
	pub fn section_at(&self, section_y: i32) -> Option<&Section> {
		self.sections.iter().find(|section| section.y == section_y)
	}
}

impl DecodeNbt for ChunkNbt {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		let mut map = match tag {
			Tag::Compound(map) => map,
			other => return mismatch("Compound", &other),
		};
		Ok(Self {
			data_version: map_decoder!(map; "DataVersion" -> Option<i32>),
			x_pos: map_decoder!(map; "xPos" -> i32),
			z_pos: map_decoder!(map; "zPos" -> i32),
			status: map_decoder!(map; "Status" -> Option<String>),
			is_light_on: map_decoder!(map; "isLightOn" -> Option<i8>),
			last_update: map_decoder!(map; "LastUpdate" -> Option<i64>),
			inhabited_time: map_decoder!(map; "InhabitedTime" -> Option<i64>),
			sections: map_decoder!(map; "sections" -> Option<Vec<Section>>).unwrap_or_default(),
			heightmaps: map_decoder!(map; "Heightmaps" -> Option<Heightmaps>).unwrap_or_default(),
			structures: map_decoder!(map; "structures" -> Option<Map>),
			rest: map,
		})
	}
}

/// The packed height maps the game keeps per chunk. Each is 37 signed
/// longs holding seven 9-bit entries apiece; a stored value is the
/// column's world Y plus 65.
#[derive(Debug, Clone, Default)]
pub struct Heightmaps {
	pub motion_blocking: Option<Vec<i64>>,
	pub motion_blocking_no_leaves: Option<Vec<i64>>,
	pub ocean_floor: Option<Vec<i64>>,
	pub ocean_floor_wg: Option<Vec<i64>>,
	pub world_surface: Option<Vec<i64>>,
	pub world_surface_wg: Option<Vec<i64>>,
}

impl DecodeNbt for Heightmaps {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		let mut map = match tag {
			Tag::Compound(map) => map,
			other => return mismatch("Compound", &other),
		};
		Ok(Self {
			motion_blocking: map_decoder!(map; "MOTION_BLOCKING" -> Option<Vec<i64>>),
			motion_blocking_no_leaves: map_decoder!(map; "MOTION_BLOCKING_NO_LEAVES" -> Option<Vec<i64>>),
			ocean_floor: map_decoder!(map; "OCEAN_FLOOR" -> Option<Vec<i64>>),
			ocean_floor_wg: map_decoder!(map; "OCEAN_FLOOR_WG" -> Option<Vec<i64>>),
			world_surface: map_decoder!(map; "WORLD_SURFACE" -> Option<Vec<i64>>),
			world_surface_wg: map_decoder!(map; "WORLD_SURFACE_WG" -> Option<Vec<i64>>),
		})
	}
}

/// One 16x16x16 sub-chunk.
#[derive(Debug, Clone)]
pub struct Section {
	/// Signed section index, -4..20 in this format.
	pub y: i32,
	pub block_states: Option<BlockStates>,
	pub biomes: Option<Biomes>,
	pub block_light: Option<Vec<i8>>,
	pub sky_light: Option<Vec<i8>>,
}

impl DecodeNbt for Vec<Section> {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::List(ListTag::Compound(maps)) => {
				maps.into_iter().map(Section::from_map).collect()
			}
			Tag::List(ListTag::Empty) => Ok(Vec::new()),
			other => mismatch("Compound List", &other),
		}
	}
}

impl Section {
	fn from_map(mut map: Map) -> MapResult<Self> {
		Ok(Self {
			y: map_decoder!(map; "Y" -> i32),
			block_states: map_decoder!(map; "block_states" -> Option<BlockStates>),
			biomes: map_decoder!(map; "biomes" -> Option<Biomes>),
			block_light: map_decoder!(map; "BlockLight" -> Option<Vec<i8>>),
			sky_light: map_decoder!(map; "SkyLight" -> Option<Vec<i8>>),
		})
	}
}

/// The paletted block container of a section. `data` may be empty when
/// the section is uniformly a single palette entry.
#[derive(Debug, Clone, Default)]
pub struct BlockStates {
	pub palette: Vec<PaletteEntry>,
	pub data: Vec<i64>,
}

impl DecodeNbt for BlockStates {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		let mut map = match tag {
			Tag::Compound(map) => map,
			other => return mismatch("Compound", &other),
		};
		let palette = map_decoder!(map; "palette" -> Option<Vec<Map>>)
			.unwrap_or_default()
			.into_iter()
			.map(PaletteEntry::from_map)
			.collect::<MapResult<Vec<PaletteEntry>>>()?;
		Ok(Self {
			palette,
			data: map_decoder!(map; "data" -> Option<Vec<i64>>).unwrap_or_default(),
		})
	}
}

/// One palette record: the block name keys the color palette, and the
/// properties ride along undecoded by the renderer.
#[derive(Debug, Clone)]
pub struct PaletteEntry {
	pub name: String,
	pub properties: Option<HashMap<String, String>>,
}

impl PaletteEntry {
	fn from_map(mut map: Map) -> MapResult<Self> {
		Ok(Self {
			name: map_decoder!(map; "Name" -> String),
			properties: map_decoder!(map; "Properties" -> Option<HashMap<String, String>>),
		})
	}
}

/// The biome palette of a section. Decoded and retained; the renderer
/// does not consume it.
#[derive(Debug, Clone, Default)]
pub struct Biomes {
	pub palette: Vec<String>,
	pub data: Option<Vec<i64>>,
}

impl DecodeNbt for Biomes {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		let mut map = match tag {
			Tag::Compound(map) => map,
			other => return mismatch("Compound", &other),
		};
		Ok(Self {
			palette: map_decoder!(map; "palette" -> Option<Vec<String>>).unwrap_or_default(),
			data: map_decoder!(map; "data" -> Option<Vec<i64>>),
		})
	}
}
