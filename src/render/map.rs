use std::{
	fs,
	io::{
		Read,
		Seek,
	},
	path::{
		Path,
		PathBuf,
	},
	sync::mpsc,
	thread,
};

use image::{
	imageops,
	RgbaImage,
};
use rayon::prelude::*;

use crate::{
	MapError,
	MapResult,
	region::RegionReader,
};

use super::{
	palette::BlockPalette,
	tile::{
		render_tile,
		TILE_SIZE,
	},
};

/// One region file covers 32x32 chunks, 512 pixels on a side.
const REGION_PIXELS: i64 = 32 * TILE_SIZE as i64;

/// A rendered chunk tile tagged with the global chunk coordinates the
/// compositor places it at.
#[derive(Debug)]
pub struct RenderedTile {
	pub tile: RgbaImage,
	pub x_pos: i32,
	pub z_pos: i32,
}

/// Collect the `.mca` files of a region directory.
pub fn region_paths(dir: impl AsRef<Path>) -> MapResult<Vec<PathBuf>> {
	let mut paths = Vec::new();
	for dir_entry in fs::read_dir(dir)? {
		let path = dir_entry?.path();
		if path.extension().map(|ext| ext == "mca").unwrap_or(false) {
			paths.push(path);
		}
	}
	paths.sort();
	Ok(paths)
}

/// Parse the region coordinates out of an `r.X.Z.mca` file name.
pub fn region_coords(path: &Path) -> Option<(i32, i32)> {
	let name = path.file_name()?.to_str()?;
	let mut parts = name.split('.');
	if parts.next() != Some("r") {
		return None;
	}
	let x = parts.next()?.parse().ok()?;
	let z = parts.next()?.parse().ok()?;
	if parts.next() != Some("mca") || parts.next().is_some() {
		return None;
	}
	Some((x, z))
}

/// Render every generated chunk of one region, sending the tiles into
/// the compositor's channel. Chunks are decoded sequentially since
/// they share the region's seek cursor. A chunk that fails to decode
/// is logged and skipped; it must not take the region down with it.
pub fn render_region<R: Read + Seek>(
	region: &mut RegionReader<R>,
	palette: &BlockPalette,
	sink: &mpsc::Sender<RenderedTile>,
) {
	let header = region.load_header();
	for entry in header.locations.iter() {
		let chunk = match region.read_chunk(*entry) {
			Ok(chunk) => chunk,
			Err(MapError::NotGenerated) => continue,
			Err(err) => {
				log::warn!("skipping chunk: {err}");
				continue;
			}
		};
		let tile = render_tile(&chunk.nbt, palette);
		let rendered = RenderedTile {
			tile,
			x_pos: chunk.nbt.x_pos,
			z_pos: chunk.nbt.z_pos,
		};
		if sink.send(rendered).is_err() {
			// The compositor is gone; no point rendering the rest.
			return;
		}
	}
}

/// The output canvas. Tiles keyed by distinct chunk coordinates own
/// disjoint 16x16 rectangles, so composition is order-independent.
/// Exactly one thread owns the canvas; workers reach it through a
/// channel of [RenderedTile]s.
pub struct MapCanvas {
	image: RgbaImage,
	origin_x: i64,
	origin_z: i64,
}

impl MapCanvas {
	/// Allocate a canvas covering the region rectangle
	/// `min..=max` in region coordinates.
	pub fn for_regions(min: (i32, i32), max: (i32, i32)) -> Self {
		let width = (max.0 - min.0 + 1) as u32 * REGION_PIXELS as u32;
		let height = (max.1 - min.1 + 1) as u32 * REGION_PIXELS as u32;
		Self {
			image: RgbaImage::new(width, height),
			origin_x: min.0 as i64 * REGION_PIXELS,
			origin_z: min.1 as i64 * REGION_PIXELS,
		}
	}

	/// Composite one tile onto the canvas with `over` semantics,
	/// translated by the chunk's global position.
	pub fn blit(&mut self, rendered: &RenderedTile) {
		let x = rendered.x_pos as i64 * TILE_SIZE as i64 - self.origin_x;
		let z = rendered.z_pos as i64 * TILE_SIZE as i64 - self.origin_z;
		imageops::overlay(&mut self.image, &rendered.tile, x, z);
	}

	pub fn into_image(self) -> RgbaImage {
		self.image
	}
}

/// Render a whole region directory into one canvas.
///
/// One rayon worker per region file; each worker owns its file handle
/// and decodes its chunks serially. Tiles drain through a channel into
/// the single compositor thread, so the canvas has exactly one writer.
/// A region whose file fails to open is logged and skipped.
pub fn render_map(dir: impl AsRef<Path>, palette: &BlockPalette) -> MapResult<RgbaImage> {
	let located: Vec<(PathBuf, (i32, i32))> = region_paths(&dir)?
		.into_iter()
		.filter_map(|path| match region_coords(&path) {
			Some(coords) => Some((path, coords)),
			None => {
				log::warn!("ignoring {}: not a region file name", path.display());
				None
			}
		})
		.collect();
	if located.is_empty() {
		return Err(MapError::NoRegionFiles(dir.as_ref().to_path_buf()));
	}

	let mut min = (i32::MAX, i32::MAX);
	let mut max = (i32::MIN, i32::MIN);
	for (_, (x, z)) in &located {
		min = (min.0.min(*x), min.1.min(*z));
		max = (max.0.max(*x), max.1.max(*z));
	}
	let canvas = MapCanvas::for_regions(min, max);

	let (sender, receiver) = mpsc::channel::<RenderedTile>();
	let compositor = thread::spawn(move || {
		let mut canvas = canvas;
		for rendered in receiver {
			canvas.blit(&rendered);
		}
		canvas.into_image()
	});

	located.into_par_iter().for_each_with(sender, |sender, (path, _)| {
		match RegionReader::open(&path) {
			Ok(mut region) => render_region(&mut region, palette, sender),
			Err(err) => log::error!("skipping region {}: {err}", path.display()),
		}
	});

	Ok(compositor.join().expect("compositor thread panicked"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chunk::{BlockStates, ChunkNbt, Heightmaps, PaletteEntry, Section};
	use image::Rgba;

	fn solid_chunk(x_pos: i32, z_pos: i32) -> ChunkNbt {
		// One section at index 0, every block palette entry 0, every
		// column's height at absY = 0.
		let mut heights = vec![0u64; 37];
		for column in 0..256usize {
			heights[column / 7] |= 65u64 << ((column % 7) * 9);
		}
		ChunkNbt {
			x_pos,
			z_pos,
			sections: vec![Section {
				y: 0,
				block_states: Some(BlockStates {
					palette: vec![PaletteEntry {
						name: "minecraft:stone".to_owned(),
						properties: None,
					}],
					data: vec![0; 256],
				}),
				biomes: None,
				block_light: None,
				sky_light: None,
			}],
			heightmaps: Heightmaps {
				motion_blocking: Some(heights.into_iter().map(|w| w as i64).collect()),
				..Heightmaps::default()
			},
			..ChunkNbt::default()
		}
	}

	fn stone_palette() -> BlockPalette {
		let mut palette = BlockPalette::new();
		palette.insert("minecraft:stone", Rgba([125, 125, 125, 255]));
		palette
	}

	#[test]
	fn region_file_names() {
		assert_eq!(region_coords(Path::new("r.0.0.mca")), Some((0, 0)));
		assert_eq!(region_coords(Path::new("/saves/region/r.-2.13.mca")), Some((-2, 13)));
		assert_eq!(region_coords(Path::new("r.0.mca")), None);
		assert_eq!(region_coords(Path::new("r.a.b.mca")), None);
		assert_eq!(region_coords(Path::new("poi.0.0.mca")), None);
	}

	#[test]
	fn tiles_land_at_their_chunk_positions() {
		let palette = stone_palette();
		let mut canvas = MapCanvas::for_regions((0, 0), (0, 0));
		for (x_pos, z_pos) in [(0, 0), (3, 1)] {
			let chunk = solid_chunk(x_pos, z_pos);
			canvas.blit(&RenderedTile {
				tile: render_tile(&chunk, &palette),
				x_pos,
				z_pos,
			});
		}
		let image = canvas.into_image();
		assert_eq!(image.dimensions(), (512, 512));
		let stone = Rgba([125, 125, 125, 255]);
		assert_eq!(*image.get_pixel(0, 0), stone);
		assert_eq!(*image.get_pixel(15, 15), stone);
		// Between the two tiles: untouched.
		assert_eq!(*image.get_pixel(16, 0), Rgba([0, 0, 0, 0]));
		// The (3, 1) tile's rectangle.
		assert_eq!(*image.get_pixel(3 * 16, 16), stone);
		assert_eq!(*image.get_pixel(3 * 16 + 15, 31), stone);
		assert_eq!(*image.get_pixel(3 * 16 + 16, 16), Rgba([0, 0, 0, 0]));
	}

	#[test]
	fn distinct_chunks_cover_disjoint_rectangles() {
		// Bounding boxes of tiles at distinct chunk coordinates can
		// never overlap on the canvas.
		let positions = [(0i64, 0i64), (1, 0), (0, 1), (31, 31)];
		for (i, a) in positions.iter().enumerate() {
			for b in positions.iter().skip(i + 1) {
				let ax = a.0 * 16;
				let az = a.1 * 16;
				let bx = b.0 * 16;
				let bz = b.1 * 16;
				let overlap_x = ax < bx + 16 && bx < ax + 16;
				let overlap_z = az < bz + 16 && bz < az + 16;
				assert!(!(overlap_x && overlap_z), "{a:?} vs {b:?}");
			}
		}
	}

	#[test]
	fn negative_region_coordinates_offset_the_origin() {
		let palette = stone_palette();
		let mut canvas = MapCanvas::for_regions((-1, -1), (0, 0));
		let chunk = solid_chunk(-1, -1);
		canvas.blit(&RenderedTile {
			tile: render_tile(&chunk, &palette),
			x_pos: -1,
			z_pos: -1,
		});
		let image = canvas.into_image();
		assert_eq!(image.dimensions(), (1024, 1024));
		// Chunk (-1, -1) sits at pixel (512 - 16, 512 - 16).
		assert_eq!(*image.get_pixel(512 - 16, 512 - 16), Rgba([125, 125, 125, 255]));
		assert_eq!(*image.get_pixel(512, 512), Rgba([0, 0, 0, 0]));
	}

	#[test]
	fn render_region_skips_bad_chunks() {
		use std::io::Cursor;
		// Entry 0: a valid uncompressed chunk. Entry 1: an unknown
		// compression byte. The good chunk must still come through.
		let mut nbt = vec![10, 0, 0];
		nbt.extend_from_slice(&[3, 0, 4]);
		nbt.extend_from_slice(b"xPos");
		nbt.extend_from_slice(&0i32.to_be_bytes());
		nbt.extend_from_slice(&[3, 0, 4]);
		nbt.extend_from_slice(b"zPos");
		nbt.extend_from_slice(&0i32.to_be_bytes());
		nbt.push(0);

		let mut raw = vec![0u8; 8192];
		raw[0..4].copy_from_slice(&[0, 0, 2, 1]);
		raw[4..8].copy_from_slice(&[0, 0, 3, 1]);
		raw.resize(8192 + 2 * 4096, 0);
		raw[8192..8196].copy_from_slice(&(nbt.len() as u32 + 1).to_be_bytes());
		raw[8196] = 0;
		raw[8197..8197 + nbt.len()].copy_from_slice(&nbt);
		raw[12288..12292].copy_from_slice(&10u32.to_be_bytes());
		raw[12292] = 3; // unknown compression

		let mut region = RegionReader::new(Cursor::new(raw));
		let (sender, receiver) = mpsc::channel();
		render_region(&mut region, &stone_palette(), &sender);
		drop(sender);
		let tiles: Vec<RenderedTile> = receiver.iter().collect();
		assert_eq!(tiles.len(), 1);
		assert_eq!((tiles[0].x_pos, tiles[0].z_pos), (0, 0));
	}

	#[test]
	fn render_map_end_to_end() {
		use std::io::Write;
		let dir = tempfile::tempdir().unwrap();

		let mut nbt = vec![10, 0, 0];
		nbt.extend_from_slice(&[3, 0, 4]);
		nbt.extend_from_slice(b"xPos");
		nbt.extend_from_slice(&1i32.to_be_bytes());
		nbt.extend_from_slice(&[3, 0, 4]);
		nbt.extend_from_slice(b"zPos");
		nbt.extend_from_slice(&0i32.to_be_bytes());
		nbt.push(0);

		let mut raw = vec![0u8; 8192];
		raw[0..4].copy_from_slice(&[0, 0, 2, 1]);
		raw.resize(8192 + 4096, 0);
		raw[8192..8196].copy_from_slice(&(nbt.len() as u32 + 1).to_be_bytes());
		raw[8196] = 0;
		raw[8197..8197 + nbt.len()].copy_from_slice(&nbt);

		let mut file = fs::File::create(dir.path().join("r.0.0.mca")).unwrap();
		file.write_all(&raw).unwrap();
		drop(file);
		// A stray file the scan must ignore.
		fs::write(dir.path().join("notes.txt"), b"not a region").unwrap();

		let image = render_map(dir.path(), &stone_palette()).unwrap();
		assert_eq!(image.dimensions(), (512, 512));
		// The chunk had no sections, so its tile is fully transparent.
		assert!(image.pixels().all(|pixel| pixel[3] == 0));
	}

	#[test]
	fn empty_directory_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = render_map(dir.path(), &stone_palette()).unwrap_err();
		assert!(matches!(err, MapError::NoRegionFiles(_)));
	}
}
