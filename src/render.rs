pub mod map;
pub mod palette;
pub mod tile;

pub use map::{
	render_map,
	MapCanvas,
	RenderedTile,
};
pub use palette::BlockPalette;
pub use tile::render_tile;
