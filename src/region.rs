pub mod compression;
pub mod coord;
pub mod header;
pub mod reader;
pub mod sector;
pub mod timestamp;

pub use compression::CompressionScheme;
pub use coord::RegionCoord;
pub use header::{
	LocationTable,
	RegionHeader,
	RegionTable,
	TimestampTable,
};
pub use reader::RegionReader;
pub use sector::LocationEntry;
pub use timestamp::Timestamp;

/// The 4KiB alignment unit of a region file.
pub const SECTOR_SIZE: u64 = 4096;
/// Each of the two header tables is one sector long.
pub const TABLE_SIZE: usize = 4096;
/// Each header table holds one 4-byte entry per chunk of the 32x32 region.
pub const TABLE_ENTRY_COUNT: usize = 1024;
