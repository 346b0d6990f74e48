use std::{
	fmt::Debug,
	io::{
		Read,
		Seek, SeekFrom,
	},
	ops::Index,
};

use crate::{
	MapError,
	MapResult,
	ioext::Readable,
};

use super::{
	coord::RegionCoord,
	sector::LocationEntry,
	timestamp::Timestamp,
	TABLE_ENTRY_COUNT,
	TABLE_SIZE,
};

/// Defines the offset in the file where a type's table begins, and how
/// one entry of that type is built from its four on-disk bytes.
/// This trait is meant to be implemented for [LocationEntry] and
/// [Timestamp].
pub trait RegionTableItem: Sized {
	/// The offset in the file that this type's table begins.
	const OFFSET: u64;

	/// Build one entry from its four table bytes.
	fn from_be_bytes(bytes: [u8; 4]) -> Self;
}

impl RegionTableItem for LocationEntry {
	// The location table is the first table in the file.
	const OFFSET: u64 = 0;

	fn from_be_bytes(bytes: [u8; 4]) -> Self {
		LocationEntry::from_be_bytes(bytes)
	}
}

impl RegionTableItem for Timestamp {
	// The timestamp table comes directly after the location table.
	const OFFSET: u64 = 4096;

	fn from_be_bytes(bytes: [u8; 4]) -> Self {
		Timestamp::from_be_bytes(bytes)
	}
}

/// A table of 1024 elements that contain information related to
/// a chunk within a region file.
#[derive(Debug, Clone)]
pub struct RegionTable<T: RegionTableItem>(Box<[T; TABLE_ENTRY_COUNT]>);

/// A table of 1024 [LocationEntry] elements for each potential chunk in
/// a 32x32 chunk region file.
pub type LocationTable = RegionTable<LocationEntry>;

/// A table of 1024 [Timestamp] elements for each potential chunk in a
/// 32x32 chunk region file.
pub type TimestampTable = RegionTable<Timestamp>;

impl<T: RegionTableItem> RegionTable<T> {
	pub const OFFSET: u64 = T::OFFSET;

	/// Returns a [SeekFrom] value that will seek to the beginning of
	/// the table.
	pub const fn seeker() -> SeekFrom {
		SeekFrom::Start(Self::OFFSET)
	}

	/// Returns an iterator of the elements in the table.
	pub fn iter(&self) -> std::slice::Iter<T> {
		self.0.iter()
	}
}

impl<T: RegionTableItem + Debug> RegionTable<T> {
	/// Seek to this table's fixed offset and read it from there.
	pub fn read_at<R: Read + Seek>(reader: &mut R) -> MapResult<Self> {
		reader.seek(Self::seeker())?;
		Self::read_from(reader)
	}
}

impl<T: RegionTableItem> IntoIterator for RegionTable<T> {
	type Item = T;
	type IntoIter = std::array::IntoIter<T, TABLE_ENTRY_COUNT>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<T: Default + Copy + RegionTableItem> Default for RegionTable<T> {
	fn default() -> Self {
		Self(Box::new([T::default(); TABLE_ENTRY_COUNT]))
	}
}

impl<C: Into<RegionCoord>, T: RegionTableItem> Index<C> for RegionTable<T> {
	type Output = T;

	fn index(&self, index: C) -> &Self::Output {
		let coord: RegionCoord = index.into();
		&self.0[coord.index()]
	}
}

impl<T: RegionTableItem + Debug> Readable for RegionTable<T> {
	/// Reads exactly 4096 bytes and subdivides them into 1024 entries,
	/// in order. A short read fails with [MapError::TruncatedHeader].
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		let mut buf = [0u8; TABLE_SIZE];
		reader.read_exact(&mut buf).map_err(|err| match err.kind() {
			std::io::ErrorKind::UnexpectedEof => MapError::TruncatedHeader,
			_ => MapError::IoError(err),
		})?;
		let table: Box<[T; TABLE_ENTRY_COUNT]> = buf
			.chunks_exact(4)
			.map(|entry| T::from_be_bytes(entry.try_into().unwrap()))
			.collect::<Box<[T]>>()
			.try_into()
			.unwrap();
		Ok(Self(table))
	}
}

/// The header at the beginning of every region file.
/// It contains 1024 [LocationEntry] elements and 1024 [Timestamp]
/// elements. The two tables are index-aligned: `timestamps[i]`
/// describes the chunk at `locations[i]`.
#[derive(Debug, Clone, Default)]
pub struct RegionHeader {
	/// The location table, containing information about where chunk
	/// slots exist in the file.
	pub locations: LocationTable,
	/// The timestamp table, which tells the last modification time for
	/// the chunk.
	pub timestamps: TimestampTable,
}

impl Readable for RegionHeader {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		Ok(Self {
			locations: LocationTable::read_from(reader)?,
			timestamps: TimestampTable::read_from(reader)?,
		})
	}
}
