use std::{
	fs::File,
	io::{
		BufReader,
		Read,
		Seek,
	},
	path::Path,
};

use crate::{
	MapError,
	MapResult,
	chunk::Chunk,
	ioext::{
		ReadExt,
		SeekExt,
	},
};

use super::{
	coord::RegionCoord,
	header::{
		LocationTable,
		RegionHeader,
		TimestampTable,
	},
	sector::LocationEntry,
	timestamp::Timestamp,
	SECTOR_SIZE,
};

/// An abstraction for reading region files.
/// You open a region file, pass the reader over to this struct, then
/// you read the header tables and the chunks their entries point at.
/// When you're done reading, you can call `.finish()` to take the
/// reader back.
pub struct RegionReader<R: Read + Seek> {
	pub(crate) reader: R,
}

impl RegionReader<BufReader<File>> {
	/// Opens a buffered file as a RegionReader.
	pub fn open(path: impl AsRef<Path>) -> MapResult<RegionReader<BufReader<File>>> {
		let file = File::open(path)?;
		Ok(RegionReader::new(BufReader::with_capacity(SECTOR_SIZE as usize * 2, file)))
	}
}

impl<R: Read + Seek> RegionReader<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
		}
	}

	/// Read both header tables from the region file.
	pub fn read_header(&mut self) -> MapResult<RegionHeader> {
		Ok(RegionHeader {
			locations: LocationTable::read_at(&mut self.reader)?,
			timestamps: TimestampTable::read_at(&mut self.reader)?,
		})
	}

	/// Read both header tables, degrading a failed table to its empty
	/// default so the other remains usable. Callers already tolerate
	/// sentinel entries, so a degraded region renders as missing chunks
	/// instead of aborting its worker.
	pub fn load_header(&mut self) -> RegionHeader {
		let locations = match LocationTable::read_at(&mut self.reader) {
			Ok(table) => table,
			Err(err) => {
				log::warn!("failed to read location table: {err}");
				LocationTable::default()
			}
		};
		let timestamps = match TimestampTable::read_at(&mut self.reader) {
			Ok(table) => table,
			Err(err) => {
				log::warn!("failed to read timestamp table: {err}");
				TimestampTable::default()
			}
		};
		RegionHeader {
			locations,
			timestamps,
		}
	}

	/// Read a single [LocationEntry] from the location table.
	/// This function preserves the position in the stream that it
	/// starts at: it seeks to the table to read the entry, then
	/// returns to where it was.
	pub fn read_location<C: Into<RegionCoord>>(&mut self, coord: C) -> MapResult<LocationEntry> {
		let coord: RegionCoord = coord.into();
		let return_offset = self.reader.seek_return()?;
		self.reader.seek(coord.location_table_offset())?;
		let entry = self.reader.read_value()?;
		self.reader.seek(return_offset)?;
		Ok(entry)
	}

	/// Read a single [Timestamp] from the timestamp table, preserving
	/// the stream position like [RegionReader::read_location].
	pub fn read_timestamp<C: Into<RegionCoord>>(&mut self, coord: C) -> MapResult<Timestamp> {
		let coord: RegionCoord = coord.into();
		let return_offset = self.reader.seek_return()?;
		self.reader.seek(coord.timestamp_table_offset())?;
		let timestamp = self.reader.read_value()?;
		self.reader.seek(return_offset)?;
		Ok(timestamp)
	}

	/// Fetch and decode the chunk that a location entry points at.
	/// The sentinel entry fails with [MapError::NotGenerated]; the full
	/// sector range is read and handed to the chunk decoder.
	pub fn read_chunk(&mut self, entry: LocationEntry) -> MapResult<Chunk> {
		if entry.is_empty() {
			return Err(MapError::NotGenerated);
		}
		self.reader.seek_to(&entry)?;
		let mut raw = vec![0u8; entry.size() as usize];
		self.reader.read_exact(&mut raw)?;
		Chunk::from_raw(raw)
	}

	/// Finish reading and return the contained reader.
	pub fn finish(self) -> R {
		self.reader
	}
}

impl<R: Read + Seek> Read for RegionReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		self.reader.read(buf)
	}
}

impl<R: Read + Seek> Seek for RegionReader<R> {
	fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
		self.reader.seek(pos)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::{Cursor, Write};
	use flate2::Compression;
	use flate2::write::ZlibEncoder;

	// A minimal chunk payload: a compound root carrying xPos and zPos.
	fn chunk_nbt(x: i32, z: i32) -> Vec<u8> {
		let mut out = vec![10, 0, 0]; // Compound, empty name
		out.extend_from_slice(&[3, 0, 4]);
		out.extend_from_slice(b"xPos");
		out.extend_from_slice(&x.to_be_bytes());
		out.extend_from_slice(&[3, 0, 4]);
		out.extend_from_slice(b"zPos");
		out.extend_from_slice(&z.to_be_bytes());
		out.push(0); // End
		out
	}

	fn region_with_slot(scheme: u8, declared_len: u32, payload: &[u8]) -> Vec<u8> {
		let sectors = ((5 + payload.len() + 4095) / 4096) as u8;
		let mut raw = vec![0u8; 8192];
		// Location entry 0: sector offset 2, sector count.
		raw[0..4].copy_from_slice(&[0, 0, 2, sectors]);
		raw.resize(8192 + sectors as usize * 4096, 0);
		raw[8192..8196].copy_from_slice(&declared_len.to_be_bytes());
		raw[8196] = scheme;
		raw[8197..8197 + payload.len()].copy_from_slice(payload);
		raw
	}

	#[test]
	fn empty_region_has_no_chunks() {
		let cursor = Cursor::new(vec![0u8; 8192]);
		let mut region = RegionReader::new(cursor);
		let header = region.read_header().unwrap();
		assert_eq!(header.locations.iter().count(), 1024);
		for entry in header.locations.clone().into_iter() {
			assert!(matches!(
				region.read_chunk(entry),
				Err(MapError::NotGenerated)
			));
		}
	}

	#[test]
	fn read_zlib_chunk() {
		let nbt = chunk_nbt(-3, 7);
		let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
		enc.write_all(&nbt).unwrap();
		let compressed = enc.finish().unwrap();
		let raw = region_with_slot(2, compressed.len() as u32 + 1, &compressed);
		let mut region = RegionReader::new(Cursor::new(raw));
		let header = region.read_header().unwrap();
		let chunk = region.read_chunk(header.locations[0usize]).unwrap();
		assert_eq!(chunk.nbt.x_pos, -3);
		assert_eq!(chunk.nbt.z_pos, 7);
	}

	#[test]
	fn read_uncompressed_chunk() {
		let nbt = chunk_nbt(1, 2);
		let raw = region_with_slot(0, nbt.len() as u32 + 1, &nbt);
		let mut region = RegionReader::new(Cursor::new(raw));
		let header = region.read_header().unwrap();
		let chunk = region.read_chunk(header.locations[0usize]).unwrap();
		assert_eq!(chunk.nbt.x_pos, 1);
		assert_eq!(chunk.nbt.z_pos, 2);
	}

	#[test]
	fn unknown_compression_byte_fails() {
		let nbt = chunk_nbt(0, 0);
		let raw = region_with_slot(3, nbt.len() as u32 + 1, &nbt);
		let mut region = RegionReader::new(Cursor::new(raw));
		let header = region.read_header().unwrap();
		let err = region.read_chunk(header.locations[0usize]).unwrap_err();
		assert!(matches!(err, MapError::InvalidCompressionScheme(3)));
	}

	#[test]
	fn truncated_payload_fails_decompression() {
		let nbt = chunk_nbt(0, 0);
		let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
		enc.write_all(&nbt).unwrap();
		let compressed = enc.finish().unwrap();
		// Declared length far beyond the sector capacity: the
		// decompressor runs out of input.
		let mut raw = region_with_slot(2, 123_456, &compressed[..compressed.len() / 2]);
		raw.truncate(8192 + 4096);
		let mut region = RegionReader::new(Cursor::new(raw));
		let header = region.read_header().unwrap();
		let err = region.read_chunk(header.locations[0usize]).unwrap_err();
		assert!(matches!(err, MapError::DecompressError(_)));
	}

	#[test]
	fn degraded_header_keeps_the_intact_table() {
		// Only the location table fits; the timestamp table is short.
		let mut raw = vec![0u8; 6000];
		raw[0..4].copy_from_slice(&[0, 0, 2, 1]);
		let mut region = RegionReader::new(Cursor::new(raw));
		let header = region.load_header();
		assert_eq!(header.locations[0usize].sector_offset(), 2);
		assert!(header.timestamps.iter().all(|ts| u32::from(*ts) == 0));
	}

	#[test]
	fn single_entry_reads_preserve_position() {
		let mut raw = vec![0u8; 8192];
		// Chunk (6, 2) is entry 70.
		raw[70 * 4..70 * 4 + 4].copy_from_slice(&[0, 0, 9, 1]);
		raw[4096 + 70 * 4..4096 + 70 * 4 + 4].copy_from_slice(&424_242u32.to_be_bytes());
		let mut region = RegionReader::new(Cursor::new(raw));
		region.seek(std::io::SeekFrom::Start(100)).unwrap();
		let entry = region.read_location((6u16, 2u16)).unwrap();
		assert_eq!(entry.sector_offset(), 9);
		assert_eq!(entry.sector_count(), 1);
		let timestamp = region.read_timestamp((6u16, 2u16)).unwrap();
		assert_eq!(u32::from(timestamp), 424_242);
		// The cursor is back where it started.
		assert_eq!(region.finish().position(), 100);
	}

	#[test]
	fn open_reads_from_disk() {
		let nbt = chunk_nbt(5, -8);
		let raw = region_with_slot(0, nbt.len() as u32 + 1, &nbt);
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(&raw).unwrap();
		file.flush().unwrap();
		let mut region = RegionReader::open(file.path()).unwrap();
		let header = region.read_header().unwrap();
		let chunk = region.read_chunk(header.locations[0usize]).unwrap();
		assert_eq!(chunk.nbt.x_pos, 5);
		assert_eq!(chunk.nbt.z_pos, -8);
	}
}
