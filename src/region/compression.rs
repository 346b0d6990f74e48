use std::io::Read;

use flate2::read::{
	GzDecoder,
	ZlibDecoder,
};

use crate::{
	MapError, MapResult,
	ioext::Readable,
};

/// Compression scheme of a chunk payload, selected by the byte that
/// follows the payload length in the chunk slot.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionScheme {
	/// Payload is stored as-is.
	Uncompressed = 0,
	/// GZip compression is used.
	GZip = 1,
	/// ZLib compression is used.
	ZLib = 2,
}

impl CompressionScheme {
	pub fn from_u8(value: u8) -> MapResult<Self> {
		match value {
			0 => Ok(Self::Uncompressed),
			1 => Ok(Self::GZip),
			2 => Ok(Self::ZLib),
			unexpected => Err(MapError::InvalidCompressionScheme(unexpected)),
		}
	}

	/// Inflate a compressed payload into a fresh buffer.
	/// Read failures inside the decompressor (bad stream, early EOF)
	/// are reported as [MapError::DecompressError].
	pub fn decompress(self, payload: &[u8]) -> MapResult<Vec<u8>> {
		let mut out = Vec::new();
		match self {
			Self::Uncompressed => out.extend_from_slice(payload),
			Self::GZip => {
				GzDecoder::new(payload)
					.read_to_end(&mut out)
					.map_err(MapError::DecompressError)?;
			}
			Self::ZLib => {
				ZlibDecoder::new(payload)
					.read_to_end(&mut out)
					.map_err(MapError::DecompressError)?;
			}
		}
		Ok(out)
	}
}

impl Readable for CompressionScheme {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		let mut buf = [0u8; 1];
		reader.read_exact(&mut buf)?;
		Self::from_u8(buf[0])
	}
}
