use crate::{
	MapError,
	nbt::{
		Map,
		tag_info_table,
		tag::{
			Tag,
			TagID,
			ListTag,
		},
	},
};
use std::io::Read;

/// A trait for reading values from readers.
/// The NBT format demands that values are read in Big-Endian byteorder,
/// so each representable type carries its own reader implementation.
/// Although this trait is public, it is not intended for public API usage.
pub trait NbtRead: Sized {
	/// Attempt to read a value from a reader.
	fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError>;
}

/// Trait applied to all readers for NBT extensions.
pub trait ReadNbt: Read {
	/// Read NBT (anything that implements NbtRead).
	fn read_nbt<T: NbtRead>(&mut self) -> Result<T, MapError>;
}

impl<Reader: Read> ReadNbt for Reader {
	fn read_nbt<T: NbtRead>(&mut self) -> Result<T, MapError> {
		T::nbt_read(self)
	}
}

/// Blanket implementations for reading primitives (scalar types).
macro_rules! primitive_io {
	($($primitive:ident)+) => {
		$(
			impl NbtRead for $primitive {
				#[doc = "Attempts to read primitive from reader. This will read in Big-Endian byte-order."]
				fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError> {
					let mut buf = [0u8; std::mem::size_of::<$primitive>()];
					reader.read_exact(&mut buf)?;
					Ok(Self::from_be_bytes(buf))
				}
			}
		)+
	};
}

primitive_io![
	i8 u8
	i16 u16
	i32 u32 f32
	i64 u64 f64
];

/// Reads an exact number of bytes from a reader, returning them as a [Vec].
fn read_bytes<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>, MapError> {
	let mut buf: Vec<u8> = vec![0u8; length];
	reader.read_exact(&mut buf)?;
	Ok(buf)
}

/// Reads a certain number of elements from a reader.
fn read_array<R, T>(reader: &mut R, length: usize) -> Result<Vec<T>, MapError>
where
	R: Read,
	T: NbtRead,
{
	(0..length).map(|_| T::nbt_read(reader)).collect()
}

impl NbtRead for String {
	/// Read a String from a reader: a 16-bit unsigned big endian length,
	/// then that many bytes interpreted as utf-8.
	fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError> {
		let length = u16::nbt_read(reader)?;
		let strbytes = read_bytes(reader, length as usize)?;
		Ok(String::from_utf8(strbytes)?)
	}
}

impl NbtRead for Vec<i8> {
	/// Read a bytearray from a reader.
	fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError> {
		let length = u32::nbt_read(reader)?;
		let bytes = read_bytes(reader, length as usize)?;
		Ok(
			bytes.into_iter()
				.map(|x| x as i8)
				.collect()
		)
	}
}

impl NbtRead for Vec<i32> {
	fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError> {
		let length = u32::nbt_read(reader)?;
		read_array(reader, length as usize)
	}
}

impl NbtRead for Vec<i64> {
	fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError> {
		let length = u32::nbt_read(reader)?;
		read_array(reader, length as usize)
	}
}

impl NbtRead for TagID {
	fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError> {
		TagID::from_u8(u8::nbt_read(reader)?)
	}
}

macro_rules! tag_io {
	($($id:literal $title:ident $type:path;)+) => {
		#[doc = "
		This function is the bread and butter of deserialization of NBT data.
		It will first read a byte representing the [Tag] ID and verify it
		(it can't be 0, and must match one of the Tag IDs). It then reads the
		name of the tag, and then the tag itself, using the ID that was read
		to determine which [Tag] type to read. The root of a chunk payload is
		read with this function; typically it is a Compound tag (ID: 10).
		"]
		pub fn read_named_tag<R: Read>(reader: &mut R) -> Result<(String, Tag), MapError> {
			let id = TagID::nbt_read(reader)?;
			let name = String::nbt_read(reader)?;
			let tag = match id {
				$(
					TagID::$title => {
						Tag::$title(<$type>::nbt_read(reader)?)
					}
				)+
			};
			Ok((name, tag))
		}

		impl NbtRead for ListTag {
			#[doc = "Attempt to read a [ListTag] from a reader."]
			fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError> {
				let id = TagID::nbt_read(reader);
				match id {
					$(
						Ok(TagID::$title) => {
							let length = u32::nbt_read(reader)?;
							Ok(ListTag::$title(
								read_array(reader, length as usize)?
							))
						},
					)+
					Err(MapError::EndTagMarker) => {
						u32::nbt_read(reader)?;
						Ok(ListTag::Empty)
					},
					Err(err) => {
						Err(err)
					},
				}
			}
		}

		impl NbtRead for Map {
			#[doc = "Attempt to read a [Map] from a reader."]
			fn nbt_read<R: Read>(reader: &mut R) -> Result<Self, MapError> {
				// Reading goes like this:
				// Read TagID
				// if TagID is not End or Unsupported,
				//     Read string for name
				//     Read tag
				//     read next id
				//     repeat until id is End
				let mut map = Map::new();
				let mut id = TagID::nbt_read(reader);
				while !matches!(id, Err(MapError::EndTagMarker)) {
					let name = String::nbt_read(reader)?;
					let tag = match id {
						$(
							Ok(TagID::$title) => Tag::$title(<$type>::nbt_read(reader)?),
						)+
						Err(err) => return Err(err),
					};
					map.insert(name, tag);
					id = TagID::nbt_read(reader);
				}
				Ok(map)
			}
		}
	};
}

tag_info_table!(tag_io);

#[cfg(test)]
mod tests {
	use super::*;

	// Hand-encoded NBT payloads for exercising the reader. The writer
	// side intentionally does not exist in this crate, so tests encode
	// their fixtures byte by byte.
	fn named(id: u8, name: &str) -> Vec<u8> {
		let mut out = vec![id];
		out.extend_from_slice(&(name.len() as u16).to_be_bytes());
		out.extend_from_slice(name.as_bytes());
		out
	}

	#[test]
	fn read_simple_compound() {
		let mut payload = named(10, "root");
		payload.extend(named(3, "xPos"));
		payload.extend_from_slice(&7i32.to_be_bytes());
		payload.extend(named(8, "Status"));
		payload.extend_from_slice(&(4u16).to_be_bytes());
		payload.extend_from_slice(b"full");
		payload.push(0); // End
		let (name, tag) = read_named_tag(&mut payload.as_slice()).unwrap();
		assert_eq!(name, "root");
		let Tag::Compound(map) = tag else {
			panic!("expected compound root");
		};
		assert!(matches!(map.get("xPos"), Some(Tag::Int(7))));
		assert!(matches!(map.get("Status"), Some(Tag::String(s)) if s == "full"));
	}

	#[test]
	fn read_long_array() {
		let mut payload = named(12, "data");
		payload.extend_from_slice(&(2u32).to_be_bytes());
		payload.extend_from_slice(&(-1i64).to_be_bytes());
		payload.extend_from_slice(&(37i64).to_be_bytes());
		let (_, tag) = read_named_tag(&mut payload.as_slice()).unwrap();
		let Tag::LongArray(longs) = tag else {
			panic!("expected long array");
		};
		assert_eq!(longs, vec![-1, 37]);
	}

	#[test]
	fn read_compound_list() {
		let mut payload = named(9, "sections");
		payload.push(10); // element id: Compound
		payload.extend_from_slice(&(2u32).to_be_bytes());
		for y in [-4i8, 0] {
			payload.extend(named(1, "Y"));
			payload.push(y as u8);
			payload.push(0); // End
		}
		let (_, tag) = read_named_tag(&mut payload.as_slice()).unwrap();
		let Tag::List(ListTag::Compound(maps)) = tag else {
			panic!("expected compound list");
		};
		assert_eq!(maps.len(), 2);
		assert!(matches!(maps[0].get("Y"), Some(Tag::Byte(-4))));
	}

	#[test]
	fn empty_list_is_empty_variant() {
		let mut payload = named(9, "empty");
		payload.push(0); // element id: End
		payload.extend_from_slice(&(0u32).to_be_bytes());
		let (_, tag) = read_named_tag(&mut payload.as_slice()).unwrap();
		assert!(matches!(tag, Tag::List(ListTag::Empty)));
	}

	#[test]
	fn unsupported_tag_id_fails() {
		let payload = named(13, "bogus");
		let err = read_named_tag(&mut payload.as_slice()).unwrap_err();
		assert!(matches!(err, MapError::UnsupportedTagId(13)));
	}

	#[test]
	fn root_end_marker_fails() {
		let payload = [0u8];
		let err = read_named_tag(&mut payload.as_slice()).unwrap_err();
		assert!(matches!(err, MapError::EndTagMarker));
	}
}
