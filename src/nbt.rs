// https://wiki.vg/NBT
// https://minecraft.fandom.com/wiki/NBT_format

pub mod tag;
pub mod io;

use crate::{
	MapError,
	MapResult,
};
use tag::{
	Tag,
	ListTag,
};

#[cfg(feature = "preserve_order")]
pub type Map = indexmap::IndexMap<std::string::String, tag::Tag>;
#[cfg(not(feature = "preserve_order"))]
pub type Map = std::collections::HashMap<std::string::String, tag::Tag>;

/// The table of NBT tag types: numeric id, variant title, payload type.
/// Pass the path of another macro to stamp out code for each tag type.
/// This single table generates [tag::TagID], [tag::Tag], [tag::ListTag],
/// and the reader implementations in [io].
macro_rules! tag_info_table {
	($macro:path) => {
		$macro! {
			1 Byte $crate::nbt::tag::Byte;
			2 Short $crate::nbt::tag::Short;
			3 Int $crate::nbt::tag::Int;
			4 Long $crate::nbt::tag::Long;
			5 Float $crate::nbt::tag::Float;
			6 Double $crate::nbt::tag::Double;
			7 ByteArray $crate::nbt::tag::ByteArray;
			8 String $crate::nbt::tag::String;
			9 List $crate::nbt::tag::ListTag;
			10 Compound $crate::nbt::tag::Compound;
			11 IntArray $crate::nbt::tag::IntArray;
			12 LongArray $crate::nbt::tag::LongArray;
		}
	};
}
pub(crate) use tag_info_table;

/// For types that can be built from a decoded [Tag].
/// Integer targets accept any narrower integer tag. The format stores
/// section `Y` as a Byte while chunk `xPos` is an Int, so strict
/// per-width matching would reject real chunk data.
pub trait DecodeNbt: Sized {
	fn decode_nbt(tag: Tag) -> MapResult<Self>;
}

pub(crate) fn mismatch<T>(expected: &'static str, found: &Tag) -> MapResult<T> {
	Err(MapError::TagTypeMismatch {
		expected,
		found: found.title(),
	})
}

impl DecodeNbt for i8 {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::Byte(value) => Ok(value),
			other => mismatch("Byte", &other),
		}
	}
}

impl DecodeNbt for i16 {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::Byte(value) => Ok(value as i16),
			Tag::Short(value) => Ok(value),
			other => mismatch("Short", &other),
		}
	}
}

impl DecodeNbt for i32 {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::Byte(value) => Ok(value as i32),
			Tag::Short(value) => Ok(value as i32),
			Tag::Int(value) => Ok(value),
			other => mismatch("Int", &other),
		}
	}
}

impl DecodeNbt for i64 {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::Byte(value) => Ok(value as i64),
			Tag::Short(value) => Ok(value as i64),
			Tag::Int(value) => Ok(value as i64),
			Tag::Long(value) => Ok(value),
			other => mismatch("Long", &other),
		}
	}
}

impl DecodeNbt for f32 {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::Float(value) => Ok(value),
			other => mismatch("Float", &other),
		}
	}
}

impl DecodeNbt for f64 {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::Float(value) => Ok(value as f64),
			Tag::Double(value) => Ok(value),
			other => mismatch("Double", &other),
		}
	}
}

impl DecodeNbt for std::string::String {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::String(value) => Ok(value),
			other => mismatch("String", &other),
		}
	}
}

impl DecodeNbt for Vec<i8> {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::ByteArray(value) => Ok(value),
			other => mismatch("ByteArray", &other),
		}
	}
}

impl DecodeNbt for Vec<i32> {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::IntArray(value) => Ok(value),
			other => mismatch("IntArray", &other),
		}
	}
}

impl DecodeNbt for Vec<i64> {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::LongArray(value) => Ok(value),
			other => mismatch("LongArray", &other),
		}
	}
}

impl DecodeNbt for Map {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::Compound(value) => Ok(value),
			other => mismatch("Compound", &other),
		}
	}
}

impl DecodeNbt for ListTag {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::List(value) => Ok(value),
			other => mismatch("List", &other),
		}
	}
}

impl DecodeNbt for Vec<Map> {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::List(ListTag::Compound(value)) => Ok(value),
			Tag::List(ListTag::Empty) => Ok(Vec::new()),
			other => mismatch("Compound List", &other),
		}
	}
}

impl DecodeNbt for Vec<std::string::String> {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::List(ListTag::String(value)) => Ok(value),
			Tag::List(ListTag::Empty) => Ok(Vec::new()),
			other => mismatch("String List", &other),
		}
	}
}

impl DecodeNbt for std::collections::HashMap<std::string::String, std::string::String> {
	fn decode_nbt(tag: Tag) -> MapResult<Self> {
		match tag {
			Tag::Compound(map) => map
				.into_iter()
				.map(|(name, tag)| Ok((name, std::string::String::decode_nbt(tag)?)))
				.collect(),
			other => mismatch("Compound", &other),
		}
	}
}
