use crate::{
	MapError,
	MapResult,
	nbt::{
		Map,
		tag_info_table,
	},
};

pub type Byte = i8;
pub type Short = i16;
pub type Int = i32;
pub type Long = i64;
pub type Float = f32;
pub type Double = f64;
pub type ByteArray = Vec<i8>;
pub type String = std::string::String; // Lol (for solidarity and isomorphism)
pub type List<T> = Vec<T>;
pub type Compound = Map;
pub type IntArray = Vec<i32>;
pub type LongArray = Vec<i64>;

macro_rules! tag_data {
	($($id:literal $title:ident $type:path;)+) => {
		/// The ID byte that introduces every tag in the binary stream.
		/// ID 0 is the End marker and is not representable here; reading
		/// it yields [MapError::EndTagMarker] instead.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		#[repr(u8)]
		pub enum TagID {
			$($title = $id,)+
		}

		impl TagID {
			/// The numeric value written to the stream for this tag type.
			pub fn value(self) -> u8 {
				self as u8
			}

			/// The tag type's name, matching the variant title.
			pub fn title(self) -> &'static str {
				match self {
					$(TagID::$title => stringify!($title),)+
				}
			}

			pub fn from_u8(id: u8) -> MapResult<TagID> {
				match id {
					0 => Err(MapError::EndTagMarker),
					$($id => Ok(TagID::$title),)+
					unsupported => Err(MapError::UnsupportedTagId(unsupported)),
				}
			}
		}

		/// A single decoded NBT tag of any payload type.
		#[derive(Debug, Clone)]
		pub enum Tag {
			$($title($type),)+
		}

		impl Tag {
			pub fn id(&self) -> TagID {
				match self {
					$(Tag::$title(_) => TagID::$title,)+
				}
			}

			pub fn title(&self) -> &'static str {
				self.id().title()
			}
		}

		/// A List tag holds a homogeneous sequence, so a decoded list is
		/// one vector of the element payload type rather than a vector
		/// of [Tag]. A zero-length list of element ID 0 is [ListTag::Empty].
		#[derive(Debug, Clone)]
		pub enum ListTag {
			Empty,
			$($title(Vec<$type>),)+
		}

		impl ListTag {
			pub fn len(&self) -> usize {
				match self {
					ListTag::Empty => 0,
					$(ListTag::$title(list) => list.len(),)+
				}
			}

			pub fn is_empty(&self) -> bool {
				self.len() == 0
			}
		}
	};
}

tag_info_table!(tag_data);
