use std::io::Read;

use chrono::{
	DateTime,
	NaiveDateTime,
	TimeZone,
	Utc,
};

use crate::{
	MapResult,
	for_each_int_type,
	ioext::Readable,
};

/// A 32-bit Unix timestamp: the last-modified time of the chunk whose
/// location entry shares this entry's index.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Timestamp(u32);

impl Timestamp {
	/// Builds a timestamp from its four on-disk bytes.
	pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
		Self(u32::from_be_bytes(bytes))
	}

	pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
		DateTime::<Utc>::try_from(*self).ok()
	}
}

macro_rules! __timestamp_impls {
	($type:ty) => {
		impl From<$type> for Timestamp {
			fn from(value: $type) -> Self {
				Self(value as u32)
			}
		}

		impl From<Timestamp> for $type {
			fn from(value: Timestamp) -> Self {
				value.0 as $type
			}
		}
	};
}

for_each_int_type!(__timestamp_impls);

impl Readable for Timestamp {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		let mut buf = [0u8; 4];
		reader.read_exact(&mut buf)?;
		Ok(Self::from_be_bytes(buf))
	}
}

impl TryFrom<Timestamp> for DateTime<Utc> {
	type Error = ();

	fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
		let naive = NaiveDateTime::from_timestamp_opt(value.0 as i64, 0);
		if let Some(naive) = naive {
			Ok(Utc.from_utc_datetime(&naive))
		} else {
			Err(())
		}
	}
}
