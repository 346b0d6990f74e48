use std::io::{
	Read,
	Seek, SeekFrom,
};

/// For types that can be read from a reader.
pub trait Readable: Sized {
	fn read_from<R: Read>(reader: &mut R) -> Result<Self, crate::MapError>;
}

/// For types that represent a seekable file offset.
pub trait Seekable: Sized {
	fn seek_to<S: Seek>(&self, seeker: &mut S) -> Result<u64, crate::MapError> {
		Ok(seeker.seek(self.seeker())?)
	}

	fn seeker(&self) -> SeekFrom;
}

pub trait ReadExt: Read + Sized {
	fn read_value<T: Readable>(&mut self) -> Result<T, crate::MapError>;
}

impl<R: Read + Sized> ReadExt for R {
	fn read_value<T: Readable>(&mut self) -> Result<T, crate::MapError> {
		T::read_from(self)
	}
}

pub trait SeekExt: Seek + Sized {
	fn seek_to<S: Seekable>(&mut self, seek_offset: &S) -> Result<u64, crate::MapError>;

	fn seek_return(&mut self) -> Result<SeekFrom, crate::MapError>;
}

impl<T: Seek + Sized> SeekExt for T {
	fn seek_to<S: Seekable>(&mut self, seek_offset: &S) -> Result<u64, crate::MapError> {
		seek_offset.seek_to(self)
	}

	fn seek_return(&mut self) -> Result<SeekFrom, crate::MapError> {
		Ok(SeekFrom::Start(self.stream_position()?))
	}
}
