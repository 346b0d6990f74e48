use std::path::PathBuf;

use thiserror::Error;

/// The master error type.
#[derive(Debug, Error)]
pub enum MapError {
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Region header is truncated.")]
	TruncatedHeader,
	#[error("Chunk has not been generated, yet.")]
	NotGenerated,
	#[error("Invalid Compression value: {0}")]
	InvalidCompressionScheme(u8),
	#[error("Failed to decompress chunk payload: {0}")]
	DecompressError(std::io::Error),
	#[error("Failed to convert to UTF-8 string.")]
	FromUtf8Error(#[from] std::string::FromUtf8Error),
	#[error("Unsupported Tag ID: {0}")]
	UnsupportedTagId(u8),
	#[error("Encountered the End Tag ID marker.")]
	EndTagMarker,
	#[error("Expected {expected} tag, found {found}.")]
	TagTypeMismatch {
		expected: &'static str,
		found: &'static str,
	},
	#[error("Tag was not found in Compound.\n\"{0}\"")]
	NotFoundInCompound(String),
	#[error("Failed to parse palette file: {0}")]
	PaletteParseError(#[from] toml::de::Error),
	#[error("Image error: {0}")]
	ImageError(#[from] image::ImageError),
	#[error("No region files found in {0}")]
	NoRegionFiles(PathBuf),
}

pub type MapResult<T> = Result<T, MapError>;
