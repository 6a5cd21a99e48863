use crate::cursor::ByteCursor;
use crate::error::{MetaError, Result};
use crate::id3::TextEncoding;
use crate::types::picture::{Picture, PictureType};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

impl Picture {
	/// Get a [`Picture`] from a FLAC PICTURE block
	///
	/// # Errors
	///
	/// A length field points past the end of `bytes`
	pub fn from_flac_bytes(bytes: &[u8]) -> Result<Self> {
		let mut cursor = ByteCursor::new(bytes);

		let pic_type = PictureType::from_u32(cursor.read_u32()?);

		let mime_len = cursor.read_u32()? as usize;
		let mime_type = cursor
			.read_fixed_string(mime_len, TextEncoding::Latin1)?
			.to_ascii_lowercase();

		let description_len = cursor.read_u32()? as usize;
		let description = cursor.read_fixed_string(description_len, TextEncoding::UTF8)?;

		let width = cursor.read_u32()?;
		let height = cursor.read_u32()?;
		let color_depth = cursor.read_u32()?;
		let num_colors = cursor.read_u32()?;

		let data_len = cursor.read_u32()? as usize;
		let data = cursor.read_bytes(data_len)?.to_vec();

		Ok(Self {
			pic_type,
			mime_type,
			description,
			width,
			height,
			color_depth,
			num_colors,
			data,
		})
	}

	/// Get a [`Picture`] from a base64 encoded `METADATA_BLOCK_PICTURE` comment
	///
	/// # Errors
	///
	/// * `value` is not valid base64
	/// * See [`Picture::from_flac_bytes`]
	pub fn from_flac_base64(value: &str) -> Result<Self> {
		let bytes = STANDARD
			.decode(value.trim())
			.map_err(|_| MetaError::MalformedContainer("Invalid base64 picture"))?;

		Self::from_flac_bytes(&bytes)
	}
}
