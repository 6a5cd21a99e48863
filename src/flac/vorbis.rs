use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::types::entry::{TagEntry, VorbisComment};
use crate::types::picture::Picture;

const PICTURE_KEY: &str = "METADATA_BLOCK_PICTURE";

/// A decoded VORBIS_COMMENT block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VorbisComments {
	/// The encoder's vendor string
	pub vendor: String,
	/// `KEY=value` comments, with `METADATA_BLOCK_PICTURE` comments decoded into pictures
	pub entries: Vec<TagEntry>,
}

/// Decode a VORBIS_COMMENT block (without framing bit)
///
/// Comments without a `=` and undecodable pictures are skipped. A length pointing past the end
/// of the block ends the list, keeping the comments read so far.
///
/// # Errors
///
/// The vendor string or comment count is truncated
pub fn read_comments(data: &[u8], read_pictures: bool) -> Result<VorbisComments> {
	let mut cursor = ByteCursor::new(data);

	let vendor_len = cursor.read_u32_le()? as usize;
	let vendor = String::from_utf8_lossy(cursor.read_bytes(vendor_len)?).into_owned();

	let comment_count = cursor.read_u32_le()?;
	let mut entries = Vec::new();

	for _ in 0..comment_count {
		let comment = match cursor
			.read_u32_le()
			.and_then(|len| cursor.read_bytes(len as usize))
		{
			Ok(comment) => String::from_utf8_lossy(comment),
			Err(err) => {
				warn!("Vorbis comment list ended early: {err}");
				break;
			},
		};

		let Some((key, value)) = comment.split_once('=') else {
			warn!("Skipping Vorbis comment without a separator: {comment}");
			continue;
		};

		if key.eq_ignore_ascii_case(PICTURE_KEY) {
			if !read_pictures {
				continue;
			}

			match Picture::from_flac_base64(value) {
				Ok(picture) => entries.push(TagEntry::Picture(picture)),
				Err(err) => debug!("Skipping invalid {PICTURE_KEY}: {err}"),
			}

			continue;
		}

		entries.push(TagEntry::VorbisComment(VorbisComment::new(key, value)));
	}

	Ok(VorbisComments { vendor, entries })
}
