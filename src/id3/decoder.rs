use super::content::decode_content;
use super::frame::{read_frame_header, validate_frames, FrameHeaderResult};
use super::header::{read_id3v2_header, skip_extended_header};
use super::{remove_unsynchronisation, Id3v2Version};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::types::entry::{MetadataList, TagEntry};

use std::borrow::Cow;

/// Decides whether a frame should be decoded, given the tag version and frame ID
pub type FramePredicate<'a> = dyn Fn(Id3v2Version, &str) -> bool + Sync + 'a;

#[derive(Copy, Clone, Debug)]
pub(crate) struct FrameContext {
	pub version: Id3v2Version,
	pub synchsafe_sizes: bool,
	/// How many `CHAP`/`CTOC` frames enclose the frames being decoded
	pub depth: u8,
}

/// Decodes a complete ID3v2 tag into a [`MetadataList`]
///
/// Frames rejected by the predicate are skipped without being decoded.
#[derive(Default, Clone, Copy)]
pub struct Id3Decoder<'a> {
	predicate: Option<&'a FramePredicate<'a>>,
}

impl<'a> Id3Decoder<'a> {
	/// A decoder that keeps every frame
	pub fn new() -> Self {
		Self { predicate: None }
	}

	/// A decoder that only keeps frames accepted by `predicate`
	pub fn with_predicate(predicate: &'a FramePredicate<'a>) -> Self {
		Self {
			predicate: Some(predicate),
		}
	}

	/// Decode `data`, which must start with the tag header
	///
	/// # Errors
	///
	/// * The header is invalid (see [`Id3v2Header`](crate::id3::Id3v2Header))
	/// * `data` is shorter than the header declares
	pub fn decode(&self, data: &[u8]) -> Result<MetadataList> {
		let mut cursor = ByteCursor::new(data);
		let header = read_id3v2_header(&mut cursor)?;
		let frames_size = skip_extended_header(&mut cursor, &header)?;

		let mut frames = Cow::Borrowed(&cursor.remaining_slice()[..frames_size]);
		if header.flags.unsynchronisation {
			frames = Cow::Owned(remove_unsynchronisation(&frames));
		}

		let mut synchsafe_sizes = true;
		if header.version == Id3v2Version::V4 && !validate_frames(&frames, header.version, true) {
			if validate_frames(&frames, header.version, false) {
				debug!("ID3v2.4 frame sizes are not synchsafe, reading them as plain integers");
				synchsafe_sizes = false;
			} else {
				warn!("Unable to validate ID3v2.4 frames, skipping tag");
				return Ok(MetadataList::default());
			}
		}

		let context = FrameContext {
			version: header.version,
			synchsafe_sizes,
			depth: 0,
		};

		Ok(MetadataList::new(self.decode_frames(&frames, context)?))
	}

	/// Decode frames until the data, or the frames, run out
	pub(crate) fn decode_frames(&self, data: &[u8], context: FrameContext) -> Result<Vec<TagEntry>> {
		let mut cursor = ByteCursor::new(data);
		let mut entries = Vec::new();

		loop {
			let header =
				match read_frame_header(&mut cursor, context.version, context.synchsafe_sizes)? {
					FrameHeaderResult::Frame(header) => header,
					FrameHeaderResult::Padding | FrameHeaderResult::End => break,
				};

			if header.size > cursor.remaining() {
				warn!("Frame size exceeds remaining tag data");
				break;
			}

			let payload = cursor.read_bytes(header.size)?;

			if let Some(predicate) = self.predicate {
				if !predicate(context.version, &header.id) {
					continue;
				}
			}

			if header.flags.compression || header.flags.encryption {
				debug!("Skipping unsupported compressed or encrypted frame: {}", header.id);
				continue;
			}

			let mut content = payload;
			if header.flags.grouping_identity {
				content = content.get(1..).unwrap_or_default();
			}
			if header.flags.data_length_indicator {
				content = content.get(4..).unwrap_or_default();
			}

			let content = if header.flags.unsynchronisation {
				Cow::Owned(remove_unsynchronisation(content))
			} else {
				Cow::Borrowed(content)
			};

			match decode_content(self, context, &header.id, &content) {
				Ok(Some(entry)) => entries.push(entry),
				Ok(None) => {},
				Err(err) => debug!("Failed to decode frame {}: {err}", header.id),
			}
		}

		Ok(entries)
	}
}
