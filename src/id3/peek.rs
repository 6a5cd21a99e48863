use super::decoder::Id3Decoder;
use super::header::is_id3_header;
use super::{unsynch_u32, ID3_HEADER_LEN};
use crate::error::Result;
use crate::source::ByteSource;
use crate::types::entry::MetadataList;

/// Reads the ID3v2 tags at the start of a [`ByteSource`]
///
/// Some writers prepend a new tag instead of replacing the old one, so any number of
/// consecutive tags may be present. Only the first is decoded.
pub struct Id3Peeker<'a> {
	decoder: Id3Decoder<'a>,
}

impl<'a> Id3Peeker<'a> {
	/// Create a peeker that decodes with `decoder`
	pub fn new(decoder: Id3Decoder<'a>) -> Self {
		Self { decoder }
	}

	/// Peek past every tag starting at the source's position
	///
	/// The peek position is left after the last tag, and the position is untouched, so the
	/// caller decides whether to consume the tags. Returns `None` when there is no tag, or when
	/// the first tag can't be decoded.
	///
	/// # Errors
	///
	/// * A tag header declares more bytes than the source holds
	/// * The source fails
	pub fn peek_id3_data(&self, source: &mut dyn ByteSource) -> Result<Option<MetadataList>> {
		source.reset_peek_position();

		let mut metadata = None;
		let mut peeked = 0_u64;
		let mut header = [0; ID3_HEADER_LEN];

		loop {
			let found = match source.peek_fully(&mut header, true) {
				Ok(peeked) => peeked && is_id3_header(&header),
				// Fewer bytes left than a header needs
				Err(err) if err.is_end_of_input() => false,
				Err(err) => return Err(err),
			};

			if !found {
				break;
			}

			let size = unsynch_u32(u32::from_be_bytes([
				header[6], header[7], header[8], header[9],
			]));
			let tag_len = ID3_HEADER_LEN + size as usize;

			if peeked == 0 {
				let mut tag = vec![0; tag_len];
				tag[..ID3_HEADER_LEN].copy_from_slice(&header);
				source.peek_fully(&mut tag[ID3_HEADER_LEN..], false)?;

				metadata = match self.decoder.decode(&tag) {
					Ok(list) => Some(list),
					Err(err) => {
						warn!("Unable to decode ID3v2 tag: {err}");
						None
					},
				};
			} else {
				debug!("Skipping additional ID3v2 tag at {}", source.position() + peeked);
				source.advance_peek_position(u64::from(size), false)?;
			}

			peeked += tag_len as u64;
		}

		source.reset_peek_position();
		source.advance_peek_position(peeked, true)?;

		Ok(metadata)
	}
}
