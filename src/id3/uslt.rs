//! Unsynchronised lyrics (`USLT`) payload decoding
//!
//! The frame is stored as a [`BinaryFrame`](crate::types::entry::BinaryFrame) and only
//! decoded once lyrics are actually requested.

use super::text::{decode_span, index_of_terminator, TextEncoding};

/// Decode the text of a `USLT` payload
///
/// The layout is an encoding byte, a 3 byte language code, a terminated description and
/// the lyrics, which end at the next terminator or the end of the payload.
///
/// Returns `None` for payloads shorter than 4 bytes. Any other malformation yields an
/// empty string.
pub fn decode_lyrics(data: &[u8]) -> Option<String> {
	if data.len() < 4 {
		return None;
	}

	// Unknown encodings are read as Latin-1
	let encoding = TextEncoding::from_u8(data[0]).unwrap_or(TextEncoding::Latin1);
	let rest = &data[4..];

	let description_end = index_of_terminator(rest, 0, encoding);
	let text_start = description_end + encoding.terminator_len();
	let text_end = index_of_terminator(rest, text_start, encoding);

	Some(decode_span(rest, text_start, text_end, encoding))
}
