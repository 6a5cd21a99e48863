//! Encoding-aware string extraction for ID3v2 frame payloads

/// The text encoding for use in ID3v2 frames
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a TextEncoding from a u8, must be 0-3 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	/// Whether strings in this encoding are terminated by two zero bytes
	pub fn is_wide(self) -> bool {
		matches!(self, Self::UTF16 | Self::UTF16BE)
	}

	/// Length of the string terminator in bytes
	pub fn terminator_len(self) -> usize {
		if self.is_wide() {
			2
		} else {
			1
		}
	}
}

/// Find the end of the string starting at `from`
///
/// Single byte encodings stop at the first zero byte. Wide encodings need a zero at an even
/// index followed by another zero, so the low byte of a narrow character is never mistaken
/// for a terminator. Returns `data.len()` when no terminator exists.
pub(crate) fn index_of_terminator(data: &[u8], from: usize, encoding: TextEncoding) -> usize {
	let from = from.min(data.len());

	if !encoding.is_wide() {
		return data[from..]
			.iter()
			.position(|b| *b == 0)
			.map_or(data.len(), |i| from + i);
	}

	let mut terminator = from;
	while terminator < data.len().saturating_sub(1) {
		if terminator % 2 == 0 && data[terminator] == 0 && data[terminator + 1] == 0 {
			return terminator;
		}

		// Skip to the next zero
		terminator = match data[terminator + 1..].iter().position(|b| *b == 0) {
			Some(i) => terminator + 1 + i,
			None => return data.len(),
		};
	}

	data.len()
}

/// Decode `data[from..to]`, yielding an empty string for empty or out of range spans
pub(crate) fn decode_span(data: &[u8], from: usize, to: usize, encoding: TextEncoding) -> String {
	if to <= from || to > data.len() {
		return String::new();
	}

	let bytes = &data[from..to];
	match encoding {
		TextEncoding::Latin1 => bytes.iter().map(|c| *c as char).collect(),
		TextEncoding::UTF8 => String::from_utf8_lossy(bytes).into_owned(),
		TextEncoding::UTF16BE => utf16_decode(bytes, u16::from_be_bytes),
		TextEncoding::UTF16 => match bytes {
			[0xFF, 0xFE, rest @ ..] => utf16_decode(rest, u16::from_le_bytes),
			[0xFE, 0xFF, rest @ ..] => utf16_decode(rest, u16::from_be_bytes),
			// No byte order mark, assume big endian
			_ => utf16_decode(bytes, u16::from_be_bytes),
		},
	}
}

fn utf16_decode(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> String {
	let units = bytes
		.chunks_exact(2)
		.map(|c| endianness([c[0], c[1]]))
		.collect::<Vec<u16>>();

	String::from_utf16_lossy(&units)
}

/// Read a terminated string starting at `from`
///
/// Returns the string and the offset just past its terminator (or `data.len()`).
pub(crate) fn read_terminated(data: &[u8], from: usize, encoding: TextEncoding) -> (String, usize) {
	let end = index_of_terminator(data, from, encoding);
	let value = decode_span(data, from, end, encoding);

	(value, (end + encoding.terminator_len()).min(data.len()))
}

/// Split `data[from..]` into its terminator separated values
///
/// A trailing terminator does not produce an empty trailing value.
pub(crate) fn read_values(data: &[u8], from: usize, encoding: TextEncoding) -> Vec<String> {
	let mut values = Vec::new();
	if from >= data.len() {
		return values;
	}

	let mut start = from;
	loop {
		let end = index_of_terminator(data, start, encoding);
		values.push(decode_span(data, start, end, encoding));

		start = end + encoding.terminator_len();
		if start >= data.len() {
			break;
		}
	}

	values
}

#[cfg(test)]
mod tests {
	use super::{decode_span, index_of_terminator, read_terminated, read_values, TextEncoding};

	#[test]
	fn single_byte_terminator() {
		let data = b"abc\0def";
		assert_eq!(index_of_terminator(data, 0, TextEncoding::Latin1), 3);
		assert_eq!(index_of_terminator(data, 4, TextEncoding::UTF8), 7);
	}

	#[test]
	fn wide_terminator_needs_even_alignment() {
		// "A" "B" in UTF-16BE followed by a terminator. The zero at index 3 pairs with index 4
		// but starts at an odd index, so it must be skipped.
		let data = [0x00, 0x41, 0x42, 0x00, 0x00, 0x43, 0x00, 0x00];
		assert_eq!(index_of_terminator(&data, 0, TextEncoding::UTF16BE), 6);
	}

	#[test]
	fn wide_terminator_missing() {
		let data = [0x00, 0x41, 0x00, 0x42];
		assert_eq!(index_of_terminator(&data, 0, TextEncoding::UTF16), 4);
	}

	#[test]
	fn utf16_bom() {
		let le = [0xFF, 0xFE, b'h', 0x00, b'i', 0x00];
		let be = [0xFE, 0xFF, 0x00, b'h', 0x00, b'i'];

		assert_eq!(decode_span(&le, 0, le.len(), TextEncoding::UTF16), "hi");
		assert_eq!(decode_span(&be, 0, be.len(), TextEncoding::UTF16), "hi");
	}

	#[test]
	fn invalid_span_is_empty() {
		assert_eq!(decode_span(b"abc", 2, 2, TextEncoding::Latin1), "");
		assert_eq!(decode_span(b"abc", 1, 10, TextEncoding::Latin1), "");
	}

	#[test]
	fn latin1_is_not_utf8() {
		assert_eq!(decode_span(&[0xE9], 0, 1, TextEncoding::Latin1), "\u{e9}");
	}

	#[test]
	fn terminated_and_values() {
		let data = b"desc\0one\0two\0";
		let (description, next) = read_terminated(data, 0, TextEncoding::Latin1);

		assert_eq!(description, "desc");
		assert_eq!(next, 5);
		assert_eq!(
			read_values(data, next, TextEncoding::Latin1),
			vec![String::from("one"), String::from("two")]
		);
	}
}
