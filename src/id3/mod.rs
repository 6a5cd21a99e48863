//! ID3v2 tag decoding
//!
//! ## Important notes
//!
//! Only reading is supported. Frames are decoded into [`TagEntry`](crate::TagEntry) values,
//! see [`Id3Decoder`] for the frame dispatch and [`Id3Peeker`] for reading tags off the front
//! of a [`ByteSource`](crate::ByteSource).
mod content;
mod decoder;
mod frame;
pub(crate) mod header;
mod peek;
pub(crate) mod text;
pub mod uslt;

pub use decoder::{FramePredicate, Id3Decoder};
pub use header::{Id3v2Header, Id3v2TagFlags};
pub use peek::Id3Peeker;
pub use text::TextEncoding;

/// The length of an ID3v2 header (and footer)
pub const ID3_HEADER_LEN: usize = 10;

/// The ID3v2 identifier, the first 3 bytes of every tag
pub const ID3_IDENTIFIER: &[u8; 3] = b"ID3";

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
/// The ID3v2 version
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// The major version number as stored in the header
	pub fn major(self) -> u8 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}

	/// Length of a frame header in this version
	pub(crate) fn frame_header_len(self) -> usize {
		match self {
			Self::V2 => 6,
			_ => 10,
		}
	}
}

// https://github.com/polyfloyd/rust-id3/blob/e142ec656bf70a8153f6e5b34a37f26df144c3c1/src/stream/unsynch.rs#L18-L20
/// Decode a synchsafe integer
pub fn unsynch_u32(n: u32) -> u32 {
	n & 0xFF | (n & 0xFF00) >> 1 | (n & 0xFF_0000) >> 2 | (n & 0xFF00_0000) >> 3
}

// https://github.com/polyfloyd/rust-id3/blob/e142ec656bf70a8153f6e5b34a37f26df144c3c1/src/stream/unsynch.rs#L9-L15
/// Encode a value as a synchsafe integer, `None` if it doesn't fit in 28 bits
pub fn synch_u32(n: u32) -> Option<u32> {
	if n > 0x0FFF_FFFF {
		return None;
	}

	let mut x: u32 = n & 0x7F | (n & 0xFFFF_FF80) << 1;
	x = x & 0x7FFF | (x & 0xFFFF_8000) << 1;
	x = x & 0x7F_FFFF | (x & 0xFF80_0000) << 1;
	Some(x)
}

/// Reverse unsynchronisation, every `0xFF 0x00` pair becomes `0xFF`
pub(crate) fn remove_unsynchronisation(data: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(data.len());
	let mut previous_ff = false;

	for byte in data {
		if previous_ff && *byte == 0 {
			previous_ff = false;
			continue;
		}

		previous_ff = *byte == 0xFF;
		out.push(*byte);
	}

	out
}
