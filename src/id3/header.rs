use super::{Id3v2Version, ID3_HEADER_LEN, ID3_IDENTIFIER};
use crate::cursor::ByteCursor;
use crate::error::{MetaError, Result};

/// Flags that apply to the entire tag
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Id3v2TagFlags {
	/// Whether or not all frames are unsynchronised (ID3v2.2 and ID3v2.3 only)
	pub unsynchronisation: bool,
	/// Whether the tag has an extended header
	pub extended_header: bool,
	/// Indicates if the tag is in an experimental stage
	pub experimental: bool,
	/// Indicates that the tag includes a footer
	pub footer: bool,
}

/// A parsed ID3v2 header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Id3v2Header {
	/// The tag's version
	pub version: Id3v2Version,
	/// The minor revision, unused apart from diagnostics
	pub revision: u8,
	/// The tag's flags
	pub flags: Id3v2TagFlags,
	/// The size of everything after the header (including any footer)
	pub size: u32,
}

impl Id3v2Header {
	/// The full length of the tag, header included
	pub fn tag_len(&self) -> u64 {
		ID3_HEADER_LEN as u64 + u64::from(self.size)
	}
}

/// Whether `bytes` starts with an ID3v2 identifier
pub(crate) fn is_id3_header(bytes: &[u8]) -> bool {
	bytes.len() >= 3 && &bytes[..3] == ID3_IDENTIFIER
}

/// Read the 10 byte tag header
///
/// # Errors
///
/// * The identifier is not `ID3`
/// * The major version is not 2, 3 or 4
/// * The tag is an ID3v2.2 tag using the compression flag
pub(crate) fn read_id3v2_header(cursor: &mut ByteCursor<'_>) -> Result<Id3v2Header> {
	let header = cursor.read_bytes(ID3_HEADER_LEN)?;

	if !is_id3_header(header) {
		return Err(MetaError::MalformedContainer("Missing ID3 identifier"));
	}

	// Version is stored as [major, minor], the minor revision is never needed to parse a tag
	let version = match header[3] {
		2 => Id3v2Version::V2,
		3 => Id3v2Version::V3,
		4 => Id3v2Version::V4,
		major => {
			debug!("Rejecting ID3v2.{major}.{} tag", header[4]);
			return Err(MetaError::MalformedContainer(
				"Unsupported ID3v2 major version",
			));
		},
	};

	let flags = header[5];

	// Compression was a flag only used in ID3v2.2 (bit 2).
	// At the time the ID3v2.2 specification was written, a compression scheme wasn't decided.
	if version == Id3v2Version::V2 && flags & 0x40 == 0x40 {
		return Err(MetaError::Unsupported("Encountered a compressed ID3v2.2 tag"));
	}

	let later_version = version != Id3v2Version::V2;

	Ok(Id3v2Header {
		version,
		revision: header[4],
		flags: Id3v2TagFlags {
			unsynchronisation: version != Id3v2Version::V4 && flags & 0x80 == 0x80,
			extended_header: later_version && flags & 0x40 == 0x40,
			experimental: later_version && flags & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && flags & 0x10 == 0x10,
		},
		size: super::unsynch_u32(u32::from_be_bytes([
			header[6], header[7], header[8], header[9],
		])),
	})
}

/// Skip the extended header (if any), returning the number of frame bytes left
///
/// `frames_size` starts as the header's declared size, the footer and extended header are
/// excluded from it.
pub(crate) fn skip_extended_header(
	cursor: &mut ByteCursor<'_>,
	header: &Id3v2Header,
) -> Result<usize> {
	let mut frames_size = header.size as usize;

	if header.flags.extended_header {
		match header.version {
			Id3v2Version::V3 => {
				// The size excludes itself
				let extended_size = cursor.read_u32()? as usize;
				cursor.skip(extended_size)?;
				frames_size = frames_size.saturating_sub(extended_size + 4);
			},
			Id3v2Version::V4 => {
				let extended_size = cursor.read_synchsafe_u32()? as usize;
				if extended_size < 6 {
					return Err(MetaError::MalformedContainer(
						"Found an extended header with an invalid size (< 6)",
					));
				}

				cursor.skip(extended_size - 4)?;
				frames_size = frames_size.saturating_sub(extended_size);
			},
			Id3v2Version::V2 => {},
		}
	}

	if header.flags.footer {
		frames_size = frames_size.saturating_sub(ID3_HEADER_LEN);
	}

	Ok(frames_size.min(cursor.remaining()))
}
