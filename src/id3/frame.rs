use super::Id3v2Version;
use crate::cursor::ByteCursor;
use crate::error::Result;

/// Frame flags that change how the payload is read
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct FrameFlags {
	pub grouping_identity: bool,
	pub compression: bool,
	pub encryption: bool,
	pub unsynchronisation: bool,
	pub data_length_indicator: bool,
}

pub(crate) fn parse_flags(flags: u16, version: Id3v2Version) -> FrameFlags {
	match version {
		Id3v2Version::V2 => FrameFlags::default(),
		Id3v2Version::V3 => FrameFlags {
			grouping_identity: flags & 0x0020 == 0x0020,
			compression: flags & 0x0080 == 0x0080,
			encryption: flags & 0x0040 == 0x0040,
			unsynchronisation: false,
			data_length_indicator: false,
		},
		Id3v2Version::V4 => FrameFlags {
			grouping_identity: flags & 0x0040 == 0x0040,
			compression: flags & 0x0008 == 0x0008,
			encryption: flags & 0x0004 == 0x0004,
			unsynchronisation: flags & 0x0002 == 0x0002,
			data_length_indicator: flags & 0x0001 == 0x0001,
		},
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrameHeader {
	pub id: String,
	pub size: usize,
	pub flags: FrameFlags,
}

/// The outcome of reading a frame header
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FrameHeaderResult {
	Frame(FrameHeader),
	/// An all-zero header, the rest of the tag is padding
	Padding,
	/// Not enough data left for a frame header
	End,
}

/// Read a frame header
///
/// `synchsafe_sizes` only matters for ID3v2.4, some writers store plain integers there.
pub(crate) fn read_frame_header(
	cursor: &mut ByteCursor<'_>,
	version: Id3v2Version,
	synchsafe_sizes: bool,
) -> Result<FrameHeaderResult> {
	if cursor.remaining() < version.frame_header_len() {
		return Ok(FrameHeaderResult::End);
	}

	let (id, size, flags) = match version {
		Id3v2Version::V2 => {
			let id = cursor.read_bytes(3)?;
			(id, cursor.read_u24()?, 0)
		},
		Id3v2Version::V3 => {
			let id = cursor.read_bytes(4)?;
			(id, cursor.read_u32()?, cursor.read_u16()?)
		},
		Id3v2Version::V4 => {
			let id = cursor.read_bytes(4)?;
			let raw_size = cursor.read_u32()?;
			let size = if synchsafe_sizes {
				super::unsynch_u32(raw_size)
			} else {
				raw_size
			};

			(id, size, cursor.read_u16()?)
		},
	};

	if id.iter().all(|b| *b == 0) && size == 0 && flags == 0 {
		return Ok(FrameHeaderResult::Padding);
	}

	Ok(FrameHeaderResult::Frame(FrameHeader {
		id: id.iter().map(|b| *b as char).collect(),
		size: size as usize,
		flags: parse_flags(flags, version),
	}))
}

/// Check that every frame in `data` fits, using the given size interpretation
///
/// ID3v2.4 sizes are meant to be synchsafe, but some writers (notably older iTunes releases)
/// store plain integers. Walking the frames with both interpretations tells them apart.
pub(crate) fn validate_frames(data: &[u8], version: Id3v2Version, synchsafe_sizes: bool) -> bool {
	let header_len = version.frame_header_len();
	let mut cursor = ByteCursor::new(data);

	while cursor.remaining() >= header_len {
		let Ok((id, size, flags)) = read_raw_header(&mut cursor, version) else {
			return false;
		};

		if id == 0 && size == 0 && flags == 0 {
			return true;
		}

		let size = if version == Id3v2Version::V4 && synchsafe_sizes {
			if size & 0x8080_8080 != 0 {
				return false;
			}

			super::unsynch_u32(size)
		} else {
			size
		};

		let mut minimum_size = 0;
		match version {
			Id3v2Version::V4 => {
				if flags & 0x0040 != 0 {
					minimum_size += 1;
				}
				if flags & 0x0001 != 0 {
					minimum_size += 4;
				}
			},
			Id3v2Version::V3 => {
				if flags & 0x0020 != 0 {
					minimum_size += 1;
				}
				if flags & 0x0080 != 0 {
					minimum_size += 4;
				}
			},
			Id3v2Version::V2 => {},
		}

		if size < minimum_size || cursor.remaining() < size as usize {
			return false;
		}

		if cursor.skip(size as usize).is_err() {
			return false;
		}
	}

	true
}

fn read_raw_header(cursor: &mut ByteCursor<'_>, version: Id3v2Version) -> Result<(u32, u32, u16)> {
	match version {
		Id3v2Version::V2 => Ok((cursor.read_u24()?, cursor.read_u24()?, 0)),
		_ => Ok((cursor.read_u32()?, cursor.read_u32()?, cursor.read_u16()?)),
	}
}
