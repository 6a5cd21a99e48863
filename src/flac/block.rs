use crate::error::{MetaError, Result};
use crate::source::ByteSource;

use byteorder::{BigEndian, ByteOrder};

pub(super) const BLOCK_HEADER_SIZE: usize = 4;

/// The type of a metadata block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BlockType {
	StreamInfo,
	Padding,
	Application,
	SeekTable,
	VorbisComment,
	CueSheet,
	Picture,
	/// A reserved or invalid type
	Unknown(u8),
}

impl BlockType {
	/// Get a `BlockType` from the 7 bit type field
	pub fn from_u8(ty: u8) -> Self {
		match ty {
			0 => Self::StreamInfo,
			1 => Self::Padding,
			2 => Self::Application,
			3 => Self::SeekTable,
			4 => Self::VorbisComment,
			5 => Self::CueSheet,
			6 => Self::Picture,
			_ => Self::Unknown(ty),
		}
	}
}

/// The 4 byte header preceding every metadata block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
	/// Whether this is the last metadata block before the audio frames
	pub last: bool,
	/// The block's type
	pub ty: BlockType,
	/// Length of the block's content
	pub length: u32,
}

impl BlockHeader {
	/// Decode a block header
	pub fn parse(bytes: [u8; BLOCK_HEADER_SIZE]) -> Self {
		Self {
			last: bytes[0] & 0x80 != 0,
			ty: BlockType::from_u8(bytes[0] & 0x7F),
			length: BigEndian::read_u24(&bytes[1..]),
		}
	}
}

/// A metadata block with its content
pub(super) struct Block {
	pub(super) header: BlockHeader,
	pub(super) content: Vec<u8>,
}

impl Block {
	/// Read the block at the source's position
	///
	/// Running out of input anywhere in the block is a malformed container, since the last
	/// block flag has not been seen yet.
	pub(super) fn read(source: &mut dyn ByteSource) -> Result<Self> {
		let mut header = [0; BLOCK_HEADER_SIZE];
		source.read_fully(&mut header).map_err(truncated)?;
		let header = BlockHeader::parse(header);

		let mut content = vec![0; header.length as usize];
		source.read_fully(&mut content).map_err(truncated)?;

		trace!(
			"Read FLAC metadata block {:?} ({} bytes, last: {})",
			header.ty,
			header.length,
			header.last
		);

		Ok(Self { header, content })
	}
}

fn truncated(err: MetaError) -> MetaError {
	if err.is_end_of_input() {
		MetaError::MalformedContainer("FLAC metadata block truncated by end of input")
	} else {
		err
	}
}
