use super::block::{Block, BlockHeader, BlockType, BLOCK_HEADER_SIZE};
use super::stream_info::{parse_seek_table, SeekPoint, StreamInfo};
use super::vorbis::read_comments;
use super::FlacFile;
use crate::config::ParseOptions;
use crate::error::{MetaError, Result};
use crate::id3::{Id3Decoder, Id3Peeker, Id3v2Version};
use crate::source::ByteSource;
use crate::types::entry::{MetadataList, TagEntry};
use crate::types::picture::Picture;
use crate::types::properties::StreamParameters;

pub(crate) const FLAC_MARKER: &[u8; 4] = b"fLaC";

const MISSING_MARKER: MetaError =
	MetaError::MalformedContainer("Failed to read FLAC stream marker");

/// Everything read from the metadata blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlacStreamMetadata {
	/// The STREAMINFO block, always the first block
	pub stream_info: Option<StreamInfo>,
	/// Seek points from a SEEKTABLE block
	pub seek_table: Vec<SeekPoint>,
	/// The VORBIS_COMMENT vendor string
	pub vendor: Option<String>,
	/// Vorbis comments and pictures, in block order
	pub entries: Vec<TagEntry>,
}

impl FlacStreamMetadata {
	fn add_block(&mut self, block: &Block, options: &ParseOptions) -> Result<()> {
		if self.stream_info.is_none() {
			if block.header.ty != BlockType::StreamInfo {
				return Err(MetaError::MalformedContainer(
					"FLAC stream is missing its STREAMINFO block",
				));
			}

			self.stream_info = Some(StreamInfo::parse(&block.content)?);
			return Ok(());
		}

		match block.header.ty {
			BlockType::SeekTable => self.seek_table = parse_seek_table(&block.content),
			BlockType::VorbisComment if options.read_tags => {
				let comments = read_comments(&block.content, options.read_pictures)?;
				self.vendor = Some(comments.vendor);
				self.entries.extend(comments.entries);
			},
			BlockType::Picture if options.read_tags && options.read_pictures => {
				match Picture::from_flac_bytes(&block.content) {
					Ok(picture) => self.entries.push(TagEntry::Picture(picture)),
					Err(err) => debug!("Skipping invalid FLAC PICTURE block: {err}"),
				}
			},
			BlockType::StreamInfo => warn!("Ignoring repeated FLAC STREAMINFO block"),
			_ => {},
		}

		Ok(())
	}
}

/// Progress through a FLAC stream's header
///
/// Each state is consumed by [`FlacState::advance`], which performs the I/O for one step and
/// returns the next state.
#[derive(Debug)]
pub enum FlacState {
	/// Skip (and decode) ID3v2 tags some writers put before the marker
	ReadId3,
	/// Check the marker and first block header without consuming them
	PeekStreamInfo {
		/// The leading ID3v2 tag
		id3v2: Option<MetadataList>,
	},
	/// Consume the `fLaC` marker
	ReadMarker {
		/// The leading ID3v2 tag
		id3v2: Option<MetadataList>,
	},
	/// Read one metadata block
	ReadMetadataBlocks {
		/// The leading ID3v2 tag
		id3v2: Option<MetadataList>,
		/// The blocks read so far
		metadata: FlacStreamMetadata,
	},
	/// The last metadata block has been read
	Done(FlacFile),
}

impl FlacState {
	/// Perform one step
	///
	/// # Errors
	///
	/// * The marker is missing, the first block is not STREAMINFO, or the input ends before
	///   the last block ([`MetaError::MalformedContainer`])
	/// * The source fails
	pub fn advance(self, source: &mut dyn ByteSource, options: &ParseOptions) -> Result<Self> {
		match self {
			Self::ReadId3 => {
				let predicate = |version: Id3v2Version, id: &str| -> bool {
					options.read_tags && options.accepts_id3_frame(version, id)
				};

				source.reset_peek_position();
				let checkpoint = source.begin_transaction();
				let id3v2 =
					Id3Peeker::new(Id3Decoder::with_predicate(&predicate)).peek_id3_data(source)?;
				source.commit(checkpoint)?;

				Ok(Self::PeekStreamInfo { id3v2 })
			},
			Self::PeekStreamInfo { id3v2 } => {
				let mut start = [0; 4 + BLOCK_HEADER_SIZE];

				source.reset_peek_position();
				let checkpoint = source.begin_transaction();
				let peeked = source.peek_fully(&mut start, true);
				source.rollback(checkpoint)?;

				match peeked {
					Ok(true) => {},
					Ok(false) => return Err(MISSING_MARKER),
					Err(err) if err.is_end_of_input() => return Err(MISSING_MARKER),
					Err(err) => return Err(err),
				}

				if &start[..4] != FLAC_MARKER {
					return Err(MISSING_MARKER);
				}

				let mut header = [0; BLOCK_HEADER_SIZE];
				header.copy_from_slice(&start[4..]);
				if BlockHeader::parse(header).ty != BlockType::StreamInfo {
					return Err(MetaError::MalformedContainer(
						"FLAC stream is missing its STREAMINFO block",
					));
				}

				Ok(Self::ReadMarker { id3v2 })
			},
			Self::ReadMarker { id3v2 } => {
				let mut marker = [0; 4];
				source.read_fully(&mut marker)?;

				if &marker != FLAC_MARKER {
					return Err(MISSING_MARKER);
				}

				Ok(Self::ReadMetadataBlocks {
					id3v2,
					metadata: FlacStreamMetadata::default(),
				})
			},
			Self::ReadMetadataBlocks {
				id3v2,
				mut metadata,
			} => {
				let block = Block::read(source)?;
				metadata.add_block(&block, options)?;

				if !block.header.last {
					return Ok(Self::ReadMetadataBlocks { id3v2, metadata });
				}

				let properties = properties(&metadata, options);
				Ok(Self::Done(FlacFile {
					id3v2: id3v2.filter(|_| options.read_tags),
					metadata,
					properties,
				}))
			},
			Self::Done(file) => Ok(Self::Done(file)),
		}
	}
}

fn properties(metadata: &FlacStreamMetadata, options: &ParseOptions) -> StreamParameters {
	let Some(info) = metadata.stream_info.as_ref().filter(|_| options.read_properties) else {
		return StreamParameters::default();
	};

	StreamParameters {
		duration: info.duration(),
		bitrate: Some(info.bitrate()),
		sample_rate: Some(info.sample_rate),
		channels: Some(info.channels),
		bits_per_sample: Some(info.bits_per_sample),
		total_samples: Some(info.total_samples).filter(|total| *total > 0),
		..StreamParameters::default()
	}
}

pub(super) fn read_from(source: &mut dyn ByteSource, options: &ParseOptions) -> Result<FlacFile> {
	let mut state = FlacState::ReadId3;

	loop {
		state = state.advance(source, options)?;

		if let FlacState::Done(file) = state {
			return Ok(file);
		}
	}
}
