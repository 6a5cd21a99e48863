//! FLAC specific items
//!
//! ## File notes
//!
//! * Only the metadata blocks are read, audio frames are never touched
//! * Vorbis comments and pictures end up in [`FlacStreamMetadata::entries`]
//! * ID3v2 tags before the `fLaC` marker are tolerated, and decoded
mod block;
mod picture;
mod read;
mod stream_info;
mod vorbis;

pub use block::{BlockHeader, BlockType};
pub use read::{FlacState, FlacStreamMetadata};
pub use stream_info::{parse_seek_table, SeekPoint, StreamInfo};
pub use vorbis::{read_comments, VorbisComments};

pub(crate) use read::FLAC_MARKER;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::source::ByteSource;
use crate::types::entry::MetadataList;
use crate::types::properties::StreamParameters;

/// A FLAC stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacFile {
	/// An ID3v2 tag preceding the marker
	pub(crate) id3v2: Option<MetadataList>,
	/// The metadata blocks
	pub(crate) metadata: FlacStreamMetadata,
	/// The stream's audio properties
	pub(crate) properties: StreamParameters,
}

impl FlacFile {
	/// Read a FLAC stream starting at the source's position
	///
	/// The source is left at the first audio frame.
	///
	/// # Errors
	///
	/// See [`FlacState::advance`]
	pub fn read_from(source: &mut dyn ByteSource, options: &ParseOptions) -> Result<Self> {
		read::read_from(source, options)
	}

	/// The ID3v2 tag preceding the marker
	pub fn id3v2(&self) -> Option<&MetadataList> {
		self.id3v2.as_ref()
	}

	/// The metadata blocks
	pub fn metadata(&self) -> &FlacStreamMetadata {
		&self.metadata
	}

	/// The stream's audio properties
	pub fn properties(&self) -> &StreamParameters {
		&self.properties
	}
}
