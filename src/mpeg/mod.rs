//! MPEG audio (MP3) specific items
mod constants;
mod gapless;
pub(crate) mod header;
mod properties;
mod read;
pub(crate) mod seek_frame;
pub(crate) mod sync;

pub use constants::{MAX_SNIFF_BYTES, MAX_SYNC_BYTES, MPEG_AUDIO_HEADER_MASK};
pub use gapless::GaplessInfo;
pub use header::{frame_size, ChannelMode, FrameHeader, Layer, MpegVersion};
pub use seek_frame::{SeekFrame, VbriFrame, XingFrame, XingKind};
pub use sync::{synchronize, SyncAction, SyncInput, SyncMode, SyncState};

use crate::config::ParseOptions;
use crate::error::Result;
use crate::source::ByteSource;
use crate::types::entry::MetadataList;
use crate::types::properties::StreamParameters;

/// An MP3 stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mp3File {
	/// The first ID3v2 tag, if present and tags were requested
	pub(crate) id3v2: Option<MetadataList>,
	/// The stream's audio properties
	pub(crate) properties: StreamParameters,
}

impl Mp3File {
	/// Read an MP3 stream starting at the source's position
	///
	/// Leading ID3v2 tags are decoded (only the first) and skipped, then the source is
	/// synchronized to the first of 4 consecutive matching frames.
	///
	/// # Errors
	///
	/// * No synchronized stream within [`ParseOptions::max_sync_bytes`]
	/// * The input ends before any valid frame
	/// * An ID3v2 tag declares more bytes than the input holds
	/// * The source fails
	pub fn read_from(source: &mut dyn ByteSource, options: &ParseOptions) -> Result<Self> {
		read::read_from(source, options)
	}

	/// The decoded ID3v2 tag
	pub fn id3v2(&self) -> Option<&MetadataList> {
		self.id3v2.as_ref()
	}

	/// The stream's audio properties
	pub fn properties(&self) -> &StreamParameters {
		&self.properties
	}
}
