use super::properties::{read_properties, StreamLayout};
use super::seek_frame::SeekFrame;
use super::sync::{synchronize, SyncMode};
use super::Mp3File;
use crate::config::ParseOptions;
use crate::error::{MetaError, Result};
use crate::id3::{Id3Decoder, Id3Peeker, Id3v2Version};
use crate::source::ByteSource;

pub(super) fn read_from(source: &mut dyn ByteSource, options: &ParseOptions) -> Result<Mp3File> {
	// Gapless and TLEN frames are needed even when tags are not
	let predicate =
		|version: Id3v2Version, id: &str| -> bool { options.accepts_id3_frame(version, id) };

	source.reset_peek_position();
	let checkpoint = source.begin_transaction();
	let id3 = Id3Peeker::new(Id3Decoder::with_predicate(&predicate)).peek_id3_data(source)?;
	source.commit(checkpoint)?;

	let header = synchronize(source, SyncMode::Read, options.max_sync_bytes)?
		.ok_or(MetaError::SearchExhausted)?;
	let first_frame_position = source.position();

	// The first frame may hold side information instead of audio
	let checkpoint = source.begin_transaction();
	let mut frame = vec![0; header.frame_size];
	let peeked = source.peek(&mut frame)?;
	frame.truncate(peeked);

	let seek_frame = SeekFrame::locate(&frame, &header);
	if seek_frame.is_some() {
		trace!("Found MPEG side information frame at {first_frame_position}");
		source.commit(checkpoint)?;
	} else {
		source.rollback(checkpoint)?;
	}

	let layout = StreamLayout {
		first_frame_position,
		audio_position: source.position(),
		length: source.length(),
	};

	let properties = read_properties(
		&header,
		seek_frame.as_ref(),
		id3.as_ref(),
		layout,
		options.read_properties,
	);

	Ok(Mp3File {
		id3v2: id3.filter(|_| options.read_tags),
		properties,
	})
}
