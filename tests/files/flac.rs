use crate::util::{
	flac_block, id3v2_tag, init_logger, picture, stream_info, text_frame, vorbis_comments,
};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use metaprobe::{
	read_from_slice, ByteSource, FlacFile, MetaError, ParseOptions, SliceSource, TagEntry,
};
use pretty_assertions::assert_eq;

const STREAMINFO: u8 = 0;
const PADDING: u8 = 1;
const VORBIS_COMMENT: u8 = 4;
const PICTURE: u8 = 6;

fn flac_stream(blocks: &[Vec<u8>]) -> Vec<u8> {
	let mut data = b"fLaC".to_vec();
	data.extend(blocks.concat());
	// The first audio frame
	data.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08]);
	data
}

fn tagged_stream() -> Vec<u8> {
	flac_stream(&[
		flac_block(STREAMINFO, false, &stream_info(44100, 2, 16, 441_000)),
		flac_block(
			VORBIS_COMMENT,
			false,
			&vorbis_comments(
				"reference libFLAC 1.4.2",
				&[
					"TITLE=Foo title",
					"artist=Bar artist",
					"ALBUM=Baz album",
					"TRACKNUMBER=3",
					"TRACKTOTAL=9",
					"DATE=2001-09-11",
					"LYRICS=La la la",
				],
			),
		),
		flac_block(PICTURE, false, &picture(4, "image/jpeg", &[1, 2, 3])),
		flac_block(PICTURE, false, &picture(3, "image/png", &[4, 5, 6])),
		flac_block(PADDING, true, &[0; 16]),
	])
}

#[test]
fn read_tagged() {
	init_logger();

	let metadata = read_from_slice(&tagged_stream(), &ParseOptions::default()).unwrap();

	assert_eq!(metadata.title.as_deref(), Some("Foo title"));
	assert_eq!(metadata.artist.as_deref(), Some("Bar artist"));
	assert_eq!(metadata.album.as_deref(), Some("Baz album"));
	assert_eq!(metadata.track_number, Some(3));
	assert_eq!(metadata.total_tracks, Some(9));
	assert_eq!(metadata.year, Some(2001));
	assert_eq!(metadata.lyrics.as_deref(), Some("La la la"));

	// The front cover wins over the back cover that came first
	assert_eq!(metadata.artwork, Some(vec![4, 5, 6]));
	assert_eq!(metadata.artwork_mime.as_deref(), Some("image/png"));

	assert_eq!(metadata.duration_ms, Some(10_000));
	assert_eq!(metadata.sample_rate, Some(44100));
	assert_eq!(metadata.bitrate, Some(1_411_200));
	assert_eq!(metadata.stream.channels(), Some(2));
	assert_eq!(metadata.stream.bits_per_sample(), Some(16));
	assert_eq!(metadata.stream.total_samples(), Some(441_000));
}

#[test]
fn source_is_left_at_first_frame() {
	init_logger();

	let data = tagged_stream();
	let mut source = SliceSource::new(&data);

	let flac = FlacFile::read_from(&mut source, &ParseOptions::default()).unwrap();

	assert_eq!(source.position(), data.len() as u64 - 4);
	assert_eq!(
		flac.metadata().vendor.as_deref(),
		Some("reference libFLAC 1.4.2")
	);
	assert_eq!(flac.metadata().entries.len(), 9);
	assert_eq!(flac.id3v2(), None);
}

#[test]
fn base64_picture_comment() {
	init_logger();

	let encoded = STANDARD.encode(picture(3, "image/png", &[7, 7, 7]));
	let comment = format!("METADATA_BLOCK_PICTURE={encoded}");

	let data = flac_stream(&[
		flac_block(STREAMINFO, false, &stream_info(48000, 1, 24, 0)),
		flac_block(
			VORBIS_COMMENT,
			true,
			&vorbis_comments("", &["TITLE=Pictured", comment.as_str()]),
		),
	]);

	let metadata = read_from_slice(&data, &ParseOptions::default()).unwrap();
	assert_eq!(metadata.title.as_deref(), Some("Pictured"));
	assert_eq!(metadata.artwork, Some(vec![7, 7, 7]));
	// Without a sample count there is no duration
	assert_eq!(metadata.duration_ms, None);
	assert_eq!(metadata.stream.total_samples(), None);
	assert_eq!(metadata.bitrate, Some(48000 * 24));
}

#[test]
fn leading_id3_wins() {
	init_logger();

	let mut data = id3v2_tag(&[
		text_frame(b"TIT2", "ID3 title"),
		text_frame(b"TCOM", "ID3 composer"),
	]);
	data.extend(tagged_stream());

	let metadata = read_from_slice(&data, &ParseOptions::default()).unwrap();
	assert_eq!(metadata.title.as_deref(), Some("ID3 title"));
	assert_eq!(metadata.composer.as_deref(), Some("ID3 composer"));
	assert_eq!(metadata.artist.as_deref(), Some("Bar artist"));
	assert_eq!(metadata.duration_ms, Some(10_000));
}

#[test]
fn options_gate_blocks() {
	init_logger();

	let data = tagged_stream();

	let options = ParseOptions {
		read_pictures: false,
		..ParseOptions::default()
	};
	let flac = FlacFile::read_from(&mut SliceSource::new(&data), &options).unwrap();
	assert!(flac
		.metadata()
		.entries
		.iter()
		.all(|entry| !matches!(entry, TagEntry::Picture(_))));

	let options = ParseOptions {
		read_tags: false,
		..ParseOptions::default()
	};
	let metadata = read_from_slice(&data, &options).unwrap();
	assert_eq!(metadata.title, None);
	assert_eq!(metadata.artwork, None);
	assert_eq!(metadata.duration_ms, Some(10_000));

	let options = ParseOptions {
		read_properties: false,
		..ParseOptions::default()
	};
	let metadata = read_from_slice(&data, &options).unwrap();
	assert_eq!(metadata.title.as_deref(), Some("Foo title"));
	assert_eq!(metadata.duration_ms, None);
	assert_eq!(metadata.sample_rate, None);
}

#[test]
fn truncated_metadata() {
	init_logger();

	let data = tagged_stream();

	assert!(matches!(
		FlacFile::read_from(&mut SliceSource::new(&data[..60]), &ParseOptions::default()),
		Err(MetaError::MalformedContainer(_))
	));
}

#[test]
fn missing_last_block_flag() {
	init_logger();

	// Every block is complete, but none is flagged as the last one
	let mut data = b"fLaC".to_vec();
	data.extend(flac_block(STREAMINFO, false, &stream_info(44100, 2, 16, 1)));
	data.extend(flac_block(PADDING, false, &[0; 8]));

	assert!(matches!(
		FlacFile::read_from(&mut SliceSource::new(&data), &ParseOptions::default()),
		Err(MetaError::MalformedContainer(_))
	));
}

#[test]
fn streaminfo_must_come_first() {
	init_logger();

	let data = flac_stream(&[
		flac_block(PADDING, false, &[0; 4]),
		flac_block(STREAMINFO, true, &stream_info(44100, 2, 16, 1)),
	]);

	assert!(matches!(
		FlacFile::read_from(&mut SliceSource::new(&data), &ParseOptions::default()),
		Err(MetaError::MalformedContainer(_))
	));
}
