use crate::util::{comment_frame, id3v2_tag, init_logger, mpeg_frames, text_frame, xing_frame};

use metaprobe::{read_from_slice, MetaError, Mp3File, ParseOptions, SliceSource};
use pretty_assertions::assert_eq;

fn tagged_stream() -> Vec<u8> {
	let mut data = id3v2_tag(&[
		text_frame(b"TIT2", "Foo title"),
		text_frame(b"TPE1", "Bar artist"),
		text_frame(b"TALB", "Baz album"),
		text_frame(b"TRCK", "1/12"),
		text_frame(b"TYER", "1984"),
	]);
	data.extend(xing_frame(b"Xing", 100, 41_700, 576, 1_000));
	data.extend(mpeg_frames(8));
	data
}

#[test]
fn read_tagged_vbr() {
	init_logger();

	let metadata = read_from_slice(&tagged_stream(), &ParseOptions::default()).unwrap();

	assert_eq!(metadata.title.as_deref(), Some("Foo title"));
	assert_eq!(metadata.artist.as_deref(), Some("Bar artist"));
	assert_eq!(metadata.album.as_deref(), Some("Baz album"));
	assert_eq!(metadata.track_number, Some(1));
	assert_eq!(metadata.total_tracks, Some(12));
	assert_eq!(metadata.year, Some(1984));

	assert_eq!(metadata.duration_ms, Some(2612));
	assert_eq!(metadata.sample_rate, Some(44100));
	assert_eq!(metadata.bitrate, Some(127_707));
	assert_eq!(metadata.stream.frame_count(), Some(100));
	assert_eq!(metadata.stream.channels(), Some(2));
	assert_eq!(metadata.stream.encoder_delay(), Some(576));
	assert_eq!(metadata.stream.encoder_padding(), Some(1_000));
}

#[test]
fn read_from_seekable_reader() {
	init_logger();

	let data = tagged_stream();
	let from_slice = read_from_slice(&data, &ParseOptions::default()).unwrap();
	let from_reader =
		metaprobe::read_from(std::io::Cursor::new(data), &ParseOptions::default()).unwrap();

	assert_eq!(from_slice, from_reader);
}

#[test]
fn constant_bitrate_estimate() {
	init_logger();

	let mut data = id3v2_tag(&[text_frame(b"TIT2", "Untimed")]);
	data.extend(mpeg_frames(10));

	let metadata = read_from_slice(&data, &ParseOptions::default()).unwrap();

	// 4170 bytes at 128kbps
	assert_eq!(metadata.duration_ms, Some(260));
	assert_eq!(metadata.bitrate, Some(128_000));
	assert_eq!(metadata.stream.frame_count(), None);
	assert_eq!(metadata.stream.encoder_delay(), None);
}

#[test]
fn tlen_before_estimate() {
	init_logger();

	let mut data = id3v2_tag(&[text_frame(b"TLEN", "123456")]);
	data.extend(mpeg_frames(10));

	let metadata = read_from_slice(&data, &ParseOptions::default()).unwrap();
	assert_eq!(metadata.duration_ms, Some(123_456));
}

#[test]
fn itunes_gapless_wins_over_lame() {
	init_logger();

	let mut data = id3v2_tag(&[comment_frame(
		"iTunSMPB",
		" 00000000 00000840 000001CA 0000000000BB5E36",
	)]);
	data.extend(xing_frame(b"Xing", 100, 41_700, 576, 1_000));
	data.extend(mpeg_frames(8));

	let metadata = read_from_slice(&data, &ParseOptions::default()).unwrap();
	assert_eq!(metadata.stream.encoder_delay(), Some(0x840));
	assert_eq!(metadata.stream.encoder_padding(), Some(0x1CA));
}

#[test]
fn garbage_before_first_frame() {
	init_logger();

	let mut data = vec![0x42; 1000];
	// A lone sync word that isn't followed by matching frames
	data[500] = 0xFF;
	data[501] = 0xFB;
	data[502] = 0x90;
	data[503] = 0x44;
	data.extend(mpeg_frames(6));

	let mp3 = Mp3File::read_from(&mut SliceSource::new(&data), &ParseOptions::default()).unwrap();
	assert_eq!(mp3.id3v2(), None);
	assert_eq!(mp3.properties().sample_rate(), Some(44100));
}

#[test]
fn search_limit() {
	init_logger();

	let mut data = vec![0; 2048];
	data.extend(mpeg_frames(6));

	let options = ParseOptions {
		max_sync_bytes: 1024,
		..ParseOptions::default()
	};

	assert!(matches!(
		Mp3File::read_from(&mut SliceSource::new(&data), &options),
		Err(MetaError::SearchExhausted)
	));
}

#[test]
fn skip_tags_and_properties() {
	init_logger();

	let data = tagged_stream();

	let options = ParseOptions {
		read_tags: false,
		..ParseOptions::default()
	};
	let metadata = read_from_slice(&data, &options).unwrap();
	assert_eq!(metadata.title, None);
	assert_eq!(metadata.duration_ms, Some(2612));

	let options = ParseOptions {
		read_properties: false,
		..ParseOptions::default()
	};
	let metadata = read_from_slice(&data, &options).unwrap();
	assert_eq!(metadata.title.as_deref(), Some("Foo title"));
	assert_eq!(metadata.duration_ms, None);
	assert_eq!(metadata.sample_rate, None);
	// Gapless values don't need the properties
	assert_eq!(metadata.stream.encoder_delay(), Some(576));
}

#[test]
fn frame_filter() {
	init_logger();

	let options = ParseOptions {
		id3_frame_filter: Some(vec![String::from("TIT2")]),
		..ParseOptions::default()
	};

	let metadata = read_from_slice(&tagged_stream(), &options).unwrap();
	assert_eq!(metadata.title.as_deref(), Some("Foo title"));
	assert_eq!(metadata.artist, None);
	assert_eq!(metadata.album, None);
}

#[test]
fn only_first_id3_tag_is_decoded() {
	init_logger();

	let mut data = id3v2_tag(&[text_frame(b"TIT2", "First")]);
	data.extend(id3v2_tag(&[
		text_frame(b"TIT2", "Second"),
		text_frame(b"TPE1", "Second artist"),
	]));
	data.extend(mpeg_frames(6));

	let metadata = read_from_slice(&data, &ParseOptions::default()).unwrap();
	assert_eq!(metadata.title.as_deref(), Some("First"));
	assert_eq!(metadata.artist, None);
	assert_eq!(metadata.sample_rate, Some(44100));
}

#[test]
fn truncated_id3_tag() {
	init_logger();

	let mut data = id3v2_tag(&[text_frame(b"TIT2", "Cut short")]);
	data.truncate(data.len() - 4);

	assert!(Mp3File::read_from(&mut SliceSource::new(&data), &ParseOptions::default()).is_err());
}

#[test]
fn truncated_lone_frame() {
	init_logger();

	let data = mpeg_frames(1);

	assert!(matches!(
		Mp3File::read_from(&mut SliceSource::new(&data[..200]), &ParseOptions::default()),
		Err(MetaError::MalformedContainer(_))
	));

	// A single complete frame is enough
	let mp3 = Mp3File::read_from(&mut SliceSource::new(&data), &ParseOptions::default()).unwrap();
	assert_eq!(mp3.properties().sample_rate(), Some(44100));
}
