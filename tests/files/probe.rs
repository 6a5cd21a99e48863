use crate::util::{flac_block, id3v2_tag, init_logger, mpeg_frames, stream_info, text_frame};

use metaprobe::{read_from_path, FileType, MetaError, ParseOptions, Probe};
use pretty_assertions::assert_eq;
use std::io::Write;

fn temp_file(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
	file.write_all(content).unwrap();
	file.flush().unwrap();
	file
}

fn mp3() -> Vec<u8> {
	let mut data = id3v2_tag(&[text_frame(b"TIT2", "An MP3")]);
	data.extend(mpeg_frames(8));
	data
}

fn flac() -> Vec<u8> {
	let mut data = id3v2_tag(&[text_frame(b"TIT2", "A FLAC")]);
	data.extend_from_slice(b"fLaC");
	data.extend(flac_block(0, true, &stream_info(44100, 2, 16, 44100)));
	data
}

#[test]
fn read_paths() {
	init_logger();

	let file = temp_file(".mp3", &mp3());
	let metadata = read_from_path(file.path(), &ParseOptions::default()).unwrap();
	assert_eq!(metadata.title.as_deref(), Some("An MP3"));
	assert_eq!(metadata.sample_rate, Some(44100));

	let file = temp_file(".flac", &flac());
	let metadata = read_from_path(file.path(), &ParseOptions::default()).unwrap();
	assert_eq!(metadata.title.as_deref(), Some("A FLAC"));
	assert_eq!(metadata.duration_ms, Some(1000));
}

#[test]
fn content_wins_over_extension() {
	init_logger();

	let file = temp_file(".mp3", &flac());

	let probe = Probe::open(file.path()).unwrap();
	assert_eq!(probe.file_type(), Some(FileType::Mp3));

	let probe = probe.guess_file_type().unwrap();
	assert_eq!(probe.file_type(), Some(FileType::Flac));
	assert_eq!(probe.read().unwrap().title.as_deref(), Some("A FLAC"));
}

#[test]
fn extension_used_when_content_is_unknown() {
	init_logger();

	let file = temp_file(".flac", b"not really audio");

	let probe = Probe::open(file.path()).unwrap().guess_file_type().unwrap();
	assert_eq!(probe.file_type(), Some(FileType::Flac));
	assert!(matches!(probe.read(), Err(MetaError::MalformedContainer(_))));
}

#[test]
fn unknown_format() {
	init_logger();

	let file = temp_file(".txt", b"not really audio");

	assert!(matches!(
		read_from_path(file.path(), &ParseOptions::default()),
		Err(MetaError::UnknownFormat)
	));
}

#[test]
fn missing_file() {
	assert!(matches!(
		read_from_path("/nonexistent/song.mp3", &ParseOptions::default()),
		Err(MetaError::Io(_))
	));
}
