use super::entry::{MetadataList, TagEntry, TextFrame, VorbisComment};
use super::picture::{Picture, PictureType};
use super::properties::StreamParameters;
use crate::flac::FlacFile;
use crate::id3::uslt::decode_lyrics;
use crate::mpeg::Mp3File;

/// The format independent result of a read
///
/// Every field is optional. Tag entries are applied in order, so later entries overwrite
/// earlier ones, with the exception of artwork: a front cover is never replaced by another
/// picture type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedMetadata {
	/// Title
	pub title: Option<String>,
	/// Album title
	pub album: Option<String>,
	/// Artist
	pub artist: Option<String>,
	/// Album artist
	pub album_artist: Option<String>,
	/// Composer
	pub composer: Option<String>,
	/// Recording year
	pub year: Option<u32>,
	/// Track number
	pub track_number: Option<u32>,
	/// Number of tracks on the album
	pub total_tracks: Option<u32>,
	/// Genre
	pub genre: Option<String>,
	/// Description
	pub description: Option<String>,
	/// Duration in milliseconds
	pub duration_ms: Option<u64>,
	/// Encoded artwork
	pub artwork: Option<Vec<u8>>,
	/// MIME type of [`UnifiedMetadata::artwork`]
	pub artwork_mime: Option<String>,
	/// Unsynchronized lyrics
	pub lyrics: Option<String>,
	/// Bitrate (bits per second)
	pub bitrate: Option<u32>,
	/// Sample rate (Hz)
	pub sample_rate: Option<u32>,
	/// Everything the reader recovered from the stream headers
	pub stream: StreamParameters,
	artwork_type: Option<PictureType>,
}

impl UnifiedMetadata {
	/// Metadata from tag entries alone, without stream parameters
	pub fn from_entries(entries: &MetadataList) -> Self {
		let mut metadata = Self::default();
		metadata.populate_all(entries);
		metadata
	}

	/// Apply every entry of `entries`, in order
	pub fn populate_all(&mut self, entries: &MetadataList) {
		for entry in entries {
			self.populate(entry);
		}
	}

	/// Apply a single entry
	///
	/// Unparsable numbers are ignored, they never fail the read.
	pub fn populate(&mut self, entry: &TagEntry) {
		match entry {
			TagEntry::Text(frame) => self.populate_text(frame),
			TagEntry::VorbisComment(comment) => self.populate_vorbis(comment),
			TagEntry::Picture(picture) => self.maybe_set_artwork(picture),
			TagEntry::Binary(frame) if frame.id.eq_ignore_ascii_case("USLT") => {
				if self.lyrics.is_none() {
					self.lyrics = decode_lyrics(&frame.data).filter(|lyrics| !lyrics.is_empty());
				}
			},
			TagEntry::Comment(_)
			| TagEntry::Url(_)
			| TagEntry::Binary(_)
			| TagEntry::Internal(_)
			| TagEntry::Chapter(_)
			| TagEntry::ChapterToc(_) => {},
		}
	}

	fn populate_text(&mut self, frame: &TextFrame) {
		let Some(value) = frame.value() else {
			return;
		};

		match frame.id.as_str() {
			"TIT2" | "TT2" => self.title = Some(value.to_string()),
			"TALB" | "TAL" => self.album = Some(value.to_string()),
			"TPE1" | "TP1" => self.artist = Some(value.to_string()),
			"TPE2" | "TP2" => self.album_artist = Some(value.to_string()),
			"TCOM" | "TCM" => self.composer = Some(value.to_string()),
			"TCON" | "TCO" => self.genre = Some(value.to_string()),
			"TRCK" | "TRK" => {
				let mut parts = value.split('/');
				if let Some(number) = parts.next().and_then(parse_number) {
					self.track_number = Some(number);
				}
				if let Some(total) = parts.next().and_then(parse_number) {
					self.total_tracks = Some(total);
				}
			},
			"TYER" | "TYE" | "TDRC" | "TDOR" => {
				if let Some(year) = parse_year(value) {
					self.year = Some(year);
				}
			},
			_ => {},
		}
	}

	fn populate_vorbis(&mut self, comment: &VorbisComment) {
		let value = comment.value.as_str();

		match comment.key.as_str() {
			"TITLE" => self.title = Some(value.to_string()),
			"ARTIST" => self.artist = Some(value.to_string()),
			"ALBUM" => self.album = Some(value.to_string()),
			"ALBUMARTIST" => self.album_artist = Some(value.to_string()),
			"COMPOSER" => self.composer = Some(value.to_string()),
			"GENRE" => self.genre = Some(value.to_string()),
			"DESCRIPTION" => self.description = Some(value.to_string()),
			"TRACKNUMBER" => {
				if let Some(number) = parse_number(value) {
					self.track_number = Some(number);
				}
			},
			"TRACKTOTAL" | "TOTALTRACKS" => {
				if let Some(total) = parse_number(value) {
					self.total_tracks = Some(total);
				}
			},
			"DATE" | "ORIGINALDATE" | "ORIGINALYEAR" => {
				if let Some(year) = parse_year(value) {
					self.year = Some(year);
				}
			},
			"LYRICS" => {
				if self.lyrics.is_none() {
					self.lyrics = Some(value.to_string());
				}
			},
			_ => {},
		}
	}

	fn maybe_set_artwork(&mut self, picture: &Picture) {
		let replace = self.artwork.is_none()
			|| picture.pic_type == PictureType::CoverFront
			|| self.artwork_type != Some(PictureType::CoverFront);

		if replace {
			self.artwork = Some(picture.data.clone());
			self.artwork_mime = Some(picture.mime_type.clone());
			self.artwork_type = Some(picture.pic_type);
		}
	}

	fn apply_stream(&mut self, stream: StreamParameters) {
		self.duration_ms = stream
			.duration()
			.map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
		self.bitrate = stream.bitrate();
		self.sample_rate = stream.sample_rate();
		self.stream = stream;
	}
}

fn parse_number(value: &str) -> Option<u32> {
	value.trim().parse().ok()
}

// "2004", "2004-05" and "2004-05-17T12:00" all start with the year
fn parse_year(value: &str) -> Option<u32> {
	value.split('-').next().and_then(parse_number)
}

impl From<Mp3File> for UnifiedMetadata {
	fn from(input: Mp3File) -> Self {
		let mut metadata = Self::default();

		if let Some(id3v2) = &input.id3v2 {
			metadata.populate_all(id3v2);
		}

		metadata.apply_stream(input.properties);
		metadata
	}
}

impl From<FlacFile> for UnifiedMetadata {
	fn from(input: FlacFile) -> Self {
		let mut metadata = Self::default();

		for entry in &input.metadata.entries {
			metadata.populate(entry);
		}

		// A leading ID3v2 tag is applied last, so it wins over Vorbis comments
		if let Some(id3v2) = &input.id3v2 {
			metadata.populate_all(id3v2);
		}

		metadata.apply_stream(input.properties);
		metadata
	}
}

#[cfg(test)]
mod tests {
	use super::UnifiedMetadata;
	use crate::types::entry::{BinaryFrame, MetadataList, TagEntry, TextFrame, VorbisComment};
	use crate::types::picture::{Picture, PictureType};

	use pretty_assertions::assert_eq;

	fn vorbis(key: &str, value: &str) -> TagEntry {
		TagEntry::VorbisComment(VorbisComment::new(key, value))
	}

	fn text(id: &str, value: &str) -> TagEntry {
		TagEntry::Text(TextFrame {
			id: id.to_string(),
			description: None,
			values: vec![value.to_string()],
		})
	}

	fn picture(pic_type: PictureType, data: u8) -> TagEntry {
		TagEntry::Picture(Picture {
			pic_type,
			mime_type: String::from("image/png"),
			description: String::new(),
			width: 0,
			height: 0,
			color_depth: 0,
			num_colors: 0,
			data: vec![data],
		})
	}

	#[test]
	fn bad_track_number_is_ignored() {
		let metadata = UnifiedMetadata::from_entries(&MetadataList::new(vec![
			vorbis("TITLE", "Foo"),
			vorbis("TRACKNUMBER", "N/A"),
			vorbis("ARTIST", "Bar"),
			vorbis("DATE", "1999-03-01"),
			vorbis("TRACKTOTAL", "12"),
		]));

		assert_eq!(metadata.track_number, None);
		assert_eq!(metadata.title.as_deref(), Some("Foo"));
		assert_eq!(metadata.artist.as_deref(), Some("Bar"));
		assert_eq!(metadata.year, Some(1999));
		assert_eq!(metadata.total_tracks, Some(12));
	}

	#[test]
	fn id3_text_frames() {
		let metadata = UnifiedMetadata::from_entries(&MetadataList::new(vec![
			text("TT2", "Old title"),
			text("TIT2", "Title"),
			text("TALB", "Album"),
			text("TPE2", "Album artist"),
			text("TCOM", "Composer"),
			text("TRCK", "3/10"),
			text("TDRC", "2004-05-17"),
			text("TXXX", "ignored"),
		]));

		assert_eq!(metadata.title.as_deref(), Some("Title"));
		assert_eq!(metadata.album.as_deref(), Some("Album"));
		assert_eq!(metadata.album_artist.as_deref(), Some("Album artist"));
		assert_eq!(metadata.composer.as_deref(), Some("Composer"));
		assert_eq!(metadata.track_number, Some(3));
		assert_eq!(metadata.total_tracks, Some(10));
		assert_eq!(metadata.year, Some(2004));
	}

	#[test]
	fn front_cover_wins() {
		let metadata = UnifiedMetadata::from_entries(&MetadataList::new(vec![
			picture(PictureType::Other, 1),
			picture(PictureType::CoverFront, 2),
			picture(PictureType::CoverBack, 3),
		]));
		assert_eq!(metadata.artwork, Some(vec![2]));
		assert_eq!(metadata.artwork_mime.as_deref(), Some("image/png"));

		let metadata = UnifiedMetadata::from_entries(&MetadataList::new(vec![
			picture(PictureType::Other, 1),
			picture(PictureType::CoverBack, 3),
		]));
		assert_eq!(metadata.artwork, Some(vec![3]));
	}

	#[test]
	fn lyrics() {
		let mut uslt = vec![0];
		uslt.extend_from_slice(b"eng");
		uslt.extend_from_slice(b"desc\0La la la");

		let metadata = UnifiedMetadata::from_entries(&MetadataList::new(vec![
			TagEntry::Binary(BinaryFrame {
				id: String::from("USLT"),
				data: uslt,
			}),
			vorbis("lyrics", "ignored, USLT came first"),
		]));
		assert_eq!(metadata.lyrics.as_deref(), Some("La la la"));

		// Frames too short to hold lyrics are skipped
		let metadata = UnifiedMetadata::from_entries(&MetadataList::new(vec![
			TagEntry::Binary(BinaryFrame {
				id: String::from("USLT"),
				data: vec![0, b'e'],
			}),
			vorbis("LYRICS", "Second"),
		]));
		assert_eq!(metadata.lyrics.as_deref(), Some("Second"));

		// So are frames with empty text, the first non-empty source wins
		let metadata = UnifiedMetadata::from_entries(&MetadataList::new(vec![
			TagEntry::Binary(BinaryFrame {
				id: String::from("USLT"),
				data: b"\x00engdesc\0".to_vec(),
			}),
			vorbis("LYRICS", "Second"),
		]));
		assert_eq!(metadata.lyrics.as_deref(), Some("Second"));
	}
}
