use crate::error::Result;
use crate::id3::Id3v2Version;
use crate::mpeg::{MAX_SNIFF_BYTES, MAX_SYNC_BYTES};

use figment::providers::{Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use std::path::Path;

/// Options controlling how much of a stream is read
///
/// Can be built in code, or loaded from a TOML file where every key is optional:
///
/// ```toml
/// read_pictures = false
/// max_sync_bytes = 65536
/// id3_frame_filter = ["TIT2", "TPE1", "TALB"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)] // allow missing fields and fill them with the `..Self::default()` in this struct
#[allow(clippy::struct_excessive_bools)]
pub struct ParseOptions {
	/// Merge title, artist, album and other general tag items
	///
	/// Gapless hints are read from ID3 tags even when this is disabled.
	pub read_tags: bool,
	/// Keep artwork bytes
	pub read_pictures: bool,
	/// Compute duration, bitrate and the other stream parameters
	pub read_properties: bool,
	/// Bytes searched for a synchronized MPEG stream when reading
	pub max_sync_bytes: usize,
	/// Bytes searched for a synchronized MPEG stream when guessing the format
	pub max_sniff_bytes: usize,
	/// Only decode ID3 frames with these IDs, all frames are decoded when unset
	///
	/// Frames needed for gapless playback and duration (`COMM`, `TLEN` and `----`, or
	/// their ID3v2.2 equivalents) are always decoded.
	pub id3_frame_filter: Option<Vec<String>>,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			read_tags: true,
			read_pictures: true,
			read_properties: true,
			max_sync_bytes: MAX_SYNC_BYTES,
			max_sniff_bytes: MAX_SNIFF_BYTES,
			id3_frame_filter: None,
		}
	}
}

/// ID3 frames the MP3 reader needs regardless of [`ParseOptions::read_tags`]
const ESSENTIAL_FRAMES: &[&str] = &["COMM", "COM", "TLEN", "TLE", "----"];

impl ParseOptions {
	/// Load options from a TOML file
	///
	/// # Errors
	///
	/// The file can't be read or has values of the wrong type
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let data: Self = Figment::new().merge(Toml::file(path)).extract()?;

		Ok(data)
	}

	/// Load options from a TOML document
	///
	/// # Errors
	///
	/// The document is invalid TOML or has values of the wrong type
	pub fn from_toml_str(toml: &str) -> Result<Self> {
		let data: Self = Figment::new().merge(Toml::string(toml)).extract()?;

		Ok(data)
	}

	/// Whether the ID3 frame `id` should be decoded
	pub fn accepts_id3_frame(&self, _version: Id3v2Version, id: &str) -> bool {
		if ESSENTIAL_FRAMES.contains(&id) {
			return true;
		}

		if !self.read_tags {
			return false;
		}

		if !self.read_pictures && matches!(id, "APIC" | "PIC") {
			return false;
		}

		match &self.id3_frame_filter {
			Some(filter) => filter.iter().any(|allowed| allowed == id),
			None => true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::ParseOptions;
	use crate::id3::Id3v2Version;
	use crate::mpeg::{MAX_SNIFF_BYTES, MAX_SYNC_BYTES};

	use pretty_assertions::assert_eq;
	use std::io::Write;

	#[test]
	fn defaults() {
		let options = ParseOptions::default();

		assert!(options.read_tags);
		assert!(options.read_pictures);
		assert!(options.read_properties);
		assert_eq!(options.max_sync_bytes, MAX_SYNC_BYTES);
		assert_eq!(options.max_sniff_bytes, MAX_SNIFF_BYTES);
		assert_eq!(options.id3_frame_filter, None);
	}

	#[test]
	fn partial_toml() {
		let options = ParseOptions::from_toml_str(
			r#"
			read_pictures = false
			max_sync_bytes = 4096
			id3_frame_filter = ["TIT2", "TPE1"]
			"#,
		)
		.unwrap();

		assert_eq!(
			options,
			ParseOptions {
				read_pictures: false,
				max_sync_bytes: 4096,
				id3_frame_filter: Some(vec![String::from("TIT2"), String::from("TPE1")]),
				..ParseOptions::default()
			}
		);
	}

	#[test]
	fn wrong_type_is_an_error() {
		assert!(ParseOptions::from_toml_str("read_tags = 5").is_err());
	}

	#[test]
	fn from_file() {
		let options = ParseOptions {
			read_properties: false,
			max_sniff_bytes: 1024,
			..ParseOptions::default()
		};

		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(toml::to_string(&options).unwrap().as_bytes())
			.unwrap();

		assert_eq!(ParseOptions::from_file(file.path()).unwrap(), options);
	}

	#[test]
	fn frame_filter() {
		let options = ParseOptions {
			id3_frame_filter: Some(vec![String::from("TIT2")]),
			..ParseOptions::default()
		};

		assert!(options.accepts_id3_frame(Id3v2Version::V4, "TIT2"));
		assert!(!options.accepts_id3_frame(Id3v2Version::V4, "TPE1"));
		// Still needed for gapless playback
		assert!(options.accepts_id3_frame(Id3v2Version::V4, "COMM"));

		let no_tags = ParseOptions {
			read_tags: false,
			..ParseOptions::default()
		};
		assert!(!no_tags.accepts_id3_frame(Id3v2Version::V3, "TIT2"));
		assert!(no_tags.accepts_id3_frame(Id3v2Version::V2, "TLE"));

		let no_pictures = ParseOptions {
			read_pictures: false,
			..ParseOptions::default()
		};
		assert!(!no_pictures.accepts_id3_frame(Id3v2Version::V3, "APIC"));
		assert!(no_pictures.accepts_id3_frame(Id3v2Version::V3, "TALB"));
	}
}
