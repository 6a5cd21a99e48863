use super::picture::Picture;

/// A single decoded tag item
///
/// ID3v2 frames and Vorbis comments both decode into this type. Entries are never mutated
/// after decoding, they are folded into [`UnifiedMetadata`](crate::UnifiedMetadata) once
/// the whole [`MetadataList`] is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEntry {
	/// `T***` text information frames, including `TXXX`
	Text(TextFrame),
	/// `COMM` comment frames
	Comment(CommentFrame),
	/// `W***` URL link frames, including `WXXX`
	Url(UrlFrame),
	/// Any frame without a dedicated decoder, the payload is kept verbatim
	Binary(BinaryFrame),
	/// `----` frames (`mean`/`name`/value triples written by Apple encoders)
	Internal(InternalFrame),
	/// `CHAP` chapter frames
	Chapter(ChapterFrame),
	/// `CTOC` table of contents frames
	ChapterToc(ChapterTocFrame),
	/// A `KEY=value` pair from a Vorbis comment block
	VorbisComment(VorbisComment),
	/// `APIC`/`PIC` frames and FLAC `PICTURE` blocks
	Picture(Picture),
}

/// A text information frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
	/// The frame ID, 3 characters for ID3v2.2 tags
	pub id: String,
	/// The description, only present in `TXXX`
	pub description: Option<String>,
	/// The null separated values
	pub values: Vec<String>,
}

impl TextFrame {
	/// The first value, if any
	pub fn value(&self) -> Option<&str> {
		self.values.first().map(String::as_str)
	}
}

/// A comment frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFrame {
	/// ISO-639-2 language code
	pub language: String,
	/// Short content description
	pub description: String,
	/// The comment itself
	pub text: String,
}

/// A URL link frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFrame {
	/// The frame ID
	pub id: String,
	/// The description, only present in `WXXX`
	pub description: Option<String>,
	/// The URL
	pub url: String,
}

/// A frame kept as raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFrame {
	/// The frame ID
	pub id: String,
	/// The frame payload
	pub data: Vec<u8>,
}

/// An internal frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalFrame {
	/// Reverse domain of the writer (`com.apple.iTunes`)
	pub domain: String,
	/// The item name (`iTunSMPB`, ...)
	pub description: String,
	/// The item value
	pub text: String,
}

/// A chapter frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFrame {
	/// Unique element ID
	pub chapter_id: String,
	/// Start time in milliseconds
	pub start_time_ms: u32,
	/// End time in milliseconds
	pub end_time_ms: u32,
	/// Start offset in bytes, `None` when the frame uses `0xFFFFFFFF`
	pub start_offset: Option<u32>,
	/// End offset in bytes, `None` when the frame uses `0xFFFFFFFF`
	pub end_offset: Option<u32>,
	/// Embedded frames
	pub sub_frames: Vec<TagEntry>,
}

/// A table of contents frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterTocFrame {
	/// Unique element ID
	pub element_id: String,
	/// Whether this is the root of the table of contents
	pub is_root: bool,
	/// Whether the children are ordered
	pub is_ordered: bool,
	/// Element IDs of the children
	pub children: Vec<String>,
	/// Embedded frames
	pub sub_frames: Vec<TagEntry>,
}

/// A Vorbis comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VorbisComment {
	/// The key, upper-cased
	pub key: String,
	/// The value, verbatim
	pub value: String,
}

impl VorbisComment {
	/// Create a comment, upper-casing the key
	pub fn new(key: &str, value: impl Into<String>) -> Self {
		Self {
			key: key.to_ascii_uppercase(),
			value: value.into(),
		}
	}
}

/// An ordered list of [`TagEntry`], frozen once decoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataList {
	entries: Vec<TagEntry>,
}

impl MetadataList {
	/// Freeze a list of entries
	pub fn new(entries: Vec<TagEntry>) -> Self {
		Self { entries }
	}

	/// Number of entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the list has no entries
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Get the entry at `index`
	pub fn get(&self, index: usize) -> Option<&TagEntry> {
		self.entries.get(index)
	}

	/// Iterate over the entries in decode order
	pub fn iter(&self) -> std::slice::Iter<'_, TagEntry> {
		self.entries.iter()
	}

	/// A new list with `other`'s entries after this list's
	#[must_use]
	pub fn concat(&self, other: &MetadataList) -> MetadataList {
		let mut entries = self.entries.clone();
		entries.extend(other.entries.iter().cloned());

		MetadataList { entries }
	}

	/// Find the first text frame whose ID is one of `ids`
	pub fn text(&self, ids: &[&str]) -> Option<&TextFrame> {
		self.entries.iter().find_map(|entry| match entry {
			TagEntry::Text(frame) if ids.contains(&frame.id.as_str()) => Some(frame),
			_ => None,
		})
	}
}

impl<'a> IntoIterator for &'a MetadataList {
	type Item = &'a TagEntry;
	type IntoIter = std::slice::Iter<'a, TagEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl IntoIterator for MetadataList {
	type Item = TagEntry;
	type IntoIter = std::vec::IntoIter<TagEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}
