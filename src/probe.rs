use crate::config::ParseOptions;
use crate::error::{MetaError, Result};
use crate::flac::{FlacFile, FLAC_MARKER};
use crate::id3::header::is_id3_header;
use crate::id3::{unsynch_u32, ID3_HEADER_LEN};
use crate::mpeg::{synchronize, Mp3File, SyncMode};
use crate::source::{ByteSource, ReadSource, SliceSource};
use crate::types::metadata::UnifiedMetadata;

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// The supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FileType {
	Mp3,
	Flac,
}

impl FileType {
	/// Attempts to extract a [`FileType`] from an extension
	pub fn from_ext<E>(ext: E) -> Option<Self>
	where
		E: AsRef<OsStr>,
	{
		let ext = ext.as_ref().to_str()?.to_ascii_lowercase();

		match ext.as_str() {
			"mp3" | "mp2" | "mp1" | "mpga" => Some(Self::Mp3),
			"flac" => Some(Self::Flac),
			_ => None,
		}
	}

	/// Attempts to determine a [`FileType`] from a path
	pub fn from_path<P>(path: P) -> Option<Self>
	where
		P: AsRef<Path>,
	{
		path.as_ref().extension().and_then(Self::from_ext)
	}
}

/// A format agnostic reader
///
/// The [`FileType`] can be set up front, inferred from a path by [`Probe::open`], or guessed
/// from the content with [`Probe::guess_file_type`]. Content based detection wins over the
/// extension.
pub struct Probe<S> {
	source: S,
	file_type: Option<FileType>,
	options: ParseOptions,
}

impl<S: ByteSource> Probe<S> {
	/// Create a new `Probe`
	pub fn new(source: S) -> Self {
		Self {
			source,
			file_type: None,
			options: ParseOptions::default(),
		}
	}

	/// Create a new `Probe` with a specified [`FileType`]
	pub fn with_file_type(source: S, file_type: FileType) -> Self {
		Self {
			source,
			file_type: Some(file_type),
			options: ParseOptions::default(),
		}
	}

	/// Set the [`ParseOptions`] used for guessing and reading
	#[must_use]
	pub fn options(mut self, options: ParseOptions) -> Self {
		self.options = options;
		self
	}

	/// Returns the current [`FileType`]
	pub fn file_type(&self) -> Option<FileType> {
		self.file_type
	}

	/// Set the [`FileType`] with which to read the stream
	pub fn set_file_type(&mut self, file_type: FileType) {
		self.file_type = Some(file_type);
	}

	/// Extract the source
	pub fn into_inner(self) -> S {
		self.source
	}

	/// Attempts to get the [`FileType`] based on the content of the source
	///
	/// On success, the file type will be replaced. The source is left where it was.
	///
	/// # Errors
	///
	/// The source fails. There is likely an issue with the underlying reader, and the entire
	/// `Probe` should be discarded.
	pub fn guess_file_type(mut self) -> Result<Self> {
		self.source.reset_peek_position();

		let checkpoint = self.source.begin_transaction();
		let guessed = sniff(&mut self.source, self.options.max_sniff_bytes);
		self.source.rollback(checkpoint)?;

		let guessed = guessed?;
		match guessed {
			Some(file_type) => debug!("Guessed {file_type:?} from content"),
			None => debug!("Unable to guess format from content"),
		}

		self.file_type = guessed.or(self.file_type);
		Ok(self)
	}

	/// Read the stream as the current [`FileType`]
	///
	/// # Errors
	///
	/// * No file type was set or guessed ([`MetaError::UnknownFormat`])
	/// * See [`Mp3File::read_from`] and [`FlacFile::read_from`]
	pub fn read(mut self) -> Result<UnifiedMetadata> {
		let file_type = self.file_type.ok_or(MetaError::UnknownFormat)?;

		match file_type {
			FileType::Mp3 => Mp3File::read_from(&mut self.source, &self.options).map(Into::into),
			FileType::Flac => FlacFile::read_from(&mut self.source, &self.options).map(Into::into),
		}
	}
}

impl Probe<ReadSource<BufReader<File>>> {
	/// Opens a file for reading
	///
	/// This will initially guess the [`FileType`] from the path, but this can be overwritten
	/// with [`Probe::guess_file_type`] or [`Probe::set_file_type`]
	///
	/// # Errors
	///
	/// `path` does not exist, or can't be read
	pub fn open<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();

		Ok(Self {
			source: ReadSource::new(BufReader::new(File::open(path)?))?,
			file_type: FileType::from_path(path),
			options: ParseOptions::default(),
		})
	}
}

// Peek the length of an ID3v2 tag at the peek position, leaving the peek position alone
fn peek_id3_len(source: &mut dyn ByteSource) -> Result<Option<u64>> {
	let mut header = [0; ID3_HEADER_LEN];

	let checkpoint = source.begin_transaction();
	let peeked = match source.peek_fully(&mut header, true) {
		Ok(peeked) => peeked,
		Err(err) if err.is_end_of_input() => false,
		Err(err) => return Err(err),
	};
	source.rollback(checkpoint)?;

	if !peeked || !is_id3_header(&header) {
		return Ok(None);
	}

	let size = unsynch_u32(u32::from_be_bytes([
		header[6], header[7], header[8], header[9],
	]));
	Ok(Some(ID3_HEADER_LEN as u64 + u64::from(size)))
}

fn sniff(source: &mut dyn ByteSource, max_sniff_bytes: usize) -> Result<Option<FileType>> {
	// Any number of ID3v2 tags may precede either format
	while let Some(tag_len) = peek_id3_len(source)? {
		match source.advance_peek_position(tag_len, true) {
			Ok(true) => {},
			Ok(false) => return Ok(None),
			Err(err) if err.is_end_of_input() => return Ok(None),
			Err(err) => return Err(err),
		}
	}

	let mut marker = [0; 4];
	let checkpoint = source.begin_transaction();
	let peeked = match source.peek_fully(&mut marker, true) {
		Ok(peeked) => peeked,
		Err(err) if err.is_end_of_input() => false,
		Err(err) => return Err(err),
	};
	source.rollback(checkpoint)?;

	if peeked && &marker == FLAC_MARKER {
		return Ok(Some(FileType::Flac));
	}

	Ok(synchronize(source, SyncMode::Sniff, max_sniff_bytes)?.map(|_| FileType::Mp3))
}

/// Read metadata from a file, guessing its format from the content, then the extension
///
/// # Errors
///
/// * `path` does not exist, or can't be read
/// * The format can't be determined ([`MetaError::UnknownFormat`])
/// * See [`Probe::read`]
pub fn read_from_path<P>(path: P, options: &ParseOptions) -> Result<UnifiedMetadata>
where
	P: AsRef<Path>,
{
	Probe::open(path)?
		.options(options.clone())
		.guess_file_type()?
		.read()
}

/// Read metadata from a seekable reader, guessing its format from the content
///
/// # Errors
///
/// * The format can't be determined ([`MetaError::UnknownFormat`])
/// * See [`Probe::read`]
pub fn read_from<R>(reader: R, options: &ParseOptions) -> Result<UnifiedMetadata>
where
	R: Read + Seek,
{
	Probe::new(ReadSource::new(reader)?)
		.options(options.clone())
		.guess_file_type()?
		.read()
}

/// Read metadata from an in-memory blob, guessing its format from the content
///
/// # Errors
///
/// See [`read_from`]
pub fn read_from_slice(data: &[u8], options: &ParseOptions) -> Result<UnifiedMetadata> {
	Probe::new(SliceSource::new(data))
		.options(options.clone())
		.guess_file_type()?
		.read()
}
