//! Read embedded metadata from MP3 and FLAC streams without decoding audio.
//!
//! # Supported Formats
//!
//! | File Format | Extensions                      | Metadata Format(s)                  |
//! |-------------|---------------------------------|-------------------------------------|
//! | FLAC        | `flac`                          | `Vorbis Comments`, `ID3v2`          |
//! | MP3         | `mp3`, `mp2`, `mp1`, `mpga`     | `ID3v2`, `Xing`/`Info`/`VBRI`, LAME |
//!
//! # Examples
//!
//! ## Reading a file
//! ```rust,no_run
//! # fn main() -> metaprobe::Result<()> {
//! use metaprobe::{read_from_path, ParseOptions};
//!
//! let metadata = read_from_path("song.mp3", &ParseOptions::default())?;
//!
//! println!("{:?} by {:?}", metadata.title, metadata.artist);
//! println!("{:?} ms", metadata.duration_ms);
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading a specific format from memory
//! ```rust,no_run
//! # fn main() -> metaprobe::Result<()> {
//! use metaprobe::{FileType, ParseOptions, Probe, SliceSource};
//!
//! let data = std::fs::read("song.flac")?;
//! let options = ParseOptions {
//! 	read_pictures: false,
//! 	..ParseOptions::default()
//! };
//!
//! let metadata = Probe::with_file_type(SliceSource::new(&data), FileType::Flac)
//! 	.options(options)
//! 	.read()?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::correctness)]
#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(
	clippy::missing_errors_doc,
	clippy::must_use_candidate,
	clippy::cast_possible_truncation,
	clippy::module_name_repetitions
)]

#[macro_use]
extern crate log;

mod config;
pub mod cursor;
mod error;
pub mod flac;
pub mod id3;
pub mod mpeg;
mod probe;
pub mod source;
mod types;

pub use crate::config::ParseOptions;
pub use crate::cursor::ByteCursor;
pub use crate::error::{MetaError, Result};
pub use crate::flac::FlacFile;
pub use crate::mpeg::Mp3File;
pub use crate::probe::{read_from, read_from_path, read_from_slice, FileType, Probe};
pub use crate::source::{ByteSource, Checkpoint, ReadSource, SliceSource};
pub use crate::types::entry::{
	BinaryFrame, ChapterFrame, ChapterTocFrame, CommentFrame, InternalFrame, MetadataList,
	TagEntry, TextFrame, UrlFrame, VorbisComment,
};
pub use crate::types::metadata::UnifiedMetadata;
pub use crate::types::picture::{Picture, PictureType};
pub use crate::types::properties::StreamParameters;
