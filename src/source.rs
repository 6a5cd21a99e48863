//! Peekable byte sources
//!
//! Every reader in this crate works against a [`ByteSource`]. A source has a *position*,
//! the first byte not yet consumed, and a *peek position* at or after it. Peeking reads
//! at the peek position and advances only the peek position, so a reader can look ahead
//! and then either consume what it saw or fall back.
//!
//! Speculative reads are expressed as transactions, see [`ByteSource::begin_transaction`].

use crate::error::{MetaError, Result};

use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// A marker for the start of a speculative read
///
/// Obtained from [`ByteSource::begin_transaction`], and resolved exactly once by passing it to
/// either [`ByteSource::commit`] or [`ByteSource::rollback`].
#[must_use = "a transaction must be committed or rolled back"]
#[derive(Debug, PartialEq, Eq)]
pub struct Checkpoint {
	peek_position: u64,
}

impl Checkpoint {
	/// The peek position when the transaction began
	pub fn peek_position(&self) -> u64 {
		self.peek_position
	}
}

/// A stream of bytes that supports peeking ahead without consuming
pub trait ByteSource {
	/// Peek up to `buf.len()` bytes, returning how many were read (0 at the end of input)
	///
	/// # Errors
	///
	/// The underlying reader fails
	fn peek(&mut self, buf: &mut [u8]) -> Result<usize>;

	/// Peek exactly `buf.len()` bytes
	///
	/// Returns `Ok(false)` if `allow_end_of_input` is set and the input ended before the first
	/// byte. The peek position is unchanged in that case.
	///
	/// # Errors
	///
	/// * The input ends after some, but not all, of the bytes ([`MetaError::EndOfInput`])
	/// * The input ends before any byte and `allow_end_of_input` is not set
	fn peek_fully(&mut self, buf: &mut [u8], allow_end_of_input: bool) -> Result<bool>;

	/// Move the peek position forward by `n` bytes
	///
	/// Returns `Ok(false)` if `allow_end_of_input` is set and no bytes were available.
	///
	/// # Errors
	///
	/// See [`ByteSource::peek_fully`]
	fn advance_peek_position(&mut self, n: u64, allow_end_of_input: bool) -> Result<bool>;

	/// Move the peek position back to the position
	fn reset_peek_position(&mut self);

	/// Consume `n` bytes, resetting the peek position to the new position
	///
	/// # Errors
	///
	/// Fewer than `n` bytes remain
	fn skip_fully(&mut self, n: u64) -> Result<()>;

	/// The position of the first unconsumed byte
	fn position(&self) -> u64;

	/// The position the next peek reads from
	fn peek_position(&self) -> u64;

	/// The total length of the input, if known
	fn length(&self) -> Option<u64>;

	/// Consume exactly `buf.len()` bytes from the position
	///
	/// # Errors
	///
	/// Fewer than `buf.len()` bytes remain
	fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
		self.reset_peek_position();
		self.peek_fully(buf, false)?;
		self.skip_fully(buf.len() as u64)
	}

	/// Start a speculative read at the current peek position
	fn begin_transaction(&mut self) -> Checkpoint {
		Checkpoint {
			peek_position: self.peek_position(),
		}
	}

	/// Consume everything up to the current peek position
	///
	/// # Errors
	///
	/// The underlying reader fails while skipping
	fn commit(&mut self, checkpoint: Checkpoint) -> Result<()> {
		trace!(
			"Committing transaction started at {}, now at {}",
			checkpoint.peek_position,
			self.peek_position()
		);

		let n = self.peek_position() - self.position();
		self.skip_fully(n)
	}

	/// Restore the peek position to where the transaction began
	///
	/// # Errors
	///
	/// The underlying reader fails while restoring the peek position
	fn rollback(&mut self, checkpoint: Checkpoint) -> Result<()> {
		self.reset_peek_position();

		let offset = checkpoint.peek_position.saturating_sub(self.position());
		if offset > 0 {
			self.advance_peek_position(offset, false)?;
		}

		Ok(())
	}
}

fn available(length: u64, peek_position: u64) -> u64 {
	length.saturating_sub(peek_position)
}

fn check_available(available: u64, wanted: u64, allow_end_of_input: bool) -> Result<bool> {
	if wanted <= available {
		return Ok(true);
	}

	if available == 0 && allow_end_of_input {
		return Ok(false);
	}

	Err(MetaError::EndOfInput)
}

/// A [`ByteSource`] over an in-memory buffer
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
	data: &'a [u8],
	position: usize,
	peek_position: usize,
}

impl<'a> SliceSource<'a> {
	/// Create a source positioned at the start of `data`
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			position: 0,
			peek_position: 0,
		}
	}
}

impl ByteSource for SliceSource<'_> {
	fn peek(&mut self, buf: &mut [u8]) -> Result<usize> {
		let remaining = &self.data[self.peek_position..];
		let n = buf.len().min(remaining.len());

		buf[..n].copy_from_slice(&remaining[..n]);
		self.peek_position += n;

		Ok(n)
	}

	fn peek_fully(&mut self, buf: &mut [u8], allow_end_of_input: bool) -> Result<bool> {
		let available = available(self.data.len() as u64, self.peek_position as u64);
		if !check_available(available, buf.len() as u64, allow_end_of_input)? {
			return Ok(false);
		}

		let start = self.peek_position;
		buf.copy_from_slice(&self.data[start..start + buf.len()]);
		self.peek_position += buf.len();

		Ok(true)
	}

	fn advance_peek_position(&mut self, n: u64, allow_end_of_input: bool) -> Result<bool> {
		let available = available(self.data.len() as u64, self.peek_position as u64);
		if !check_available(available, n, allow_end_of_input)? {
			return Ok(false);
		}

		self.peek_position += n as usize;
		Ok(true)
	}

	fn reset_peek_position(&mut self) {
		self.peek_position = self.position;
	}

	fn skip_fully(&mut self, n: u64) -> Result<()> {
		let available = available(self.data.len() as u64, self.position as u64);
		check_available(available, n, false)?;

		self.position += n as usize;
		self.peek_position = self.position;

		Ok(())
	}

	fn position(&self) -> u64 {
		self.position as u64
	}

	fn peek_position(&self) -> u64 {
		self.peek_position as u64
	}

	fn length(&self) -> Option<u64> {
		Some(self.data.len() as u64)
	}
}

/// A [`ByteSource`] over any seekable reader
///
/// Only the bytes between the position and the furthest peek are buffered. Advancing the peek
/// position without reading does not buffer anything.
pub struct ReadSource<R> {
	reader: R,
	length: u64,
	position: u64,
	peek_position: u64,
	window_start: u64,
	window: Vec<u8>,
}

impl<R> ReadSource<R>
where
	R: Read + Seek,
{
	/// Wrap `reader`, starting at its current stream position
	///
	/// # Errors
	///
	/// Seeking the reader fails
	pub fn new(mut reader: R) -> Result<Self> {
		let position = reader.stream_position()?;
		let length = reader.seek(SeekFrom::End(0))?;
		reader.seek(SeekFrom::Start(position))?;

		Ok(Self {
			reader,
			length,
			position,
			peek_position: position,
			window_start: position,
			window: Vec::new(),
		})
	}

	/// Unwrap the reader
	pub fn into_inner(self) -> R {
		self.reader
	}

	fn window_end(&self) -> u64 {
		self.window_start + self.window.len() as u64
	}

	/// Make sure `[at, at + n)` is buffered, `n` must not pass the end of input
	fn fill(&mut self, at: u64, n: usize) -> Result<&[u8]> {
		let end = at + n as u64;

		if at < self.window_start || at > self.window_end() {
			self.window.clear();
			self.window_start = at;
		}

		let window_end = self.window_end();
		if end > window_end {
			let missing = (end - window_end) as usize;
			let old_len = self.window.len();
			self.window.resize(old_len + missing, 0);

			self.reader.seek(SeekFrom::Start(window_end))?;
			if let Err(e) = self.reader.read_exact(&mut self.window[old_len..]) {
				self.window.truncate(old_len);
				return Err(if e.kind() == ErrorKind::UnexpectedEof {
					MetaError::EndOfInput
				} else {
					e.into()
				});
			}
		}

		let offset = (at - self.window_start) as usize;
		Ok(&self.window[offset..offset + n])
	}

	/// Drop buffered bytes that can no longer be peeked
	fn discard_consumed(&mut self) {
		if self.position >= self.window_end() {
			self.window.clear();
			self.window_start = self.position;
		} else if self.position > self.window_start {
			let consumed = (self.position - self.window_start) as usize;
			self.window.drain(..consumed);
			self.window_start = self.position;
		}
	}
}

impl<R> ByteSource for ReadSource<R>
where
	R: Read + Seek,
{
	fn peek(&mut self, buf: &mut [u8]) -> Result<usize> {
		let n = (available(self.length, self.peek_position) as usize).min(buf.len());
		if n == 0 {
			return Ok(0);
		}

		let at = self.peek_position;
		let bytes = self.fill(at, n)?;
		buf[..n].copy_from_slice(bytes);
		self.peek_position += n as u64;

		Ok(n)
	}

	fn peek_fully(&mut self, buf: &mut [u8], allow_end_of_input: bool) -> Result<bool> {
		let available = available(self.length, self.peek_position);
		if !check_available(available, buf.len() as u64, allow_end_of_input)? {
			return Ok(false);
		}

		let at = self.peek_position;
		let bytes = self.fill(at, buf.len())?;
		buf.copy_from_slice(bytes);
		self.peek_position += buf.len() as u64;

		Ok(true)
	}

	fn advance_peek_position(&mut self, n: u64, allow_end_of_input: bool) -> Result<bool> {
		let available = available(self.length, self.peek_position);
		if !check_available(available, n, allow_end_of_input)? {
			return Ok(false);
		}

		self.peek_position += n;
		Ok(true)
	}

	fn reset_peek_position(&mut self) {
		self.peek_position = self.position;
	}

	fn skip_fully(&mut self, n: u64) -> Result<()> {
		check_available(available(self.length, self.position), n, false)?;

		self.position += n;
		self.peek_position = self.position;
		self.discard_consumed();

		Ok(())
	}

	fn position(&self) -> u64 {
		self.position
	}

	fn peek_position(&self) -> u64 {
		self.peek_position
	}

	fn length(&self) -> Option<u64> {
		Some(self.length)
	}
}
