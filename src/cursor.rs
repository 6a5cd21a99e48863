use crate::error::{MetaError, Result};
use crate::id3::text::{decode_span, TextEncoding};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// A bounds-checked, position-tracking view over a byte buffer
///
/// All multi-byte integers are read big-endian unless the method name says otherwise.
/// Any read that would pass the end of the buffer fails with [`MetaError::OutOfBounds`]
/// and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	position: usize,
}

impl<'a> ByteCursor<'a> {
	/// Create a cursor positioned at the start of `data`
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, position: 0 }
	}

	/// Current read position
	pub fn position(&self) -> usize {
		self.position
	}

	/// Total length of the underlying buffer
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether the underlying buffer is empty
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Number of bytes left to read
	pub fn remaining(&self) -> usize {
		self.data.len() - self.position
	}

	/// Move to an absolute position
	///
	/// # Errors
	///
	/// `position` is past the end of the buffer
	pub fn set_position(&mut self, position: usize) -> Result<()> {
		if position > self.data.len() {
			return Err(MetaError::OutOfBounds {
				requested: position - self.position.min(position),
				remaining: self.remaining(),
			});
		}

		self.position = position;
		Ok(())
	}

	/// Everything from the current position to the end, without consuming it
	pub fn remaining_slice(&self) -> &'a [u8] {
		&self.data[self.position..]
	}

	/// Advance by `n` bytes
	///
	/// # Errors
	///
	/// Fewer than `n` bytes remain
	pub fn skip(&mut self, n: usize) -> Result<()> {
		self.read_bytes(n).map(|_| ())
	}

	/// Read the next `n` bytes
	///
	/// # Errors
	///
	/// Fewer than `n` bytes remain
	pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(MetaError::OutOfBounds {
				requested: n,
				remaining: self.remaining(),
			});
		}

		let start = self.position;
		self.position += n;
		Ok(&self.data[start..self.position])
	}

	/// Read `n` bytes and decode them as a string in `encoding`
	///
	/// Decoding is lossy, invalid sequences become U+FFFD.
	///
	/// # Errors
	///
	/// Fewer than `n` bytes remain
	pub fn read_fixed_string(&mut self, n: usize, encoding: TextEncoding) -> Result<String> {
		let bytes = self.read_bytes(n)?;
		Ok(decode_span(bytes, 0, bytes.len(), encoding))
	}

	/// # Errors
	///
	/// The buffer is exhausted
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_bytes(1)?[0])
	}

	/// # Errors
	///
	/// Fewer than 2 bytes remain
	pub fn read_u16(&mut self) -> Result<u16> {
		self.read_bytes(2).map(BigEndian::read_u16)
	}

	/// # Errors
	///
	/// Fewer than 3 bytes remain
	pub fn read_u24(&mut self) -> Result<u32> {
		self.read_bytes(3).map(BigEndian::read_u24)
	}

	/// # Errors
	///
	/// Fewer than 4 bytes remain
	pub fn read_u32(&mut self) -> Result<u32> {
		self.read_bytes(4).map(BigEndian::read_u32)
	}

	/// # Errors
	///
	/// Fewer than 8 bytes remain
	pub fn read_u64(&mut self) -> Result<u64> {
		self.read_bytes(8).map(BigEndian::read_u64)
	}

	/// Little-endian `u32`, used by Vorbis comments
	///
	/// # Errors
	///
	/// Fewer than 4 bytes remain
	pub fn read_u32_le(&mut self) -> Result<u32> {
		self.read_bytes(4).map(LittleEndian::read_u32)
	}

	/// Read a 4 byte synchsafe integer (7 usable bits per byte)
	///
	/// # Errors
	///
	/// Fewer than 4 bytes remain
	pub fn read_synchsafe_u32(&mut self) -> Result<u32> {
		self.read_u32().map(crate::id3::unsynch_u32)
	}
}
