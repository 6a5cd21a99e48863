//! Xing, Info and VBRI side information frames
//!
//! Encoders write one of these in place of the first audio frame. They carry the frame count
//! and stream size needed for an accurate duration, and LAME adds the encoder delay and
//! padding needed for gapless playback.

use super::constants::{SEEK_HEADER_INFO, SEEK_HEADER_VBRI, SEEK_HEADER_XING, VBRI_OFFSET};
use super::header::{FrameHeader, MpegVersion};
use crate::cursor::ByteCursor;

const MICROS_PER_SECOND: u64 = 1_000_000;

// Version string (9), revision & VBR method (1), lowpass filter (1), replay gain (8),
// encoding flags & ATH type (1), bitrate (1)
const LAME_BYTES_BEFORE_DELAY: usize = 9 + 1 + 1 + 8 + 1 + 1;

/// Offset of the `Xing`/`Info` tag within the frame, after the side information
pub fn xing_base(header: &FrameHeader) -> usize {
	match (header.version, header.channels) {
		(MpegVersion::V1, 1) => 21,
		(MpegVersion::V1, _) => 36,
		(_, 1) => 13,
		_ => 21,
	}
}

/// Whether a LAME frame declared a variable or constant bitrate stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XingKind {
	/// `Xing`, variable bitrate
	Xing,
	/// `Info`, constant bitrate
	Info,
}

/// A parsed `Xing` or `Info` frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XingFrame {
	/// Which tag introduced the frame
	pub kind: XingKind,
	/// Number of audio frames
	pub frame_count: Option<u32>,
	/// Size of the audio data in bytes
	pub data_size: Option<u32>,
	/// 100 entry seek table, each a position in 1/256ths of the stream
	pub table_of_contents: Option<[u8; 100]>,
	/// Samples of encoder delay
	pub encoder_delay: Option<u32>,
	/// Samples of encoder padding
	pub encoder_padding: Option<u32>,
}

impl XingFrame {
	/// Parse the fields following the 4 byte tag
	///
	/// Fields that don't fit in the frame are left unset.
	pub fn parse(kind: XingKind, cursor: &mut ByteCursor<'_>) -> Self {
		let mut frame = Self {
			kind,
			frame_count: None,
			data_size: None,
			table_of_contents: None,
			encoder_delay: None,
			encoder_padding: None,
		};

		let Ok(flags) = cursor.read_u32() else {
			debug!("Xing frame is missing its flags");
			return frame;
		};

		if flags & 0x01 != 0 {
			frame.frame_count = cursor.read_u32().ok();
		}

		if flags & 0x02 != 0 {
			frame.data_size = cursor.read_u32().ok();
		}

		if flags & 0x04 != 0 {
			frame.table_of_contents = cursor
				.read_bytes(100)
				.ok()
				.and_then(|toc| <[u8; 100]>::try_from(toc).ok());
		}

		if flags & 0x08 != 0 && cursor.skip(4).is_err() {
			debug!("Xing frame is missing its quality indicator");
		}

		if cursor.remaining() >= LAME_BYTES_BEFORE_DELAY + 3 {
			if let Ok(packed) = cursor
				.skip(LAME_BYTES_BEFORE_DELAY)
				.and_then(|_| cursor.read_u24())
			{
				frame.encoder_delay = Some((packed & 0xFF_F000) >> 12);
				frame.encoder_padding = Some(packed & 0xFFF);
			}
		} else {
			debug!("Xing frame has no LAME extension, encoder delay and padding are unknown");
		}

		frame
	}

	/// Duration of a `Xing` stream in microseconds
	///
	/// `None` without a (non-zero) frame count.
	pub fn duration_us(&self, header: &FrameHeader) -> Option<u64> {
		let frame_count = self.frame_count.filter(|count| *count > 0)?;
		if header.sample_rate == 0 {
			return None;
		}

		// Audio requires both a start and end sample, so one is subtracted from the total
		let samples = u64::from(frame_count) * u64::from(header.samples_per_frame) - 1;
		Some(samples * MICROS_PER_SECOND / u64::from(header.sample_rate))
	}
}

/// A parsed `VBRI` frame (Fraunhofer encoder)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VbriFrame {
	/// Size of the audio data in bytes
	pub data_size: Option<u32>,
	/// Number of audio frames
	pub frame_count: Option<u32>,
}

impl VbriFrame {
	/// Parse the fields following the 4 byte tag
	pub fn parse(cursor: &mut ByteCursor<'_>) -> Self {
		// Version (2), delay (2), quality (2)
		let data_size = cursor.skip(6).and_then(|_| cursor.read_u32()).ok();
		let frame_count = cursor.read_u32().ok();

		Self {
			data_size,
			frame_count,
		}
	}

	/// Duration in microseconds, `None` without a positive frame count
	pub fn duration_us(&self, header: &FrameHeader) -> Option<u64> {
		let frame_count = self.frame_count.filter(|count| *count > 0 && *count <= i32::MAX as u32)?;
		if header.sample_rate == 0 {
			return None;
		}

		let samples_per_frame: u128 = if header.sample_rate >= 32000 { 1152 } else { 576 };
		let us = u128::from(frame_count) * u128::from(MICROS_PER_SECOND) * samples_per_frame
			/ u128::from(header.sample_rate);

		u64::try_from(us).ok()
	}
}

/// The side information found in the first frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeekFrame {
	/// A LAME `Xing` or `Info` frame
	Xing(XingFrame),
	/// A Fraunhofer `VBRI` frame
	Vbri(VbriFrame),
}

impl SeekFrame {
	/// Look for side information in `frame`, the complete first frame including its header
	///
	/// Returns `None` when the frame is ordinary audio.
	pub fn locate(frame: &[u8], header: &FrameHeader) -> Option<Self> {
		let base = xing_base(header);

		if frame.len() >= base + 4 {
			let mut cursor = ByteCursor::new(&frame[base..]);
			let kind = match cursor.read_bytes(4) {
				Ok(tag) if tag == SEEK_HEADER_XING => Some(XingKind::Xing),
				Ok(tag) if tag == SEEK_HEADER_INFO => Some(XingKind::Info),
				_ => None,
			};

			if let Some(kind) = kind {
				return Some(Self::Xing(XingFrame::parse(kind, &mut cursor)));
			}
		}

		if frame.len() >= VBRI_OFFSET + 4 && &frame[VBRI_OFFSET..VBRI_OFFSET + 4] == SEEK_HEADER_VBRI
		{
			let mut cursor = ByteCursor::new(&frame[VBRI_OFFSET + 4..]);
			return Some(Self::Vbri(VbriFrame::parse(&mut cursor)));
		}

		None
	}

	/// Number of audio frames, if declared
	pub fn frame_count(&self) -> Option<u32> {
		match self {
			Self::Xing(xing) => xing.frame_count,
			Self::Vbri(vbri) => vbri.frame_count,
		}
	}

	/// Size of the audio data, if declared
	pub fn data_size(&self) -> Option<u32> {
		match self {
			Self::Xing(xing) => xing.data_size,
			Self::Vbri(vbri) => vbri.data_size,
		}
	}
}
