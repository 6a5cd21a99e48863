use crate::cursor::ByteCursor;
use crate::error::{MetaError, Result};

use std::time::Duration;

pub(super) const STREAM_INFO_SIZE: usize = 34;

// The smallest possible frame header
const MIN_FRAME_HEADER_SIZE: u32 = 6;

const SEEK_POINT_SIZE: usize = 18;
const PLACEHOLDER_SEEK_POINT: u64 = u64::MAX;

/// The contents of a STREAMINFO block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
	/// Minimum block size (in samples)
	pub min_block_size: u16,
	/// Maximum block size (in samples)
	pub max_block_size: u16,
	/// Minimum frame size (in bytes), never below the size of a frame header
	pub min_frame_size: u32,
	/// Maximum frame size (in bytes), 0 when unknown
	pub max_frame_size: u32,
	/// Sample rate (Hz)
	pub sample_rate: u32,
	/// Channel count
	pub channels: u8,
	/// Bits per sample
	pub bits_per_sample: u8,
	/// Total number of inter-channel samples, 0 when unknown
	pub total_samples: u64,
	/// MD5 signature of the unencoded audio
	pub md5_signature: [u8; 16],
}

impl StreamInfo {
	/// Decode a STREAMINFO block
	///
	/// # Errors
	///
	/// `data` is shorter than 34 bytes
	pub fn parse(data: &[u8]) -> Result<Self> {
		if data.len() < STREAM_INFO_SIZE {
			return Err(MetaError::MalformedContainer(
				"FLAC STREAMINFO block is too short",
			));
		}

		let mut cursor = ByteCursor::new(data);

		let min_block_size = cursor.read_u16()?;
		let max_block_size = cursor.read_u16()?;
		let min_frame_size = cursor.read_u24()?.max(MIN_FRAME_HEADER_SIZE);
		let max_frame_size = cursor.read_u24()?;

		// Sample rate (20 bits), channels - 1 (3 bits), bits per sample - 1 (5 bits),
		// total samples (36 bits)
		let packed = cursor.read_u64()?;
		let sample_rate = (packed >> 44) as u32;
		let channels = ((packed >> 41) & 0x7) as u8 + 1;
		let bits_per_sample = ((packed >> 36) & 0x1F) as u8 + 1;
		let total_samples = packed & 0xF_FFFF_FFFF;

		let mut md5_signature = [0; 16];
		md5_signature.copy_from_slice(cursor.read_bytes(16)?);

		Ok(Self {
			min_block_size,
			max_block_size,
			min_frame_size,
			max_frame_size,
			sample_rate,
			channels,
			bits_per_sample,
			total_samples,
			md5_signature,
		})
	}

	/// Duration, `None` when the sample count or sample rate is unknown
	pub fn duration(&self) -> Option<Duration> {
		if self.total_samples == 0 || self.sample_rate == 0 {
			return None;
		}

		let us = u128::from(self.total_samples) * 1_000_000 / u128::from(self.sample_rate);
		u64::try_from(us).ok().map(Duration::from_micros)
	}

	/// Bitrate of the decoded PCM stream (bits per second)
	pub fn bitrate(&self) -> u32 {
		self.sample_rate * u32::from(self.channels) * u32::from(self.bits_per_sample)
	}
}

/// A SEEKTABLE entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekPoint {
	/// Number of the first sample in the target frame
	pub sample_number: u64,
	/// Offset of the target frame from the first frame's header
	pub stream_offset: u64,
	/// Number of samples in the target frame
	pub frame_samples: u16,
}

/// Decode a SEEKTABLE block, dropping placeholder points
pub fn parse_seek_table(data: &[u8]) -> Vec<SeekPoint> {
	if data.len() % SEEK_POINT_SIZE != 0 {
		debug!("FLAC SEEKTABLE length is not a multiple of {SEEK_POINT_SIZE}");
	}

	data.chunks_exact(SEEK_POINT_SIZE)
		.filter_map(|point| {
			let mut cursor = ByteCursor::new(point);
			let sample_number = cursor.read_u64().ok()?;
			if sample_number == PLACEHOLDER_SEEK_POINT {
				return None;
			}

			Some(SeekPoint {
				sample_number,
				stream_offset: cursor.read_u64().ok()?,
				frame_samples: cursor.read_u16().ok()?,
			})
		})
		.collect()
}
