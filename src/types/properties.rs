use std::time::Duration;

#[derive(Debug, PartialEq, Eq, Clone, Default)]
/// Audio parameters a reader recovers from container headers
///
/// Every field is optional, readers only fill in what the stream declares.
pub struct StreamParameters {
	pub(crate) duration: Option<Duration>,
	pub(crate) bitrate: Option<u32>,
	pub(crate) sample_rate: Option<u32>,
	pub(crate) channels: Option<u8>,
	pub(crate) bits_per_sample: Option<u8>,
	pub(crate) total_samples: Option<u64>,
	pub(crate) frame_count: Option<u32>,
	pub(crate) encoder_delay: Option<u32>,
	pub(crate) encoder_padding: Option<u32>,
}

impl StreamParameters {
	/// Duration
	pub fn duration(&self) -> Option<Duration> {
		self.duration
	}

	/// Bitrate (bits per second)
	///
	/// For MPEG this is the average bitrate when a Xing header declares the data size,
	/// otherwise the bitrate of the first frame. For FLAC it is the uncompressed PCM rate.
	pub fn bitrate(&self) -> Option<u32> {
		self.bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> Option<u32> {
		self.sample_rate
	}

	/// Channel count
	pub fn channels(&self) -> Option<u8> {
		self.channels
	}

	/// Bits per sample (FLAC only)
	pub fn bits_per_sample(&self) -> Option<u8> {
		self.bits_per_sample
	}

	/// Total number of inter-channel samples (FLAC only)
	pub fn total_samples(&self) -> Option<u64> {
		self.total_samples
	}

	/// Number of audio frames declared by a Xing or VBRI header
	pub fn frame_count(&self) -> Option<u32> {
		self.frame_count
	}

	/// Samples of encoder delay to trim from the start
	pub fn encoder_delay(&self) -> Option<u32> {
		self.encoder_delay
	}

	/// Samples of encoder padding to trim from the end
	pub fn encoder_padding(&self) -> Option<u32> {
		self.encoder_padding
	}
}
