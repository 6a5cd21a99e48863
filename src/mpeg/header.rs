use super::constants::{
	BITRATE_V1_L1, BITRATE_V1_L2, BITRATE_V1_L3, BITRATE_V2, BITRATE_V2_L1,
	MPEG_AUDIO_HEADER_MASK, SAMPLES_PER_FRAME_L1, SAMPLES_PER_FRAME_L2, SAMPLES_PER_FRAME_L3_V1,
	SAMPLES_PER_FRAME_L3_V2, SAMPLE_RATE_V1,
};

pub(crate) fn verify_frame_sync(header: u32) -> bool {
	header & 0xFFE0_0000 == 0xFFE0_0000
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
#[allow(missing_docs)]
/// MPEG Audio version
pub enum MpegVersion {
	#[default]
	V1,
	V2,
	V2_5,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[allow(missing_docs)]
/// MPEG layer
pub enum Layer {
	Layer1 = 1,
	Layer2 = 2,
	#[default]
	Layer3 = 3,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[allow(missing_docs)]
/// Channel mode
pub enum ChannelMode {
	#[default]
	Stereo = 0,
	JointStereo = 1,
	DualChannel = 2,
	SingleChannel = 3,
}

/// A decoded MPEG audio frame header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameHeader {
	/// The raw 32 bit header
	pub data: u32,
	/// MPEG version
	pub version: MpegVersion,
	/// MPEG layer
	pub layer: Layer,
	/// Channel mode
	pub channel_mode: ChannelMode,
	/// Sample rate (Hz)
	pub sample_rate: u32,
	/// 1 for single channel streams, 2 otherwise
	pub channels: u8,
	/// Bitrate (bits per second)
	pub bitrate: u32,
	/// Size of the frame in bytes, header included
	pub frame_size: usize,
	/// Number of samples per channel in the frame
	pub samples_per_frame: u32,
}

impl FrameHeader {
	/// Decode a header, `None` if any field holds a reserved or invalid value
	pub fn parse(data: u32) -> Option<Self> {
		if !verify_frame_sync(data) {
			return None;
		}

		let version = match (data >> 19) & 0b11 {
			0 => MpegVersion::V2_5,
			2 => MpegVersion::V2,
			3 => MpegVersion::V1,
			_ => return None,
		};

		let layer = match (data >> 17) & 0b11 {
			1 => Layer::Layer3,
			2 => Layer::Layer2,
			3 => Layer::Layer1,
			_ => return None,
		};

		let bitrate_index = ((data >> 12) & 0xF) as usize;
		if bitrate_index == 0 || bitrate_index == 0xF {
			return None;
		}

		let sample_rate_index = ((data >> 10) & 0b11) as usize;
		if sample_rate_index == 3 {
			return None;
		}

		let sample_rate = match version {
			MpegVersion::V1 => SAMPLE_RATE_V1[sample_rate_index],
			MpegVersion::V2 => SAMPLE_RATE_V1[sample_rate_index] / 2,
			MpegVersion::V2_5 => SAMPLE_RATE_V1[sample_rate_index] / 4,
		};

		let table = match (version, layer) {
			(MpegVersion::V1, Layer::Layer1) => &BITRATE_V1_L1,
			(MpegVersion::V1, Layer::Layer2) => &BITRATE_V1_L2,
			(MpegVersion::V1, Layer::Layer3) => &BITRATE_V1_L3,
			(_, Layer::Layer1) => &BITRATE_V2_L1,
			_ => &BITRATE_V2,
		};
		let bitrate = table[bitrate_index - 1];

		let padding = (data >> 9) & 1;

		let frame_size = match (version, layer) {
			(_, Layer::Layer1) => (12 * bitrate / sample_rate + padding) * 4,
			(MpegVersion::V1, _) | (_, Layer::Layer2) => 144 * bitrate / sample_rate + padding,
			// Layer III, MPEG-2 and MPEG-2.5 frames hold half as many samples
			_ => 72 * bitrate / sample_rate + padding,
		};

		let samples_per_frame = match (version, layer) {
			(_, Layer::Layer1) => SAMPLES_PER_FRAME_L1,
			(_, Layer::Layer2) => SAMPLES_PER_FRAME_L2,
			(MpegVersion::V1, Layer::Layer3) => SAMPLES_PER_FRAME_L3_V1,
			_ => SAMPLES_PER_FRAME_L3_V2,
		};

		let channel_mode = match (data >> 6) & 0b11 {
			0 => ChannelMode::Stereo,
			1 => ChannelMode::JointStereo,
			2 => ChannelMode::DualChannel,
			_ => ChannelMode::SingleChannel,
		};

		let channels = if channel_mode == ChannelMode::SingleChannel {
			1
		} else {
			2
		};

		Some(Self {
			data,
			version,
			layer,
			channel_mode,
			sample_rate,
			channels,
			bitrate,
			frame_size: frame_size as usize,
			samples_per_frame,
		})
	}

	/// Whether `other` belongs to the same stream as this header
	pub fn matches(&self, other: u32) -> bool {
		headers_match(self.data, other)
	}
}

/// The size of the frame starting with `header`, `None` if the header is invalid
pub fn frame_size(header: u32) -> Option<usize> {
	FrameHeader::parse(header).map(|h| h.frame_size)
}

pub(crate) fn headers_match(a: u32, b: u32) -> bool {
	a & MPEG_AUDIO_HEADER_MASK == b & MPEG_AUDIO_HEADER_MASK
}

#[cfg(test)]
mod tests {
	use super::{frame_size, headers_match, ChannelMode, FrameHeader, Layer, MpegVersion};

	// MPEG-1 layer III, 128kbps, 44.1kHz, no padding, joint stereo
	const V1_L3_128: u32 = 0xFFFB_9044;

	#[test]
	fn parse_common_header() {
		let header = FrameHeader::parse(V1_L3_128).unwrap();

		assert_eq!(header.version, MpegVersion::V1);
		assert_eq!(header.layer, Layer::Layer3);
		assert_eq!(header.channel_mode, ChannelMode::JointStereo);
		assert_eq!(header.sample_rate, 44100);
		assert_eq!(header.bitrate, 128_000);
		assert_eq!(header.channels, 2);
		assert_eq!(header.frame_size, 417);
		assert_eq!(header.samples_per_frame, 1152);
	}

	#[test]
	fn padding_and_mono() {
		// Padding bit and single channel mode
		let header = FrameHeader::parse(V1_L3_128 | 0x200 | 0xC0).unwrap();
		assert_eq!(header.frame_size, 418);
		assert_eq!(header.channels, 1);
	}

	#[test]
	fn mpeg2_layer3() {
		// MPEG-2 layer III, 64kbps, 22.05kHz
		let header = FrameHeader::parse(0xFFF3_8000).unwrap();

		assert_eq!(header.version, MpegVersion::V2);
		assert_eq!(header.sample_rate, 22050);
		assert_eq!(header.bitrate, 64_000);
		assert_eq!(header.frame_size, 72 * 64_000 / 22050);
		assert_eq!(header.samples_per_frame, 576);
	}

	#[test]
	fn layer1_size() {
		// MPEG-1 layer I, 32kbps, 44.1kHz
		let header = FrameHeader::parse(0xFFFF_1000).unwrap();
		assert_eq!(header.layer, Layer::Layer1);
		assert_eq!(header.frame_size, (12 * 32_000 / 44100) * 4);
	}

	#[test]
	fn invalid_headers() {
		// Missing sync
		assert_eq!(frame_size(0x7FFB_9044), None);
		// Reserved version
		assert_eq!(frame_size(0xFFEB_9044), None);
		// Reserved layer
		assert_eq!(frame_size(0xFFF9_9044), None);
		// Free format and bad bitrate indices
		assert_eq!(frame_size(0xFFFB_0044), None);
		assert_eq!(frame_size(0xFFFB_F044), None);
		// Reserved sample rate
		assert_eq!(frame_size(0xFFFB_9C44), None);
	}

	#[test]
	fn frame_size_is_deterministic() {
		for version in [0_u32, 2, 3] {
			for layer in 1_u32..=3 {
				for bitrate_index in 0_u32..16 {
					for sample_rate_index in 0_u32..4 {
						for padding in 0_u32..2 {
							let header = 0xFFE0_0000
								| version << 19 | layer << 17
								| bitrate_index << 12 | sample_rate_index << 10
								| padding << 9;

							let first = frame_size(header);
							assert_eq!(first, frame_size(header));

							let invalid = bitrate_index == 0
								|| bitrate_index == 0xF || sample_rate_index == 3;
							assert_eq!(first.is_none(), invalid, "{header:#010x}");
							if let Some(size) = first {
								assert!(size > 0);
							}
						}
					}
				}
			}
		}
	}

	#[test]
	fn header_mask() {
		// Differing bitrate, padding and channel mode still match
		assert!(headers_match(V1_L3_128, 0xFFFB_A2C4));
		// Differing sample rate does not
		assert!(!headers_match(V1_L3_128, 0xFFFB_9444));
	}
}
