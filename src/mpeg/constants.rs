// Bitrates in bits per second, indexed by the header's bitrate index - 1
pub(crate) const BITRATE_V1_L1: [u32; 14] = [
	32_000, 64_000, 96_000, 128_000, 160_000, 192_000, 224_000, 256_000, 288_000, 320_000,
	352_000, 384_000, 416_000, 448_000,
];
pub(crate) const BITRATE_V2_L1: [u32; 14] = [
	32_000, 48_000, 56_000, 64_000, 80_000, 96_000, 112_000, 128_000, 144_000, 160_000, 176_000,
	192_000, 224_000, 256_000,
];
pub(crate) const BITRATE_V1_L2: [u32; 14] = [
	32_000, 48_000, 56_000, 64_000, 80_000, 96_000, 112_000, 128_000, 160_000, 192_000, 224_000,
	256_000, 320_000, 384_000,
];
pub(crate) const BITRATE_V1_L3: [u32; 14] = [
	32_000, 40_000, 48_000, 56_000, 64_000, 80_000, 96_000, 112_000, 128_000, 160_000, 192_000,
	224_000, 256_000, 320_000,
];
// Shared by layer II and III
pub(crate) const BITRATE_V2: [u32; 14] = [
	8_000, 16_000, 24_000, 32_000, 40_000, 48_000, 56_000, 64_000, 80_000, 96_000, 112_000,
	128_000, 144_000, 160_000,
];

// MPEG-1 sample rates, halved for MPEG-2 and quartered for MPEG-2.5
pub(crate) const SAMPLE_RATE_V1: [u32; 3] = [44100, 48000, 32000];

pub(crate) const SAMPLES_PER_FRAME_L1: u32 = 384;
pub(crate) const SAMPLES_PER_FRAME_L2: u32 = 1152;
pub(crate) const SAMPLES_PER_FRAME_L3_V1: u32 = 1152;
pub(crate) const SAMPLES_PER_FRAME_L3_V2: u32 = 576;

/// Bits that must agree between frames of one stream
///
/// Covers the sync word, version, layer and sample rate index. Bitrate, padding, protection
/// and the private/copyright/original/emphasis bits are allowed to change.
pub const MPEG_AUDIO_HEADER_MASK: u32 = 0xFFFE_0C00;

/// Bytes searched for a synchronized stream when reading
pub const MAX_SYNC_BYTES: usize = 128 * 1024;

/// Bytes searched for a synchronized stream when sniffing, excluding ID3 tags
pub const MAX_SNIFF_BYTES: usize = 32 * 1024;

pub(crate) const SEEK_HEADER_XING: &[u8; 4] = b"Xing";
pub(crate) const SEEK_HEADER_INFO: &[u8; 4] = b"Info";
pub(crate) const SEEK_HEADER_VBRI: &[u8; 4] = b"VBRI";

// The 4 byte frame header and 32 bytes of side information
pub(crate) const VBRI_OFFSET: usize = 36;
