//! Builders for synthetic MP3 and FLAC streams

use std::sync::Once;

static LOGGER: Once = Once::new();

pub fn init_logger() {
	LOGGER.call_once(|| lovely_env_logger::init_default());
}

// MPEG-1 layer III, 128kbps, 44.1kHz, joint stereo, 417 byte frames
pub const MPEG_HEADER: u32 = 0xFFFB_9044;
pub const MPEG_FRAME_SIZE: usize = 417;

pub fn mpeg_frames(count: usize) -> Vec<u8> {
	let mut data = Vec::with_capacity(count * MPEG_FRAME_SIZE);
	for _ in 0..count {
		data.extend_from_slice(&MPEG_HEADER.to_be_bytes());
		data.resize(data.len() + MPEG_FRAME_SIZE - 4, 0x55);
	}
	data
}

/// A first frame holding a `Xing` (or `Info`) header with a frame count, data size and
/// LAME delay/padding
pub fn xing_frame(tag: &[u8; 4], frame_count: u32, data_size: u32, delay: u16, padding: u16) -> Vec<u8> {
	let mut frame = MPEG_HEADER.to_be_bytes().to_vec();
	// Side information of a stereo MPEG-1 frame
	frame.resize(36, 0);
	frame.extend_from_slice(tag);
	frame.extend_from_slice(&0x03_u32.to_be_bytes());
	frame.extend_from_slice(&frame_count.to_be_bytes());
	frame.extend_from_slice(&data_size.to_be_bytes());
	frame.extend_from_slice(b"LAME3.100");
	frame.extend_from_slice(&[0; 12]);

	let packed = u32::from(delay) << 12 | u32::from(padding);
	frame.extend_from_slice(&packed.to_be_bytes()[1..]);

	frame.resize(MPEG_FRAME_SIZE, 0);
	frame
}

pub fn id3v2_frame(id: &[u8; 4], content: &[u8]) -> Vec<u8> {
	let mut frame = id.to_vec();
	frame.extend_from_slice(&(content.len() as u32).to_be_bytes());
	frame.extend_from_slice(&[0, 0]);
	frame.extend_from_slice(content);
	frame
}

/// An ID3v2.3 text frame, UTF-8 encoded
pub fn text_frame(id: &[u8; 4], value: &str) -> Vec<u8> {
	let mut content = vec![3];
	content.extend_from_slice(value.as_bytes());
	id3v2_frame(id, &content)
}

pub fn comment_frame(description: &str, text: &str) -> Vec<u8> {
	let mut content = vec![0];
	content.extend_from_slice(b"eng");
	content.extend_from_slice(description.as_bytes());
	content.push(0);
	content.extend_from_slice(text.as_bytes());
	id3v2_frame(b"COMM", &content)
}

/// An ID3v2.3 tag holding `frames`
pub fn id3v2_tag(frames: &[Vec<u8>]) -> Vec<u8> {
	let body = frames.concat();
	let size = body.len() as u32;
	assert!(size < 0x1000_0000);

	let synchsafe = (size & 0x7F)
		| (size & 0x3F80) << 1
		| (size & 0x1F_C000) << 2
		| (size & 0x0FE0_0000) << 3;

	let mut tag = vec![b'I', b'D', b'3', 3, 0, 0];
	tag.extend_from_slice(&synchsafe.to_be_bytes());
	tag.extend(body);
	tag
}

pub fn flac_block(ty: u8, last: bool, content: &[u8]) -> Vec<u8> {
	let mut block = vec![if last { ty | 0x80 } else { ty }];
	block.extend_from_slice(&(content.len() as u32).to_be_bytes()[1..]);
	block.extend_from_slice(content);
	block
}

pub fn stream_info(sample_rate: u32, channels: u8, bits_per_sample: u8, total_samples: u64) -> Vec<u8> {
	let mut data = Vec::new();
	data.extend_from_slice(&4096_u16.to_be_bytes());
	data.extend_from_slice(&4096_u16.to_be_bytes());
	data.extend_from_slice(&[0, 0, 0x0E]);
	data.extend_from_slice(&[0, 0x3A, 0x98]);

	let packed = u64::from(sample_rate) << 44
		| u64::from(channels - 1) << 41
		| u64::from(bits_per_sample - 1) << 36
		| total_samples;
	data.extend_from_slice(&packed.to_be_bytes());
	data.extend_from_slice(&[0; 16]);
	data
}

pub fn vorbis_comments(vendor: &str, comments: &[&str]) -> Vec<u8> {
	let mut data = (vendor.len() as u32).to_le_bytes().to_vec();
	data.extend_from_slice(vendor.as_bytes());
	data.extend_from_slice(&(comments.len() as u32).to_le_bytes());
	for comment in comments {
		data.extend_from_slice(&(comment.len() as u32).to_le_bytes());
		data.extend_from_slice(comment.as_bytes());
	}
	data
}

pub fn picture(pic_type: u32, mime: &str, data: &[u8]) -> Vec<u8> {
	let mut block = pic_type.to_be_bytes().to_vec();
	block.extend_from_slice(&(mime.len() as u32).to_be_bytes());
	block.extend_from_slice(mime.as_bytes());
	// Empty description
	block.extend_from_slice(&0_u32.to_be_bytes());
	for value in [1_u32, 1, 24, 0] {
		block.extend_from_slice(&value.to_be_bytes());
	}
	block.extend_from_slice(&(data.len() as u32).to_be_bytes());
	block.extend_from_slice(data);
	block
}
