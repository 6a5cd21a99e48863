use super::gapless::GaplessInfo;
use super::header::FrameHeader;
use super::seek_frame::{SeekFrame, XingKind};
use crate::types::entry::MetadataList;
use crate::types::properties::StreamParameters;

use std::time::Duration;

const MICROS_PER_SECOND: u128 = 1_000_000;

/// Where the stream's audio frames are, for bitrate based estimates
#[derive(Debug, Clone, Copy)]
pub(super) struct StreamLayout {
	/// Position of the first frame (the side information frame, if there is one)
	pub first_frame_position: u64,
	/// Position of the first frame holding audio
	pub audio_position: u64,
	/// Length of the whole input, if known
	pub length: Option<u64>,
}

/// `bytes` of constant bitrate audio, in microseconds
fn estimate_us(bytes: u64, bitrate: u32) -> Option<u64> {
	if bitrate == 0 {
		return None;
	}

	u64::try_from(u128::from(bytes) * 8 * MICROS_PER_SECOND / u128::from(bitrate)).ok()
}

fn duration_us(
	header: &FrameHeader,
	seek_frame: Option<&SeekFrame>,
	id3: Option<&MetadataList>,
	layout: StreamLayout,
) -> Option<u64> {
	let from_seek_frame = match seek_frame {
		Some(SeekFrame::Xing(xing)) if xing.kind == XingKind::Xing => xing.duration_us(header),
		Some(SeekFrame::Xing(info)) => info.data_size.and_then(|data_size| {
			let data_end = layout.first_frame_position + u64::from(data_size);
			estimate_us(data_end.saturating_sub(layout.audio_position), header.bitrate)
		}),
		Some(SeekFrame::Vbri(vbri)) => vbri.duration_us(header),
		None => None,
	};

	if from_seek_frame.is_some() {
		return from_seek_frame;
	}

	let from_tlen = id3
		.and_then(|metadata| metadata.text(&["TLEN", "TLE"]))
		.and_then(|tlen| tlen.value())
		.and_then(|ms| ms.trim().parse::<u64>().ok())
		.filter(|ms| *ms > 0)
		.map(|ms| ms * 1000);

	if from_tlen.is_some() {
		trace!("Using the ID3 TLEN frame for the stream duration");
		return from_tlen;
	}

	let length = layout.length?;
	estimate_us(
		length.saturating_sub(layout.first_frame_position),
		header.bitrate,
	)
}

/// Fill in [`StreamParameters`] for a synchronized stream
///
/// Duration comes from the first available of: the `Xing`/`Info`/`VBRI` frame, an ID3 `TLEN`
/// frame, and a constant bitrate estimate over the rest of the input. Gapless values from an
/// `iTunSMPB` comment win over those of a LAME header.
pub(super) fn read_properties(
	header: &FrameHeader,
	seek_frame: Option<&SeekFrame>,
	id3: Option<&MetadataList>,
	layout: StreamLayout,
	read_properties: bool,
) -> StreamParameters {
	let gapless = id3.and_then(GaplessInfo::from_metadata).or_else(|| match seek_frame {
		Some(SeekFrame::Xing(xing)) => {
			GaplessInfo::from_lame(xing.encoder_delay, xing.encoder_padding)
		},
		_ => None,
	});

	let mut properties = StreamParameters {
		encoder_delay: gapless.map(|info| info.encoder_delay),
		encoder_padding: gapless.map(|info| info.encoder_padding),
		..StreamParameters::default()
	};

	if !read_properties {
		return properties;
	}

	let duration_us = duration_us(header, seek_frame, id3, layout);

	let average_bitrate = match (seek_frame.and_then(SeekFrame::data_size), duration_us) {
		(Some(data_size), Some(us)) if data_size > 0 && us > 0 => {
			u32::try_from(u128::from(data_size) * 8 * MICROS_PER_SECOND / u128::from(us)).ok()
		},
		_ => None,
	};

	properties.duration = duration_us.map(Duration::from_micros);
	properties.bitrate = average_bitrate.or(Some(header.bitrate));
	properties.sample_rate = Some(header.sample_rate);
	properties.channels = Some(header.channels);
	properties.frame_count = seek_frame.and_then(SeekFrame::frame_count);

	properties
}
