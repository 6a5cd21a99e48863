use crate::types::entry::{MetadataList, TagEntry};

use lazy_static::lazy_static;
use regex::Regex;

const ITUNES_GAPLESS_DESCRIPTION: &str = "iTunSMPB";
const ITUNES_DOMAIN: &str = "com.apple.iTunes";

lazy_static! {
	// " 00000000 DDDDDDDD PPPPPPPP ..." (hex delay and padding, then the sample count)
	static ref ITUNES_SMPB: Regex =
		Regex::new("^ [0-9a-fA-F]{8} ([0-9a-fA-F]{8}) ([0-9a-fA-F]{8})").expect("Regex error");
}

/// Samples to trim from the start and end of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaplessInfo {
	/// Samples of encoder delay
	pub encoder_delay: u32,
	/// Samples of encoder padding
	pub encoder_padding: u32,
}

impl GaplessInfo {
	/// Values from a LAME header, `None` unless at least one is non-zero
	pub fn from_lame(encoder_delay: Option<u32>, encoder_padding: Option<u32>) -> Option<Self> {
		Self::non_zero(encoder_delay.unwrap_or(0), encoder_padding.unwrap_or(0))
	}

	/// Values from the first `iTunSMPB` comment or internal frame that holds any
	pub fn from_metadata(metadata: &MetadataList) -> Option<Self> {
		metadata.iter().find_map(|entry| match entry {
			TagEntry::Comment(comment) if comment.description == ITUNES_GAPLESS_DESCRIPTION => {
				Self::from_itunes(&comment.text)
			},
			TagEntry::Internal(internal)
				if internal.domain == ITUNES_DOMAIN
					&& internal.description == ITUNES_GAPLESS_DESCRIPTION =>
			{
				Self::from_itunes(&internal.text)
			},
			_ => None,
		})
	}

	fn from_itunes(value: &str) -> Option<Self> {
		let captures = ITUNES_SMPB.captures(value)?;

		let parse = |index| {
			captures
				.get(index)
				.and_then(|m| u32::from_str_radix(m.as_str(), 16).ok())
		};

		match (parse(1), parse(2)) {
			(Some(delay), Some(padding)) => Self::non_zero(delay, padding),
			_ => {
				debug!("Ignoring invalid iTunSMPB value: {value}");
				None
			},
		}
	}

	fn non_zero(encoder_delay: u32, encoder_padding: u32) -> Option<Self> {
		(encoder_delay > 0 || encoder_padding > 0).then_some(Self {
			encoder_delay,
			encoder_padding,
		})
	}
}
