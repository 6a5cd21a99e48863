//! MPEG audio frame synchronization
//!
//! A stream is considered synchronized once 4 consecutive frames with matching headers are
//! found. The search is a pure state machine ([`SyncState::step`]), driven over a
//! [`ByteSource`] by [`synchronize`].

use super::header::FrameHeader;
use crate::error::{MetaError, Result};
use crate::source::ByteSource;

/// Number of consecutive matching frames needed to synchronize
pub const REQUIRED_MATCHES: u8 = 4;

/// What the search should do when its budget runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
	/// The caller already committed to MPEG, exhaustion is an error
	Read,
	/// The caller is only probing the format, exhaustion means "not MPEG"
	Sniff,
}

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncInput {
	/// The 4 bytes at the current search position, big endian
	Header(u32),
	/// Fewer than 4 bytes were available where a header was expected
	EndOfInput,
	/// The input ended while skipping the body of the last frame
	TruncatedFrame,
}

/// What the driver has to do before the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
	/// Skip the rest of the current frame (`frame_size - 4` bytes), then read a header
	SkipFrame(usize),
	/// Restart the search `offset` bytes after the starting point, then read a header
	Restart(usize),
	/// The state is terminal
	Done,
}

/// State of the frame search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
	/// Looking for a first valid header
	Seeking {
		/// Bytes skipped so far
		searched: usize,
		/// Bytes that may be skipped before giving up
		limit: usize,
	},
	/// Found at least one valid header, confirming the following frames match it
	Candidate {
		/// Bytes skipped so far
		searched: usize,
		/// Bytes that may be skipped before giving up
		limit: usize,
		/// The first header of the run
		header: FrameHeader,
		/// Number of matching frames seen, including the first
		matches: u8,
	},
	/// Terminal: the stream starts `offset` bytes after the starting point
	Synchronized {
		/// Distance from the starting point to the first frame
		offset: usize,
		/// The first frame's header
		header: FrameHeader,
	},
	/// Terminal: no run of frames was found within the budget
	Exhausted,
	/// Terminal: the input ended before any valid frame was found
	Truncated,
}

impl SyncState {
	/// Start a search that gives up after skipping `limit` bytes
	pub fn new(limit: usize) -> Self {
		Self::Seeking { searched: 0, limit }
	}

	/// Whether no further input is expected
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			Self::Synchronized { .. } | Self::Exhausted | Self::Truncated
		)
	}

	/// Advance the search by one observation
	pub fn step(self, input: SyncInput) -> (SyncState, SyncAction) {
		match (self, input) {
			(Self::Seeking { .. }, SyncInput::EndOfInput | SyncInput::TruncatedFrame) => {
				(Self::Truncated, SyncAction::Done)
			},
			// End of input after at least one complete frame is good enough
			(
				Self::Candidate {
					searched, header, ..
				},
				SyncInput::EndOfInput,
			) => (
				Self::Synchronized {
					offset: searched,
					header,
				},
				SyncAction::Done,
			),
			// Every frame before the one being skipped is complete
			(
				Self::Candidate {
					searched,
					header,
					matches,
					..
				},
				SyncInput::TruncatedFrame,
			) => {
				if matches > 1 {
					(
						Self::Synchronized {
							offset: searched,
							header,
						},
						SyncAction::Done,
					)
				} else {
					debug!(
						"Candidate MPEG frame at offset {searched} is cut off by the end of input"
					);
					(Self::Truncated, SyncAction::Done)
				}
			},
			(Self::Seeking { searched, limit }, SyncInput::Header(data)) => {
				match FrameHeader::parse(data) {
					Some(header) => {
						trace!("Candidate MPEG frame at offset {searched}");
						(
							Self::Candidate {
								searched,
								limit,
								header,
								matches: 1,
							},
							SyncAction::SkipFrame(header.frame_size.saturating_sub(4)),
						)
					},
					None => Self::mismatch(searched, limit),
				}
			},
			(
				Self::Candidate {
					searched,
					limit,
					header,
					matches,
				},
				SyncInput::Header(data),
			) => {
				let next = if header.matches(data) {
					FrameHeader::parse(data)
				} else {
					None
				};

				match next {
					Some(_) if matches + 1 == REQUIRED_MATCHES => (
						Self::Synchronized {
							offset: searched,
							header,
						},
						SyncAction::Done,
					),
					Some(next) => (
						Self::Candidate {
							searched,
							limit,
							header,
							matches: matches + 1,
						},
						SyncAction::SkipFrame(next.frame_size.saturating_sub(4)),
					),
					None => Self::mismatch(searched, limit),
				}
			},
			(terminal, _) => (terminal, SyncAction::Done),
		}
	}

	fn mismatch(searched: usize, limit: usize) -> (SyncState, SyncAction) {
		if searched == limit {
			return (Self::Exhausted, SyncAction::Done);
		}

		let searched = searched + 1;
		(
			Self::Seeking { searched, limit },
			SyncAction::Restart(searched),
		)
	}
}

/// Find the first of 4 consecutive matching frames
///
/// The search starts at the source's peek position, so a caller can search past bytes it only
/// peeked. On success in [`SyncMode::Read`] the source is positioned at the first frame, in
/// [`SyncMode::Sniff`] only the peek position is moved there. On failure the peek position is
/// left wherever the search stopped.
///
/// # Errors
///
/// * [`SyncMode::Read`] and no frames were found within `limit` bytes ([`MetaError::SearchExhausted`])
/// * [`SyncMode::Read`] and the input ended before any valid frame ([`MetaError::MalformedContainer`])
/// * The source fails
pub fn synchronize(
	source: &mut dyn ByteSource,
	mode: SyncMode,
	limit: usize,
) -> Result<Option<FrameHeader>> {
	let start = source.peek_position() - source.position();

	let mut state = SyncState::new(limit);
	let mut scratch = [0; 4];
	let mut at_end = None;

	loop {
		let input = if let Some(input) = at_end {
			input
		} else {
			match source.peek_fully(&mut scratch, true) {
				Ok(true) => SyncInput::Header(u32::from_be_bytes(scratch)),
				Ok(false) => SyncInput::EndOfInput,
				Err(err) if err.is_end_of_input() => SyncInput::EndOfInput,
				Err(err) => return Err(err),
			}
		};

		let (next, action) = state.step(input);
		state = next;

		let (advanced, on_end) = match action {
			SyncAction::SkipFrame(n) => (
				source.advance_peek_position(n as u64, true),
				SyncInput::TruncatedFrame,
			),
			SyncAction::Restart(offset) => {
				source.reset_peek_position();
				(
					source.advance_peek_position(start + offset as u64, true),
					SyncInput::EndOfInput,
				)
			},
			SyncAction::Done => break,
		};

		// Running off the end while skipping is reported on the next step
		at_end = match advanced {
			Ok(true) => None,
			Ok(false) => Some(on_end),
			Err(err) if err.is_end_of_input() => Some(on_end),
			Err(err) => return Err(err),
		};
	}

	match state {
		SyncState::Synchronized { offset, header } => {
			let distance = start + offset as u64;
			debug!(
				"Synchronized to MPEG stream {distance} bytes after {}",
				source.position()
			);

			source.reset_peek_position();
			match mode {
				SyncMode::Read => source.skip_fully(distance)?,
				SyncMode::Sniff => {
					source.advance_peek_position(distance, false)?;
				},
			}

			Ok(Some(header))
		},
		SyncState::Exhausted if mode == SyncMode::Read => Err(MetaError::SearchExhausted),
		SyncState::Truncated if mode == SyncMode::Read => Err(MetaError::MalformedContainer(
			"Unable to find an MPEG frame",
		)),
		_ => Ok(None),
	}
}
