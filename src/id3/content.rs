use super::decoder::{FrameContext, Id3Decoder};
use super::text::{decode_span, index_of_terminator, read_terminated, read_values, TextEncoding};
use super::Id3v2Version;
use crate::cursor::ByteCursor;
use crate::error::{MetaError, Result};
use crate::types::entry::{
	BinaryFrame, ChapterFrame, ChapterTocFrame, CommentFrame, InternalFrame, TagEntry, TextFrame,
	UrlFrame,
};
use crate::types::picture::{Picture, PictureType};

/// Decode a frame payload into a [`TagEntry`]
///
/// `None` means the frame was understood but carries nothing usable.
pub(crate) fn decode_content(
	decoder: &Id3Decoder<'_>,
	context: FrameContext,
	id: &str,
	data: &[u8],
) -> Result<Option<TagEntry>> {
	let entry = match id {
		"TXXX" | "TXX" => read_user_text(id, data)?,
		_ if id.starts_with('T') => read_text(id, data)?,
		"WXXX" | "WXX" => read_user_url(id, data)?,
		_ if id.starts_with('W') => Some(read_url(id, data)),
		"APIC" | "PIC" => read_picture(data, context.version)?,
		"COMM" | "COM" => read_comment(data)?,
		"CHAP" if context.version != Id3v2Version::V2 => Some(read_chapter(decoder, context, data)?),
		"CTOC" if context.version != Id3v2Version::V2 => {
			Some(read_chapter_toc(decoder, context, data)?)
		},
		"----" => read_internal(data)?,
		// USLT is decoded lazily, see `crate::id3::uslt`
		_ => Some(TagEntry::Binary(BinaryFrame {
			id: id.to_string(),
			data: data.to_vec(),
		})),
	};

	Ok(entry)
}

fn encoding(byte: u8) -> Result<TextEncoding> {
	TextEncoding::from_u8(byte).ok_or(MetaError::Unsupported("Unknown ID3v2 text encoding"))
}

fn read_text(id: &str, data: &[u8]) -> Result<Option<TagEntry>> {
	let Some((&encoding_byte, content)) = data.split_first() else {
		return Ok(None);
	};

	Ok(Some(TagEntry::Text(TextFrame {
		id: id.to_string(),
		description: None,
		values: read_values(content, 0, encoding(encoding_byte)?),
	})))
}

fn read_user_text(id: &str, data: &[u8]) -> Result<Option<TagEntry>> {
	let Some((&encoding_byte, content)) = data.split_first() else {
		return Ok(None);
	};

	let encoding = encoding(encoding_byte)?;
	let (description, values_start) = read_terminated(content, 0, encoding);

	Ok(Some(TagEntry::Text(TextFrame {
		id: id.to_string(),
		description: Some(description),
		values: read_values(content, values_start, encoding),
	})))
}

fn read_url(id: &str, data: &[u8]) -> TagEntry {
	let end = index_of_terminator(data, 0, TextEncoding::Latin1);

	TagEntry::Url(UrlFrame {
		id: id.to_string(),
		description: None,
		url: decode_span(data, 0, end, TextEncoding::Latin1),
	})
}

fn read_user_url(id: &str, data: &[u8]) -> Result<Option<TagEntry>> {
	let Some((&encoding_byte, content)) = data.split_first() else {
		return Ok(None);
	};

	let (description, url_start) = read_terminated(content, 0, encoding(encoding_byte)?);
	let url_end = index_of_terminator(content, url_start, TextEncoding::Latin1);

	Ok(Some(TagEntry::Url(UrlFrame {
		id: id.to_string(),
		description: Some(description),
		url: decode_span(content, url_start, url_end, TextEncoding::Latin1),
	})))
}

fn read_comment(data: &[u8]) -> Result<Option<TagEntry>> {
	if data.len() < 4 {
		return Ok(None);
	}

	let mut cursor = ByteCursor::new(data);
	let encoding = encoding(cursor.read_u8()?)?;
	let language = cursor.read_fixed_string(3, TextEncoding::Latin1)?;

	let content = cursor.remaining_slice();
	let (description, text_start) = read_terminated(content, 0, encoding);
	let text_end = index_of_terminator(content, text_start, encoding);

	Ok(Some(TagEntry::Comment(CommentFrame {
		language,
		description,
		text: decode_span(content, text_start, text_end, encoding),
	})))
}

fn read_picture(data: &[u8], version: Id3v2Version) -> Result<Option<TagEntry>> {
	let mut cursor = ByteCursor::new(data);
	let encoding = encoding(cursor.read_u8()?)?;

	let mime_type = if version == Id3v2Version::V2 {
		// ID3v2.2 stores a 3 character image format instead of a MIME type
		let format = cursor
			.read_fixed_string(3, TextEncoding::Latin1)?
			.to_ascii_lowercase();

		if format == "jpg" {
			String::from("image/jpeg")
		} else {
			format!("image/{format}")
		}
	} else {
		let rest = cursor.remaining_slice();
		let end = index_of_terminator(rest, 0, TextEncoding::Latin1);
		let mime = decode_span(rest, 0, end, TextEncoding::Latin1).to_ascii_lowercase();
		cursor.skip((end + 1).min(rest.len()))?;

		if mime.contains('/') {
			mime
		} else {
			format!("image/{mime}")
		}
	};

	let pic_type = PictureType::from_u8(cursor.read_u8()?);

	let rest = cursor.remaining_slice();
	let (description, data_start) = read_terminated(rest, 0, encoding);

	Ok(Some(TagEntry::Picture(Picture {
		pic_type,
		mime_type,
		description,
		width: 0,
		height: 0,
		color_depth: 0,
		num_colors: 0,
		data: rest[data_start..].to_vec(),
	})))
}

fn read_internal(data: &[u8]) -> Result<Option<TagEntry>> {
	let Some((&encoding_byte, content)) = data.split_first() else {
		return Ok(None);
	};

	let encoding = encoding(encoding_byte)?;
	let (domain, description_start) = read_terminated(content, 0, encoding);
	let (description, text_start) = read_terminated(content, description_start, encoding);
	let text_end = index_of_terminator(content, text_start, encoding);

	Ok(Some(TagEntry::Internal(InternalFrame {
		domain,
		description,
		text: decode_span(content, text_start, text_end, encoding),
	})))
}

// Chapters nested deeper than this keep their own fields but lose their sub-frames
const MAX_SUB_FRAME_DEPTH: u8 = 8;

fn decode_sub_frames(
	decoder: &Id3Decoder<'_>,
	context: FrameContext,
	id: &str,
	data: &[u8],
) -> Result<Vec<TagEntry>> {
	if context.depth >= MAX_SUB_FRAME_DEPTH {
		warn!("{id} frames nested more than {MAX_SUB_FRAME_DEPTH} levels deep, dropping sub-frames");
		return Ok(Vec::new());
	}

	decoder.decode_frames(
		data,
		FrameContext {
			depth: context.depth + 1,
			..context
		},
	)
}

fn offset(value: u32) -> Option<u32> {
	(value != u32::MAX).then_some(value)
}

fn read_chapter(
	decoder: &Id3Decoder<'_>,
	context: FrameContext,
	data: &[u8],
) -> Result<TagEntry> {
	let id_end = index_of_terminator(data, 0, TextEncoding::Latin1);
	let chapter_id = decode_span(data, 0, id_end, TextEncoding::Latin1);

	let mut cursor = ByteCursor::new(data);
	cursor.set_position((id_end + 1).min(data.len()))?;

	let start_time_ms = cursor.read_u32()?;
	let end_time_ms = cursor.read_u32()?;
	let start_offset = offset(cursor.read_u32()?);
	let end_offset = offset(cursor.read_u32()?);

	let sub_frames = decode_sub_frames(decoder, context, "CHAP", cursor.remaining_slice())?;

	Ok(TagEntry::Chapter(ChapterFrame {
		chapter_id,
		start_time_ms,
		end_time_ms,
		start_offset,
		end_offset,
		sub_frames,
	}))
}

fn read_chapter_toc(
	decoder: &Id3Decoder<'_>,
	context: FrameContext,
	data: &[u8],
) -> Result<TagEntry> {
	let id_end = index_of_terminator(data, 0, TextEncoding::Latin1);
	let element_id = decode_span(data, 0, id_end, TextEncoding::Latin1);

	let mut cursor = ByteCursor::new(data);
	cursor.set_position((id_end + 1).min(data.len()))?;

	let flags = cursor.read_u8()?;
	let child_count = cursor.read_u8()?;

	let mut children = Vec::with_capacity(usize::from(child_count));
	for _ in 0..child_count {
		let start = cursor.position();
		let end = index_of_terminator(data, start, TextEncoding::Latin1);
		children.push(decode_span(data, start, end, TextEncoding::Latin1));
		cursor.set_position((end + 1).min(data.len()))?;
	}

	let sub_frames = decode_sub_frames(decoder, context, "CTOC", cursor.remaining_slice())?;

	Ok(TagEntry::ChapterToc(ChapterTocFrame {
		element_id,
		is_root: flags & 0x02 != 0,
		is_ordered: flags & 0x01 != 0,
		children,
		sub_frames,
	}))
}
