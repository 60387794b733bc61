/// Cuts `text` to at most `max_chars` characters.
///
/// Returns the (possibly borrowed) text and whether anything was removed. Characters are Unicode
/// scalar values, so a multi-byte character is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
	match text.char_indices().nth(max_chars) {
		Some((byte_idx, _)) => (&text[..byte_idx], true),
		None => (text, false),
	}
}

/// Lowercased, trimmed tag name, or `None` when nothing is left.
pub fn normalize_tag_name(raw: &str) -> Option<String> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.to_lowercase())
}
